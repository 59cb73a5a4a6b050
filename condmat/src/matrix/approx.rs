use crate::matrix::Matrix;
use approx::{AbsDiffEq, RelativeEq};
use std::iter::zip;

impl<T: AbsDiffEq> AbsDiffEq for Matrix<T>
where
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;
    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.dims() == other.dims() && zip(self.as_slice(), other.as_slice()).all(|(a, b)| T::abs_diff_eq(a, b, epsilon))
    }
}

impl<T: RelativeEq> RelativeEq for Matrix<T>
where
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.dims() == other.dims()
            && zip(self.as_slice(), other.as_slice()).all(|(a, b)| T::relative_eq(a, b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod test {
    use approx::{assert_relative_eq, assert_relative_ne};

    #[test]
    fn test_relative_eq() {
        let a = crate::matrix![[1.0, 2.0], [3.0, 4.0]];
        let b = crate::matrix![[1.0 + 1e-12, 2.0], [3.0, 4.0 - 1e-12]];
        assert_relative_eq!(a, b, max_relative = 1e-10);
        assert_relative_ne!(a, crate::matrix![[1.0, 2.0], [3.0, 4.1]], max_relative = 1e-10);
        assert_relative_ne!(a, crate::matrix![[1.0, 2.0, 3.0, 4.0]]);
    }
}
