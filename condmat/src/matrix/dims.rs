use std::fmt::{Display, Formatter, Write};

/// Shape of a row-major matrix: `Dim2(rows, cols)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Dim2(pub usize, pub usize);

impl Dim2 {
    #[inline]
    pub fn square(width: usize) -> Self {
        Dim2(width, width)
    }
    #[inline]
    pub fn rows(&self) -> usize {
        self.0
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.1
    }
    /// Element count, `None` when `rows * cols` overflows.
    #[inline]
    pub fn checked_len(&self) -> Option<usize> {
        self.0.checked_mul(self.1)
    }
    /// Element count. Panics when it does not fit in `usize`.
    #[inline]
    pub fn len(&self) -> usize {
        match self.checked_len() {
            Some(len) => len,
            None => panic!("dimension {self} overflows usize"),
        }
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0 || self.1 == 0
    }
    #[inline]
    pub fn is_square(&self) -> bool {
        self.0 == self.1
    }
    #[inline]
    pub fn transposed(&self) -> Self {
        Dim2(self.1, self.0)
    }
}

impl From<(usize, usize)> for Dim2 {
    #[inline]
    fn from((rows, cols): (usize, usize)) -> Self {
        Dim2(rows, cols)
    }
}

impl Display for Dim2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_char('(')?;
        Display::fmt(&self.0, f)?;
        f.write_str(", ")?;
        Display::fmt(&self.1, f)?;
        f.write_char(')')
    }
}

#[cfg(test)]
mod test {
    use super::Dim2;

    const HALF_BITS: u32 = usize::BITS / 2;

    #[test]
    fn test_len() {
        assert_eq!(Dim2(3, 4).len(), 12);
        assert_eq!(Dim2(3, 4).checked_len(), Some(12));
        assert!(Dim2(0, 7).is_empty());
        assert_eq!(Dim2(1 << HALF_BITS, 1 << HALF_BITS).checked_len(), None);
        assert!(!Dim2(1 << HALF_BITS, 1 << HALF_BITS).is_empty());
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn test_len_overflow() {
        Dim2::square(1 << HALF_BITS).len();
    }
}
