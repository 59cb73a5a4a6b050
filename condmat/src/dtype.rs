use num_traits::{Float, Num, NumAssignOps};
use std::fmt::Debug;

pub trait DType: 'static + Sized + Copy + Debug + Num + NumAssignOps + PartialOrd {
    const ZERO: Self;
    const ONE: Self;
}

pub trait DTypeFloat: DType + Float {}

macro_rules! impl_dtype {
    ($ty:ty, $one:expr, $zero:expr $(,$other_trait:path)*) => {
        impl DType for $ty {
            const ZERO: Self = $zero;
            const ONE: Self = $one;
        }
        $(
        impl $other_trait for $ty {}
        )*
    };
}

impl_dtype!(f32, 1.0, 0.0, DTypeFloat);
impl_dtype!(f64, 1.0, 0.0, DTypeFloat);
