use crate::dtype::DType;
use crate::matrix::{Dim2, Matrix};

pub trait DTypeOps: DType {
    /// Strided gemm on raw buffers: `c = alpha * a * b + beta * c` with `a` of
    /// `m × k`, `b` of `k × n` and `c` of `m × n`.
    ///
    /// # Safety
    /// Every element addressed through the pointers and strides must be in
    /// bounds, and `c` must not overlap `a` or `b`.
    #[allow(clippy::too_many_arguments)]
    unsafe fn gemm(
        m: usize,
        k: usize,
        n: usize,
        alpha: Self,
        a: *const Self,
        rsa: isize,
        csa: isize,
        b: *const Self,
        rsb: isize,
        csb: isize,
        beta: Self,
        c: *mut Self,
        rsc: isize,
        csc: isize,
    );

    /// performs a generic matrix multiplication (gemm): `c = alpha * op(a) * op(b) + beta * c`
    fn matrix_multiply(alpha: Self, a: &Matrix<Self>, ta: bool, b: &Matrix<Self>, tb: bool, beta: Self, c: &mut Matrix<Self>);
}

macro_rules! implement_dtype_ops {
    ($t: ident, $g: ident) => {
        impl DTypeOps for $t {
            unsafe fn gemm(
                m: usize,
                k: usize,
                n: usize,
                alpha: Self,
                a: *const Self,
                rsa: isize,
                csa: isize,
                b: *const Self,
                rsb: isize,
                csb: isize,
                beta: Self,
                c: *mut Self,
                rsc: isize,
                csc: isize,
            ) {
                // SAFETY: upheld by the caller
                unsafe { matrixmultiply::$g(m, k, n, alpha, a, rsa, csa, b, rsb, csb, beta, c, rsc, csc) }
            }

            fn matrix_multiply(
                alpha: Self,
                a: &Matrix<Self>,
                ta: bool,
                b: &Matrix<Self>,
                tb: bool,
                beta: Self,
                c: &mut Matrix<Self>,
            ) {
                let Dim2(a_rows, a_cols) = a.dims();
                let Dim2(b_rows, b_cols) = b.dims();
                let (m, k, rsa, csa) = if ta {
                    (a_cols, a_rows, 1, a_cols as isize)
                } else {
                    (a_rows, a_cols, a_cols as isize, 1)
                };
                let (n, rsb, csb) = if tb {
                    assert_eq!(b_cols, k);
                    (b_rows, 1, b_cols as isize)
                } else {
                    assert_eq!(b_rows, k);
                    (b_cols, b_cols as isize, 1)
                };
                assert_eq!(c.dims(), Dim2(m, n));
                assert_eq!(a.len(), a.dims().len());
                assert_eq!(b.len(), b.dims().len());
                assert_eq!(c.len(), c.dims().len());
                if m == 0 || n == 0 {
                    return;
                }
                let c_cols = c.cols() as isize;
                // SAFETY: buffer lengths match the shapes, and the shapes were checked
                // against each other above
                unsafe {
                    Self::gemm(
                        m,
                        k,
                        n,
                        alpha,
                        a.as_slice().as_ptr(),
                        rsa,
                        csa,
                        b.as_slice().as_ptr(),
                        rsb,
                        csb,
                        beta,
                        c.as_mut_slice().as_mut_ptr(),
                        c_cols,
                        1,
                    );
                }
            }
        }
    };
}

implement_dtype_ops!(f32, sgemm);
implement_dtype_ops!(f64, dgemm);

impl<T: DTypeOps> Matrix<T> {
    /// Returns the product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.cols(),
            rhs.rows(),
            "Mismatched inner dimensions {} x {}",
            self.dims(),
            rhs.dims()
        );
        let mut out = Matrix::filled(T::ZERO, Dim2(self.rows(), rhs.cols()));
        T::matrix_multiply(T::ONE, self, false, rhs, false, T::ZERO, &mut out);
        out
    }
}
