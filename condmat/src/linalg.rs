//! Dense inversion and norms used by the conditioning test.

use crate::backend::DTypeOps;
use crate::dtype::DTypeFloat;
use crate::matrix::{Dim2, Matrix};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum LinAlgError {
    /// The input is not a non-empty square matrix.
    #[error("the matrix of shape {0} is not a non-empty square 2D matrix")]
    InvalidShape(Dim2),
    #[error("matrix is singular")]
    Singular,
}

/// Panel width of the blocked factorisation and solves. Updates outside a
/// panel go through gemm.
const BLOCK: usize = 64;

/// LU factorisation with partial pivoting, `P·A = L·U`, packed in one matrix.
///
/// The strictly lower triangle holds `L` (unit diagonal implied), the upper
/// triangle holds `U`. `perm[i]` is the row of `A` that ended up in row `i`.
pub struct LuDecomposition<T> {
    lu: Matrix<T>,
    perm: Vec<usize>,
}

impl<T: DTypeFloat + DTypeOps> LuDecomposition<T> {
    /// Right-looking blocked factorisation in the manner of LAPACK's `getrf`.
    ///
    /// Fails with [`LinAlgError::Singular`] when a pivot is exactly zero or not
    /// finite, the same test `getrf` applies.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinAlgError> {
        let dims = a.dims();
        if dims.is_empty() || !dims.is_square() {
            return Err(LinAlgError::InvalidShape(dims));
        }
        let n = dims.rows();
        let mut lu = a.clone();
        let mut perm: Vec<usize> = (0..n).collect();

        for k0 in (0..n).step_by(BLOCK) {
            let k1 = (k0 + BLOCK).min(n);
            factor_panel(&mut lu, &mut perm, k0, k1)?;
            if k1 == n {
                break;
            }
            let data = lu.as_mut_slice();
            // U12 = L11⁻¹ · A12
            for k in k0..k1 {
                let (head, tail) = data.split_at_mut((k + 1) * n);
                let u = &head[k * n + k1..(k + 1) * n];
                for row in tail.chunks_exact_mut(n).take(k1 - k - 1) {
                    let l = row[k];
                    if l != T::ZERO {
                        axpy(-l, u, &mut row[k1..]);
                    }
                }
            }
            // A22 -= L21 · U12
            let rest = n - k1;
            let ptr = data.as_mut_ptr();
            // SAFETY: L21 (rows k1.., cols k0..k1), U12 (rows k0..k1, cols k1..)
            // and A22 (rows k1.., cols k1..) are disjoint parts of the n × n buffer
            unsafe {
                T::gemm(
                    rest,
                    k1 - k0,
                    rest,
                    -T::ONE,
                    ptr.add(k1 * n + k0),
                    n as isize,
                    1,
                    ptr.add(k0 * n + k1),
                    n as isize,
                    1,
                    T::ONE,
                    ptr.add(k1 * n + k1),
                    n as isize,
                    1,
                );
            }
        }
        Ok(LuDecomposition { lu, perm })
    }

    /// Builds `A⁻¹ = U⁻¹ · L⁻¹ · P` by blocked forward and back substitution.
    pub fn inverse(&self) -> Matrix<T> {
        let n = self.lu.rows();
        let lu = self.lu.as_slice();
        let mut inv = Matrix::zeroed(Dim2::square(n));
        for (i, &p) in self.perm.iter().enumerate() {
            inv[(i, p)] = T::ONE;
        }
        let blocks: Vec<(usize, usize)> = (0..n).step_by(BLOCK).map(|i0| (i0, (i0 + BLOCK).min(n))).collect();

        // Y = L⁻¹ · P
        for &(i0, i1) in &blocks {
            let (solved, rest) = inv.as_mut_slice().split_at_mut(i0 * n);
            let target = &mut rest[..(i1 - i0) * n];
            if i0 > 0 {
                // SAFETY: L[i0..i1, 0..i0] lies in `lu`, Y[0..i0] is `solved`,
                // Y[i0..i1] is `target`, all with row stride n
                unsafe {
                    T::gemm(
                        i1 - i0,
                        i0,
                        n,
                        -T::ONE,
                        lu.as_ptr().add(i0 * n),
                        n as isize,
                        1,
                        solved.as_ptr(),
                        n as isize,
                        1,
                        T::ONE,
                        target.as_mut_ptr(),
                        n as isize,
                        1,
                    );
                }
            }
            for i in 1..i1 - i0 {
                let (done, row) = target.split_at_mut(i * n);
                for k in 0..i {
                    let l = lu[(i0 + i) * n + i0 + k];
                    if l != T::ZERO {
                        axpy(-l, &done[k * n..(k + 1) * n], &mut row[..n]);
                    }
                }
            }
        }

        // X = U⁻¹ · Y
        for &(i0, i1) in blocks.iter().rev() {
            let (head, solved) = inv.as_mut_slice().split_at_mut(i1 * n);
            let target = &mut head[i0 * n..];
            if i1 < n {
                // SAFETY: U[i0..i1, i1..n] lies in `lu`, X[i1..n] is `solved`,
                // X[i0..i1] is `target`, all with row stride n
                unsafe {
                    T::gemm(
                        i1 - i0,
                        n - i1,
                        n,
                        -T::ONE,
                        lu.as_ptr().add(i0 * n + i1),
                        n as isize,
                        1,
                        solved.as_ptr(),
                        n as isize,
                        1,
                        T::ONE,
                        target.as_mut_ptr(),
                        n as isize,
                        1,
                    );
                }
            }
            for i in (0..i1 - i0).rev() {
                let (upper, done) = target.split_at_mut((i + 1) * n);
                let row = &mut upper[i * n..];
                for k in i + 1..i1 - i0 {
                    let u = lu[(i0 + i) * n + i0 + k];
                    if u != T::ZERO {
                        axpy(-u, &done[(k - i - 1) * n..(k - i) * n], row);
                    }
                }
                let d = lu[(i0 + i) * n + i0 + i];
                for x in row.iter_mut() {
                    *x /= d;
                }
            }
        }
        inv
    }
}

/// Unblocked elimination of columns `k0..k1`. Row swaps span the full width;
/// the elimination itself stays inside the panel.
fn factor_panel<T: DTypeFloat>(lu: &mut Matrix<T>, perm: &mut [usize], k0: usize, k1: usize) -> Result<(), LinAlgError> {
    let n = lu.rows();
    for k in k0..k1 {
        let (p, pivot) = (k..n)
            .map(|i| (i, lu[(i, k)]))
            .fold((k, T::ZERO), |best, (i, v)| if v.abs() > best.1.abs() { (i, v) } else { best });
        if pivot == T::ZERO || !pivot.is_finite() {
            return Err(LinAlgError::Singular);
        }
        if p != k {
            lu.swap_rows(p, k);
            perm.swap(p, k);
        }
        let (head, tail) = lu.as_mut_slice().split_at_mut((k + 1) * n);
        let pivot_row = &head[k * n + k + 1..k * n + k1];
        for row in tail.chunks_exact_mut(n) {
            let factor = row[k] / pivot;
            row[k] = factor;
            if factor != T::ZERO {
                axpy(-factor, pivot_row, &mut row[k + 1..k1]);
            }
        }
    }
    Ok(())
}

#[inline]
fn axpy<T: DTypeFloat>(alpha: T, x: &[T], y: &mut [T]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

pub fn invert<T: DTypeFloat + DTypeOps>(a: &Matrix<T>) -> Result<Matrix<T>, LinAlgError> {
    Ok(LuDecomposition::new(a)?.inverse())
}

/// `sqrt(Σ a_ij²)`, accumulated with scaling so large entries do not overflow.
pub fn frobenius_norm<T: DTypeFloat>(a: &Matrix<T>) -> T {
    let mut scale = T::ZERO;
    let mut ssq = T::ONE;
    for &x in a {
        if x != T::ZERO {
            let ax = x.abs();
            if scale < ax {
                ssq = T::ONE + ssq * (scale / ax) * (scale / ax);
                scale = ax;
            } else {
                ssq += (ax / scale) * (ax / scale);
            }
        }
    }
    scale * ssq.sqrt()
}

/// Condition number in the Frobenius norm, `||P||_F · ||P⁻¹||_F`.
#[inline]
pub fn condition_number<T: DTypeFloat>(p: &Matrix<T>, p_inv: &Matrix<T>) -> T {
    frobenius_norm(p) * frobenius_norm(p_inv)
}
