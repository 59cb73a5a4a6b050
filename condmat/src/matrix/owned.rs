use crate::matrix::Dim2;
use num_traits::{One, Zero};
use rand::distributions::Distribution;
use rand::Rng;
use std::slice::{ChunksExact, Iter, IterMut};
use std::vec::IntoIter;

/// Dense row-major matrix.
#[derive(Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    dims: Dim2,
}

impl<T> Matrix<T> {
    pub fn from_vec<D: Into<Dim2>>(data: Vec<T>, dims: D) -> Self {
        let dims = dims.into();
        assert_eq!(
            data.len(),
            dims.len(),
            "Mismatched data length {} and dimension {}",
            data.len(),
            dims
        );
        Matrix { data, dims }
    }

    /// Fills a matrix in row-major order with independent draws from `dist`.
    pub fn from_distribution<R, S, D>(rng: &mut R, dist: &S, dims: D) -> Self
    where
        R: Rng,
        S: Distribution<T>,
        D: Into<Dim2>,
    {
        let dims = dims.into();
        let data: Vec<T> = dist.sample_iter(rng).take(dims.len()).collect();
        Matrix { data, dims }
    }

    #[inline]
    pub fn dims(&self) -> Dim2 {
        self.dims
    }
    #[inline]
    pub fn rows(&self) -> usize {
        self.dims.rows()
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.dims.cols()
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        let cols = self.cols();
        &self.data[i * cols..(i + 1) * cols]
    }

    /// Iterates over the rows. A matrix without columns yields no rows.
    #[inline]
    pub fn iter_rows(&self) -> ChunksExact<'_, T> {
        self.data.chunks_exact(self.cols().max(1))
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.data.iter_mut()
    }
}

impl<T: Copy> Matrix<T> {
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.cols() + j]
    }

    pub fn filled<D: Into<Dim2>>(value: T, dims: D) -> Self {
        let dims = dims.into();
        Matrix {
            data: vec![value; dims.len()],
            dims,
        }
    }

    pub fn transpose(&self) -> Self {
        let Dim2(rows, cols) = self.dims;
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..cols {
            data.extend((0..rows).map(|i| self.data[i * cols + j]));
        }
        Matrix {
            data,
            dims: self.dims.transposed(),
        }
    }

    /// Swaps two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let cols = self.cols();
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * cols);
        head[lo * cols..(lo + 1) * cols].swap_with_slice(&mut tail[..cols]);
    }
}

impl<T: Zero + Copy> Matrix<T> {
    #[inline]
    pub fn zeroed<D: Into<Dim2>>(dims: D) -> Self {
        Self::filled(T::zero(), dims)
    }
}

impl<T: Zero + One + Copy> Matrix<T> {
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeroed(Dim2::square(n));
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }
}

impl<T> AsRef<[T]> for Matrix<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T> AsMut<[T]> for Matrix<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<'a, T> IntoIterator for &'a Matrix<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Matrix<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

impl<T> IntoIterator for Matrix<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<T> std::ops::Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.dims.cols() + j]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let cols = self.dims.cols();
        &mut self.data[i * cols + j]
    }
}

#[macro_export]
macro_rules! matrix {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        let rows: Vec<Vec<_>> = vec![$(vec![$($x,)*],)*];
        let n_rows = rows.len();
        let n_cols = rows[0].len();
        assert!(rows.iter().all(|r| r.len() == n_cols), "ragged matrix literal");
        $crate::matrix::Matrix::from_vec(rows.into_iter().flatten().collect(), (n_rows, n_cols))
    }};
}
