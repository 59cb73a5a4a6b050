use crate::config::{DEFAULT_M1_RANGE, DEFAULT_M2_RANGE};
use crate::matrix::{Dim2, Matrix};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Uniform;

pub const SIZE_LG: usize = 1000;
pub const SIZE_MD: usize = 256;
pub const SIZE_SM: usize = 64;
const SEED: u64 = 0x8371943;

/// Two square operands drawn like the fixture operands.
pub fn get_square_matrices(size: usize) -> [Matrix<f64>; 2] {
    let mut rng = StdRng::seed_from_u64(SEED);
    let dims = Dim2::square(size);
    [
        Matrix::from_distribution(&mut rng, &Uniform::new(DEFAULT_M1_RANGE.low, DEFAULT_M1_RANGE.high), dims),
        Matrix::from_distribution(&mut rng, &Uniform::new(DEFAULT_M2_RANGE.low, DEFAULT_M2_RANGE.high), dims),
    ]
}
