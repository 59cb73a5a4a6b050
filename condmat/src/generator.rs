//! Resampling generator for well-conditioned matrix pairs.
//!
//! Uniformly sampled matrices are frequently ill-conditioned, so pairs are
//! redrawn until the condition number of their product falls below a
//! threshold.

use crate::config::{GeneratorConfig, SamplingConfig};
use crate::error::{Error, Result};
use crate::linalg::{self, LinAlgError};
use crate::matrix::{Dim2, Matrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;

/// An accepted pair, its product and the attempt that produced it.
#[derive(Clone, Debug)]
pub struct ConditionedPair {
    pub m1: Matrix<f64>,
    pub m2: Matrix<f64>,
    pub product: Matrix<f64>,
    pub condition: f64,
    pub attempts: usize,
}

impl ConditionedPair {
    #[inline]
    pub fn width(&self) -> usize {
        self.product.rows()
    }
}

/// Outcome of a single sample.
#[derive(Debug)]
pub enum Trial {
    Accepted(ConditionedPair),
    RetrySingular,
    RetryIllConditioned { condition: f64 },
    FatalInvalidShape(Dim2),
}

pub struct PairGenerator<R: Rng = StdRng> {
    rng: R,
    m1_dist: Uniform<f64>,
    m2_dist: Uniform<f64>,
    max_attempts: Option<usize>,
}

impl PairGenerator<StdRng> {
    pub fn seed_from_u64(seed: u64, sampling: &SamplingConfig, max_attempts: Option<usize>) -> Result<Self> {
        Self::new(StdRng::seed_from_u64(seed), sampling, max_attempts)
    }

    /// Seeded from `config.seed` when present, otherwise from system entropy.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng, &config.sampling, config.max_attempts)
    }
}

impl<R: Rng> PairGenerator<R> {
    pub fn new(rng: R, sampling: &SamplingConfig, max_attempts: Option<usize>) -> Result<Self> {
        sampling.validate()?;
        Ok(PairGenerator {
            rng,
            m1_dist: Uniform::new(sampling.m1.low, sampling.m1.high),
            m2_dist: Uniform::new(sampling.m2.low, sampling.m2.high),
            max_attempts,
        })
    }

    #[inline]
    pub fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }

    /// Draws a fresh pair and classifies it against `threshold`.
    pub fn trial(&mut self, width: usize, threshold: f64) -> Trial {
        let dims = Dim2::square(width);
        if !fits_in_memory(dims) {
            return Trial::FatalInvalidShape(dims);
        }
        log::debug!("sampling two {dims} matrices");
        let m1 = Matrix::from_distribution(&mut self.rng, &self.m1_dist, dims);
        let m2 = Matrix::from_distribution(&mut self.rng, &self.m2_dist, dims);

        log::info!("Calculating product matrix...");
        let product = m1.matmul(&m2);

        log::debug!("inverting product matrix");
        let inverse = match linalg::invert(&product) {
            Ok(inverse) => inverse,
            Err(LinAlgError::Singular) => return Trial::RetrySingular,
            Err(LinAlgError::InvalidShape(dims)) => return Trial::FatalInvalidShape(dims),
        };

        log::info!("Calculating condition number...");
        let condition = linalg::condition_number(&product, &inverse);
        log::info!("condition number {condition:e} (threshold {threshold:e})");
        if condition < threshold {
            Trial::Accepted(ConditionedPair {
                m1,
                m2,
                product,
                condition,
                attempts: 1,
            })
        } else {
            // NaN lands here as well
            Trial::RetryIllConditioned { condition }
        }
    }

    /// Resamples until a pair of `width × width` matrices has
    /// `cond(M1·M2) < threshold`.
    ///
    /// An invalid shape is fatal. With a `max_attempts` limit the search gives
    /// up with [`Error::AttemptsExhausted`].
    pub fn generate(&mut self, width: usize, threshold: f64) -> Result<ConditionedPair> {
        let mut attempts = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(Error::AttemptsExhausted {
                        width,
                        attempts,
                        threshold,
                    });
                }
            }
            attempts += 1;
            match self.trial(width, threshold) {
                Trial::Accepted(mut pair) => {
                    pair.attempts = attempts;
                    log::info!("accepted {width}x{width} pair after {attempts} attempt(s)");
                    return Ok(pair);
                }
                Trial::RetrySingular => {
                    log::info!("Ended up with a singular matrix. Trying again");
                }
                Trial::RetryIllConditioned { condition } => {
                    log::debug!("rejected pair with condition number {condition:e}");
                }
                Trial::FatalInvalidShape(dims) => {
                    log::error!("The matrix of shape {dims} is not a square 2D matrix");
                    return Err(Error::InvalidShape(dims));
                }
            }
        }
    }
}

/// Whether a `dims` buffer of `f64` can be addressed at all.
fn fits_in_memory(dims: Dim2) -> bool {
    dims.checked_len()
        .and_then(|len| len.checked_mul(size_of::<f64>()))
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}
