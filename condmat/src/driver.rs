use crate::error::{Error, Result};
use approx::RelativeEq;
use crate::fixtures::{FixtureSet, FixtureWriter};
use crate::generator::PairGenerator;
use crate::schedule::SizeStep;
use rand::Rng;
use std::path::PathBuf;

/// Generates one fixture set; nothing is written unless a pair is accepted.
pub fn generate_single<R: Rng>(
    generator: &mut PairGenerator<R>,
    width: usize,
    threshold: f64,
    writer: &FixtureWriter,
) -> Result<Vec<PathBuf>> {
    let pair = generator.generate(width, threshold)?;
    log::info!("condition number {:e} after {} attempt(s)", pair.condition, pair.attempts);
    writer.write(&pair)
}

#[derive(Debug)]
pub enum SizeOutcome {
    Written { files: Vec<PathBuf>, condition: f64, attempts: usize },
    Skipped(Error),
}

#[derive(Debug)]
pub struct SizeReport {
    pub step: SizeStep,
    pub outcome: SizeOutcome,
}

/// Runs the generator for every step in order.
///
/// A width that cannot be generated (invalid shape, attempts exhausted) is
/// skipped and leaves a gap in the output; I/O failures abort the run.
pub fn generate_multi<R: Rng>(
    generator: &mut PairGenerator<R>,
    steps: &[SizeStep],
    writer: &FixtureWriter,
) -> Result<Vec<SizeReport>> {
    let mut reports = Vec::with_capacity(steps.len());
    for &step in steps {
        log::info!("generating width {} with threshold {:e}", step.width, step.threshold);
        let outcome = match generator.generate(step.width, step.threshold) {
            Ok(pair) => SizeOutcome::Written {
                files: writer.write(&pair)?,
                condition: pair.condition,
                attempts: pair.attempts,
            },
            Err(err @ (Error::InvalidShape(_) | Error::AttemptsExhausted { .. })) => {
                log::error!("skipping width {}: {err}", step.width);
                SizeOutcome::Skipped(err)
            }
            Err(err) => return Err(err),
        };
        reports.push(SizeReport { step, outcome });
    }
    Ok(reports)
}

#[derive(Clone, Debug, PartialEq)]
pub struct VerifyReport {
    pub width: usize,
    /// Largest `|P - M1·M2| / max(|P|, 1)` over all entries.
    pub max_relative_error: f64,
    pub product_matches: bool,
    /// `None` when the layout has no transpose files.
    pub transposes_match: Option<bool>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.product_matches && self.transposes_match.unwrap_or(true)
    }
}

/// Checks a loaded set: `P ≈ M1·M2` within `max_relative`, transposes exact.
pub fn verify(set: &FixtureSet, max_relative: f64) -> VerifyReport {
    let expected = set.m1.matmul(&set.m2);
    let max_relative_error = std::iter::zip(set.product.iter(), expected.iter())
        .map(|(&p, &e)| (p - e).abs() / p.abs().max(1.0))
        .fold(0.0, f64::max);
    let product_matches = set.product.relative_eq(&expected, f64::EPSILON, max_relative);
    let transposes_match = match (&set.m2_transposed, &set.product_transposed) {
        (Some(m2_t), Some(product_t)) => Some(*m2_t == set.m2.transpose() && *product_t == set.product.transpose()),
        _ => None,
    };
    VerifyReport {
        width: set.width,
        max_relative_error,
        product_matches,
        transposes_match,
    }
}
