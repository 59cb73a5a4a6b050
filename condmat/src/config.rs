use crate::error::{Error, Result};
use crate::schedule::{
    ThresholdSchedule, DEFAULT_BASE_THRESHOLD, DEFAULT_SINGLE_THRESHOLD, DEFAULT_THRESHOLD_GROWTH, DEFAULT_WIDTHS,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Half-open interval `[low, high)` entries are drawn from.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleRange {
    pub low: f64,
    pub high: f64,
}

impl SampleRange {
    pub const fn new(low: f64, high: f64) -> Self {
        SampleRange { low, high }
    }

    pub fn validate(&self) -> Result<()> {
        if self.low.is_finite() && self.high.is_finite() && self.low < self.high {
            Ok(())
        } else {
            Err(Error::InvalidRange {
                low: self.low,
                high: self.high,
            })
        }
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.low <= x && x < self.high
    }
}

pub const DEFAULT_M1_RANGE: SampleRange = SampleRange::new(10.0, 126.0);
pub const DEFAULT_M2_RANGE: SampleRange = SampleRange::new(52.0, 303.5);

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SamplingConfig {
    pub m1: SampleRange,
    pub m2: SampleRange,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            m1: DEFAULT_M1_RANGE,
            m2: DEFAULT_M2_RANGE,
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        self.m1.validate()?;
        self.m2.validate()
    }
}

/// Everything both drivers need. Missing fields in a config file take the
/// defaults below.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GeneratorConfig {
    pub sampling: SamplingConfig,
    pub single_threshold: f64,
    pub base_threshold: f64,
    pub threshold_growth: f64,
    pub widths: Vec<usize>,
    /// `None` resamples until a pair is accepted.
    pub max_attempts: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            sampling: SamplingConfig::default(),
            single_threshold: DEFAULT_SINGLE_THRESHOLD,
            base_threshold: DEFAULT_BASE_THRESHOLD,
            threshold_growth: DEFAULT_THRESHOLD_GROWTH,
            widths: DEFAULT_WIDTHS.to_vec(),
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    #[inline]
    pub fn schedule(&self) -> ThresholdSchedule {
        ThresholdSchedule::new(self.base_threshold, self.threshold_growth)
    }

    pub fn validate(&self) -> Result<()> {
        self.sampling.validate()
    }
}

#[cfg(feature = "serde")]
impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| Error::file(path, err))?;
        log::debug!("loading generator config from {}", path.display());
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ranges() {
        assert!(DEFAULT_M1_RANGE.validate().is_ok());
        assert!(DEFAULT_M1_RANGE.contains(10.0));
        assert!(!DEFAULT_M1_RANGE.contains(126.0));
        assert!(matches!(
            SampleRange::new(5.0, 5.0).validate(),
            Err(Error::InvalidRange { .. })
        ));
        assert!(SampleRange::new(f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_default_schedule() {
        let config = GeneratorConfig::default();
        assert_eq!(config.schedule().steps(&config.widths).len(), 4);
        assert_eq!(config.max_attempts, Some(DEFAULT_MAX_ATTEMPTS));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json() {
        let config = GeneratorConfig::from_json_str(r#"{"widths": [3, 4], "seed": 42, "max_attempts": null}"#).unwrap();
        assert_eq!(config.widths, vec![3, 4]);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.sampling, SamplingConfig::default());
        assert_eq!(config.single_threshold, DEFAULT_SINGLE_THRESHOLD);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_rejects_bad_range() {
        let err = GeneratorConfig::from_json_str(r#"{"sampling": {"m1": {"low": 3.0, "high": 1.0}}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { low, high } if low == 3.0 && high == 1.0));
    }
}
