/// Widths generated by the multi-size driver, smallest first.
pub const DEFAULT_WIDTHS: [usize; 4] = [100, 1000, 5000, 10000];
/// Acceptance threshold of the single-size driver.
pub const DEFAULT_SINGLE_THRESHOLD: f64 = 1.0e9;
pub const DEFAULT_BASE_THRESHOLD: f64 = 1.0e7;
/// Condition numbers grow with the width, so each step relaxes the bar by this factor.
pub const DEFAULT_THRESHOLD_GROWTH: f64 = 50.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SizeStep {
    pub width: usize,
    pub threshold: f64,
}

/// Geometric threshold schedule: step `i` accepts `cond < base · growth^i`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ThresholdSchedule {
    pub base: f64,
    pub growth: f64,
}

impl Default for ThresholdSchedule {
    fn default() -> Self {
        ThresholdSchedule {
            base: DEFAULT_BASE_THRESHOLD,
            growth: DEFAULT_THRESHOLD_GROWTH,
        }
    }
}

impl ThresholdSchedule {
    pub fn new(base: f64, growth: f64) -> Self {
        ThresholdSchedule { base, growth }
    }

    pub fn steps(&self, widths: &[usize]) -> Vec<SizeStep> {
        widths
            .iter()
            .scan(self.base, |threshold, &width| {
                let step = SizeStep {
                    width,
                    threshold: *threshold,
                };
                *threshold *= self.growth;
                Some(step)
            })
            .collect()
    }
}
