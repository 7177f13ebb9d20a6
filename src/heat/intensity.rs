pub const EXPONENT: f64 = 0.4;
pub const DEFAULT_LEVELS: u8 = 5;

/// Sub-linear power scale mapping commit counts onto `0..=levels`.
///
/// Daily commit counts are heavily right-skewed, so the root-like curve keeps
/// the common low counts apart while rare bursts share the top buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityScale {
    levels: u8,
    max: Option<u32>,
}

impl IntensityScale {
    /// Fit the domain `[1, max(counts)]` onto the range `[1, levels]`.
    pub fn fit(positive_counts: &[u32], levels: u8) -> Self {
        Self {
            levels: levels.max(1),
            max: positive_counts.iter().copied().filter(|&c| c > 0).max(),
        }
    }

    pub fn levels(&self) -> u8 {
        self.levels
    }

    pub fn classify(&self, count: u32) -> u8 {
        if count == 0 {
            return 0;
        }
        let Some(max) = self.max else {
            return 1;
        };

        let lo = 1f64.powf(EXPONENT);
        let hi = f64::from(max).powf(EXPONENT);
        // A single-point domain sits in the middle of the range.
        let t = if hi > lo {
            (f64::from(count).powf(EXPONENT) - lo) / (hi - lo)
        } else {
            0.5
        };

        let top = f64::from(self.levels);
        let value = 1.0 + t * (top - 1.0);
        (value + 0.5).floor().clamp(1.0, top) as u8
    }
}

/// Intensity level of `count` given every positive day count observed.
pub fn classify(count: u32, all_positive_counts: &[u32], levels: u8) -> u8 {
    IntensityScale::fit(all_positive_counts, levels).classify(count)
}
