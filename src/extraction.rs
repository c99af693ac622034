//! Extractor yield curve
//!
//! Yield per cycle is a closed-form function of the cycle index: a
//! hyperbolic decay modulated by three cosine waves. The computation order
//! below is fixed so results stay bit-identical with historical reports.

const DECAY_FACTOR: f64 = 0.012;
const NOISE_FACTOR: f64 = 0.8;
const F1: f64 = 1.0 / 12.0;
const F2: f64 = 1.0 / 5.0;
const F3: f64 = 1.0 / 2.0;

/// Length of the yield formula's time unit, in seconds.
const UNIT_SECONDS: f64 = 900.0;

#[derive(Debug, Clone, Copy)]
pub struct ExtractorYield {
    qty_per_cycle: u32,
    cycle_time_secs: i64,
    phase_shift: f64,
}

impl ExtractorYield {
    pub fn new(qty_per_cycle: u32, cycle_time_secs: i64) -> Self {
        Self {
            qty_per_cycle,
            cycle_time_secs,
            phase_shift: f64::from(qty_per_cycle).powf(0.7),
        }
    }

    /// Number of 15 minute units in one cycle
    fn w_count(&self) -> f64 {
        self.cycle_time_secs as f64 / UNIT_SECONDS
    }

    /// Yield of the cycle with the given zero-based index
    pub fn yield_for_cycle(&self, cycle_index: u64) -> u64 {
        let w_count = self.w_count();
        let t = (cycle_index as f64 + 0.5) * w_count;

        let decay = f64::from(self.qty_per_cycle) / (1.0 + t * DECAY_FACTOR);

        let sina = (self.phase_shift + t * F1).cos();
        let sinb = (self.phase_shift / 2.0 + t * F2).cos();
        let sinc = (t * F3).cos();
        let sins = ((sina + sinb + sinc) / 3.0).max(0.0);

        let value = w_count * decay * (1.0 + NOISE_FACTOR * sins);
        // negative or NaN inputs saturate to zero
        value.floor() as u64
    }

    /// Yields for cycles `start..=end`, paired with the 1-based cycle number
    pub fn yield_range(&self, start: u64, end: u64) -> Vec<(u64, u64)> {
        (start..=end)
            .map(|cycle| (cycle + 1, self.yield_for_cycle(cycle)))
            .collect()
    }

    /// Total over the first `cycles` cycles
    pub fn total_yield(&self, cycles: u64) -> u64 {
        (0..cycles).map(|cycle| self.yield_for_cycle(cycle)).sum()
    }
}
