use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// One row of the frequency table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreFrequencySample {
    pub core_id: u32,
    pub frequency_mhz: f64,
    pub bar: String,
}

/// Observed frequency range of one physical core. `0.0` means "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrequencyRange {
    pub min_mhz: f64,
    pub max_mhz: f64,
}

/// Running min/max per physical core, shared between the sampling loop and
/// the reset key.
#[derive(Debug, Default)]
pub struct FrequencyStats {
    ranges: Mutex<BTreeMap<u32, FrequencyRange>>,
}

impl FrequencyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a new observation into the range for `core_id` and return it.
    pub fn observe(&self, core_id: u32, mhz: f64) -> FrequencyRange {
        let mut ranges = self.lock();
        let range = ranges.entry(core_id).or_default();
        range.min_mhz = lower(range.min_mhz, mhz);
        range.max_mhz = higher(range.max_mhz, mhz);
        *range
    }

    pub fn get(&self, core_id: u32) -> FrequencyRange {
        self.lock().get(&core_id).copied().unwrap_or_default()
    }

    /// Mark every known core as unobserved. Entries are kept.
    pub fn reset(&self) {
        for range in self.lock().values_mut() {
            *range = FrequencyRange::default();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u32, FrequencyRange>> {
        // The map holds plain numbers, so a panic mid-update cannot leave it
        // inconsistent.
        self.ranges.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn lower(stored: f64, observed: f64) -> f64 {
    if stored == 0.0 {
        return observed;
    }
    if observed == 0.0 {
        return stored;
    }
    stored.min(observed)
}

fn higher(stored: f64, observed: f64) -> f64 {
    if stored == 0.0 {
        return observed;
    }
    if observed == 0.0 {
        return stored;
    }
    stored.max(observed)
}
