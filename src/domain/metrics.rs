// Derived network metrics, reproducible for a given outcome
use super::outcome::{TestOutcome, TestStatus};
use serde::Serialize;

const SEED_MODULUS: f64 = 10_000.0;
const PHASE_STRIDE: u64 = 0xD1B5_4A32_D192_ED03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricTier {
    Good,
    Warning,
    Bad,
}

impl MetricTier {
    /// Higher is better (quality, integrity, throughput)
    fn at_least(value: f64, good: f64, warning: f64) -> Self {
        if value >= good {
            Self::Good
        } else if value >= warning {
            Self::Warning
        } else {
            Self::Bad
        }
    }

    /// Lower is better (latency)
    fn at_most(value: f64, good: f64, warning: f64) -> Self {
        if value <= good {
            Self::Good
        } else if value <= warning {
            Self::Warning
        } else {
            Self::Bad
        }
    }

    pub fn for_percentage(value: f64) -> Self {
        Self::at_least(value, 80.0, 60.0)
    }

    pub fn for_throughput(mbps: f64) -> Self {
        Self::at_least(mbps, 800.0, 600.0)
    }

    pub fn for_latency(ms: f64) -> Self {
        Self::at_most(ms, 2.0, 3.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricReading {
    pub value: f64,
    pub unit: &'static str,
    pub tier: MetricTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub cable_quality: MetricReading,
    pub signal_integrity: MetricReading,
    pub estimated_throughput: MetricReading,
    pub latency: MetricReading,
}

/// Maps a seed to [0, 1). Any seed with the same bit pattern gives the same
/// value on every platform.
pub fn seeded_unit(seed: f64) -> f64 {
    unit_from_bits(seed.to_bits())
}

/// Integer-keyed variant for per-sample noise; every (phase, index) pair maps
/// to its own value, however large the phase
pub fn seeded_unit_at(phase: u64, index: u64) -> f64 {
    unit_from_bits(phase.wrapping_mul(PHASE_STRIDE) ^ index)
}

// splitmix64 finalizer
fn unit_from_bits(bits: u64) -> f64 {
    let mut z = bits.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    // top 53 bits fill the f64 mantissa exactly
    (z >> 11) as f64 / (1u64 << 53) as f64
}

/// Base seed for an outcome; sub-metrics draw from seed, seed + 1, seed + 2
pub fn outcome_seed(outcome: &TestOutcome) -> f64 {
    let fault = outcome.fault_distance.unwrap_or(0.0);
    (f64::from(outcome.quality) * 1000.0 + outcome.length + fault * 100.0).rem_euclid(SEED_MODULUS)
}

pub fn signal_integrity(outcome: &TestOutcome) -> f64 {
    let quality = f64::from(outcome.quality);
    if outcome.has_fault() {
        // floor of 50, but never above the raw quality
        (quality - 10.0).max(50.0).min(quality)
    } else {
        quality
    }
}

pub fn derive_metrics(outcome: &TestOutcome) -> DerivedMetrics {
    let seed = outcome_seed(outcome);
    let quality = f64::from(outcome.quality);
    let integrity = signal_integrity(outcome);

    let (throughput, latency) = match outcome.status {
        TestStatus::Pass => (
            900.0 + seeded_unit(seed) * 100.0,
            1.5 + seeded_unit(seed + 1.0),
        ),
        _ => (quality * 10.0, 2.0 + seeded_unit(seed + 2.0) * 2.0),
    };

    DerivedMetrics {
        cable_quality: MetricReading {
            value: quality,
            unit: "%",
            tier: MetricTier::for_percentage(quality),
        },
        signal_integrity: MetricReading {
            value: integrity,
            unit: "%",
            tier: MetricTier::for_percentage(integrity),
        },
        estimated_throughput: MetricReading {
            value: throughput,
            unit: "Mbps",
            tier: MetricTier::for_throughput(throughput),
        },
        latency: MetricReading {
            value: latency,
            unit: "ms",
            tier: MetricTier::for_latency(latency),
        },
    }
}
