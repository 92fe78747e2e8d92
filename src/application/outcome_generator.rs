// Outcome generator - Simulates a single TDR test run
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::outcome::{validate_input, TestOutcome};
use crate::infrastructure::config::SimulationConfig;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct OutcomeGenerator {
    fault_probability: f64,
    max_fault_fraction: f64,
    faulted_quality: (u8, u8),
    clean_quality: (u8, u8),
}

impl Default for OutcomeGenerator {
    fn default() -> Self {
        Self {
            fault_probability: 0.6,
            max_fault_fraction: 0.8,
            faulted_quality: (60, 80),
            clean_quality: (85, 100),
        }
    }
}

impl OutcomeGenerator {
    pub fn from_config(config: &SimulationConfig) -> DomainResult<Self> {
        if !(0.0..=1.0).contains(&config.fault_probability) {
            return Err(DomainError::invalid(format!(
                "fault probability {} outside [0, 1]",
                config.fault_probability
            )));
        }
        if !(config.max_fault_fraction > 0.0 && config.max_fault_fraction <= 1.0) {
            return Err(DomainError::invalid(format!(
                "max fault fraction {} outside (0, 1]",
                config.max_fault_fraction
            )));
        }
        for (low, high) in [config.faulted_quality, config.clean_quality] {
            if low >= high || high > 100 {
                return Err(DomainError::invalid(format!(
                    "quality band [{low}, {high}) is empty or above 100"
                )));
            }
        }

        Ok(Self {
            fault_probability: config.fault_probability,
            max_fault_fraction: config.max_fault_fraction,
            faulted_quality: config.faulted_quality,
            clean_quality: config.clean_quality,
        })
    }

    /// Fresh thread-local entropy per call; every call is a new physical test
    pub fn generate(&self, cable_type: &str, length: f64) -> DomainResult<TestOutcome> {
        self.generate_with(&mut rand::rng(), cable_type, length)
    }

    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        cable_type: &str,
        length: f64,
    ) -> DomainResult<TestOutcome> {
        validate_input(cable_type, length)?;

        let has_fault = rng.random::<f64>() < self.fault_probability;
        let (fault_distance, band) = if has_fault {
            let distance = rng.random::<f64>() * length * self.max_fault_fraction;
            (Some(distance), self.faulted_quality)
        } else {
            (None, self.clean_quality)
        };
        let quality = rng.random_range(band.0..band.1);

        tracing::debug!(
            cable_type,
            length,
            ?fault_distance,
            quality,
            "generated test outcome"
        );

        TestOutcome::new(cable_type, length, fault_distance, quality)
    }
}
