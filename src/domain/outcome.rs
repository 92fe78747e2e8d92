// Test outcome domain model
use super::cable::expected_impedance;
use super::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Impedance reading reported when the pulse hits an open circuit
pub const OPEN_CIRCUIT: &str = "∞ Ω";

pub const PASS_QUALITY: u8 = 90;
pub const WARNING_QUALITY: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Warning,
    Fail,
}

impl TestStatus {
    /// pass needs a clean cable and quality >= 90; anything under 75 fails
    pub fn classify(quality: u8, has_fault: bool) -> Self {
        if quality < WARNING_QUALITY {
            Self::Fail
        } else if quality >= PASS_QUALITY && !has_fault {
            Self::Pass
        } else {
            Self::Warning
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "Passed",
            Self::Warning => "Warning",
            Self::Fail => "Failed",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warning => "warning",
            Self::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    pub cable_type: String,
    pub length: f64,
    pub fault_distance: Option<f64>,
    pub status: TestStatus,
    pub impedance: String,
    pub expected_impedance: String,
    pub quality: u8,
}

impl TestOutcome {
    /// Build a consistent outcome; status and impedance follow from the
    /// other fields.
    pub fn new(
        cable_type: &str,
        length: f64,
        fault_distance: Option<f64>,
        quality: u8,
    ) -> DomainResult<Self> {
        validate_input(cable_type, length)?;
        if let Some(distance) = fault_distance {
            if !distance.is_finite() || distance < 0.0 || distance >= length {
                return Err(DomainError::invalid(format!(
                    "fault distance {distance} outside [0, {length})"
                )));
            }
        }
        if quality > 100 {
            return Err(DomainError::invalid(format!("quality {quality} above 100")));
        }

        let expected = expected_impedance(cable_type);
        let impedance = if fault_distance.is_some() {
            OPEN_CIRCUIT
        } else {
            expected
        };

        Ok(Self {
            cable_type: cable_type.to_string(),
            length,
            fault_distance,
            status: TestStatus::classify(quality, fault_distance.is_some()),
            impedance: impedance.to_string(),
            expected_impedance: expected.to_string(),
            quality,
        })
    }

    pub fn has_fault(&self) -> bool {
        self.fault_distance.is_some()
    }

    pub fn impedance_matches(&self) -> bool {
        self.impedance == self.expected_impedance
    }

    /// Fault location as a fraction of cable length; 1.0 (far end) when clean
    pub fn fault_fraction(&self) -> f64 {
        match self.fault_distance {
            Some(distance) => distance / self.length,
            None => 1.0,
        }
    }

    pub fn status_summary(&self) -> &'static str {
        match self.status {
            TestStatus::Pass => "No faults detected",
            TestStatus::Fail if self.has_fault() => "1 fault detected",
            TestStatus::Fail => "Fault detected",
            TestStatus::Warning => "Minor issues detected",
        }
    }
}

/// Checks shared by every entry point that accepts a cable type and length
pub fn validate_input(cable_type: &str, length: f64) -> DomainResult<()> {
    if cable_type.trim().is_empty() {
        return Err(DomainError::invalid("cable type must not be empty"));
    }
    if !length.is_finite() || length <= 0.0 {
        return Err(DomainError::invalid(format!(
            "cable length must be positive, got {length}"
        )));
    }
    Ok(())
}

/// "47.3m" style distance label
pub fn format_meters(distance: f64) -> String {
    format!("{distance:.1}m")
}
