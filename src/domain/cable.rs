// Cable domain model
use serde::{Deserialize, Serialize};

/// Cable types offered by the new-test form. Free text is accepted as well.
pub const KNOWN_CABLE_TYPES: [&str; 6] = [
    "Cat5e UTP",
    "Cat6 UTP",
    "Cat6a STP",
    "Cat7 STP",
    "Fiber SM",
    "Fiber MM",
];

pub const FIBER_IMPEDANCE: &str = "50Ω";
pub const COPPER_IMPEDANCE: &str = "100Ω";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CableFamily {
    Unshielded,
    Shielded,
    Fiber,
    Other,
}

impl CableFamily {
    pub fn of(cable_type: &str) -> Self {
        if cable_type.contains("UTP") {
            Self::Unshielded
        } else if cable_type.contains("STP") {
            Self::Shielded
        } else if cable_type.contains("Fiber") {
            Self::Fiber
        } else {
            Self::Other
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Unshielded => "Unshielded Twisted Pair",
            Self::Shielded => "Shielded Twisted Pair",
            Self::Fiber => "Optical Fiber",
            Self::Other => "Network Cable",
        }
    }
}

/// Nominal impedance for a cable type: fiber runs use 50Ω, everything else 100Ω
pub fn expected_impedance(cable_type: &str) -> &'static str {
    if cable_type.contains("Fiber") {
        FIBER_IMPEDANCE
    } else {
        COPPER_IMPEDANCE
    }
}

/// Catalog record, keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableSpec {
    pub name: String,
    pub velocity_of_propagation: String,
    pub impedance: String,
}

impl CableSpec {
    pub fn new(name: &str, velocity_of_propagation: &str, impedance: &str) -> Self {
        Self {
            name: name.to_string(),
            velocity_of_propagation: velocity_of_propagation.to_string(),
            impedance: impedance.to_string(),
        }
    }

    pub fn defaults() -> Vec<CableSpec> {
        vec![
            CableSpec::new("Cat6 UTP", "0.69c", "100 Ω"),
            CableSpec::new("Cat5e UTP", "0.67c", "100 Ω"),
            CableSpec::new("RG6 Coaxial", "0.82c", "75 Ω"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_impedance() {
        assert_eq!(expected_impedance("Fiber SM"), "50Ω");
        assert_eq!(expected_impedance("Fiber MM"), "50Ω");
        assert_eq!(expected_impedance("Cat6 UTP"), "100Ω");
        assert_eq!(expected_impedance("RG6 Coaxial"), "100Ω");
    }

    #[test]
    fn test_cable_family() {
        assert_eq!(CableFamily::of("Cat5e UTP"), CableFamily::Unshielded);
        assert_eq!(CableFamily::of("Cat7 STP"), CableFamily::Shielded);
        assert_eq!(CableFamily::of("Fiber SM").description(), "Optical Fiber");
        assert_eq!(CableFamily::of("mystery").description(), "Network Cable");
    }

    #[test]
    fn test_every_known_type_has_a_family() {
        for cable_type in KNOWN_CABLE_TYPES {
            assert_ne!(CableFamily::of(cable_type), CableFamily::Other, "{cable_type}");
        }
    }
}
