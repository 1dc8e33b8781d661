//! Specialty value object representing a specialist capability tag

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Specialist capability tags (Value Object)
///
/// This is a domain concept representing the reasoning specialties that
/// can participate in a consultation panel. Dispatch is always by tag,
/// never by probing what an agent object happens to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Specialty {
    /// Pain assessment and analgesic strategy
    PainManagement,
    /// Mobility, gait, and range-of-motion work
    Movement,
    /// Strength and functional restoration
    Strength,
    /// Adherence and psychological recovery factors
    Psychology,
    /// Care-team triage and phase coordination
    Coordination,
}

impl Specialty {
    /// Get the normalized tag for this specialty
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::PainManagement => "pain_management",
            Specialty::Movement => "movement",
            Specialty::Strength => "strength",
            Specialty::Psychology => "psychology",
            Specialty::Coordination => "coordination",
        }
    }

    /// All specialties, in panel order
    pub fn all() -> [Specialty; 5] {
        [
            Specialty::Coordination,
            Specialty::PainManagement,
            Specialty::Movement,
            Specialty::Strength,
            Specialty::Psychology,
        ]
    }

    /// Default panel for a full consultation
    pub fn default_panel() -> Vec<Specialty> {
        Specialty::all().to_vec()
    }

    /// Check if this specialty acts as the panel's triage coordinator
    pub fn is_coordinator(&self) -> bool {
        matches!(self, Specialty::Coordination)
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Specialty {
    type Err = DomainError;

    /// Parse a specialty tag, accepting common aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pain_management" | "pain" | "analgesia" => Ok(Specialty::PainManagement),
            "movement" | "mobility" | "physio" | "pt" => Ok(Specialty::Movement),
            "strength" | "functional" | "conditioning" => Ok(Specialty::Strength),
            "psychology" | "psych" | "behavioral" => Ok(Specialty::Psychology),
            "coordination" | "coordinator" | "triage" => Ok(Specialty::Coordination),
            other => Err(DomainError::UnknownSpecialty(other.to_string())),
        }
    }
}

impl Serialize for Specialty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Specialty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
