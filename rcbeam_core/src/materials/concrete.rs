//! Concrete Grades (IS 456:2000 Table 2)
//!
//! Standard concrete grades designated by characteristic cube strength fck
//! (N/mm² at 28 days). Only the grades used for reinforced beams are
//! supported; anything else is an [`UnsupportedGrade`](CalcError::UnsupportedGrade).

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Concrete grade per IS 456 Table 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConcreteGrade {
    /// fck = 20 N/mm²
    M20,
    /// fck = 25 N/mm²
    M25,
    /// fck = 30 N/mm²
    M30,
    /// fck = 35 N/mm²
    M35,
    /// fck = 40 N/mm²
    M40,
}

impl ConcreteGrade {
    /// All supported grades, weakest first
    pub const ALL: [ConcreteGrade; 5] = [
        ConcreteGrade::M20,
        ConcreteGrade::M25,
        ConcreteGrade::M30,
        ConcreteGrade::M35,
        ConcreteGrade::M40,
    ];

    /// Characteristic compressive strength fck (N/mm²)
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::M20 => 20.0,
            ConcreteGrade::M25 => 25.0,
            ConcreteGrade::M30 => 30.0,
            ConcreteGrade::M35 => 35.0,
            ConcreteGrade::M40 => 40.0,
        }
    }

    /// Short code (e.g., "M25")
    pub fn code(&self) -> &'static str {
        match self {
            ConcreteGrade::M20 => "M20",
            ConcreteGrade::M25 => "M25",
            ConcreteGrade::M30 => "M30",
            ConcreteGrade::M35 => "M35",
            ConcreteGrade::M40 => "M40",
        }
    }

    /// Look up a grade from its fck value.
    ///
    /// The value must match a tabulated grade exactly; 27.5 is not rounded
    /// to M25 or M30.
    pub fn from_fck(fck_mpa: f64) -> CalcResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.fck_mpa() == fck_mpa)
            .ok_or_else(|| CalcError::unsupported_grade("concrete", fck_mpa.to_string()))
    }

    /// Parse from common string representations ("M25", "m 25", "25")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let cleaned = s.to_uppercase().replace([' ', '-', '_'], "");
        let digits = cleaned.strip_prefix('M').unwrap_or(&cleaned);
        match digits.parse::<f64>() {
            Ok(fck) => Self::from_fck(fck),
            Err(_) => Err(CalcError::unsupported_grade("concrete", s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> String {
        format!("{} (fck = {:.0} N/mm²)", self.code(), self.fck_mpa())
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for ConcreteGrade {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_flexible(s)
    }
}
