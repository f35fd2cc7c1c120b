//! Reinforcing Steel (IS 456:2000 cl. 5.6, Fig. 23)
//!
//! Steel grades designated by characteristic yield strength fy, plus the
//! design stress-strain curves used for compression steel in doubly
//! reinforced sections and the standard bar sizes used for detailing.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Modulus of elasticity of reinforcing steel Es (N/mm²)
pub const ES_MPA: f64 = 200_000.0;

/// Unit weight of reinforcing steel (kg/m³)
pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;

/// Partial safety factor on steel, expressed as the 0.87 fy design multiplier
pub const STEEL_DESIGN_FACTOR: f64 = 0.87;

/// Standard main bar diameters (mm), smallest first
pub const MAIN_BAR_DIAMETERS_MM: [f64; 6] = [10.0, 12.0, 16.0, 20.0, 25.0, 32.0];

/// Standard stirrup diameters (mm), smallest first
pub const STIRRUP_DIAMETERS_MM: [f64; 3] = [8.0, 10.0, 12.0];

/// Inelastic strain at each stress level of the cold-worked bar curve (Fig. 23A).
///
/// Pairs of (stress / fyd, inelastic strain).
const COLD_WORKED_CURVE: [(f64, f64); 6] = [
    (0.80, 0.0),
    (0.85, 0.0001),
    (0.90, 0.0003),
    (0.95, 0.0007),
    (0.975, 0.0010),
    (1.00, 0.0020),
];

/// Reinforcing steel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    /// Mild steel, fy = 250 N/mm²
    Fe250,
    /// HYSD, fy = 415 N/mm²
    Fe415,
    /// HYSD, fy = 500 N/mm²
    Fe500,
    /// HYSD, fy = 550 N/mm²
    Fe550,
}

impl SteelGrade {
    /// All supported grades, weakest first
    pub const ALL: [SteelGrade; 4] = [
        SteelGrade::Fe250,
        SteelGrade::Fe415,
        SteelGrade::Fe500,
        SteelGrade::Fe550,
    ];

    /// Characteristic yield strength fy (N/mm²)
    pub fn fy_mpa(&self) -> f64 {
        match self {
            SteelGrade::Fe250 => 250.0,
            SteelGrade::Fe415 => 415.0,
            SteelGrade::Fe500 => 500.0,
            SteelGrade::Fe550 => 550.0,
        }
    }

    /// Design yield stress fyd = 0.87 fy (N/mm²)
    pub fn fyd_mpa(&self) -> f64 {
        STEEL_DESIGN_FACTOR * self.fy_mpa()
    }

    /// Short code (e.g., "Fe500")
    pub fn code(&self) -> &'static str {
        match self {
            SteelGrade::Fe250 => "Fe250",
            SteelGrade::Fe415 => "Fe415",
            SteelGrade::Fe500 => "Fe500",
            SteelGrade::Fe550 => "Fe550",
        }
    }

    /// Deformed (HYSD) bars get the 60 % bond stress increase of cl. 26.2.1.1
    pub fn is_deformed(&self) -> bool {
        !matches!(self, SteelGrade::Fe250)
    }

    /// Look up a grade from its fy value (exact match only)
    pub fn from_fy(fy_mpa: f64) -> CalcResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.fy_mpa() == fy_mpa)
            .ok_or_else(|| CalcError::unsupported_grade("steel", fy_mpa.to_string()))
    }

    /// Parse from common string representations ("Fe500", "FE 500", "500")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let cleaned = s.to_uppercase().replace([' ', '-', '_'], "");
        let digits = cleaned.strip_prefix("FE").unwrap_or(&cleaned);
        match digits.parse::<f64>() {
            Ok(fy) => Self::from_fy(fy),
            Err(_) => Err(CalcError::unsupported_grade("steel", s)),
        }
    }

    /// Design stress (N/mm²) at a given strain, per IS 456 Fig. 23.
    ///
    /// Mild steel is elastic-perfectly plastic at 0.87 fy. Cold-worked bars
    /// follow the piecewise-linear curve of Fig. 23A, elastic up to 0.8 fyd.
    /// Negative strains return zero.
    pub fn design_stress(&self, strain: f64) -> f64 {
        if strain <= 0.0 {
            return 0.0;
        }
        let fyd = self.fyd_mpa();
        if !self.is_deformed() {
            return (ES_MPA * strain).min(fyd);
        }

        let mut prev_strain = 0.0;
        let mut prev_stress = 0.0;
        for (ratio, inelastic) in COLD_WORKED_CURVE {
            let stress = ratio * fyd;
            let point_strain = stress / ES_MPA + inelastic;
            if strain <= point_strain {
                let t = (strain - prev_strain) / (point_strain - prev_strain);
                return prev_stress + t * (stress - prev_stress);
            }
            prev_strain = point_strain;
            prev_stress = stress;
        }
        fyd
    }

    /// Get display name
    pub fn display_name(&self) -> String {
        format!("{} (fy = {:.0} N/mm²)", self.code(), self.fy_mpa())
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for SteelGrade {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_flexible(s)
    }
}

/// Cross-sectional area of one bar (mm²)
pub fn bar_area_mm2(diameter_mm: f64) -> f64 {
    std::f64::consts::PI * diameter_mm * diameter_mm / 4.0
}
