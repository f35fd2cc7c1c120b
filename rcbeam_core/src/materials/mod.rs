//! # Materials
//!
//! Concrete and reinforcing steel grades per IS 456:2000.
//!
//! Both grades come from a fixed enumeration. Numeric or string inputs are
//! converted through `from_fck` / `from_fy` / `from_str_flexible`, which fail
//! with [`CalcError::UnsupportedGrade`] instead of rounding to a neighbour.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::materials::{ConcreteGrade, MaterialGrade, SteelGrade};
//!
//! let mat = MaterialGrade::new(ConcreteGrade::M25, SteelGrade::Fe500);
//! assert_eq!(mat.fck_mpa(), 25.0);
//!
//! let parsed = MaterialGrade::from_strengths(25.0, 500.0).unwrap();
//! assert_eq!(parsed, mat);
//! assert!(MaterialGrade::from_strengths(15.0, 500.0).is_err());
//! ```

pub mod concrete;
pub mod rebar;

pub use concrete::ConcreteGrade;
pub use rebar::{
    bar_area_mm2, SteelGrade, ES_MPA, MAIN_BAR_DIAMETERS_MM, STEEL_DENSITY_KG_M3,
    STEEL_DESIGN_FACTOR, STIRRUP_DIAMETERS_MM,
};

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

/// Concrete + steel grade pair for one design
///
/// ## JSON
///
/// ```json
/// { "concrete": "M25", "steel": "Fe500" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialGrade {
    pub concrete: ConcreteGrade,
    pub steel: SteelGrade,
}

impl MaterialGrade {
    pub fn new(concrete: ConcreteGrade, steel: SteelGrade) -> Self {
        MaterialGrade { concrete, steel }
    }

    /// Build from raw strengths, rejecting anything outside the enumerations
    pub fn from_strengths(fck_mpa: f64, fy_mpa: f64) -> CalcResult<Self> {
        Ok(MaterialGrade {
            concrete: ConcreteGrade::from_fck(fck_mpa)?,
            steel: SteelGrade::from_fy(fy_mpa)?,
        })
    }

    /// Characteristic concrete strength fck (N/mm²)
    pub fn fck_mpa(&self) -> f64 {
        self.concrete.fck_mpa()
    }

    /// Characteristic steel yield strength fy (N/mm²)
    pub fn fy_mpa(&self) -> f64 {
        self.steel.fy_mpa()
    }

    /// Get display name (e.g., "M25 / Fe500")
    pub fn display_name(&self) -> String {
        format!("{} / {}", self.concrete.code(), self.steel.code())
    }
}

impl Default for MaterialGrade {
    fn default() -> Self {
        MaterialGrade::new(ConcreteGrade::M25, SteelGrade::Fe500)
    }
}

impl std::fmt::Display for MaterialGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
