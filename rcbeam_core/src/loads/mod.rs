//! Factored design actions per IS 456:2000 Table 18
//!
//! The design pipeline consumes a [`LoadDemand`]: the factored bending
//! moment Mu and factored shear Vu at the critical section. Callers with a
//! structural analysis pass those values directly. For a single uniformly
//! loaded member, [`LoadDemand::from_uniform_load`] applies the limit state
//! load factor (1.5 for DL + LL) and the statically determinate moment and
//! shear formulas.
//!
//! # Example
//!
//! ```
//! use rcbeam_core::loads::LoadDemand;
//! use rcbeam_core::section::SupportCondition;
//!
//! // 5 m simply supported beam, 10 kN/m dead + 12 kN/m live
//! let demand = LoadDemand::from_uniform_load(5000.0, SupportCondition::SimplySupported, 10.0, 12.0)
//!     .unwrap();
//! // wu = 1.5 x 22 = 33 kN/m, Mu = 33 x 5² / 8
//! assert!((demand.mu_knm - 103.125).abs() < 1e-9);
//! assert!((demand.vu_kn - 82.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::section::SupportCondition;
use crate::units::{Meters, Millimeters};

/// Partial safety factor for DL + LL at the limit state of collapse (Table 18)
pub const LOAD_FACTOR_DL_LL: f64 = 1.5;

/// Factored bending moment and shear for one design check.
///
/// Both values are magnitudes at the critical section and must be finite and
/// non-negative; hogging moments are designed by flipping the section, not by
/// passing a negative value.
///
/// ## JSON Example
///
/// ```json
/// { "mu_knm": 120.0, "vu_kn": 150.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadDemand {
    /// Factored bending moment Mu (kN·m)
    pub mu_knm: f64,
    /// Factored shear force Vu (kN)
    pub vu_kn: f64,
}

impl LoadDemand {
    /// Create a validated demand.
    pub fn new(mu_knm: f64, vu_kn: f64) -> CalcResult<Self> {
        let demand = LoadDemand { mu_knm, vu_kn };
        demand.validate()?;
        Ok(demand)
    }

    /// Validate that both actions are finite and non-negative.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("mu_knm", self.mu_knm)?;
        ensure_finite("vu_kn", self.vu_kn)?;
        if self.mu_knm < 0.0 {
            return Err(CalcError::invalid_input(
                "mu_knm",
                self.mu_knm.to_string(),
                "Factored moment must be non-negative",
            ));
        }
        if self.vu_kn < 0.0 {
            return Err(CalcError::invalid_input(
                "vu_kn",
                self.vu_kn.to_string(),
                "Factored shear must be non-negative",
            ));
        }
        Ok(())
    }

    /// Factored actions for a uniformly loaded, statically determinate member.
    ///
    /// - Simply supported: Mu = wu L² / 8, Vu = wu L / 2
    /// - Cantilever: Mu = wu L² / 2, Vu = wu L
    ///
    /// Continuous spans need a frame or moment-coefficient analysis and are
    /// rejected here.
    pub fn from_uniform_load(
        span_mm: f64,
        support: SupportCondition,
        dead_kn_per_m: f64,
        live_kn_per_m: f64,
    ) -> CalcResult<Self> {
        ensure_finite("span_mm", span_mm)?;
        ensure_finite("dead_kn_per_m", dead_kn_per_m)?;
        ensure_finite("live_kn_per_m", live_kn_per_m)?;
        if span_mm <= 0.0 {
            return Err(CalcError::invalid_input("span_mm", span_mm.to_string(), "Span must be positive"));
        }
        if dead_kn_per_m < 0.0 || live_kn_per_m < 0.0 {
            return Err(CalcError::invalid_input(
                "uniform_load",
                format!("D = {}, L = {}", dead_kn_per_m, live_kn_per_m),
                "Service loads must be non-negative",
            ));
        }

        let wu = LOAD_FACTOR_DL_LL * (dead_kn_per_m + live_kn_per_m);
        let l = Meters::from(Millimeters(span_mm)).value();

        let (mu_knm, vu_kn) = match support {
            SupportCondition::SimplySupported => (wu * l * l / 8.0, wu * l / 2.0),
            SupportCondition::Cantilever => (wu * l * l / 2.0, wu * l),
            SupportCondition::Continuous => {
                return Err(CalcError::invalid_input(
                    "support",
                    support.display_name(),
                    "Continuous spans require analysed Mu and Vu",
                ))
            }
        };
        Self::new(mu_knm, vu_kn)
    }
}
