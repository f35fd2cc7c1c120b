//! # Beam Design Pipeline
//!
//! One complete design for one section, material pair and demand:
//!
//! ```text
//! validate inputs → flexure → bars → shear (provided pt) → development length
//!                 → compliance checks → cost
//! ```
//!
//! Only input errors stop the pipeline. An inadequate beam is still a
//! complete [`DesignCandidate`] with `is_adequate() == false`, so the
//! optimizer can explain why a search space is infeasible.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::calculations::design_beam;
//! use rcbeam_core::cost::CostProfile;
//! use rcbeam_core::loads::LoadDemand;
//! use rcbeam_core::materials::MaterialGrade;
//! use rcbeam_core::section::{Section, SupportCondition};
//!
//! let section = Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)?;
//! let candidate = design_beam(
//!     &section,
//!     MaterialGrade::default(),
//!     &LoadDemand::new(120.0, 150.0)?,
//!     &CostProfile::default(),
//! )?;
//!
//! assert!(candidate.is_adequate());
//! assert!(candidate.cost.total > 0.0);
//! # Ok::<(), rcbeam_core::errors::CalcError>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{reinforce, ReinforcementResult};
use crate::compliance::{self, ComplianceReport};
use crate::cost::{compute_cost, CostBreakdown, CostProfile};
use crate::errors::CalcResult;
use crate::loads::LoadDemand;
use crate::materials::MaterialGrade;
use crate::section::Section;

/// A fully designed, checked and priced beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCandidate {
    pub section: Section,
    pub material: MaterialGrade,
    pub demand: LoadDemand,
    pub reinforcement: ReinforcementResult,
    pub compliance: ComplianceReport,
    pub cost: CostBreakdown,
}

impl DesignCandidate {
    /// Gross area b × D (mm²), used to prefer lighter sections on equal cost
    pub fn self_weight_index(&self) -> f64 {
        self.section.gross_area_mm2()
    }

    pub fn is_adequate(&self) -> bool {
        self.compliance.is_adequate
    }

    /// Ids of failed compliance checks
    pub fn failed_checks(&self) -> Vec<&str> {
        self.compliance.failed_checks()
    }

    /// e.g. "300 x 500 (d = 450) M25 / Fe500"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.section.display_name(), self.material)
    }
}

/// Design one beam end to end.
///
/// # Errors
///
/// Input errors only: `InvalidSection`, `InvalidInput` (demand or rates),
/// `MissingField` (no concrete rate for the grade).
#[instrument(skip(profile), fields(section = %section.display_name(), material = %material))]
pub fn design_beam(
    section: &Section,
    material: MaterialGrade,
    demand: &LoadDemand,
    profile: &CostProfile,
) -> CalcResult<DesignCandidate> {
    section.validate()?;
    demand.validate()?;
    profile.validate()?;
    profile.concrete_rate(material.concrete)?;

    let reinforcement = reinforce(section, material, demand)?;
    let compliance = compliance::validate(section, material, &reinforcement)?;
    let cost = compute_cost(section, &reinforcement, profile)?;

    debug!(
        adequate = compliance.is_adequate,
        total_cost = cost.total,
        failed = ?compliance.failed_checks(),
        "designed beam"
    );

    Ok(DesignCandidate {
        section: *section,
        material,
        demand: *demand,
        reinforcement,
        compliance,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConcreteGrade, SteelGrade};
    use crate::section::SupportCondition;

    fn section_300x500() -> Section {
        Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap()
    }

    #[test]
    fn test_design_is_deterministic() {
        let demand = LoadDemand::new(120.0, 150.0).unwrap();
        let a = design_beam(&section_300x500(), MaterialGrade::default(), &demand, &CostProfile::default()).unwrap();
        let b = design_beam(&section_300x500(), MaterialGrade::default(), &demand, &CostProfile::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_inadequate_design_is_not_error() {
        let demand = LoadDemand::new(120.0, 500.0).unwrap();
        let candidate =
            design_beam(&section_300x500(), MaterialGrade::default(), &demand, &CostProfile::default()).unwrap();
        assert!(!candidate.is_adequate());
        assert_eq!(candidate.failed_checks(), vec!["shear"]);
    }

    #[test]
    fn test_missing_rate_is_error() {
        let mut profile = CostProfile::default();
        profile.concrete_rates.remove(&ConcreteGrade::M30);
        let material = MaterialGrade::new(ConcreteGrade::M30, SteelGrade::Fe500);
        let err = design_beam(&section_300x500(), material, &LoadDemand::new(100.0, 80.0).unwrap(), &profile)
            .unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_invalid_section_is_error() {
        let mut section = section_300x500();
        section.width_mm = 0.0;
        let err = design_beam(&section, MaterialGrade::default(), &LoadDemand::default(), &CostProfile::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SECTION");
    }

    #[test]
    fn test_self_weight_index() {
        let candidate = design_beam(
            &section_300x500(),
            MaterialGrade::default(),
            &LoadDemand::new(50.0, 40.0).unwrap(),
            &CostProfile::default(),
        )
        .unwrap();
        assert_eq!(candidate.self_weight_index(), 150_000.0);
    }
}
