//! # Beam Calculations
//!
//! Each calculator is a pure function over validated inputs that returns a
//! JSON-serializable result:
//!
//! - [`flexure`] - required tension / compression steel (cl. 38.1)
//! - [`shear`] - nominal shear stress and stirrups (cl. 40)
//! - [`detailing`] - bar arrangements and development length (cl. 26)
//! - [`design`] - the full pipeline producing a priced, checked
//!   [`DesignCandidate`](design::DesignCandidate)
//!
//! [`reinforce`] chains the first three into a [`ReinforcementResult`], the
//! reinforcement actually detailed for one beam.

pub mod design;
pub mod detailing;
pub mod flexure;
pub mod shear;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use design::{design_beam, DesignCandidate};
pub use detailing::{BarArrangement, HANGER_BAR_DIA_MM};
pub use flexure::{design_flexure, FlexureOutcome, FlexureResult};
pub use shear::{design_shear, ShearDesignMode, ShearResult};

use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::loads::LoadDemand;
use crate::materials::{MaterialGrade, STIRRUP_DIAMETERS_MM};
use crate::section::Section;

/// Reinforcement detailed for one beam.
///
/// Produced by [`reinforce`]; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementResult {
    /// Grades the reinforcement was designed for
    pub material: MaterialGrade,
    /// Flexure design
    pub flexure: FlexureResult,
    /// Shear design, using the provided tension steel percentage
    pub shear: ShearResult,
    /// Bottom (tension) bars
    pub tension_bars: BarArrangement,
    /// Top bars: compression steel, or hangers when none is required
    pub top_bars: BarArrangement,
    /// Stress in the top bars at xu,max when they act as compression steel
    /// (N/mm²); `None` for hangers
    #[serde(default)]
    pub compression_stress_mpa: Option<f64>,
    /// Development length of the tension bars (mm)
    pub development_length_mm: f64,
}

impl ReinforcementResult {
    /// Provided tension steel (mm²)
    pub fn ast_provided_mm2(&self) -> f64 {
        self.tension_bars.area_mm2
    }

    /// Provided compression steel (mm²); hanger bars do not count
    pub fn asc_provided_mm2(&self) -> f64 {
        if self.carries_compression_steel() {
            self.top_bars.area_mm2
        } else {
            0.0
        }
    }

    /// Top bars were sized as compression reinforcement
    pub fn carries_compression_steel(&self) -> bool {
        self.compression_stress_mpa.is_some()
    }

    /// 100 Ast,prov / (b d)
    pub fn pt_provided_percent(&self, section: &Section) -> f64 {
        100.0 * self.ast_provided_mm2() / section.effective_area_mm2()
    }

    /// 100 Asc,prov / (b d)
    pub fn pc_provided_percent(&self, section: &Section) -> f64 {
        100.0 * self.asc_provided_mm2() / section.effective_area_mm2()
    }

    /// Reject structurally meaningless data: non-finite or negative areas,
    /// empty bar groups, non-positive stirrup spacing.
    pub fn validate(&self) -> CalcResult<()> {
        self.tension_bars.validate("tension_bars")?;
        self.top_bars.validate("top_bars")?;
        let areas = [
            ("flexure.ast_required_mm2", self.flexure.ast_required_mm2),
            ("flexure.asc_required_mm2", self.flexure.asc_required_mm2),
            ("shear.asv_mm2", self.shear.asv_mm2),
        ];
        for (field, value) in areas {
            ensure_finite(field, value)?;
            if value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Steel area must be non-negative"));
            }
        }
        ensure_finite("shear.spacing_mm", self.shear.spacing_mm)?;
        if self.shear.spacing_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "shear.spacing_mm",
                self.shear.spacing_mm.to_string(),
                "Stirrup spacing must be positive",
            ));
        }
        ensure_finite("development_length_mm", self.development_length_mm)?;
        if let Some(fsc) = self.compression_stress_mpa {
            ensure_finite("compression_stress_mpa", fsc)?;
        }
        Ok(())
    }
}

/// Compression steel to detail, with its stress at xu,max.
///
/// Provided tension steel beyond Ast,lim would push the neutral axis below
/// xu,max, so compression steel balances the excess force:
/// Asc = (Ast,prov - Ast,lim) 0.87 fy / (fsc - 0.447 fck). This applies to
/// singly sections whose whole bars overshoot Ast,lim as well as to doubly
/// sections. Returns `None` when the top bars are hangers.
fn compression_target(
    section: &Section,
    flexure: &FlexureResult,
    material: MaterialGrade,
    ast_provided_mm2: f64,
) -> Option<(f64, f64)> {
    let excess = (ast_provided_mm2 - flexure.ast_lim_mm2).max(0.0);
    if flexure.asc_required_mm2 <= 0.0 && excess <= 0.0 {
        return None;
    }
    let fsc = flexure::compression_steel_stress_mpa(section, material.steel, flexure.xu_max_mm);
    let net_stress = fsc - 0.447 * material.fck_mpa();
    if net_stress <= 0.0 {
        // Compression steel cannot act; the ductility check reports it
        return None;
    }
    let balancing = excess * material.steel.fyd_mpa() / net_stress;
    Some((flexure.asc_required_mm2.max(balancing), fsc))
}

/// Detail bars and stirrups for one design action.
///
/// Flexure, then bars (minimum steel applied), then shear with the provided
/// steel percentage. Bars are first laid out inside 8 mm stirrups. If shear
/// needs a larger stirrup, the bars are laid out again inside it and shear is
/// redesigned with no smaller stirrup, until the size stops changing. The
/// stirrup only grows, so this ends after at most one pass per size.
pub fn reinforce(section: &Section, material: MaterialGrade, demand: &LoadDemand) -> CalcResult<ReinforcementResult> {
    section.validate()?;
    demand.validate()?;

    let flexure = design_flexure(section, material.concrete, material.steel, demand.mu_knm)?;
    let ast_target = flexure.ast_design_mm2();

    let mut stirrup_dia = STIRRUP_DIAMETERS_MM[0];
    for _ in 0..STIRRUP_DIAMETERS_MM.len() {
        let tension_bars = detailing::select_tension_bars(ast_target, section, stirrup_dia)?;
        let compression = compression_target(section, &flexure, material, tension_bars.area_mm2);
        let asc_target = compression.map_or(0.0, |(asc, _)| asc);
        let top_bars = detailing::select_top_bars(asc_target, section, stirrup_dia)?;

        let pt = 100.0 * tension_bars.area_mm2 / section.effective_area_mm2();
        let shear =
            shear::design_shear_from(section, material.concrete, material.steel, demand.vu_kn, pt, stirrup_dia)?;

        if shear.stirrup_dia_mm == stirrup_dia {
            return Ok(ReinforcementResult {
                material,
                flexure,
                shear,
                tension_bars,
                top_bars,
                compression_stress_mpa: compression.map(|(_, fsc)| fsc),
                development_length_mm: detailing::development_length_mm(
                    tension_bars.diameter_mm,
                    material.concrete,
                    material.steel,
                    false,
                ),
            });
        }
        stirrup_dia = shear.stirrup_dia_mm;
    }
    Err(CalcError::internal(format!(
        "stirrup size did not settle, last tried {} mm",
        stirrup_dia
    )))
}
