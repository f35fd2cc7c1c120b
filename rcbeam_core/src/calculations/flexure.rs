//! # Flexure Design (IS 456:2000 cl. 38.1, Annex G)
//!
//! Required longitudinal steel for a rectangular section under a factored
//! sagging moment, using the rectangular-parabolic stress block
//! (0.36 fck b xu acting at 0.42 xu).
//!
//! ## Method
//!
//! ```text
//! Mu,lim = 0.36 fck b xu,max (d - 0.42 xu,max)
//!
//! Mu ≤ Mu,lim  →  singly reinforced
//!     Ast = (0.5 fck / fy) [1 - √(1 - 4.6 Mu / (fck b d²))] b d
//!
//! Mu > Mu,lim  →  doubly reinforced
//!     Asc  = (Mu - Mu,lim) / ((fsc - 0.447 fck)(d - d'))
//!     Ast  = Ast,lim + Asc (fsc - 0.447 fck) / (0.87 fy)
//! ```
//!
//! Both branches are closed form. The branch is chosen by a single comparison
//! against Mu,lim and recorded in [`FlexureOutcome`].
//!
//! Inadequate results (steel above 4 % of bD, compression steel that cannot
//! act) are flagged on the result, not returned as errors.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::calculations::flexure::{design_flexure, FlexureOutcome};
//! use rcbeam_core::materials::{ConcreteGrade, SteelGrade};
//! use rcbeam_core::section::{Section, SupportCondition};
//!
//! let section = Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)?;
//! let result = design_flexure(&section, ConcreteGrade::M25, SteelGrade::Fe500, 120.0)?;
//!
//! assert_eq!(result.outcome, FlexureOutcome::Singly);
//! assert!((result.ast_required_mm2 - 682.0).abs() < 7.0);
//! # Ok::<(), rcbeam_core::errors::CalcError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::code_tables::{min_tension_steel_ratio, xu_max_ratio, MAX_STEEL_RATIO};
use crate::errors::{ensure_finite, CalcResult};
use crate::materials::{ConcreteGrade, SteelGrade};
use crate::section::Section;
use crate::units::{KiloNewtonMeters, NewtonMillimeters};

/// Ultimate compressive strain in concrete in bending
pub const CONCRETE_ULTIMATE_STRAIN: f64 = 0.0035;

/// Singly vs doubly reinforced branch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FlexureOutcome {
    /// Mu ≤ Mu,lim: tension steel only
    Singly,
    /// Mu > Mu,lim: compression steel carries the excess moment
    Doubly {
        /// Compression steel centroid depth d' (mm)
        d_prime_mm: f64,
        /// Design stress in compression steel fsc (N/mm²)
        fsc_mpa: f64,
    },
}

impl FlexureOutcome {
    pub fn is_doubly(&self) -> bool {
        matches!(self, FlexureOutcome::Doubly { .. })
    }

    /// Compression steel stress fsc (N/mm²); zero when singly reinforced
    pub fn fsc_mpa(&self) -> f64 {
        match self {
            FlexureOutcome::Singly => 0.0,
            FlexureOutcome::Doubly { fsc_mpa, .. } => *fsc_mpa,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlexureOutcome::Singly => "Singly reinforced",
            FlexureOutcome::Doubly { .. } => "Doubly reinforced",
        }
    }
}

/// Flexure design results.
///
/// ## JSON Example
///
/// ```json
/// {
///   "outcome": { "type": "Singly" },
///   "mu_knm": 120.0,
///   "mu_lim_knm": 202.9,
///   "xu_max_mm": 207.0,
///   "xu_mm": 73.7,
///   "ast_lim_mm2": 1284.8,
///   "ast_required_mm2": 682.3,
///   "asc_required_mm2": 0.0,
///   "ast_min_mm2": 229.5,
///   "ast_max_mm2": 6000.0,
///   "exceeds_max_steel": false,
///   "capacity_exceeded": false
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexureResult {
    /// Which branch was used
    pub outcome: FlexureOutcome,

    /// Design moment Mu used (kN·m); negative input is reported as zero
    pub mu_knm: f64,

    /// Limiting moment of resistance of the singly reinforced section (kN·m)
    pub mu_lim_knm: f64,

    /// Limiting neutral axis depth xu,max (mm)
    pub xu_max_mm: f64,

    /// Neutral axis depth for the required steel (mm)
    pub xu_mm: f64,

    /// Tension steel that puts the neutral axis at xu,max without
    /// compression steel, 0.36 fck b xu,max / (0.87 fy) (mm²)
    pub ast_lim_mm2: f64,

    /// Required tension steel Ast (mm²), before minimum steel
    pub ast_required_mm2: f64,

    /// Required compression steel Asc (mm²); zero when singly reinforced
    pub asc_required_mm2: f64,

    /// Minimum tension steel 0.85 b d / fy (mm²)
    pub ast_min_mm2: f64,

    /// Maximum steel 0.04 b D (mm²), applies to Ast and Asc separately
    pub ast_max_mm2: f64,

    /// Required Ast or Asc exceeds 4 % of bD
    pub exceeds_max_steel: bool,

    /// The moment cannot be reached even with compression steel
    /// (d' at or beyond the limiting neutral axis)
    pub capacity_exceeded: bool,
}

impl FlexureResult {
    /// Tension steel area to detail: required steel, but never below minimum
    pub fn ast_design_mm2(&self) -> f64 {
        self.ast_required_mm2.max(self.ast_min_mm2)
    }

    /// No moment to resist; minimum steel governs
    pub fn is_trivial(&self) -> bool {
        self.mu_knm <= 0.0
    }

    /// Flexural demand can be met within the code steel limits
    pub fn is_adequate(&self) -> bool {
        !self.exceeds_max_steel && !self.capacity_exceeded
    }
}

/// Limiting moment of resistance Mu,lim (kN·m) for a singly reinforced section
pub fn limiting_moment_knm(section: &Section, concrete: ConcreteGrade, steel: SteelGrade) -> f64 {
    let fck = concrete.fck_mpa();
    let b = section.width_mm;
    let d = section.effective_depth_mm;
    let xu_max = xu_max_ratio(steel) * d;
    let mu_lim = NewtonMillimeters(0.36 * fck * b * xu_max * (d - 0.42 * xu_max));
    KiloNewtonMeters::from(mu_lim).value()
}

/// Stress in compression steel at d' when the neutral axis is at `xu_max_mm`
/// (N/mm²). Zero when d' is at or below the neutral axis.
pub fn compression_steel_stress_mpa(section: &Section, steel: SteelGrade, xu_max_mm: f64) -> f64 {
    let d_prime = section.effective_cover_mm();
    let strain = CONCRETE_ULTIMATE_STRAIN * (xu_max_mm - d_prime) / xu_max_mm;
    steel.design_stress(strain)
}

/// Design the tension (and if needed compression) steel for a factored moment.
///
/// # Arguments
///
/// * `section` - Beam section (validated before any calculation)
/// * `concrete` - Concrete grade
/// * `steel` - Steel grade for main bars
/// * `mu_knm` - Factored moment (kN·m). Zero or negative returns the trivial
///   singly reinforced result with no required steel.
///
/// # Returns
///
/// * `Ok(FlexureResult)` - Always returned for valid input, including
///   over-reinforced or otherwise inadequate designs (see the flags)
/// * `Err(CalcError::InvalidSection)` - Geometry violates basic constraints
/// * `Err(CalcError::InvalidInput)` - Non-finite moment
pub fn design_flexure(
    section: &Section,
    concrete: ConcreteGrade,
    steel: SteelGrade,
    mu_knm: f64,
) -> CalcResult<FlexureResult> {
    section.validate()?;
    ensure_finite("mu_knm", mu_knm)?;

    let fck = concrete.fck_mpa();
    let fy = steel.fy_mpa();
    let fyd = steel.fyd_mpa();
    let b = section.width_mm;
    let d = section.effective_depth_mm;

    let xu_max = xu_max_ratio(steel) * d;
    let mu_lim_knm = limiting_moment_knm(section, concrete, steel);
    let ast_lim = 0.36 * fck * b * xu_max / fyd;
    let ast_min = min_tension_steel_ratio(steel) * b * d;
    let ast_max = MAX_STEEL_RATIO * section.gross_area_mm2();

    let mu_knm = mu_knm.max(0.0);
    let mu = NewtonMillimeters::from(KiloNewtonMeters(mu_knm)).value();
    let mu_lim = NewtonMillimeters::from(KiloNewtonMeters(mu_lim_knm)).value();

    let mut capacity_exceeded = false;

    let (outcome, ast_required, asc_required, xu) = if mu <= mu_lim {
        let ast = if mu > 0.0 {
            let k = 4.6 * mu / (fck * b * d * d);
            (0.5 * fck / fy) * (1.0 - (1.0 - k).sqrt()) * b * d
        } else {
            0.0
        };
        let xu = fyd * ast / (0.36 * fck * b);
        (FlexureOutcome::Singly, ast, 0.0, xu)
    } else {
        let d_prime = section.effective_cover_mm();
        let fsc = compression_steel_stress_mpa(section, steel, xu_max);
        let net_stress = fsc - 0.447 * fck;

        if d_prime >= xu_max || net_stress <= 0.0 {
            capacity_exceeded = true;
            (
                FlexureOutcome::Doubly {
                    d_prime_mm: d_prime,
                    fsc_mpa: fsc,
                },
                ast_lim,
                0.0,
                xu_max,
            )
        } else {
            let asc = (mu - mu_lim) / (net_stress * (d - d_prime));
            let ast = ast_lim + asc * net_stress / fyd;
            (
                FlexureOutcome::Doubly {
                    d_prime_mm: d_prime,
                    fsc_mpa: fsc,
                },
                ast,
                asc,
                xu_max,
            )
        }
    };

    let exceeds_max_steel = ast_required > ast_max || asc_required > ast_max;

    Ok(FlexureResult {
        outcome,
        mu_knm,
        mu_lim_knm,
        xu_max_mm: xu_max,
        xu_mm: xu,
        ast_lim_mm2: ast_lim,
        ast_required_mm2: ast_required,
        asc_required_mm2: asc_required,
        ast_min_mm2: ast_min,
        ast_max_mm2: ast_max,
        exceeds_max_steel,
        capacity_exceeded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SupportCondition;

    fn section_300x500() -> Section {
        Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap()
    }

    #[test]
    fn test_limiting_moment() {
        // 0.36 x 25 x 300 x 207 x (450 - 0.42 x 207) = 202.9 kN·m
        let mu_lim = limiting_moment_knm(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500);
        assert!((mu_lim - 202.9).abs() < 0.5, "got {}", mu_lim);
    }

    #[test]
    fn test_singly_reinforced_reference() {
        let result = design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, 120.0).unwrap();
        assert_eq!(result.outcome, FlexureOutcome::Singly);
        // Hand calculation: 682.3 mm²
        let reference = 682.3;
        assert!((result.ast_required_mm2 - reference).abs() / reference < 0.01);
        assert_eq!(result.asc_required_mm2, 0.0);
        assert!(result.xu_mm < result.xu_max_mm);
        assert!(result.is_adequate());
    }

    #[test]
    fn test_minimum_and_maximum_steel() {
        let result = design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, 120.0).unwrap();
        // 0.85 x 300 x 450 / 500 = 229.5
        assert!((result.ast_min_mm2 - 229.5).abs() < 1e-9);
        // 0.04 x 300 x 500 = 6000
        assert!((result.ast_max_mm2 - 6000.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_moment_is_trivial() {
        let result = design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, 0.0).unwrap();
        assert!(result.is_trivial());
        assert_eq!(result.ast_required_mm2, 0.0);
        assert_eq!(result.outcome, FlexureOutcome::Singly);
        assert!((result.ast_design_mm2() - result.ast_min_mm2).abs() < 1e-12);
    }

    #[test]
    fn test_negative_moment_is_trivial() {
        let result = design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, -15.0).unwrap();
        assert!(result.is_trivial());
        assert_eq!(result.mu_knm, 0.0);
        assert_eq!(result.ast_required_mm2, 0.0);
    }

    #[test]
    fn test_doubly_reinforced() {
        let result = design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, 250.0).unwrap();
        assert!(result.outcome.is_doubly());
        assert!(result.asc_required_mm2 > 250.0 && result.asc_required_mm2 < 350.0);
        if let FlexureOutcome::Doubly { d_prime_mm, fsc_mpa } = result.outcome {
            assert_eq!(d_prime_mm, 50.0);
            // SP 16 Table F: about 412 N/mm² for Fe500 at d'/d = 0.1
            assert!((fsc_mpa - 410.0).abs() < 8.0, "fsc = {}", fsc_mpa);
        }
        let ast_lim = 0.36 * 25.0 * 300.0 * 207.0 / 435.0;
        assert!(result.ast_required_mm2 > ast_lim);
        assert!(result.is_adequate());
    }

    #[test]
    fn test_limiting_steel_reaches_limiting_moment() {
        // 0.36 x 25 x 300 x 207 / 435 = 1284.8 mm²
        let result = design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, 150.0).unwrap();
        assert!((result.ast_lim_mm2 - 1284.8).abs() < 0.1);
        assert!(result.ast_required_mm2 < result.ast_lim_mm2);

        let at_limit =
            design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, result.mu_lim_knm).unwrap();
        assert!((at_limit.ast_required_mm2 - at_limit.ast_lim_mm2).abs() / at_limit.ast_lim_mm2 < 1e-3);
    }

    #[test]
    fn test_compression_steel_stress_at_limit() {
        let section = section_300x500();
        let doubly = design_flexure(&section, ConcreteGrade::M25, SteelGrade::Fe500, 250.0).unwrap();
        let fsc = compression_steel_stress_mpa(&section, SteelGrade::Fe500, doubly.xu_max_mm);
        assert_eq!(fsc, doubly.outcome.fsc_mpa());
        // d' beyond the neutral axis: the bars are in tension
        assert_eq!(compression_steel_stress_mpa(&section, SteelGrade::Fe500, 40.0), 0.0);
    }

    #[test]
    fn test_monotonic_in_moment() {
        let section = section_300x500();
        let mut last = 0.0;
        for i in 0..=80 {
            let mu = i as f64 * 5.0;
            let result = design_flexure(&section, ConcreteGrade::M25, SteelGrade::Fe500, mu).unwrap();
            assert!(
                result.ast_required_mm2 >= last,
                "Ast decreased at Mu = {}: {} < {}",
                mu,
                result.ast_required_mm2,
                last
            );
            last = result.ast_required_mm2;
        }
    }

    #[test]
    fn test_excessive_moment_is_flagged_not_error() {
        let result = design_flexure(&section_300x500(), ConcreteGrade::M20, SteelGrade::Fe415, 1500.0).unwrap();
        assert!(result.exceeds_max_steel);
        assert!(!result.is_adequate());
    }

    #[test]
    fn test_compression_steel_cannot_act() {
        // Very deep cover relative to the neutral axis: d' = 150 > xu,max = 0.46 x 200 = 92
        let section = Section::new(300.0, 350.0, 200.0, 40.0, 3000.0, SupportCondition::SimplySupported).unwrap();
        let result = design_flexure(&section, ConcreteGrade::M25, SteelGrade::Fe500, 200.0).unwrap();
        assert!(result.capacity_exceeded);
        assert!(!result.is_adequate());
    }

    #[test]
    fn test_invalid_section_fails_fast() {
        let bad = Section {
            width_mm: 300.0,
            overall_depth_mm: 500.0,
            effective_depth_mm: 550.0,
            clear_cover_mm: 25.0,
            span_mm: 5000.0,
            support: SupportCondition::SimplySupported,
        };
        let err = design_flexure(&bad, ConcreteGrade::M25, SteelGrade::Fe500, 100.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SECTION");
    }

    #[test]
    fn test_nan_moment_rejected() {
        assert!(design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, f64::NAN).is_err());
    }
}
