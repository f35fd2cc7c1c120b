//! # Shear Design (IS 456:2000 cl. 40)
//!
//! Nominal shear stress, concrete shear capacity and two-legged vertical
//! stirrups.
//!
//! ```text
//! τv  = Vu / (b d)
//! τc  = Table 19 (pt), τc,max = Table 20
//!
//! τv ≤ τc   →  minimum stirrups      sv = 0.87 fy' Asv / (0.4 b)
//! τv > τc   →  Vus = Vu - τc b d     sv = 0.87 fy Asv d / Vus
//!
//! sv ≤ min(0.75 d, 300 mm),  fy' = min(fy, 415)   (cl. 26.5.1.6)
//! ```
//!
//! Stirrup diameter is the smallest of 8, 10, 12 mm that achieves a spacing of
//! at least 75 mm. When none does, or τv exceeds τc,max, the section is
//! flagged `overstressed` and needs a larger section or higher grade.

use serde::{Deserialize, Serialize};

use crate::code_tables::{tau_c, tau_c_max};
use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::materials::{bar_area_mm2, ConcreteGrade, SteelGrade, STEEL_DESIGN_FACTOR, STIRRUP_DIAMETERS_MM};
use crate::section::Section;
use crate::units::{KiloNewtons, Newtons};

/// Stirrup legs (closed two-legged stirrup)
pub const STIRRUP_LEGS: u32 = 2;

/// Absolute maximum stirrup spacing (mm), cl. 26.5.1.5
pub const MAX_STIRRUP_SPACING_MM: f64 = 300.0;

/// Practical minimum stirrup spacing (mm); below this the section is overstressed
pub const MIN_STIRRUP_SPACING_MM: f64 = 75.0;

/// Detailed spacing is rounded down to this increment (mm)
pub const SPACING_ROUNDING_MM: f64 = 5.0;

/// Cap on fy in the minimum shear reinforcement formula (N/mm²), cl. 26.5.1.6
pub const MAX_MIN_STIRRUP_FY_MPA: f64 = 415.0;

/// How the stirrup spacing was governed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShearDesignMode {
    /// τv ≤ τc: nominal (minimum) stirrups only
    Minimum,
    /// τv > τc: stirrups designed for Vus = Vu - τc b d
    Calculated,
}

impl ShearDesignMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShearDesignMode::Minimum => "Minimum stirrups",
            ShearDesignMode::Calculated => "Designed stirrups",
        }
    }
}

/// Shear design results.
///
/// ## JSON Example
///
/// ```json
/// {
///   "tau_v_mpa": 1.111,
///   "tau_c_mpa": 0.49,
///   "tau_c_max_mpa": 3.1,
///   "pt_percent": 0.5,
///   "vus_kn": 83.85,
///   "mode": "Calculated",
///   "stirrup_dia_mm": 8.0,
///   "legs": 2,
///   "asv_mm2": 100.53,
///   "spacing_required_mm": 234.7,
///   "spacing_mm": 230.0,
///   "max_spacing_mm": 300.0,
///   "overstressed": false
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    /// Nominal shear stress τv (N/mm²)
    pub tau_v_mpa: f64,
    /// Design shear strength of concrete τc (N/mm²)
    pub tau_c_mpa: f64,
    /// Maximum shear stress τc,max (N/mm²)
    pub tau_c_max_mpa: f64,
    /// Tension steel percentage used for τc
    pub pt_percent: f64,
    /// Shear carried by stirrups Vus (kN); zero in minimum mode
    pub vus_kn: f64,
    /// Governing design mode
    pub mode: ShearDesignMode,
    /// Stirrup bar diameter (mm)
    pub stirrup_dia_mm: f64,
    /// Number of stirrup legs
    pub legs: u32,
    /// Stirrup area per set Asv (mm²)
    pub asv_mm2: f64,
    /// Spacing required by calculation after the code caps, unrounded (mm)
    pub spacing_required_mm: f64,
    /// Detailed spacing (mm), rounded down to 5 mm, never below 75 mm
    pub spacing_mm: f64,
    /// Code maximum spacing min(0.75 d, 300) (mm)
    pub max_spacing_mm: f64,
    /// τv > τc,max, or no stirrup size reaches 75 mm spacing
    pub overstressed: bool,
}

impl ShearResult {
    /// τv / τc,max
    pub fn utilization(&self) -> f64 {
        if self.tau_c_max_mpa > 0.0 {
            self.tau_v_mpa / self.tau_c_max_mpa
        } else {
            0.0
        }
    }

    pub fn is_adequate(&self) -> bool {
        !self.overstressed
    }
}

/// Required spacing (mm) for one stirrup size, before rounding
fn stirrup_spacing(
    section: &Section,
    steel: SteelGrade,
    asv_mm2: f64,
    vus_n: Option<f64>,
    max_spacing_mm: f64,
) -> f64 {
    let b = section.width_mm;
    let d = section.effective_depth_mm;
    let minimum = STEEL_DESIGN_FACTOR * steel.fy_mpa().min(MAX_MIN_STIRRUP_FY_MPA) * asv_mm2 / (0.4 * b);
    let governed = match vus_n {
        Some(vus) => (steel.fyd_mpa() * asv_mm2 * d / vus).min(minimum),
        None => minimum,
    };
    governed.min(max_spacing_mm)
}

/// Design two-legged vertical stirrups for a factored shear.
///
/// # Arguments
///
/// * `section` - Beam section
/// * `concrete` - Concrete grade (τc, τc,max)
/// * `steel` - Stirrup steel grade
/// * `vu_kn` - Factored shear force (kN), non-negative
/// * `pt_percent` - Provided tension steel percentage 100 Ast / (b d)
///
/// # Returns
///
/// * `Ok(ShearResult)` - Including overstressed designs (see `overstressed`)
/// * `Err(CalcError::InvalidSection)` - Geometry violates basic constraints
/// * `Err(CalcError::InvalidInput)` - Negative or non-finite shear or pt
///
/// # Example
///
/// ```rust
/// use rcbeam_core::calculations::shear::{design_shear, ShearDesignMode};
/// use rcbeam_core::materials::{ConcreteGrade, SteelGrade};
/// use rcbeam_core::section::{Section, SupportCondition};
///
/// let section = Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)?;
/// let result = design_shear(&section, ConcreteGrade::M25, SteelGrade::Fe500, 150.0, 0.5)?;
///
/// assert_eq!(result.mode, ShearDesignMode::Calculated);
/// assert_eq!(result.spacing_mm, 230.0);
/// # Ok::<(), rcbeam_core::errors::CalcError>(())
/// ```
pub fn design_shear(
    section: &Section,
    concrete: ConcreteGrade,
    steel: SteelGrade,
    vu_kn: f64,
    pt_percent: f64,
) -> CalcResult<ShearResult> {
    design_shear_from(section, concrete, steel, vu_kn, pt_percent, STIRRUP_DIAMETERS_MM[0])
}

/// [`design_shear`] with stirrup sizes below `min_stirrup_dia_mm` skipped.
///
/// Used when the bars are already laid out inside a larger stirrup.
pub(crate) fn design_shear_from(
    section: &Section,
    concrete: ConcreteGrade,
    steel: SteelGrade,
    vu_kn: f64,
    pt_percent: f64,
    min_stirrup_dia_mm: f64,
) -> CalcResult<ShearResult> {
    section.validate()?;
    ensure_finite("vu_kn", vu_kn)?;
    ensure_finite("pt_percent", pt_percent)?;
    if vu_kn < 0.0 {
        return Err(CalcError::invalid_input(
            "vu_kn",
            vu_kn.to_string(),
            "Factored shear must be non-negative",
        ));
    }
    if pt_percent < 0.0 {
        return Err(CalcError::invalid_input(
            "pt_percent",
            pt_percent.to_string(),
            "Steel percentage must be non-negative",
        ));
    }

    let b = section.width_mm;
    let d = section.effective_depth_mm;
    let vu = Newtons::from(KiloNewtons(vu_kn)).value();

    let tau_v = vu / (b * d);
    let tau_c_value = tau_c(concrete, pt_percent);
    let tau_c_max_value = tau_c_max(concrete);
    let max_spacing = (0.75 * d).min(MAX_STIRRUP_SPACING_MM);

    let (mode, vus_n) = if tau_v <= tau_c_value {
        (ShearDesignMode::Minimum, None)
    } else {
        (ShearDesignMode::Calculated, Some(vu - tau_c_value * b * d))
    };

    let mut chosen = None;
    for dia in STIRRUP_DIAMETERS_MM.into_iter().filter(|&dia| dia >= min_stirrup_dia_mm) {
        let asv = STIRRUP_LEGS as f64 * bar_area_mm2(dia);
        let spacing = stirrup_spacing(section, steel, asv, vus_n, max_spacing);
        if spacing >= MIN_STIRRUP_SPACING_MM {
            chosen = Some((dia, asv, spacing));
            break;
        }
    }

    let mut overstressed = tau_v > tau_c_max_value;
    let (stirrup_dia, asv, spacing_required, spacing) = match chosen {
        Some((dia, asv, spacing)) => {
            let rounded = (spacing / SPACING_ROUNDING_MM).floor() * SPACING_ROUNDING_MM;
            (dia, asv, spacing, rounded.max(MIN_STIRRUP_SPACING_MM))
        }
        None => {
            overstressed = true;
            let dia = STIRRUP_DIAMETERS_MM[STIRRUP_DIAMETERS_MM.len() - 1];
            let asv = STIRRUP_LEGS as f64 * bar_area_mm2(dia);
            let spacing = stirrup_spacing(section, steel, asv, vus_n, max_spacing);
            (dia, asv, spacing, MIN_STIRRUP_SPACING_MM)
        }
    };

    Ok(ShearResult {
        tau_v_mpa: tau_v,
        tau_c_mpa: tau_c_value,
        tau_c_max_mpa: tau_c_max_value,
        pt_percent,
        vus_kn: KiloNewtons::from(Newtons(vus_n.unwrap_or(0.0))).value(),
        mode,
        stirrup_dia_mm: stirrup_dia,
        legs: STIRRUP_LEGS,
        asv_mm2: asv,
        spacing_required_mm: spacing_required,
        spacing_mm: spacing,
        max_spacing_mm: max_spacing,
        overstressed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SupportCondition;

    fn section_300x500() -> Section {
        Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap()
    }

    fn shear(vu_kn: f64) -> ShearResult {
        design_shear(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, vu_kn, 0.5).unwrap()
    }

    #[test]
    fn test_low_shear_uses_minimum_stirrups() {
        let result = shear(50.0);
        assert_eq!(result.mode, ShearDesignMode::Minimum);
        assert_eq!(result.stirrup_dia_mm, 8.0);
        assert_eq!(result.vus_kn, 0.0);
        // Minimum-stirrup spacing (302 mm with fy taken as 415) is capped at 300 mm
        assert_eq!(result.spacing_mm, 300.0);
        assert!(!result.overstressed);
    }

    #[test]
    fn test_zero_shear_still_gets_stirrups() {
        let result = shear(0.0);
        assert_eq!(result.tau_v_mpa, 0.0);
        assert_eq!(result.mode, ShearDesignMode::Minimum);
        assert!(result.spacing_mm > 0.0);
    }

    #[test]
    fn test_calculated_spacing_reference() {
        // Vus = 150 - 0.49 x 300 x 450 / 1000 = 83.85 kN
        let result = shear(150.0);
        assert_eq!(result.mode, ShearDesignMode::Calculated);
        assert!((result.tau_v_mpa - 1.1111).abs() < 1e-3);
        assert!((result.tau_c_mpa - 0.49).abs() < 1e-12);
        assert!((result.vus_kn - 83.85).abs() < 1e-9);
        assert!((result.spacing_required_mm - 234.7).abs() < 0.5);
        assert_eq!(result.spacing_mm, 230.0);
    }

    #[test]
    fn test_spacing_decreases_with_shear() {
        let spacings: Vec<f64> = [150.0, 200.0, 250.0].iter().map(|&v| shear(v).spacing_mm).collect();
        assert_eq!(spacings, vec![230.0, 145.0, 105.0]);

        let mut last = f64::INFINITY;
        for i in 0..40 {
            let vu = 100.0 + i as f64 * 5.0;
            let result = shear(vu);
            assert_eq!(result.stirrup_dia_mm, 8.0);
            if result.mode == ShearDesignMode::Calculated && result.spacing_required_mm < result.max_spacing_mm {
                assert!(result.spacing_required_mm < last, "spacing not decreasing at Vu = {}", vu);
                last = result.spacing_required_mm;
            }
        }
    }

    #[test]
    fn test_spacing_never_exceeds_code_maximum() {
        // Shallow beam: 0.75 d governs
        let section = Section::new(230.0, 300.0, 260.0, 25.0, 3000.0, SupportCondition::SimplySupported).unwrap();
        let result = design_shear(&section, ConcreteGrade::M20, SteelGrade::Fe415, 10.0, 0.3).unwrap();
        assert!((result.max_spacing_mm - 195.0).abs() < 1e-9);
        assert!(result.spacing_mm <= 195.0);
    }

    #[test]
    fn test_exceeding_tau_c_max_is_overstressed() {
        // τv = 500 000 / 135 000 = 3.70 > 3.1
        let result = shear(500.0);
        assert!(result.overstressed);
        assert!(result.utilization() > 1.0);
        assert!(!result.is_adequate());
    }

    #[test]
    fn test_spacing_floor_marks_overstressed() {
        // Wide section with τv just under τc,max: even 12 mm stirrups need s < 75 mm
        let section = Section::new(600.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap();
        let result = design_shear(&section, ConcreteGrade::M25, SteelGrade::Fe500, 810.0, 0.15).unwrap();
        assert!(result.tau_v_mpa <= result.tau_c_max_mpa);
        assert!(result.overstressed);
        assert_eq!(result.stirrup_dia_mm, 12.0);
        assert_eq!(result.spacing_mm, MIN_STIRRUP_SPACING_MM);
        assert!(result.spacing_required_mm < MIN_STIRRUP_SPACING_MM);
    }

    #[test]
    fn test_larger_stirrup_selected_before_floor() {
        // 8 mm would need s < 75 mm; 10 or 12 mm is picked instead
        let result = shear(400.0);
        assert!(result.stirrup_dia_mm > 8.0);
        assert!(result.spacing_mm >= MIN_STIRRUP_SPACING_MM);
        assert!(!result.overstressed);
    }

    #[test]
    fn test_minimum_stirrups_cap_fy_at_415() {
        // 0.87 x 415 x 100.53 / (0.4 x 600) = 151.2 mm for every grade above Fe415
        let section = Section::new(600.0, 600.0, 550.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap();
        let spacings: Vec<f64> = [SteelGrade::Fe415, SteelGrade::Fe500, SteelGrade::Fe550]
            .iter()
            .map(|&steel| {
                let result = design_shear(&section, ConcreteGrade::M25, steel, 20.0, 0.5).unwrap();
                assert_eq!(result.mode, ShearDesignMode::Minimum);
                assert_eq!(result.stirrup_dia_mm, 8.0);
                result.spacing_mm
            })
            .collect();
        assert_eq!(spacings, vec![150.0, 150.0, 150.0]);
    }

    #[test]
    fn test_calculated_spacing_uses_full_fy() {
        // 0.87 x 500 x 100.53 x 450 / 83 850 = 234.7 mm, below the capped minimum of 302 mm
        let result = shear(150.0);
        let capped_minimum = 0.87 * MAX_MIN_STIRRUP_FY_MPA * result.asv_mm2 / (0.4 * 300.0);
        assert!(result.spacing_required_mm < capped_minimum);
        assert!((result.spacing_required_mm - 234.7).abs() < 0.5);
    }

    #[test]
    fn test_smaller_stirrups_skipped_when_requested() {
        let result = design_shear_from(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, 150.0, 0.5, 10.0)
            .unwrap();
        assert_eq!(result.stirrup_dia_mm, 10.0);
        assert!(result.spacing_mm > shear(150.0).spacing_mm);
    }

    #[test]
    fn test_negative_shear_rejected() {
        let err = design_shear(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, -1.0, 0.5).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
