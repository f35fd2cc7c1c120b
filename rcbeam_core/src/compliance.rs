//! # IS 456 Compliance Checks
//!
//! Validates a detailed beam against the serviceability and detailing
//! provisions that the strength calculations do not cover by themselves.
//!
//! Checks run in a fixed order with stable ids:
//!
//! | id            | Rule                                                   |
//! |---------------|--------------------------------------------------------|
//! | `min_steel`   | Ast,prov ≥ 0.85 b d / fy                               |
//! | `max_steel`   | Ast,prov and Asc,prov ≤ 0.04 b D                       |
//! | `bar_spacing` | max(φ, 25) ≤ clear spacing ≤ Table 15 maximum          |
//! | `deflection`  | L/d ≤ basic × kt × kc (× 10/L beyond 10 m)             |
//! | `ductility`   | xu/d ≤ xu,max/d with the provided steel                |
//! | `shear`       | τv ≤ τc,max and stirrups at ≥ 75 mm suffice            |
//!
//! A failing check is an ordinary outcome; only malformed input is an error.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::calculations::reinforce;
//! use rcbeam_core::compliance::validate;
//! use rcbeam_core::loads::LoadDemand;
//! use rcbeam_core::materials::MaterialGrade;
//! use rcbeam_core::section::{Section, SupportCondition};
//!
//! let section = Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)?;
//! let material = MaterialGrade::default();
//! let reinforcement = reinforce(&section, material, &LoadDemand::new(120.0, 150.0)?)?;
//!
//! let report = validate(&section, material, &reinforcement)?;
//! assert_eq!(report.checks.len(), 6);
//! assert_eq!(report.checks[0].name, "min_steel");
//! # Ok::<(), rcbeam_core::errors::CalcError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::detailing::{clear_spacing_mm, min_clear_spacing_mm};
use crate::calculations::shear::MIN_STIRRUP_SPACING_MM;
use crate::calculations::ReinforcementResult;
use crate::code_tables::{
    compression_modification_factor, is456_ref, max_clear_spacing_mm, service_stress_mpa,
    tension_modification_factor, xu_max_ratio, MAX_STEEL_RATIO,
};
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialGrade;
use crate::section::{Section, SupportCondition};

pub const CHECK_MIN_STEEL: &str = "min_steel";
pub const CHECK_MAX_STEEL: &str = "max_steel";
pub const CHECK_BAR_SPACING: &str = "bar_spacing";
pub const CHECK_DEFLECTION: &str = "deflection";
pub const CHECK_DUCTILITY: &str = "ductility";
pub const CHECK_SHEAR: &str = "shear";

/// Check ids in evaluation order
pub const CHECK_IDS: [&str; 6] = [
    CHECK_MIN_STEEL,
    CHECK_MAX_STEEL,
    CHECK_BAR_SPACING,
    CHECK_DEFLECTION,
    CHECK_DUCTILITY,
    CHECK_SHEAR,
];

/// Spans beyond this length (m) reduce the allowable L/d by 10 / L
const LONG_SPAN_M: f64 = 10.0;

/// Reported utilization for checks with no finite ratio (zero capacity)
pub const UTILIZATION_CAP: f64 = 99.0;

/// Result of one code check.
///
/// `utilization` is demand / capacity where that is meaningful; values above
/// 1.0 correspond to a failed check. It is capped at [`UTILIZATION_CAP`] so
/// reports stay valid JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Stable check id (see [`CHECK_IDS`])
    pub name: String,
    pub passed: bool,
    /// Human-readable explanation with the governing numbers
    pub reason: String,
    /// IS 456 clause reference
    pub clause: String,
    pub utilization: f64,
}

impl CheckOutcome {
    fn new(name: &str, passed: bool, reason: String, clause: &str, utilization: f64) -> Self {
        CheckOutcome {
            name: name.to_string(),
            passed,
            reason,
            clause: clause.to_string(),
            utilization: utilization.min(UTILIZATION_CAP),
        }
    }
}

/// All check outcomes for one design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "checks": [
///     {
///       "name": "min_steel",
///       "passed": true,
///       "reason": "Ast,prov = 792 mm² ≥ Ast,min = 230 mm²",
///       "clause": "IS 456 26.5.1.1(a)",
///       "utilization": 0.29
///     }
///   ],
///   "is_adequate": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Outcomes in [`CHECK_IDS`] order
    pub checks: Vec<CheckOutcome>,
    /// True iff every check passed
    pub is_adequate: bool,
}

impl ComplianceReport {
    fn from_checks(checks: Vec<CheckOutcome>) -> Self {
        let is_adequate = checks.iter().all(|c| c.passed);
        ComplianceReport { checks, is_adequate }
    }

    /// Ids of failed checks, in check order
    pub fn failed_checks(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Look up a check by id
    pub fn check(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Highest utilization across all checks
    pub fn governing_utilization(&self) -> f64 {
        self.checks.iter().map(|c| c.utilization).fold(0.0, f64::max)
    }
}

/// Run every compliance check.
///
/// # Errors
///
/// * `InvalidSection` - section geometry is invalid
/// * `InvalidInput` - reinforcement data is malformed (non-finite or negative
///   areas, zero bar count)
/// * `InvalidInput` - reinforcement was designed for other grades
pub fn validate(
    section: &Section,
    material: MaterialGrade,
    reinforcement: &ReinforcementResult,
) -> CalcResult<ComplianceReport> {
    section.validate()?;
    reinforcement.validate()?;
    if reinforcement.material != material {
        return Err(CalcError::invalid_input(
            "material",
            material.display_name(),
            format!("Reinforcement was designed for {}", reinforcement.material),
        ));
    }

    Ok(ComplianceReport::from_checks(vec![
        check_min_steel(section, material, reinforcement),
        check_max_steel(section, reinforcement),
        check_bar_spacing(section, material, reinforcement),
        check_deflection(section, material, reinforcement),
        check_ductility(section, material, reinforcement),
        check_shear(reinforcement),
    ]))
}

fn check_min_steel(section: &Section, material: MaterialGrade, r: &ReinforcementResult) -> CheckOutcome {
    let ast_min = 0.85 * section.effective_area_mm2() / material.fy_mpa();
    let provided = r.ast_provided_mm2();
    let passed = provided >= ast_min;
    let utilization = if provided > 0.0 { ast_min / provided } else { f64::INFINITY };
    CheckOutcome::new(
        CHECK_MIN_STEEL,
        passed,
        format!(
            "Ast,prov = {:.0} mm² {} Ast,min = {:.0} mm²",
            provided,
            if passed { "≥" } else { "<" },
            ast_min
        ),
        is456_ref::MIN_TENSION_STEEL,
        utilization,
    )
}

fn check_max_steel(section: &Section, r: &ReinforcementResult) -> CheckOutcome {
    let limit = MAX_STEEL_RATIO * section.gross_area_mm2();
    let ast = r.ast_provided_mm2();
    let asc = r.asc_provided_mm2();
    let passed = ast <= limit && asc <= limit;
    CheckOutcome::new(
        CHECK_MAX_STEEL,
        passed,
        format!(
            "Ast,prov = {:.0} mm², Asc,prov = {:.0} mm², limit 0.04 bD = {:.0} mm²",
            ast, asc, limit
        ),
        is456_ref::MAX_STEEL,
        ast.max(asc) / limit,
    )
}

fn check_bar_spacing(section: &Section, material: MaterialGrade, r: &ReinforcementResult) -> CheckOutcome {
    let stirrup = r.shear.stirrup_dia_mm;
    let tension = r.tension_bars;
    let clear = clear_spacing_mm(section, stirrup, &tension);
    let min_clear = min_clear_spacing_mm(tension.diameter_mm);
    let max_clear = max_clear_spacing_mm(material.steel);

    let top = r.top_bars;
    let top_clear = clear_spacing_mm(section, stirrup, &top);
    let top_min = min_clear_spacing_mm(top.diameter_mm);

    let mut problems = Vec::new();
    if clear < min_clear {
        problems.push(format!(
            "{} clear spacing {:.0} mm < {:.0} mm",
            tension, clear, min_clear
        ));
    }
    if clear > max_clear {
        problems.push(format!(
            "{} clear spacing {:.0} mm > {:.0} mm (Table 15)",
            tension, clear, max_clear
        ));
    }
    if top_clear < top_min {
        problems.push(format!("top {} clear spacing {:.0} mm < {:.0} mm", top, top_clear, top_min));
    }

    let utilization = [
        if clear > 0.0 { min_clear / clear } else { f64::INFINITY },
        clear / max_clear,
        if top_clear > 0.0 { top_min / top_clear } else { f64::INFINITY },
    ]
    .into_iter()
    .fold(0.0, f64::max);

    let passed = problems.is_empty();
    let reason = if passed {
        format!(
            "{} clear spacing {:.0} mm within {:.0}-{:.0} mm",
            tension, clear, min_clear, max_clear
        )
    } else {
        problems.join("; ")
    };
    CheckOutcome::new(CHECK_BAR_SPACING, passed, reason, is456_ref::BAR_SPACING, utilization)
}

/// Allowable span / effective depth ratio for the provided reinforcement
pub fn allowable_span_depth_ratio(section: &Section, material: MaterialGrade, r: &ReinforcementResult) -> f64 {
    let fs = service_stress_mpa(material.steel, r.flexure.ast_required_mm2, r.ast_provided_mm2());
    let kt = tension_modification_factor(fs, r.pt_provided_percent(section));
    let kc = compression_modification_factor(r.pc_provided_percent(section));
    let mut allowable = section.support.basic_span_depth_ratio() * kt * kc;
    let span_m = section.span_m();
    if span_m > LONG_SPAN_M && section.support != SupportCondition::Cantilever {
        allowable *= LONG_SPAN_M / span_m;
    }
    allowable
}

fn check_deflection(section: &Section, material: MaterialGrade, r: &ReinforcementResult) -> CheckOutcome {
    let actual = section.span_depth_ratio();
    let allowable = allowable_span_depth_ratio(section, material, r);
    let passed = actual <= allowable;
    CheckOutcome::new(
        CHECK_DEFLECTION,
        passed,
        format!(
            "L/d = {:.1} {} allowable {:.1} ({}, basic {:.0})",
            actual,
            if passed { "≤" } else { ">" },
            allowable,
            section.support,
            section.support.basic_span_depth_ratio()
        ),
        is456_ref::DEFLECTION,
        actual / allowable,
    )
}

fn check_ductility(section: &Section, material: MaterialGrade, r: &ReinforcementResult) -> CheckOutcome {
    let d = section.effective_depth_mm;
    let limit = xu_max_ratio(material.steel);

    if r.flexure.capacity_exceeded {
        return CheckOutcome::new(
            CHECK_DUCTILITY,
            false,
            format!(
                "Mu = {:.1} kN·m cannot be resisted: compression steel at d' = {:.0} mm lies outside xu,max = {:.0} mm",
                r.flexure.mu_knm,
                section.effective_cover_mm(),
                r.flexure.xu_max_mm
            ),
            is456_ref::DUCTILITY,
            f64::INFINITY,
        );
    }

    let fck = material.fck_mpa();
    let fsc = r.compression_stress_mpa.unwrap_or(0.0);
    let compression_force = (fsc - 0.447 * fck).max(0.0) * r.asc_provided_mm2();
    let tension_force = material.steel.fyd_mpa() * r.ast_provided_mm2();
    let xu = ((tension_force - compression_force) / (0.36 * fck * section.width_mm)).max(0.0);
    let ratio = xu / d;
    let passed = ratio <= limit + 1e-9;
    CheckOutcome::new(
        CHECK_DUCTILITY,
        passed,
        format!(
            "xu/d = {:.3} {} xu,max/d = {:.2}",
            ratio,
            if passed { "≤" } else { ">" },
            limit
        ),
        is456_ref::DUCTILITY,
        ratio / limit,
    )
}

fn check_shear(r: &ReinforcementResult) -> CheckOutcome {
    let s = &r.shear;
    let stress_ratio = s.utilization();
    let spacing_ratio = if s.spacing_required_mm > 0.0 {
        MIN_STIRRUP_SPACING_MM / s.spacing_required_mm
    } else {
        f64::INFINITY
    };

    let reason = if s.tau_v_mpa > s.tau_c_max_mpa {
        format!(
            "τv = {:.2} N/mm² > τc,max = {:.2} N/mm²",
            s.tau_v_mpa, s.tau_c_max_mpa
        )
    } else if s.overstressed {
        format!(
            "{:.0} mm stirrups need {:.0} mm spacing (< {:.0} mm)",
            s.stirrup_dia_mm, s.spacing_required_mm, MIN_STIRRUP_SPACING_MM
        )
    } else {
        format!(
            "τv = {:.2} N/mm² ≤ τc,max = {:.2} N/mm²; {}L-{:.0}φ @ {:.0} mm ({})",
            s.tau_v_mpa,
            s.tau_c_max_mpa,
            s.legs,
            s.stirrup_dia_mm,
            s.spacing_mm,
            s.mode.display_name()
        )
    };

    CheckOutcome::new(
        CHECK_SHEAR,
        !s.overstressed,
        reason,
        is456_ref::SHEAR,
        stress_ratio.max(if s.overstressed { spacing_ratio } else { 0.0 }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::reinforce;
    use crate::loads::LoadDemand;
    use crate::materials::{ConcreteGrade, SteelGrade};

    fn report_for(section: &Section, material: MaterialGrade, mu: f64, vu: f64) -> ComplianceReport {
        let r = reinforce(section, material, &LoadDemand::new(mu, vu).unwrap()).unwrap();
        validate(section, material, &r).unwrap()
    }

    fn section_300x500() -> Section {
        Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap()
    }

    #[test]
    fn test_check_order_is_stable() {
        let report = report_for(&section_300x500(), MaterialGrade::default(), 120.0, 150.0);
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, CHECK_IDS.to_vec());
    }

    #[test]
    fn test_reasonable_beam_is_adequate() {
        let report = report_for(&section_300x500(), MaterialGrade::default(), 120.0, 150.0);
        assert!(report.is_adequate, "failed: {:?}", report.failed_checks());
        assert!(report.governing_utilization() <= 1.0);
        for check in &report.checks {
            assert!(check.clause.starts_with("IS 456"));
        }
    }

    #[test]
    fn test_adequate_iff_all_pass() {
        let section = Section::new(200.0, 300.0, 260.0, 25.0, 6000.0, SupportCondition::SimplySupported).unwrap();
        let report = report_for(&section, MaterialGrade::default(), 40.0, 40.0);
        assert_eq!(report.is_adequate, report.checks.iter().all(|c| c.passed));
        assert_eq!(report.is_adequate, report.failed_checks().is_empty());
    }

    #[test]
    fn test_cantilever_deflection_fails() {
        let section = Section::new(300.0, 400.0, 350.0, 25.0, 5000.0, SupportCondition::Cantilever).unwrap();
        let report = report_for(&section, MaterialGrade::default(), 10.0, 10.0);
        let deflection = report.check(CHECK_DEFLECTION).unwrap();
        assert!(!deflection.passed);
        assert!(deflection.utilization > 1.0);
        assert!(!report.is_adequate);
    }

    #[test]
    fn test_shear_overstress_reported() {
        let report = report_for(&section_300x500(), MaterialGrade::default(), 120.0, 500.0);
        let shear = report.check(CHECK_SHEAR).unwrap();
        assert!(!shear.passed);
        assert!(shear.reason.contains("τc,max"));
        assert_eq!(shear.clause, is456_ref::SHEAR);
        assert_eq!(report.failed_checks(), vec![CHECK_SHEAR]);
    }

    #[test]
    fn test_capacity_exceeded_fails_ductility() {
        let section = Section::new(300.0, 350.0, 200.0, 40.0, 3000.0, SupportCondition::SimplySupported).unwrap();
        let material = MaterialGrade::new(ConcreteGrade::M25, SteelGrade::Fe500);
        let report = report_for(&section, material, 200.0, 50.0);
        let ductility = report.check(CHECK_DUCTILITY).unwrap();
        assert!(!ductility.passed);
        assert!(!report.is_adequate);
    }

    #[test]
    fn test_ductile_up_to_limiting_moment() {
        let section = section_300x500();
        let material = MaterialGrade::new(ConcreteGrade::M25, SteelGrade::Fe500);
        let mu_lim = crate::calculations::flexure::limiting_moment_knm(&section, material.concrete, material.steel);
        for step in 0..=10 {
            let mu = mu_lim * (0.95 + 0.005 * step as f64);
            let report = report_for(&section, material, mu, 100.0);
            assert!(
                report.is_adequate,
                "Mu = {:.2} kN·m failed: {:?}",
                mu,
                report.failed_checks()
            );
            assert!(report.check(CHECK_DUCTILITY).unwrap().utilization <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_hangers_do_not_count_as_compression_steel() {
        // 4-20φ = 1257 mm² stays below Ast,lim, so xu comes from tension steel alone
        let section = section_300x500();
        let material = MaterialGrade::new(ConcreteGrade::M25, SteelGrade::Fe500);
        let r = reinforce(&section, material, &LoadDemand::new(195.0, 100.0).unwrap()).unwrap();
        assert_eq!(r.asc_provided_mm2(), 0.0);
        let report = validate(&section, material, &r).unwrap();
        let expected = 435.0 * r.ast_provided_mm2() / (0.36 * 25.0 * 300.0) / 450.0 / 0.46;
        let ductility = report.check(CHECK_DUCTILITY).unwrap();
        assert!((ductility.utilization - expected).abs() < 1e-9);
        assert!(ductility.passed);
    }

    #[test]
    fn test_long_span_factor() {
        let short = Section::new(300.0, 700.0, 650.0, 25.0, 10_000.0, SupportCondition::SimplySupported).unwrap();
        let long = Section::new(300.0, 700.0, 650.0, 25.0, 12_000.0, SupportCondition::SimplySupported).unwrap();
        let material = MaterialGrade::default();
        let demand = LoadDemand::new(150.0, 100.0).unwrap();
        let r_short = reinforce(&short, material, &demand).unwrap();
        let r_long = reinforce(&long, material, &demand).unwrap();
        let a_short = allowable_span_depth_ratio(&short, material, &r_short);
        let a_long = allowable_span_depth_ratio(&long, material, &r_long);
        assert!((a_long - a_short * 10.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_material_mismatch_rejected() {
        let section = section_300x500();
        let r = reinforce(&section, MaterialGrade::default(), &LoadDemand::new(120.0, 150.0).unwrap()).unwrap();
        let other = MaterialGrade::new(ConcreteGrade::M30, SteelGrade::Fe415);
        assert_eq!(validate(&section, other, &r).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_malformed_reinforcement_rejected() {
        let section = section_300x500();
        let mut r = reinforce(&section, MaterialGrade::default(), &LoadDemand::new(120.0, 150.0).unwrap()).unwrap();
        r.tension_bars.area_mm2 = -10.0;
        assert!(validate(&section, MaterialGrade::default(), &r).is_err());
    }

    #[test]
    fn test_report_serialization() {
        let report = report_for(&section_300x500(), MaterialGrade::default(), 120.0, 150.0);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"name\":\"bar_spacing\""));
        let parsed: ComplianceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
