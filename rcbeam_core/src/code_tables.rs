//! # IS 456 Code Tables
//!
//! Static design data from IS 456:2000, keyed by concrete or steel grade.
//!
//! ## Overview
//!
//! | Table                         | Key   | Clause            |
//! |-------------------------------|-------|-------------------|
//! | Limiting neutral axis xu,max/d | fy   | 38.1 (note)       |
//! | Max shear stress τc,max       | fck   | Table 20          |
//! | Design bond stress τbd        | fck   | 26.2.1.1          |
//! | Minimum tension steel ratio   | fy    | 26.5.1.1(a)       |
//! | Max clear bar spacing         | fy    | Table 15          |
//! | Design shear strength τc      | fck, pt | Table 19        |
//!
//! Typed accessors (`xu_max_ratio`, `tau_c_max`, ...) are exhaustive matches
//! over the grade enums, so a missing entry fails to compile. The scalar
//! tables are also exposed through [`lookup`], a map built once on first use
//! and never mutated, for callers holding raw numeric grades.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{ConcreteGrade, SteelGrade};

// ============================================================================
// IS 456 Clause References
// ============================================================================

/// IS 456:2000 clause references for each design check and formula.
pub mod is456_ref {
    /// Minimum tension reinforcement
    pub const MIN_TENSION_STEEL: &str = "IS 456 26.5.1.1(a)";
    /// Maximum tension/compression reinforcement
    pub const MAX_STEEL: &str = "IS 456 26.5.1.1(b), 26.5.1.2";
    /// Minimum and maximum distance between bars
    pub const BAR_SPACING: &str = "IS 456 26.3.2, 26.3.3";
    /// Span to effective depth ratio
    pub const DEFLECTION: &str = "IS 456 23.2.1";
    /// Limiting depth of neutral axis
    pub const DUCTILITY: &str = "IS 456 38.1";
    /// Nominal shear stress against τc,max, stirrup design, minimum stirrups
    /// and their maximum spacing
    pub const SHEAR: &str = "IS 456 40.2.3, 40.4, 26.5.1.5, 26.5.1.6";
}

/// Maximum steel area as a fraction of gross section bD
pub const MAX_STEEL_RATIO: f64 = 0.04;

/// Nominal maximum aggregate size assumed for bar spacing (mm)
pub const AGGREGATE_SIZE_MM: f64 = 20.0;

/// Longitudinal bar percentages tabulated in Table 19
pub const TAU_C_PT_BREAKPOINTS: [f64; 13] = [
    0.15, 0.25, 0.50, 0.75, 1.00, 1.25, 1.50, 1.75, 2.00, 2.25, 2.50, 2.75, 3.00,
];

/// Identifier for the scalar (single-key) tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeTable {
    /// xu,max / d, keyed by fy
    XuMaxRatio,
    /// τc,max (N/mm²), keyed by fck
    TauCMax,
    /// τbd for plain bars in tension (N/mm²), keyed by fck
    BondStress,
    /// Minimum Ast / (b d), keyed by fy
    MinTensionSteelRatio,
    /// Maximum clear spacing of tension bars (mm), keyed by fy
    MaxClearSpacing,
}

impl CodeTable {
    pub const ALL: [CodeTable; 5] = [
        CodeTable::XuMaxRatio,
        CodeTable::TauCMax,
        CodeTable::BondStress,
        CodeTable::MinTensionSteelRatio,
        CodeTable::MaxClearSpacing,
    ];

    /// Which material grade keys this table
    pub fn keyed_by(&self) -> &'static str {
        match self {
            CodeTable::TauCMax | CodeTable::BondStress => "concrete",
            CodeTable::XuMaxRatio | CodeTable::MinTensionSteelRatio | CodeTable::MaxClearSpacing => {
                "steel"
            }
        }
    }
}

/// Limiting neutral axis depth ratio xu,max/d (cl. 38.1 note)
pub fn xu_max_ratio(steel: SteelGrade) -> f64 {
    match steel {
        SteelGrade::Fe250 => 0.53,
        SteelGrade::Fe415 => 0.48,
        SteelGrade::Fe500 => 0.46,
        SteelGrade::Fe550 => 0.44,
    }
}

/// Maximum shear stress τc,max in N/mm² (Table 20)
pub fn tau_c_max(concrete: ConcreteGrade) -> f64 {
    match concrete {
        ConcreteGrade::M20 => 2.8,
        ConcreteGrade::M25 => 3.1,
        ConcreteGrade::M30 => 3.5,
        ConcreteGrade::M35 => 3.7,
        ConcreteGrade::M40 => 4.0,
    }
}

/// Design bond stress τbd for plain bars in tension, N/mm² (cl. 26.2.1.1)
pub fn bond_stress_plain(concrete: ConcreteGrade) -> f64 {
    match concrete {
        ConcreteGrade::M20 => 1.2,
        ConcreteGrade::M25 => 1.4,
        ConcreteGrade::M30 => 1.5,
        ConcreteGrade::M35 => 1.7,
        ConcreteGrade::M40 => 1.9,
    }
}

/// Design bond stress adjusted for bar type and stress sign.
///
/// Deformed bars: +60 %. Bars in compression: a further +25 %.
pub fn bond_stress(concrete: ConcreteGrade, steel: SteelGrade, in_compression: bool) -> f64 {
    let mut tau_bd = bond_stress_plain(concrete);
    if steel.is_deformed() {
        tau_bd *= 1.6;
    }
    if in_compression {
        tau_bd *= 1.25;
    }
    tau_bd
}

/// Minimum tension steel ratio As/(b d) = 0.85 / fy (cl. 26.5.1.1)
pub fn min_tension_steel_ratio(steel: SteelGrade) -> f64 {
    0.85 / steel.fy_mpa()
}

/// Maximum clear distance between tension bars, mm (Table 15, no redistribution)
///
/// Table 15 stops at Fe500; Fe550 follows the same fy × spacing ≈ 75 000 trend.
pub fn max_clear_spacing_mm(steel: SteelGrade) -> f64 {
    match steel {
        SteelGrade::Fe250 => 280.0,
        SteelGrade::Fe415 => 180.0,
        SteelGrade::Fe500 => 150.0,
        SteelGrade::Fe550 => 135.0,
    }
}

/// Table 19 row for a concrete grade, aligned with [`TAU_C_PT_BREAKPOINTS`]
pub fn tau_c_row(concrete: ConcreteGrade) -> &'static [f64; 13] {
    match concrete {
        ConcreteGrade::M20 => &[0.28, 0.36, 0.48, 0.56, 0.62, 0.67, 0.72, 0.75, 0.79, 0.81, 0.82, 0.82, 0.82],
        ConcreteGrade::M25 => &[0.29, 0.36, 0.49, 0.57, 0.64, 0.70, 0.74, 0.78, 0.82, 0.85, 0.88, 0.90, 0.92],
        ConcreteGrade::M30 => &[0.29, 0.37, 0.50, 0.59, 0.66, 0.71, 0.76, 0.80, 0.84, 0.88, 0.91, 0.94, 0.96],
        ConcreteGrade::M35 => &[0.29, 0.37, 0.50, 0.59, 0.67, 0.73, 0.78, 0.82, 0.86, 0.90, 0.93, 0.96, 0.99],
        ConcreteGrade::M40 => &[0.30, 0.38, 0.51, 0.60, 0.68, 0.74, 0.79, 0.84, 0.88, 0.92, 0.95, 0.98, 1.01],
    }
}

/// Design shear strength of concrete τc (N/mm², Table 19).
///
/// Linear interpolation on pt = 100 As/(b d) between tabulated percentages.
/// Below 0.15 % and above 3.00 % the end values are used; the table is never
/// extrapolated.
pub fn tau_c(concrete: ConcreteGrade, pt_percent: f64) -> f64 {
    let row = tau_c_row(concrete);
    let pts = &TAU_C_PT_BREAKPOINTS;

    if !(pt_percent > pts[0]) {
        return row[0];
    }
    for i in 1..pts.len() {
        if pt_percent <= pts[i] {
            let t = (pt_percent - pts[i - 1]) / (pts[i] - pts[i - 1]);
            return row[i - 1] + t * (row[i] - row[i - 1]);
        }
    }
    row[row.len() - 1]
}

/// Tension reinforcement modification factor kt (Fig. 4).
///
/// Curve fit of Fig. 4: kt = 1 / (0.225 + 0.00322 fs - 0.625 log10(1/pt)),
/// capped at 2.0. `fs_mpa` is the steel service stress and `pt_percent` the
/// provided tension steel percentage.
pub fn tension_modification_factor(fs_mpa: f64, pt_percent: f64) -> f64 {
    if pt_percent <= 0.0 {
        return 2.0;
    }
    let denominator = 0.225 + 0.00322 * fs_mpa - 0.625 * (1.0 / pt_percent).log10();
    if denominator <= 0.5 {
        2.0
    } else {
        (1.0 / denominator).min(2.0)
    }
}

/// Compression reinforcement modification factor kc (Fig. 5).
///
/// kc = 1 + pc / (3 + pc), capped at 1.5.
pub fn compression_modification_factor(pc_percent: f64) -> f64 {
    if pc_percent <= 0.0 {
        return 1.0;
    }
    (1.0 + pc_percent / (3.0 + pc_percent)).min(1.5)
}

/// Steel service stress for deflection, fs = 0.58 fy (Ast,req / Ast,prov)
pub fn service_stress_mpa(steel: SteelGrade, ast_required_mm2: f64, ast_provided_mm2: f64) -> f64 {
    if ast_provided_mm2 <= 0.0 {
        return 0.58 * steel.fy_mpa();
    }
    0.58 * steel.fy_mpa() * (ast_required_mm2 / ast_provided_mm2).min(1.0)
}

/// Scalar tables keyed by (table, integer grade value), built once.
static SCALAR_TABLES: Lazy<HashMap<(CodeTable, u32), f64>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for concrete in ConcreteGrade::ALL {
        let key = concrete.fck_mpa() as u32;
        map.insert((CodeTable::TauCMax, key), tau_c_max(concrete));
        map.insert((CodeTable::BondStress, key), bond_stress_plain(concrete));
    }
    for steel in SteelGrade::ALL {
        let key = steel.fy_mpa() as u32;
        map.insert((CodeTable::XuMaxRatio, key), xu_max_ratio(steel));
        map.insert((CodeTable::MinTensionSteelRatio, key), min_tension_steel_ratio(steel));
        map.insert((CodeTable::MaxClearSpacing, key), max_clear_spacing_mm(steel));
    }
    map
});

/// Look up a scalar table by raw grade value (fck or fy in N/mm²).
///
/// # Errors
///
/// `UnsupportedGrade` if `key` is not one of the enumerated grades for the
/// table's material.
///
/// # Example
///
/// ```rust
/// use rcbeam_core::code_tables::{lookup, CodeTable};
///
/// assert_eq!(lookup(CodeTable::TauCMax, 25.0).unwrap(), 3.1);
/// assert!(lookup(CodeTable::TauCMax, 15.0).is_err());
/// ```
pub fn lookup(table: CodeTable, key: f64) -> CalcResult<f64> {
    let unsupported = || CalcError::unsupported_grade(table.keyed_by(), key.to_string());
    if !key.is_finite() || key <= 0.0 || key.fract() != 0.0 || key > u32::MAX as f64 {
        return Err(unsupported());
    }
    SCALAR_TABLES
        .get(&(table, key as u32))
        .copied()
        .ok_or_else(unsupported)
}
