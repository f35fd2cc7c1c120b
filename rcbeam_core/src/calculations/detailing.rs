//! # Bar Detailing
//!
//! Turns required steel areas into real bars: a count and a diameter from the
//! standard sizes, laid in a single layer between the stirrup legs.
//!
//! ```text
//! clear spacing = (b - 2 cover - 2 φstirrup - n φ) / (n - 1)
//! ```
//!
//! Development length per cl. 26.2.1:
//!
//! ```text
//! Ld = φ σs / (4 τbd),   σs = 0.87 fy
//! ```

use serde::{Deserialize, Serialize};

use crate::code_tables::{bond_stress, AGGREGATE_SIZE_MM};
use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::materials::{bar_area_mm2, ConcreteGrade, SteelGrade, MAIN_BAR_DIAMETERS_MM};
use crate::section::Section;

/// Minimum number of longitudinal bars in a face
pub const MIN_BAR_COUNT: u32 = 2;

/// Diameter of hanger bars used when no compression steel is required (mm)
pub const HANGER_BAR_DIA_MM: f64 = 12.0;

/// A group of identical longitudinal bars.
///
/// ## JSON Example
///
/// ```json
/// { "count": 3, "diameter_mm": 16.0, "area_mm2": 603.19 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarArrangement {
    /// Number of bars
    pub count: u32,
    /// Bar diameter φ (mm)
    pub diameter_mm: f64,
    /// Total steel area n π φ² / 4 (mm²)
    pub area_mm2: f64,
}

impl BarArrangement {
    pub fn new(count: u32, diameter_mm: f64) -> Self {
        BarArrangement {
            count,
            diameter_mm,
            area_mm2: count as f64 * bar_area_mm2(diameter_mm),
        }
    }

    /// Two 12 mm hanger bars holding the stirrups at the top
    pub fn hangers() -> Self {
        Self::new(MIN_BAR_COUNT, HANGER_BAR_DIA_MM)
    }

    /// Reject non-finite areas, zero bars and non-positive diameters
    pub fn validate(&self, field: &str) -> CalcResult<()> {
        ensure_finite(field, self.area_mm2)?;
        ensure_finite(field, self.diameter_mm)?;
        if self.count == 0 {
            return Err(CalcError::invalid_input(field, "0 bars", "Bar count must be at least 1"));
        }
        if self.diameter_mm <= 0.0 || self.area_mm2 < 0.0 {
            return Err(CalcError::invalid_input(
                field,
                self.display_name(),
                "Bar diameter and area must be positive",
            ));
        }
        Ok(())
    }

    /// e.g. "3-16φ"
    pub fn display_name(&self) -> String {
        format!("{}-{:.0}φ", self.count, self.diameter_mm)
    }
}

impl std::fmt::Display for BarArrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Width available for longitudinal bars inside the stirrups (mm)
fn inner_width_mm(section: &Section, stirrup_dia_mm: f64) -> f64 {
    section.width_mm - 2.0 * (section.clear_cover_mm + stirrup_dia_mm)
}

/// Minimum clear distance between bars: max(φ, aggregate + 5 mm)
pub fn min_clear_spacing_mm(bar_dia_mm: f64) -> f64 {
    bar_dia_mm.max(AGGREGATE_SIZE_MM + 5.0)
}

/// Clear distance between adjacent bars of a single layer (mm).
///
/// Negative when the bars do not physically fit. A single bar reports the
/// clear width left beside it.
pub fn clear_spacing_mm(section: &Section, stirrup_dia_mm: f64, bars: &BarArrangement) -> f64 {
    let inner = inner_width_mm(section, stirrup_dia_mm);
    let n = bars.count as f64;
    if bars.count < 2 {
        return inner - n * bars.diameter_mm;
    }
    (inner - n * bars.diameter_mm) / (n - 1.0)
}

/// Choose tension bars for a required area.
///
/// Every standard diameter is tried with the fewest bars (at least two) that
/// reach `required_mm2`. Among the arrangements that fit in one layer with
/// clear spacing of at least max(φ, 25 mm), the one with the least provided
/// area wins; equal areas prefer fewer bars. When none fits, the arrangement
/// with the fewest bars (largest diameter) is returned and the compliance
/// check reports the congestion.
///
/// # Example
///
/// ```rust
/// use rcbeam_core::calculations::detailing::select_tension_bars;
/// use rcbeam_core::section::{Section, SupportCondition};
///
/// let section = Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)?;
/// let bars = select_tension_bars(682.3, &section, 8.0)?;
/// assert!(bars.area_mm2 >= 682.3);
/// assert!(bars.count >= 2);
/// # Ok::<(), rcbeam_core::errors::CalcError>(())
/// ```
pub fn select_tension_bars(
    required_mm2: f64,
    section: &Section,
    stirrup_dia_mm: f64,
) -> CalcResult<BarArrangement> {
    ensure_finite("required_mm2", required_mm2)?;
    if required_mm2 < 0.0 {
        return Err(CalcError::invalid_input(
            "required_mm2",
            required_mm2.to_string(),
            "Required steel area must be non-negative",
        ));
    }

    let candidates: Vec<BarArrangement> = MAIN_BAR_DIAMETERS_MM
        .iter()
        .map(|&dia| {
            let count = (required_mm2 / bar_area_mm2(dia)).ceil().max(MIN_BAR_COUNT as f64) as u32;
            BarArrangement::new(count, dia)
        })
        .collect();

    let best_fitting = candidates
        .iter()
        .filter(|bars| clear_spacing_mm(section, stirrup_dia_mm, bars) >= min_clear_spacing_mm(bars.diameter_mm))
        .min_by(|a, b| a.area_mm2.total_cmp(&b.area_mm2).then(a.count.cmp(&b.count)));

    if let Some(bars) = best_fitting {
        return Ok(*bars);
    }

    candidates
        .into_iter()
        .min_by(|a, b| a.count.cmp(&b.count).then(b.diameter_mm.total_cmp(&a.diameter_mm)))
        .ok_or_else(|| CalcError::internal("No standard bar diameters configured"))
}

/// Top bars: compression steel when required, otherwise two hanger bars.
pub fn select_top_bars(
    compression_mm2: f64,
    section: &Section,
    stirrup_dia_mm: f64,
) -> CalcResult<BarArrangement> {
    if compression_mm2 > 0.0 {
        select_tension_bars(compression_mm2, section, stirrup_dia_mm)
    } else {
        ensure_finite("compression_mm2", compression_mm2)?;
        Ok(BarArrangement::hangers())
    }
}

/// Development length Ld (mm) of a bar at full design stress (cl. 26.2.1)
pub fn development_length_mm(
    bar_dia_mm: f64,
    concrete: ConcreteGrade,
    steel: SteelGrade,
    in_compression: bool,
) -> f64 {
    let tau_bd = bond_stress(concrete, steel, in_compression);
    bar_dia_mm * steel.fyd_mpa() / (4.0 * tau_bd)
}
