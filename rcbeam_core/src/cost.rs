//! # Cost Model
//!
//! Material quantities and cost of one designed beam.
//!
//! | Item       | Quantity                                   | Rate            |
//! |------------|--------------------------------------------|-----------------|
//! | Concrete   | b D L (m³)                                 | per grade, /m³  |
//! | Steel      | (bars + stirrups) × 7850 kg/m³ × 1.10      | /kg             |
//! | Formwork   | (b + 2D) L (m²), soffit and both sides     | /m²             |
//! | Labor      | (multiplier - 1) × (concrete + steel + formwork)            |
//!
//! The total is the plain sum of the four items, unrounded. Rates are in the
//! caller's currency; the defaults are typical Indian market rates (INR).
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::cost::CostProfile;
//! use rcbeam_core::materials::ConcreteGrade;
//!
//! let profile = CostProfile::default();
//! assert_eq!(profile.concrete_rate(ConcreteGrade::M25).unwrap(), 6900.0);
//! assert_eq!(profile.currency, "INR");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculations::ReinforcementResult;
use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::materials::{bar_area_mm2, ConcreteGrade, STEEL_DENSITY_KG_M3};
use crate::section::Section;
use crate::units::{Meters, Millimeters, SqM, SqMm};

/// Allowance on steel mass for laps, hooks and cutting waste
pub const LAP_AND_WASTAGE_ALLOWANCE: f64 = 0.10;

/// Length of each stirrup hook, in stirrup diameters
pub const STIRRUP_HOOK_DIAMETERS: f64 = 10.0;

/// Embodied carbon factors (optional)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonFactors {
    /// kg CO₂e per m³ of concrete
    pub concrete_kgco2e_per_m3: f64,
    /// kg CO₂e per kg of reinforcing steel
    pub steel_kgco2e_per_kg: f64,
}

/// Unit rates used to price a design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "currency": "INR",
///   "concrete_rates": { "M20": 6700.0, "M25": 6900.0, "M30": 7200.0 },
///   "steel_rate_per_kg": 72.0,
///   "formwork_rate_per_m2": 500.0,
///   "labor_multiplier": 1.0,
///   "carbon": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostProfile {
    /// Currency label for reports
    pub currency: String,
    /// Concrete rate per m³, by grade
    pub concrete_rates: BTreeMap<ConcreteGrade, f64>,
    /// Reinforcing steel rate per kg
    pub steel_rate_per_kg: f64,
    /// Formwork rate per m²
    pub formwork_rate_per_m2: f64,
    /// Labor multiplier on the material subtotal (1.0 = included in rates)
    pub labor_multiplier: f64,
    /// Optional embodied carbon factors
    pub carbon: Option<CarbonFactors>,
}

impl Default for CostProfile {
    fn default() -> Self {
        let concrete_rates = [
            (ConcreteGrade::M20, 6700.0),
            (ConcreteGrade::M25, 6900.0),
            (ConcreteGrade::M30, 7200.0),
            (ConcreteGrade::M35, 7500.0),
            (ConcreteGrade::M40, 7800.0),
        ]
        .into_iter()
        .collect();

        CostProfile {
            currency: "INR".to_string(),
            concrete_rates,
            steel_rate_per_kg: 72.0,
            formwork_rate_per_m2: 500.0,
            labor_multiplier: 1.0,
            carbon: None,
        }
    }
}

impl CostProfile {
    /// Rate for a concrete grade, `MissingField` if the profile has none
    pub fn concrete_rate(&self, grade: ConcreteGrade) -> CalcResult<f64> {
        self.concrete_rates
            .get(&grade)
            .copied()
            .ok_or_else(|| CalcError::missing_field(format!("concrete_rates.{}", grade.code())))
    }

    /// Builder-style override of a concrete rate
    pub fn with_concrete_rate(mut self, grade: ConcreteGrade, rate: f64) -> Self {
        self.concrete_rates.insert(grade, rate);
        self
    }

    /// Builder-style carbon factors
    pub fn with_carbon(mut self, carbon: CarbonFactors) -> Self {
        self.carbon = Some(carbon);
        self
    }

    /// Every rate finite and non-negative
    pub fn validate(&self) -> CalcResult<()> {
        for (grade, rate) in &self.concrete_rates {
            check_rate(&format!("concrete_rates.{}", grade.code()), *rate)?;
        }
        check_rate("steel_rate_per_kg", self.steel_rate_per_kg)?;
        check_rate("formwork_rate_per_m2", self.formwork_rate_per_m2)?;
        check_rate("labor_multiplier", self.labor_multiplier)?;
        if let Some(carbon) = &self.carbon {
            check_rate("carbon.concrete_kgco2e_per_m3", carbon.concrete_kgco2e_per_m3)?;
            check_rate("carbon.steel_kgco2e_per_kg", carbon.steel_kgco2e_per_kg)?;
        }
        Ok(())
    }
}

fn check_rate(field: &str, value: f64) -> CalcResult<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Rate must be non-negative"));
    }
    Ok(())
}

/// Quantities and itemized cost of one design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Concrete volume (m³)
    pub concrete_m3: f64,
    /// Steel mass including lap and wastage allowance (kg)
    pub steel_kg: f64,
    /// Formwork contact area (m²)
    pub formwork_m2: f64,
    pub concrete_cost: f64,
    pub steel_cost: f64,
    pub formwork_cost: f64,
    /// (labor_multiplier - 1) × material subtotal
    pub labor_adjustment: f64,
    /// Sum of the four items above
    pub total: f64,
    /// Embodied carbon (kg CO₂e), when factors are supplied
    pub carbon_kgco2e: Option<f64>,
}

impl CostBreakdown {
    /// Concrete + steel + formwork, before labor
    pub fn material_subtotal(&self) -> f64 {
        self.concrete_cost + self.steel_cost + self.formwork_cost
    }
}

/// Cut length of one closed stirrup including two hooks (mm)
pub fn stirrup_length_mm(section: &Section, stirrup_dia_mm: f64) -> f64 {
    let c = section.clear_cover_mm;
    2.0 * (section.width_mm - 2.0 * c)
        + 2.0 * (section.overall_depth_mm - 2.0 * c)
        + 2.0 * STIRRUP_HOOK_DIAMETERS * stirrup_dia_mm
}

/// Number of stirrups along the span: floor(L / s) + 1
pub fn stirrup_count(span_mm: f64, spacing_mm: f64) -> u32 {
    if spacing_mm <= 0.0 {
        return 0;
    }
    (span_mm / spacing_mm).floor() as u32 + 1
}

/// Price a designed beam.
///
/// # Errors
///
/// * `MissingField` - no concrete rate for the section's grade
/// * `InvalidInput` - negative or non-finite rates
pub fn compute_cost(
    section: &Section,
    reinforcement: &ReinforcementResult,
    profile: &CostProfile,
) -> CalcResult<CostBreakdown> {
    section.validate()?;
    profile.validate()?;
    let concrete_rate = profile.concrete_rate(reinforcement.material.concrete)?;

    let span_m = section.span_m();
    let b_m = Meters::from(Millimeters(section.width_mm)).value();
    let depth_m = Meters::from(Millimeters(section.overall_depth_mm)).value();

    let concrete_m3 = b_m * depth_m * span_m;
    let formwork_m2 = (b_m + 2.0 * depth_m) * span_m;

    let longitudinal_m2 =
        SqM::from(SqMm(reinforcement.tension_bars.area_mm2 + reinforcement.top_bars.area_mm2)).value();
    let shear = &reinforcement.shear;
    let stirrups = stirrup_count(section.span_mm, shear.spacing_mm) as f64;
    let stirrup_volume_m3 = stirrups
        * Meters::from(Millimeters(stirrup_length_mm(section, shear.stirrup_dia_mm))).value()
        * SqM::from(SqMm(bar_area_mm2(shear.stirrup_dia_mm))).value();
    let steel_m3 = longitudinal_m2 * span_m + stirrup_volume_m3;
    let steel_kg = steel_m3 * STEEL_DENSITY_KG_M3 * (1.0 + LAP_AND_WASTAGE_ALLOWANCE);

    let concrete_cost = concrete_m3 * concrete_rate;
    let steel_cost = steel_kg * profile.steel_rate_per_kg;
    let formwork_cost = formwork_m2 * profile.formwork_rate_per_m2;
    let labor_adjustment = (profile.labor_multiplier - 1.0) * (concrete_cost + steel_cost + formwork_cost);

    let carbon_kgco2e = profile
        .carbon
        .map(|c| concrete_m3 * c.concrete_kgco2e_per_m3 + steel_kg * c.steel_kgco2e_per_kg);

    Ok(CostBreakdown {
        concrete_m3,
        steel_kg,
        formwork_m2,
        concrete_cost,
        steel_cost,
        formwork_cost,
        labor_adjustment,
        total: concrete_cost + steel_cost + formwork_cost + labor_adjustment,
        carbon_kgco2e,
    })
}
