//! # Beam Section
//!
//! Rectangular reinforced-concrete beam section together with the span it is
//! designed over. All dimensions in millimetres.
//!
//! ```text
//!    ┌───────── b ─────────┐
//!    │  o               o  │  ─┬─ d' (compression steel)
//!    │                     │   │
//!    │                     │   D
//!    │                     │   │   d = effective depth
//!    │  o   o   o   o   o  │  ─┼─ tension steel centroid
//!    └─────────────────────┘  ─┴─ clear cover below stirrup
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::section::{Section, SupportCondition};
//!
//! let section = Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)
//!     .unwrap();
//! assert_eq!(section.effective_cover_mm(), 50.0);
//!
//! // Effective depth cannot reach the bottom of the beam
//! assert!(Section::new(300.0, 500.0, 520.0, 25.0, 5000.0, SupportCondition::SimplySupported).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Meters, Millimeters};

/// Support condition, selecting the basic span/depth ratio of cl. 23.2.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SupportCondition {
    /// Simply supported span: basic L/d = 20
    #[default]
    SimplySupported,
    /// Continuous span: basic L/d = 26
    Continuous,
    /// Cantilever: basic L/d = 7
    Cantilever,
}

impl SupportCondition {
    /// Basic span to effective depth ratio (cl. 23.2.1 a)
    pub fn basic_span_depth_ratio(&self) -> f64 {
        match self {
            SupportCondition::SimplySupported => 20.0,
            SupportCondition::Continuous => 26.0,
            SupportCondition::Cantilever => 7.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SupportCondition::SimplySupported => "Simply supported",
            SupportCondition::Continuous => "Continuous",
            SupportCondition::Cantilever => "Cantilever",
        }
    }
}

impl std::fmt::Display for SupportCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Rectangular beam section plus design span.
///
/// Construct through [`Section::new`] or [`Section::from_cover`], which
/// validate the geometry. Deserialized sections are validated again by every
/// calculator before any formula runs.
///
/// ## JSON Example
///
/// ```json
/// {
///   "width_mm": 300.0,
///   "overall_depth_mm": 500.0,
///   "effective_depth_mm": 450.0,
///   "clear_cover_mm": 25.0,
///   "span_mm": 5000.0,
///   "support": "SimplySupported"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Web width b (mm)
    pub width_mm: f64,
    /// Overall depth D (mm)
    pub overall_depth_mm: f64,
    /// Effective depth d to the tension steel centroid (mm)
    pub effective_depth_mm: f64,
    /// Clear cover to the outermost (stirrup) steel (mm)
    pub clear_cover_mm: f64,
    /// Effective span L (mm)
    pub span_mm: f64,
    /// Support condition
    #[serde(default)]
    pub support: SupportCondition,
}

impl Section {
    /// Create a validated section.
    pub fn new(
        width_mm: f64,
        overall_depth_mm: f64,
        effective_depth_mm: f64,
        clear_cover_mm: f64,
        span_mm: f64,
        support: SupportCondition,
    ) -> CalcResult<Self> {
        let section = Section {
            width_mm,
            overall_depth_mm,
            effective_depth_mm,
            clear_cover_mm,
            span_mm,
            support,
        };
        section.validate()?;
        Ok(section)
    }

    /// Create a section whose effective depth is derived from the cover and
    /// bar sizes: d = D - cover - stirrup - bar/2.
    pub fn from_cover(
        width_mm: f64,
        overall_depth_mm: f64,
        clear_cover_mm: f64,
        span_mm: f64,
        support: SupportCondition,
        main_bar_dia_mm: f64,
        stirrup_dia_mm: f64,
    ) -> CalcResult<Self> {
        if !(main_bar_dia_mm > 0.0) || !main_bar_dia_mm.is_finite() {
            return Err(CalcError::invalid_section(
                "main_bar_dia_mm",
                main_bar_dia_mm.to_string(),
                "Bar diameter must be positive",
            ));
        }
        if !(stirrup_dia_mm > 0.0) || !stirrup_dia_mm.is_finite() {
            return Err(CalcError::invalid_section(
                "stirrup_dia_mm",
                stirrup_dia_mm.to_string(),
                "Stirrup diameter must be positive",
            ));
        }
        let effective_depth_mm = overall_depth_mm - clear_cover_mm - stirrup_dia_mm - main_bar_dia_mm / 2.0;
        Self::new(
            width_mm,
            overall_depth_mm,
            effective_depth_mm,
            clear_cover_mm,
            span_mm,
            support,
        )
    }

    /// Validate the basic physical constraints.
    ///
    /// All dimensions finite and positive, d < D, 0 < cover < D, and the
    /// effective depth must lie below the cover.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("width_mm", self.width_mm, "Width must be positive"),
            ("overall_depth_mm", self.overall_depth_mm, "Overall depth must be positive"),
            ("effective_depth_mm", self.effective_depth_mm, "Effective depth must be positive"),
            ("clear_cover_mm", self.clear_cover_mm, "Cover must be positive"),
            ("span_mm", self.span_mm, "Span must be positive"),
        ];
        for (field, value, reason) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_section(field, value.to_string(), reason));
            }
        }
        if self.effective_depth_mm >= self.overall_depth_mm {
            return Err(CalcError::invalid_section(
                "effective_depth_mm",
                self.effective_depth_mm.to_string(),
                format!(
                    "Effective depth must be less than overall depth ({})",
                    self.overall_depth_mm
                ),
            ));
        }
        if self.clear_cover_mm >= self.overall_depth_mm {
            return Err(CalcError::invalid_section(
                "clear_cover_mm",
                self.clear_cover_mm.to_string(),
                format!("Cover must be less than overall depth ({})", self.overall_depth_mm),
            ));
        }
        if self.effective_depth_mm <= self.clear_cover_mm {
            return Err(CalcError::invalid_section(
                "effective_depth_mm",
                self.effective_depth_mm.to_string(),
                format!("Effective depth must exceed the cover ({})", self.clear_cover_mm),
            ));
        }
        Ok(())
    }

    /// Distance from the extreme fibre to the steel centroid, D - d (mm).
    ///
    /// Also used as d' for compression steel (symmetric cover).
    pub fn effective_cover_mm(&self) -> f64 {
        self.overall_depth_mm - self.effective_depth_mm
    }

    /// Gross cross-sectional area b·D (mm²)
    pub fn gross_area_mm2(&self) -> f64 {
        self.width_mm * self.overall_depth_mm
    }

    /// Effective area b·d (mm²)
    pub fn effective_area_mm2(&self) -> f64 {
        self.width_mm * self.effective_depth_mm
    }

    /// Span in metres
    pub fn span_m(&self) -> f64 {
        Meters::from(Millimeters(self.span_mm)).value()
    }

    /// Actual span / effective depth ratio
    pub fn span_depth_ratio(&self) -> f64 {
        self.span_mm / self.effective_depth_mm
    }

    /// Short description, e.g. "300 x 500 (d = 450)"
    pub fn display_name(&self) -> String {
        format!(
            "{:.0} x {:.0} (d = {:.0})",
            self.width_mm, self.overall_depth_mm, self.effective_depth_mm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Section {
        Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap()
    }

    #[test]
    fn test_section_properties() {
        let s = base();
        assert_eq!(s.gross_area_mm2(), 150_000.0);
        assert_eq!(s.effective_area_mm2(), 135_000.0);
        assert_eq!(s.span_m(), 5.0);
        assert!((s.span_depth_ratio() - 11.111).abs() < 0.001);
    }

    #[test]
    fn test_from_cover() {
        let s = Section::from_cover(230.0, 450.0, 25.0, 4000.0, SupportCondition::Continuous, 16.0, 8.0)
            .unwrap();
        // 450 - 25 - 8 - 8 = 409
        assert!((s.effective_depth_mm - 409.0).abs() < 1e-9);
        assert_eq!(s.support, SupportCondition::Continuous);
    }

    #[test]
    fn test_rejects_negative_width() {
        let err = Section::new(-300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SECTION");
        assert!(err.to_string().contains("width_mm"));
    }

    #[test]
    fn test_rejects_effective_depth_beyond_overall() {
        assert!(Section::new(300.0, 500.0, 500.0, 25.0, 5000.0, SupportCondition::SimplySupported).is_err());
    }

    #[test]
    fn test_rejects_bad_cover() {
        assert!(Section::new(300.0, 500.0, 450.0, 0.0, 5000.0, SupportCondition::SimplySupported).is_err());
        assert!(Section::new(300.0, 500.0, 450.0, 500.0, 5000.0, SupportCondition::SimplySupported).is_err());
        // d above the cover line
        assert!(Section::new(300.0, 500.0, 20.0, 25.0, 5000.0, SupportCondition::SimplySupported).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Section::new(f64::NAN, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).is_err());
        assert!(Section::new(300.0, 500.0, 450.0, 25.0, f64::INFINITY, SupportCondition::SimplySupported).is_err());
    }

    #[test]
    fn test_from_cover_too_shallow() {
        // 60 - 25 - 8 - 10 = 17 < cover
        let err = Section::from_cover(300.0, 60.0, 25.0, 3000.0, SupportCondition::SimplySupported, 20.0, 8.0)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SECTION");
    }

    #[test]
    fn test_basic_span_depth_ratios() {
        assert_eq!(SupportCondition::Cantilever.basic_span_depth_ratio(), 7.0);
        assert_eq!(SupportCondition::SimplySupported.basic_span_depth_ratio(), 20.0);
        assert_eq!(SupportCondition::Continuous.basic_span_depth_ratio(), 26.0);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let s = base();
        let json = serde_json::to_string(&s).unwrap();
        let parsed: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(s, parsed);
    }
}
