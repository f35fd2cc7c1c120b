//! # Section Optimizer
//!
//! Exhaustive search over an explicit list of section sizes and material
//! grades for the cheapest design that passes every compliance check.
//!
//! ```text
//! SearchSpace ──par_iter──▶ design_beam (one per point)
//!                                │
//!               Result<Vec<_>> ◀─┘  any input error aborts the search
//!                    │
//!        adequate ──▶ rank ──▶ top_k
//!        none     ──▶ InfeasibilityDiagnostic
//! ```
//!
//! ## Ranking
//!
//! Candidates are sorted by total cost. Costs within a relative tolerance of
//! 1e-6 of their neighbour form one run; a run is ordered by self-weight
//! index (b × D), then width, then depth. Every comparison is a total order
//! on f64 (`total_cmp`), so the result does not depend on thread scheduling.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::cost::CostProfile;
//! use rcbeam_core::loads::LoadDemand;
//! use rcbeam_core::materials::{ConcreteGrade, SteelGrade};
//! use rcbeam_core::optimizer::{optimize, SearchSpace, SectionTemplate};
//!
//! let space = SearchSpace::grid(
//!     SectionTemplate::default(),
//!     &[230.0, 300.0],
//!     &[450.0, 500.0],
//!     &[ConcreteGrade::M25],
//!     &[SteelGrade::Fe500],
//! );
//! let result = optimize(&space, &LoadDemand::new(120.0, 150.0)?, &CostProfile::default(), 3)?;
//!
//! assert_eq!(result.evaluated, 4);
//! assert!(result.ranked.len() <= 3);
//! # Ok::<(), rcbeam_core::errors::CalcError>(())
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::calculations::{design_beam, DesignCandidate};
use crate::compliance::CHECK_IDS;
use crate::cost::CostProfile;
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadDemand;
use crate::materials::{ConcreteGrade, MaterialGrade, SteelGrade};
use crate::section::{Section, SupportCondition};

/// Relative tolerance under which two costs count as equal
pub const COST_TIE_TOLERANCE: f64 = 1e-6;

/// Near misses reported when nothing is feasible, at least
pub const MIN_NEAR_MISSES: usize = 3;

/// Properties shared by every section in a search.
///
/// ## JSON Example
///
/// ```json
/// {
///   "clear_cover_mm": 25.0,
///   "span_mm": 5000.0,
///   "support": "SimplySupported",
///   "main_bar_dia_mm": 16.0,
///   "stirrup_dia_mm": 8.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionTemplate {
    pub clear_cover_mm: f64,
    pub span_mm: f64,
    pub support: SupportCondition,
    /// Assumed main bar diameter for the effective depth (mm)
    pub main_bar_dia_mm: f64,
    /// Assumed stirrup diameter for the effective depth (mm)
    pub stirrup_dia_mm: f64,
}

impl Default for SectionTemplate {
    fn default() -> Self {
        SectionTemplate {
            clear_cover_mm: 25.0,
            span_mm: 5000.0,
            support: SupportCondition::SimplySupported,
            main_bar_dia_mm: 16.0,
            stirrup_dia_mm: 8.0,
        }
    }
}

impl SectionTemplate {
    /// Section for a width and overall depth, d derived from cover and bars
    pub fn section(&self, width_mm: f64, depth_mm: f64) -> CalcResult<Section> {
        Section::from_cover(
            width_mm,
            depth_mm,
            self.clear_cover_mm,
            self.span_mm,
            self.support,
            self.main_bar_dia_mm,
            self.stirrup_dia_mm,
        )
    }
}

/// One point of the search space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub width_mm: f64,
    pub depth_mm: f64,
    pub concrete: ConcreteGrade,
    pub steel: SteelGrade,
}

impl GridPoint {
    pub fn material(&self) -> MaterialGrade {
        MaterialGrade::new(self.concrete, self.steel)
    }
}

/// Explicit list of candidate points sharing one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub template: SectionTemplate,
    pub points: Vec<GridPoint>,
}

impl SearchSpace {
    /// Cartesian product in caller order: widths outermost, steels innermost.
    pub fn grid(
        template: SectionTemplate,
        widths_mm: &[f64],
        depths_mm: &[f64],
        concretes: &[ConcreteGrade],
        steels: &[SteelGrade],
    ) -> Self {
        let mut points = Vec::with_capacity(widths_mm.len() * depths_mm.len() * concretes.len() * steels.len());
        for &width_mm in widths_mm {
            for &depth_mm in depths_mm {
                for &concrete in concretes {
                    for &steel in steels {
                        points.push(GridPoint {
                            width_mm,
                            depth_mm,
                            concrete,
                            steel,
                        });
                    }
                }
            }
        }
        SearchSpace { template, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An inadequate candidate and the checks it failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMiss {
    pub candidate: DesignCandidate,
    pub failed_checks: Vec<String>,
}

/// Why no candidate in the space is adequate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfeasibilityDiagnostic {
    /// Candidates failing the fewest checks, cheapest first
    pub near_misses: Vec<NearMiss>,
    /// Number of candidates failing each check (every check id present)
    pub failure_counts: BTreeMap<String, usize>,
    /// Checks failed by every candidate, in check order
    pub blocking_checks: Vec<String>,
}

/// Optimizer output.
///
/// `diagnostic` is present exactly when `ranked` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Adequate candidates, best first, at most `top_k`
    pub ranked: Vec<DesignCandidate>,
    /// Points evaluated
    pub evaluated: usize,
    /// Adequate candidates found (before truncation to `top_k`)
    pub feasible: usize,
    pub diagnostic: Option<InfeasibilityDiagnostic>,
}

impl OptimizationResult {
    pub fn best(&self) -> Option<&DesignCandidate> {
        self.ranked.first()
    }

    pub fn is_feasible(&self) -> bool {
        !self.ranked.is_empty()
    }
}

fn costs_tied(a: f64, b: f64) -> bool {
    (a - b).abs() <= COST_TIE_TOLERANCE * a.abs().max(b.abs())
}

/// Tie-break order: self-weight index, then width, then depth
fn tie_break(a: &DesignCandidate, b: &DesignCandidate) -> Ordering {
    a.self_weight_index()
        .total_cmp(&b.self_weight_index())
        .then(a.section.width_mm.total_cmp(&b.section.width_mm))
        .then(a.section.overall_depth_mm.total_cmp(&b.section.overall_depth_mm))
        .then(a.cost.total.total_cmp(&b.cost.total))
}

/// Sort candidates by cost, ordering near-equal costs by the tie-break.
///
/// Costs are first sorted exactly. Candidates within [`COST_TIE_TOLERANCE`]
/// of the cheapest member of a run join it, and each run is re-sorted by
/// [`tie_break`]. No run spans more than the tolerance.
pub fn rank_candidates(mut candidates: Vec<DesignCandidate>) -> Vec<DesignCandidate> {
    candidates.sort_by(|a, b| a.cost.total.total_cmp(&b.cost.total).then_with(|| tie_break(a, b)));

    let mut start = 0;
    while start < candidates.len() {
        let mut end = start + 1;
        while end < candidates.len() && costs_tied(candidates[start].cost.total, candidates[end].cost.total) {
            end += 1;
        }
        if end - start > 1 {
            candidates[start..end].sort_by(tie_break);
        }
        start = end;
    }
    candidates
}

fn diagnose(candidates: &[DesignCandidate], limit: usize) -> InfeasibilityDiagnostic {
    let mut failure_counts: BTreeMap<String, usize> = CHECK_IDS.iter().map(|id| (id.to_string(), 0)).collect();
    for candidate in candidates {
        for id in candidate.failed_checks() {
            *failure_counts.entry(id.to_string()).or_insert(0) += 1;
        }
    }

    let blocking_checks = CHECK_IDS
        .iter()
        .filter(|id| !candidates.is_empty() && failure_counts.get(**id) == Some(&candidates.len()))
        .map(|id| id.to_string())
        .collect();

    let mut ordered: Vec<&DesignCandidate> = candidates.iter().collect();
    ordered.sort_by(|a, b| {
        a.failed_checks()
            .len()
            .cmp(&b.failed_checks().len())
            .then(a.cost.total.total_cmp(&b.cost.total))
            .then_with(|| tie_break(a, b))
    });

    let near_misses = ordered
        .into_iter()
        .take(limit)
        .map(|c| NearMiss {
            failed_checks: c.failed_checks().into_iter().map(String::from).collect(),
            candidate: c.clone(),
        })
        .collect();

    InfeasibilityDiagnostic {
        near_misses,
        failure_counts,
        blocking_checks,
    }
}

/// Find the cheapest adequate designs in a search space.
///
/// # Arguments
///
/// * `space` - Points to evaluate (must be non-empty)
/// * `demand` - Factored actions, shared by every point
/// * `profile` - Unit rates
/// * `top_k` - Number of ranked designs to return (must be ≥ 1)
///
/// # Errors
///
/// Input errors from any point abort the whole search: `InvalidInput` for an
/// empty space or `top_k = 0`, `InvalidSection` for a template that produces
/// an impossible section, `MissingField` for an unpriced concrete grade.
/// "No adequate design" is not an error; see
/// [`OptimizationResult::diagnostic`].
#[instrument(skip(space, demand, profile), fields(points = space.points.len(), top_k = top_k))]
pub fn optimize(
    space: &SearchSpace,
    demand: &LoadDemand,
    profile: &CostProfile,
    top_k: usize,
) -> CalcResult<OptimizationResult> {
    if space.is_empty() {
        return Err(CalcError::invalid_input("space.points", "[]", "Search space is empty"));
    }
    if top_k == 0 {
        return Err(CalcError::invalid_input("top_k", "0", "top_k must be at least 1"));
    }
    demand.validate()?;
    profile.validate()?;

    let template = space.template;
    let candidates = space
        .points
        .par_iter()
        .map(|point| {
            let section = template.section(point.width_mm, point.depth_mm)?;
            design_beam(&section, point.material(), demand, profile)
        })
        .collect::<CalcResult<Vec<DesignCandidate>>>()?;

    let evaluated = candidates.len();
    let (adequate, inadequate): (Vec<DesignCandidate>, Vec<DesignCandidate>) =
        candidates.into_iter().partition(|c| c.is_adequate());
    let feasible = adequate.len();

    if adequate.is_empty() {
        let diagnostic = diagnose(&inadequate, top_k.max(MIN_NEAR_MISSES));
        warn!(
            evaluated,
            blocking = ?diagnostic.blocking_checks,
            "no feasible design in search space"
        );
        return Ok(OptimizationResult {
            ranked: Vec::new(),
            evaluated,
            feasible,
            diagnostic: Some(diagnostic),
        });
    }

    let mut ranked = rank_candidates(adequate);
    ranked.truncate(top_k);

    if let Some(best) = ranked.first() {
        info!(
            evaluated,
            feasible,
            best = %best.display_name(),
            best_cost = best.cost.total,
            "optimization complete"
        );
    }

    Ok(OptimizationResult {
        ranked,
        evaluated,
        feasible,
        diagnostic: None,
    })
}
