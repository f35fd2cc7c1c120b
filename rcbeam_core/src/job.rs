//! # Optimization Jobs and Reports
//!
//! A job file describes one optimization run: the search grid, the factored
//! demand and the unit rates. Running it produces a report that records the
//! result with a unique id and timestamp.
//!
//! ## Structure
//!
//! ```text
//! OptimizationJob
//! ├── meta: JobMetadata (version, engineer, job id, timestamps)
//! ├── settings: OptimizerSettings (top_k)
//! ├── search: SearchSpec (template + axis lists)
//! ├── demand: LoadDemand
//! └── cost_profile: CostProfile
//!
//! OptimizationReport
//! ├── meta: ReportMetadata (uuid, version, generated, job id)
//! ├── demand: LoadDemand
//! └── result: OptimizationResult
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::job::OptimizationJob;
//!
//! let job = OptimizationJob::new("Jane Engineer", "26-014");
//! let json = serde_json::to_string_pretty(&job).unwrap();
//! assert!(json.contains("26-014"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cost::CostProfile;
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadDemand;
use crate::materials::{ConcreteGrade, SteelGrade};
use crate::optimizer::{optimize, OptimizationResult, SearchSpace, SectionTemplate};

/// Current schema version for job and report files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default number of ranked designs to keep
pub const DEFAULT_TOP_K: usize = 5;

/// Job metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Free-form description, e.g. member mark
    #[serde(default)]
    pub description: String,

    /// When the job was created
    pub created: DateTime<Utc>,

    /// When the job was last modified
    pub modified: DateTime<Utc>,
}

/// Optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Number of ranked designs to report
    pub top_k: usize,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        OptimizerSettings { top_k: DEFAULT_TOP_K }
    }
}

/// Search grid as axis lists; expanded to an explicit [`SearchSpace`].
///
/// ## JSON Example
///
/// ```json
/// {
///   "template": { "clear_cover_mm": 25.0, "span_mm": 5000.0, "support": "SimplySupported",
///                 "main_bar_dia_mm": 16.0, "stirrup_dia_mm": 8.0 },
///   "widths_mm": [230.0, 300.0],
///   "depths_mm": [400.0, 450.0, 500.0],
///   "concretes": ["M20", "M25"],
///   "steels": ["Fe500"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSpec {
    pub template: SectionTemplate,
    pub widths_mm: Vec<f64>,
    pub depths_mm: Vec<f64>,
    pub concretes: Vec<ConcreteGrade>,
    pub steels: Vec<SteelGrade>,
}

impl Default for SearchSpec {
    fn default() -> Self {
        SearchSpec {
            template: SectionTemplate::default(),
            widths_mm: vec![230.0, 250.0, 300.0],
            depths_mm: vec![300.0, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0],
            concretes: vec![ConcreteGrade::M20, ConcreteGrade::M25, ConcreteGrade::M30],
            steels: vec![SteelGrade::Fe415, SteelGrade::Fe500],
        }
    }
}

impl SearchSpec {
    /// Cartesian product of the axes, widths outermost
    pub fn expand(&self) -> SearchSpace {
        SearchSpace::grid(
            self.template,
            &self.widths_mm,
            &self.depths_mm,
            &self.concretes,
            &self.steels,
        )
    }

    /// Number of grid points
    pub fn point_count(&self) -> usize {
        self.widths_mm.len() * self.depths_mm.len() * self.concretes.len() * self.steels.len()
    }
}

/// Root job container, serialized to job files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationJob {
    pub meta: JobMetadata,
    #[serde(default)]
    pub settings: OptimizerSettings,
    #[serde(default)]
    pub search: SearchSpec,
    pub demand: LoadDemand,
    #[serde(default)]
    pub cost_profile: CostProfile,
}

impl OptimizationJob {
    /// Create a job with the default grid, default rates and zero demand.
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        OptimizationJob {
            meta: JobMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                description: String::new(),
                created: now,
                modified: now,
            },
            settings: OptimizerSettings::default(),
            search: SearchSpec::default(),
            demand: LoadDemand::default(),
            cost_profile: CostProfile::default(),
        }
    }

    /// Update the modified timestamp
    fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Replace the design demand.
    pub fn set_demand(&mut self, demand: LoadDemand) {
        self.demand = demand;
        self.touch();
    }

    /// Replace the search grid.
    pub fn set_search(&mut self, search: SearchSpec) {
        self.search = search;
        self.touch();
    }

    /// Run the optimizer with the job's settings.
    pub fn run(&self) -> CalcResult<OptimizationReport> {
        self.run_with_top_k(self.settings.top_k)
    }

    /// Run the optimizer with an explicit `top_k`.
    pub fn run_with_top_k(&self, top_k: usize) -> CalcResult<OptimizationReport> {
        if self.search.point_count() == 0 {
            return Err(CalcError::invalid_input(
                "search",
                format!(
                    "{} widths x {} depths x {} concretes x {} steels",
                    self.search.widths_mm.len(),
                    self.search.depths_mm.len(),
                    self.search.concretes.len(),
                    self.search.steels.len()
                ),
                "Every search axis needs at least one value",
            ));
        }
        info!(job_id = %self.meta.job_id, points = self.search.point_count(), "running optimization job");
        let result = optimize(&self.search.expand(), &self.demand, &self.cost_profile, top_k)?;
        Ok(OptimizationReport::new(self, result))
    }
}

impl Default for OptimizationJob {
    fn default() -> Self {
        OptimizationJob::new("", "")
    }
}

/// Report metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Unique report id
    pub id: Uuid,
    /// Schema version
    pub version: String,
    /// When the report was generated
    pub generated: DateTime<Utc>,
    /// Job/project number of the source job
    pub job_id: String,
    pub engineer: String,
}

/// Result of running a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub meta: ReportMetadata,
    pub demand: LoadDemand,
    pub result: OptimizationResult,
}

impl OptimizationReport {
    pub fn new(job: &OptimizationJob, result: OptimizationResult) -> Self {
        OptimizationReport {
            meta: ReportMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                generated: Utc::now(),
                job_id: job.meta.job_id.clone(),
                engineer: job.meta.engineer.clone(),
            },
            demand: job.demand,
            result,
        }
    }
}
