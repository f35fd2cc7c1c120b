//! # rcbeam_core - Reinforced Concrete Beam Design Engine
//!
//! `rcbeam_core` designs rectangular reinforced-concrete beams to IS 456:2000
//! (limit state method) and searches a grid of sections and material grades
//! for the cheapest design that satisfies every code check. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types for bad input; a failed code
//!   check is a result, not an error
//! - **Deterministic**: Same inputs give the same ranked output, regardless of
//!   evaluation order
//!
//! ## Quick Start
//!
//! ```rust
//! use rcbeam_core::calculations::design_beam;
//! use rcbeam_core::cost::CostProfile;
//! use rcbeam_core::loads::LoadDemand;
//! use rcbeam_core::materials::{ConcreteGrade, MaterialGrade, SteelGrade};
//! use rcbeam_core::section::{Section, SupportCondition};
//!
//! let section = Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported)?;
//! let material = MaterialGrade::new(ConcreteGrade::M25, SteelGrade::Fe500);
//! let demand = LoadDemand::new(120.0, 150.0)?;
//!
//! let candidate = design_beam(&section, material, &demand, &CostProfile::default())?;
//! println!("{}: {} bottom, cost {:.0}", candidate.display_name(),
//!          candidate.reinforcement.tension_bars, candidate.cost.total);
//! # Ok::<(), rcbeam_core::errors::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Concrete and steel grades
//! - [`section`] - Beam section geometry and support condition
//! - [`loads`] - Factored design actions
//! - [`code_tables`] - IS 456 tables (τc, xu,max/d, bond stress, modification factors)
//! - [`calculations`] - Flexure, shear, detailing and the design pipeline
//! - [`compliance`] - Code checks on a detailed beam
//! - [`cost`] - Quantities, rates and cost breakdown
//! - [`optimizer`] - Grid search and ranking
//! - [`job`] - Job files and reports
//! - [`file_io`] - Atomic file saves and schema validation
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod code_tables;
pub mod compliance;
pub mod cost;
pub mod errors;
pub mod file_io;
pub mod job;
pub mod loads;
pub mod materials;
pub mod optimizer;
pub mod section;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{design_beam, DesignCandidate, ReinforcementResult};
pub use compliance::ComplianceReport;
pub use cost::{CostBreakdown, CostProfile};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_job, load_report, save_job, save_report};
pub use job::{OptimizationJob, OptimizationReport};
pub use loads::LoadDemand;
pub use materials::{ConcreteGrade, MaterialGrade, SteelGrade};
pub use optimizer::{optimize, OptimizationResult, SearchSpace};
pub use section::{Section, SupportCondition};
