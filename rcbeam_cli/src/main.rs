//! # RCBeam CLI
//!
//! Command-line front end for `rcbeam_core`.
//!
//! ```text
//! rcbeam design --width 300 --depth 500 --mu 120 --vu 150
//! rcbeam template --out beam_b1.json
//! rcbeam optimize --job beam_b1.json --top-k 3 --out beam_b1.report.json
//! ```
//!
//! Input errors exit with a non-zero status. An inadequate design or an
//! infeasible search is a normal result and exits with 0.

mod logging;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use rcbeam_core::calculations::{design_beam, DesignCandidate};
use rcbeam_core::cost::CostProfile;
use rcbeam_core::file_io::{load_job, save_job, save_report};
use rcbeam_core::job::{OptimizationJob, OptimizationReport};
use rcbeam_core::loads::LoadDemand;
use rcbeam_core::materials::{ConcreteGrade, MaterialGrade, SteelGrade};
use rcbeam_core::section::{Section, SupportCondition};

#[derive(Parser, Debug)]
#[command(name = "rcbeam", version, about = "IS 456 reinforced concrete beam design and cost optimization")]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Design one beam and print its checks and cost
    Design(DesignArgs),

    /// Run an optimization job file
    Optimize {
        /// Job file (JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Override the job's top_k
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Write the report to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Write an example job file to start from
    Template {
        #[arg(short, long)]
        out: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug)]
struct DesignArgs {
    /// Web width b (mm)
    #[arg(long)]
    width: f64,

    /// Overall depth D (mm)
    #[arg(long)]
    depth: f64,

    /// Effective depth d (mm); derived from cover and bar sizes if omitted
    #[arg(long)]
    effective_depth: Option<f64>,

    /// Clear cover (mm)
    #[arg(long, default_value_t = 25.0)]
    cover: f64,

    /// Effective span (mm)
    #[arg(long, default_value_t = 5000.0)]
    span: f64,

    #[arg(long, value_enum, default_value_t = SupportArg::SimplySupported)]
    support: SupportArg,

    /// Concrete grade, e.g. M25
    #[arg(long, default_value = "M25", value_parser = ConcreteGrade::from_str_flexible)]
    concrete: ConcreteGrade,

    /// Steel grade, e.g. Fe500
    #[arg(long, default_value = "Fe500", value_parser = SteelGrade::from_str_flexible)]
    steel: SteelGrade,

    /// Factored moment Mu (kN·m)
    #[arg(long, requires = "vu", conflicts_with_all = ["dead", "live"])]
    mu: Option<f64>,

    /// Factored shear Vu (kN)
    #[arg(long, requires = "mu")]
    vu: Option<f64>,

    /// Service dead load (kN/m), factored by 1.5 with --live
    #[arg(long, requires = "live")]
    dead: Option<f64>,

    /// Service live load (kN/m)
    #[arg(long, requires = "dead")]
    live: Option<f64>,

    /// Print the full candidate as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SupportArg {
    SimplySupported,
    Continuous,
    Cantilever,
}

impl From<SupportArg> for SupportCondition {
    fn from(arg: SupportArg) -> Self {
        match arg {
            SupportArg::SimplySupported => SupportCondition::SimplySupported,
            SupportArg::Continuous => SupportCondition::Continuous,
            SupportArg::Cantilever => SupportCondition::Cantilever,
        }
    }
}

/// Bar and stirrup sizes assumed when d is derived from the cover
const ASSUMED_MAIN_BAR_MM: f64 = 16.0;
const ASSUMED_STIRRUP_MM: f64 = 8.0;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Design(args) => run_design(&args),
        Command::Optimize { job, top_k, out } => run_optimize(&job, top_k, out.as_deref()),
        Command::Template { out, force } => run_template(&out, force),
    }
}

fn run_design(args: &DesignArgs) -> Result<()> {
    let support = SupportCondition::from(args.support);
    let section = match args.effective_depth {
        Some(d) => Section::new(args.width, args.depth, d, args.cover, args.span, support)?,
        None => Section::from_cover(
            args.width,
            args.depth,
            args.cover,
            args.span,
            support,
            ASSUMED_MAIN_BAR_MM,
            ASSUMED_STIRRUP_MM,
        )?,
    };

    let demand = match (args.mu, args.vu, args.dead, args.live) {
        (Some(mu), Some(vu), _, _) => LoadDemand::new(mu, vu)?,
        (_, _, Some(dead), Some(live)) => LoadDemand::from_uniform_load(args.span, support, dead, live)?,
        _ => bail!("Provide either --mu and --vu, or --dead and --live"),
    };

    let material = MaterialGrade::new(args.concrete, args.steel);
    let candidate = design_beam(&section, material, &demand, &CostProfile::default())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&candidate)?);
    } else {
        print_candidate(&candidate);
    }
    Ok(())
}

fn run_optimize(job_path: &std::path::Path, top_k: Option<usize>, out: Option<&std::path::Path>) -> Result<()> {
    let job = load_job(job_path).with_context(|| format!("loading job {}", job_path.display()))?;
    let report = match top_k {
        Some(k) => job.run_with_top_k(k)?,
        None => job.run()?,
    };

    print_report(&report, &job.cost_profile.currency);

    if let Some(path) = out {
        save_report(&report, path).with_context(|| format!("saving report {}", path.display()))?;
        info!(path = %path.display(), report_id = %report.meta.id, "report saved");
    }
    Ok(())
}

fn run_template(out: &std::path::Path, force: bool) -> Result<()> {
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }
    let mut job = OptimizationJob::new("", "");
    job.meta.description = "Example job: edit the demand and search grid".to_string();
    job.set_demand(LoadDemand::new(120.0, 150.0)?);
    save_job(&job, out)?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn print_candidate(candidate: &DesignCandidate) {
    let r = &candidate.reinforcement;
    println!("{}", candidate.display_name());
    println!(
        "  Mu = {:.1} kN·m (Mu,lim = {:.1}), {}",
        r.flexure.mu_knm,
        r.flexure.mu_lim_knm,
        r.flexure.outcome.display_name()
    );
    println!(
        "  Bottom: {} ({:.0} mm², required {:.0})",
        r.tension_bars,
        r.ast_provided_mm2(),
        r.flexure.ast_design_mm2()
    );
    println!(
        "  Top:    {}{}",
        r.top_bars,
        if r.carries_compression_steel() { "" } else { " (hangers)" }
    );
    println!(
        "  Stirrups: {}-legged {:.0} mm @ {:.0} mm ({})",
        r.shear.legs,
        r.shear.stirrup_dia_mm,
        r.shear.spacing_mm,
        r.shear.mode.display_name()
    );
    println!("  Ld = {:.0} mm", r.development_length_mm);
    println!();
    for check in &candidate.compliance.checks {
        println!(
            "  [{}] {:<12} {:>5.2}  {}  ({})",
            if check.passed { "PASS" } else { "FAIL" },
            check.name,
            check.utilization,
            check.reason,
            check.clause
        );
    }
    println!();
    println!(
        "  Cost: {:.2} (concrete {:.2}, steel {:.2} for {:.1} kg, formwork {:.2})",
        candidate.cost.total,
        candidate.cost.concrete_cost,
        candidate.cost.steel_cost,
        candidate.cost.steel_kg,
        candidate.cost.formwork_cost
    );
    println!("  {}", if candidate.is_adequate() { "ADEQUATE" } else { "NOT ADEQUATE" });
}

fn print_report(report: &OptimizationReport, currency: &str) {
    let result = &report.result;
    println!(
        "Evaluated {} candidates, {} adequate (Mu = {:.1} kN·m, Vu = {:.1} kN)",
        result.evaluated, result.feasible, report.demand.mu_knm, report.demand.vu_kn
    );

    if let Some(diagnostic) = &result.diagnostic {
        println!("No adequate design.");
        if !diagnostic.blocking_checks.is_empty() {
            println!("  Failed by every candidate: {}", diagnostic.blocking_checks.join(", "));
        }
        for (check, count) in &diagnostic.failure_counts {
            if *count > 0 {
                println!("  {:<12} failed by {}", check, count);
            }
        }
        println!("Closest candidates:");
        for miss in &diagnostic.near_misses {
            println!(
                "  {:<40} {:>12.2} {}  fails: {}",
                miss.candidate.display_name(),
                miss.candidate.cost.total,
                currency,
                miss.failed_checks.join(", ")
            );
        }
        return;
    }

    for (rank, candidate) in result.ranked.iter().enumerate() {
        println!(
            "{:>2}. {:<40} {:>12.2} {}  {} / {} @ {:.0}",
            rank + 1,
            candidate.display_name(),
            candidate.cost.total,
            currency,
            candidate.reinforcement.tension_bars,
            candidate.reinforcement.shear.stirrup_dia_mm,
            candidate.reinforcement.shear.spacing_mm
        );
    }
}
