use clap::{Args, Parser, Subcommand};
use merge_advisor::config::AppConfig;
use merge_advisor::error::AppError;
use merge_advisor::telemetry;
use merge_advisor::workflows::merge::{
    compare_addresses, record_category, AllowedDepartment, EligibilityClassifier, MergeAdvisor,
    MergeReview,
};
use merge_advisor::workflows::snapshot::{SnapshotFormat, SnapshotImporter};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "merge-advisor",
    about = "Advise on merging duplicate CRM person records",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Review a record-pair snapshot and recommend a side for every conflicting field
    Review(ReviewArgs),
    /// Compare two address strings and report which one should survive
    CompareAddresses(CompareArgs),
    /// Report only the merge eligibility verdict and ledger category
    Classify(ClassifyArgs),
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Snapshot file (JSON record snapshot or Label,Left,Right[,Conflicting] CSV)
    #[arg(long)]
    input: PathBuf,
    /// Input format; inferred from the file extension when omitted
    #[arg(long, value_parser = parse_format)]
    format: Option<SnapshotFormat>,
    /// Override the configured department the operator may merge
    #[arg(long, value_parser = parse_department)]
    allowed_department: Option<AllowedDepartment>,
}

#[derive(Args, Debug)]
struct ReviewArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
    /// Override the configured twin-warning threshold (0 disables)
    #[arg(long)]
    conflict_threshold: Option<u32>,
    /// Print a plain-text summary instead of JSON
    #[arg(long)]
    text: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Left-side address
    left: String,
    /// Right-side address
    right: String,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "merge advisor starting");

    match cli.command {
        Command::Review(args) => {
            if let Some(allowed) = args.snapshot.allowed_department {
                config.merge.allowed_department = allowed;
            }
            if let Some(threshold) = args.conflict_threshold {
                config.merge.conflict_row_threshold = threshold;
            }
            let snapshot = SnapshotImporter::from_path(&args.snapshot.input, args.snapshot.format)?;
            let review = MergeAdvisor::new(config.merge).review(&snapshot);
            if args.text {
                render_review(&review);
            } else {
                println!("{}", serde_json::to_string_pretty(&review)?);
            }
        }
        Command::CompareAddresses(args) => {
            let comparison = compare_addresses(&args.left, &args.right);
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        Command::Classify(args) => {
            let allowed = args
                .snapshot
                .allowed_department
                .unwrap_or(config.merge.allowed_department);
            let snapshot = SnapshotImporter::from_path(&args.snapshot.input, args.snapshot.format)?;
            let verdict = EligibilityClassifier::new(allowed).classify(&snapshot);
            let payload = json!({
                "allowed_department": allowed.to_string(),
                "verdict": verdict,
                "summary": verdict.summary(),
                "category": record_category(&snapshot).to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

fn parse_format(raw: &str) -> Result<SnapshotFormat, String> {
    raw.parse::<SnapshotFormat>().map_err(|err| err.to_string())
}

fn parse_department(raw: &str) -> Result<AllowedDepartment, String> {
    raw.parse::<AllowedDepartment>().map_err(|err| err.to_string())
}

fn render_review(review: &MergeReview) {
    println!("Merge review");
    println!("Verdict: {}", review.verdict.summary());
    println!("Category: {}", review.category);
    println!("Readiness: {}", review.readiness.summary());
    if let Some(side) = review.applicant.side.side() {
        println!("Applicant side: {} ({})", side, review.applicant.basis);
    }

    if !review.resolutions.is_empty() {
        println!("\nField decisions");
        for resolution in &review.resolutions {
            let rule = resolution
                .rule
                .map(|rule| format!("{rule:?}"))
                .unwrap_or_else(|| "none".to_string());
            println!(
                "- {}: {} [rule: {}]",
                resolution.label,
                resolution.decision.summary(),
                rule
            );
        }
    }

    println!(
        "\nIdentity conflicts: {}{}",
        review.conflicts.count,
        if review.twin_warning {
            " (possible twins, verify before merging)"
        } else {
            ""
        }
    );
    for label in &review.conflicts.conflicts {
        println!("- {label}");
    }
}
