use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scrutineer::config;
use scrutineer::scenario::{demo_scenario, run_scenario, ScenarioFile, ScenarioReport};
use scrutineer::telemetry;
use scrutineer::voting::{EngineSnapshot, Operation, WorkflowStatus};

#[derive(Parser)]
#[command(name = "scrutineer")]
#[command(about = "Workflow-driven voting engine with scripted elections")]
#[command(long_about = "Scrutineer runs elections through a strict six-phase workflow: voter \
                       registration, proposal registration, a voting session, and a final tally. \
                       Describe an election in a TOML scenario file and replay it with 'scrutineer run', \
                       or try 'scrutineer demo' for a built-in example.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an election scenario from a TOML file through the full workflow
    Run {
        /// Scenario file to run (falls back to the configured default path)
        #[arg(help = "Path to a scenario TOML file")]
        file: Option<PathBuf>,
        /// Emit the election report as JSON instead of text
        #[arg(long, help = "Print the report as pretty JSON")]
        json: bool,
        /// Write an engine snapshot after the run
        #[arg(long, help = "Write the final engine state to this snapshot file")]
        snapshot: Option<PathBuf>,
    },
    /// Run the built-in demo election end to end
    Demo {
        /// Emit the election report as JSON instead of text
        #[arg(long, help = "Print the report as pretty JSON")]
        json: bool,
    },
    /// List the workflow phases and the operations each phase allows
    Phases,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    config::init_config()?;
    let cfg = config::config()?;
    telemetry::init_telemetry(&cfg.observability)?;

    match cli.command {
        // Default behavior: cargo run (no subcommand) - explain how to run an election
        None => show_overview(),
        Some(Commands::Run { file, json, snapshot }) => run_command(file, json, snapshot),
        Some(Commands::Demo { json }) => demo_command(json),
        Some(Commands::Phases) => phases_command(),
    }
}

fn show_overview() -> Result<()> {
    println!("🗳️  SCRUTINEER - Voting Workflow Engine");
    println!("=======================================");
    println!();
    println!("Elections move through six phases, one step at a time:");
    for status in WorkflowStatus::ALL {
        println!("   {}. {}", status.rank(), status);
    }
    println!();
    println!("🚀 QUICK START:");
    println!("   → Try the built-in election: scrutineer demo");
    println!("   → Run your own scenario: scrutineer run election.toml");
    println!("   → Inspect the workflow: scrutineer phases");

    Ok(())
}

fn run_command(file: Option<PathBuf>, json: bool, snapshot: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let path = file.unwrap_or_else(|| PathBuf::from(&cfg.scenario.default_path));

    let correlation_id = telemetry::generate_correlation_id();
    let span = telemetry::create_run_span("run", path.to_str(), Some(&correlation_id));
    let _guard = span.enter();

    let scenario = ScenarioFile::load(&path)?;
    let (report, engine) = run_scenario(&scenario)?;

    let snapshot_target = snapshot.or_else(|| {
        cfg.snapshot.as_ref().map(|s| PathBuf::from(&s.path))
    });
    if let Some(target) = snapshot_target {
        EngineSnapshot::capture(&engine)
            .save_to_file(&target)
            .with_context(|| format!("writing snapshot to {}", target.display()))?;
        if !json {
            println!("💾 Snapshot written to {}", target.display());
        }
    }

    render_report(&report, json)
}

fn demo_command(json: bool) -> Result<()> {
    let correlation_id = telemetry::generate_correlation_id();
    let span = telemetry::create_run_span("demo", None, Some(&correlation_id));
    let _guard = span.enter();

    let (report, _engine) = run_scenario(&demo_scenario())?;
    render_report(&report, json)
}

fn render_report(report: &ScenarioReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("🗳️  ELECTION RESULT: {}", report.name);
    println!("=======================================");
    println!();
    println!("   👤 Administrator: {}", report.admin);
    println!("   🙋 Registered voters: {}", report.registered_voters);
    println!("   🏁 Final phase: {}", report.final_status);
    println!();
    println!("📋 BALLOT:");
    for outcome in &report.proposals {
        let marker = if outcome.proposal_id == report.winning_proposal_id {
            "🏆"
        } else {
            "  "
        };
        println!(
            "   {} #{} {} ({} votes)",
            marker, outcome.proposal_id, outcome.description, outcome.vote_count
        );
    }
    println!();
    println!(
        "🏆 Winner: proposal #{} ({})",
        report.winning_proposal_id, report.winning_description
    );
    println!("🧾 Events recorded: {}", report.events.len());

    Ok(())
}

fn phases_command() -> Result<()> {
    println!("🗳️  WORKFLOW PHASES");
    println!("=======================================");
    println!();

    for status in WorkflowStatus::ALL {
        println!("   {}. {}", status.rank(), status);

        let allowed: Vec<String> = Operation::ALL
            .iter()
            .filter(|op| op.required_status() == status)
            .map(|op| format!("{op:?}"))
            .collect();

        if allowed.is_empty() {
            println!("      └─ terminal phase, no further operations");
        } else {
            println!("      └─ allows: {}", allowed.join(", "));
        }
    }

    println!();
    println!("Each transition advances exactly one phase and never goes back.");

    Ok(())
}
