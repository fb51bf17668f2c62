//! Tournament CLI
//!
//! Seed single-elimination brackets, play them out and show reports.

use anyhow::{bail, Context, Result};
use bracket_core::EntityId;
use std::env;
use std::path::Path;
use tournament::{
    seed_bracket, AdvancementEngine, BracketRunner, InMemoryStore, RunnerConfig, ScoringConfig,
    SeededCoin, TournamentReport,
};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Single-elimination Tournament Runner");
    println!();
    println!("Usage:");
    println!("  tournament simulate <participants> [--seed N] [--events N] [--shark B,B,..]");
    println!("                      [--config FILE] [--out FILE] [--quiet]");
    println!("  tournament report <FILE>");
    println!();
    println!("Options:");
    println!("  --seed N       seed for tie-breaks and simulated events (default 0)");
    println!("  --events N     random events per contender per battle (default 1)");
    println!("  --shark LIST   battle numbers pre-marked as shark fights");
    println!("  --config FILE  scoring rules in TOML");
    println!("  --out FILE     save the final report as JSON");
    println!();
    println!("Examples:");
    println!("  tournament simulate 8 --seed 42 --shark 1,5");
    println!("  tournament simulate 16 --config scoring.toml --out cup.json");
    println!("  tournament report cup.json");
}

fn parse_shark_fights(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse()
                .with_context(|| format!("invalid battle number '{}'", s))
        })
        .collect()
}

fn run_simulation(args: &[String]) -> Result<()> {
    let Some(count) = args.first() else {
        print_usage();
        bail!("simulate requires a participant count");
    };
    let participants: u64 = count
        .parse()
        .with_context(|| format!("invalid participant count '{}'", count))?;

    // Parse optional arguments
    let mut seed: u64 = 0;
    let mut events: u32 = 1;
    let mut shark_fights = Vec::new();
    let mut config_path = None;
    let mut out_path = None;
    let mut verbose = true;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--seed" | "-s", Some(v)) => {
                seed = v.parse().with_context(|| format!("invalid seed '{}'", v))?;
                i += 1;
            }
            ("--events" | "-e", Some(v)) => {
                events = v.parse().with_context(|| format!("invalid event count '{}'", v))?;
                i += 1;
            }
            ("--shark", Some(v)) => {
                shark_fights = parse_shark_fights(v)?;
                i += 1;
            }
            ("--config" | "-c", Some(v)) => {
                config_path = Some(v.clone());
                i += 1;
            }
            ("--out" | "-o", Some(v)) => {
                out_path = Some(v.clone());
                i += 1;
            }
            ("--quiet" | "-q", _) => verbose = false,
            (other, _) => bail!("unknown or incomplete option '{}'", other),
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => ScoringConfig::load(Path::new(path))
            .with_context(|| format!("loading scoring config from {}", path))?,
        None => ScoringConfig::default(),
    };

    println!("=== Bracket: {} participants ===", participants);
    println!(
        "Seed: {}, Events/contender: {}, Shark fights: {:?}",
        seed, events, shark_fights
    );
    println!();

    let mut store = InMemoryStore::new();
    let entities: Vec<EntityId> = (1..=participants).map(EntityId).collect();
    let seeded = seed_bracket(
        &mut store,
        &config,
        &format!("Simulated cup (seed {})", seed),
        &entities,
        &shark_fights,
    )
    .context("seeding bracket")?;
    let event_types = BracketRunner::install_event_types(&mut store)?;

    let mut engine = AdvancementEngine::new(config, SeededCoin::new(seed));
    let mut runner = BracketRunner::new(RunnerConfig {
        seed,
        events_per_contender: events,
        verbose,
    });
    let summary = runner
        .run(&mut engine, &mut store, seeded.tournament.id, &event_types)
        .context("playing out bracket")?;

    println!();
    println!("=== Final Result ===");
    println!(
        "{} battles, {} shark fights, {} events",
        summary.resolved, summary.tie_breaks, summary.events
    );

    let report = TournamentReport::from_store(&store, seeded.tournament.id)?;
    report.print_report();

    if let Some(path) = out_path {
        report
            .save(Path::new(&path))
            .with_context(|| format!("saving report to {}", path))?;
        println!("Report saved to {}", path);
    }
    Ok(())
}

fn show_report(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        print_usage();
        bail!("report requires a file");
    };
    let report = TournamentReport::load(Path::new(path))
        .with_context(|| format!("loading report from {}", path))?;
    report.print_report();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "simulate" | "sim" => run_simulation(&args[2..]),
        "report" => show_report(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {}", other)
        }
    }
}
