//! Home energy simulator entry point — CLI wiring and scenario execution.

use std::path::Path;
use std::process;

use greengrid_sim::config::ScenarioConfig;
use greengrid_sim::io::export::export_csv;
use greengrid_sim::runner::{compare_strategies, run_scenario};
use greengrid_sim::sim::summary::SummaryReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    strategy_override: Option<String>,
    days_override: Option<usize>,
    telemetry_out: Option<String>,
    compare: bool,
    quiet: bool,
}

fn print_help() {
    eprintln!("greengrid-sim — Household solar+battery+grid digital twin");
    eprintln!();
    eprintln!("Usage: greengrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --strategy <name>        Override dispatch strategy (load|charge|produce)");
    eprintln!("  --days <n>               Override simulation horizon in days");
    eprintln!("  --telemetry-out <path>   Export tick history to CSV");
    eprintln!("  --compare                Run all three strategies and print a comparison");
    eprintln!("  --quiet                  Suppress the per-tick log");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        strategy_override: None,
        days_override: None,
        telemetry_out: None,
        compare: false,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--strategy" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --strategy requires a name argument");
                    process::exit(1);
                }
                cli.strategy_override = Some(args[i].clone());
            }
            "--days" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --days requires a number argument");
                    process::exit(1);
                }
                if let Ok(d) = args[i].parse::<usize>() {
                    cli.days_override = Some(d);
                } else {
                    eprintln!("error: --days value \"{}\" is not a valid number", args[i]);
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --telemetry-out requires a path argument");
                    process::exit(1);
                }
                cli.telemetry_out = Some(args[i].clone());
            }
            "--compare" => {
                cli.compare = true;
            }
            "--quiet" => {
                cli.quiet = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Runs all three strategies on the same scenario and prints a table.
fn run_comparison(scenario: &ScenarioConfig) {
    let summaries = match compare_strategies(scenario) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    println!("=== Strategy comparison ===");
    println!(
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "strategy", "import kWh", "export kWh", "curtail kWh", "avg SoC %", "net balance"
    );
    for s in &summaries {
        println!(
            "{:<10} {:>12.2} {:>12.2} {:>12.2} {:>12.1} {:>12.2}",
            s.strategy.name(),
            s.report.grid_import_kwh,
            s.report.grid_export_kwh,
            s.report.curtailment_kwh,
            s.report.avg_soc_pct,
            s.report.net_balance,
        );
    }

    if let Some(best) = summaries
        .iter()
        .max_by(|a, b| a.report.net_balance.total_cmp(&b.report.net_balance))
    {
        println!();
        println!(
            "Best net balance: {} ({:.2})",
            best.strategy, best.report.net_balance
        );
    }
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(ref strategy) = cli.strategy_override {
        scenario.simulation.strategy = strategy.clone();
    }
    if let Some(days) = cli.days_override {
        scenario.simulation.days = days;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    if cli.compare {
        run_comparison(&scenario);
        return;
    }

    // Run
    let run = match run_scenario(&scenario, !cli.quiet) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    // Print summary report
    let report = SummaryReport::from_run(
        &run,
        scenario.simulation.minutes_per_tick as f32 / 60.0,
        scenario.economics.import_cost_per_kwh,
        scenario.economics.export_rate_per_kwh,
    );
    println!("\n{report}");

    // Export CSV if requested
    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&run.history, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }
}
