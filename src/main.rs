// Entry point and high-level CLI flow.
//
// Both CSV files are loaded once at startup; a failed load aborts before any
// view is shown. After that:
// - Interactive mode shows a menu where options [2] and [3] act as the state
//   and phase dropdowns, each redrawing only its own charts.
// - Batch mode (`--batch`, `--export`, `--summary-dir`) renders the chosen
//   selections once and exits.
use anyhow::{Context, Result};
use clap::Parser;
use election_dashboard::config::{
    self, DEFAULT_ADVERTISERS_PATH, DEFAULT_PREVIEW_ROWS, DEFAULT_RESULTS_PATH,
};
use election_dashboard::dashboard::{summary_rows, Dashboard, SelectionEvent, Selections, Slot};
use election_dashboard::view::Scope;
use election_dashboard::{loader, output, util};
use env_logger::Env;
use log::info;
use once_cell::sync::OnceCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// Loaded once; read-only for the rest of the run.
static DASHBOARD: OnceCell<Dashboard> = OnceCell::new();

/// Election advertising and voting analysis dashboard
#[derive(Parser, Debug)]
#[command(name = "election-dashboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Ad-spend-by-page CSV
    #[arg(long, env = "DASHBOARD_ADVERTISERS", default_value = DEFAULT_ADVERTISERS_PATH)]
    advertisers: PathBuf,

    /// Merged election results CSV
    #[arg(long, env = "DASHBOARD_RESULTS", default_value = DEFAULT_RESULTS_PATH)]
    results: PathBuf,

    /// Initial state selection
    #[arg(long, default_value = config::ALL_LABEL)]
    state: String,

    /// Initial phase selection
    #[arg(long, default_value = config::ALL_LABEL)]
    phase: String,

    /// Write the chart specifications of the current selections to this JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write state, phase and advertiser summaries as CSV into this directory
    #[arg(long)]
    summary_dir: Option<PathBuf>,

    /// Render once and exit instead of showing the menu
    #[arg(long)]
    batch: bool,

    /// Rows shown per chart preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// Returns `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// List `options` as a numbered dropdown and return the chosen one.
///
/// Accepts either the number or the option text itself. Returns `None` when
/// the input matches neither.
fn prompt_selection(label: &str, options: &[String]) -> Option<Scope> {
    println!("Select {}:", label);
    for (idx, opt) in options.iter().enumerate() {
        println!("[{}] {}", idx, opt);
    }
    let choice = read_choice()?;
    let picked = match choice.parse::<usize>() {
        Ok(idx) => options.get(idx)?.clone(),
        Err(_) => options.iter().find(|o| **o == choice)?.clone(),
    };
    Some(Scope::parse(&picked))
}

fn load(cli: &Cli) -> Result<Dashboard> {
    println!("Processing datasets...");
    let (ads, ad_report) = loader::load_advertisers(&cli.advertisers)
        .with_context(|| format!("Failed to load {}", cli.advertisers.display()))?;
    let (results, result_report) = loader::load_election_results(&cli.results)
        .with_context(|| format!("Failed to load {}", cli.results.display()))?;
    println!(
        "({} advertiser rows, {} constituencies loaded)",
        util::format_int(ad_report.kept_rows),
        util::format_int(result_report.kept_rows)
    );
    let coerced = ad_report.coerced_cells + result_report.coerced_cells;
    if coerced > 0 {
        println!(
            "Note: {} unparseable numeric values treated as missing.",
            util::format_int(coerced)
        );
    }
    println!();
    Ok(Dashboard::build(&ads, &results))
}

fn show_advertisers(dashboard: &Dashboard, max_rows: usize) {
    output::preview_chart(&dashboard.advertiser_chart(), max_rows);
}

fn show_slot(dashboard: &Dashboard, slot: Slot, selections: &Selections, max_rows: usize) {
    let heading = match slot {
        Slot::State => "State wise Data",
        Slot::Phase => "Phase wise Data",
    };
    println!("{} (selected: {})\n", heading, selections.get(slot).label());
    output::preview_view(&dashboard.render(slot, selections), max_rows);
}

fn export(dashboard: &Dashboard, selections: &Selections, path: &Path) -> Result<()> {
    let snapshot = dashboard.snapshot(selections, chrono::Utc::now());
    output::write_json(path, &snapshot)
        .with_context(|| format!("Failed to export {}", path.display()))?;
    println!("(Chart specifications exported to {})\n", path.display());
    Ok(())
}

fn write_summaries(dashboard: &Dashboard, dir: &Path) -> Result<()> {
    output::write_csv(dir.join("state_summary.csv"), &summary_rows(dashboard.state_summary()))?;
    output::write_csv(dir.join("phase_summary.csv"), &summary_rows(dashboard.phase_summary()))?;
    output::write_csv(dir.join("top_advertisers.csv"), &dashboard.advertiser_rows())?;
    println!("(Summaries exported to {})\n", dir.display());
    Ok(())
}

fn run_menu(dashboard: &Dashboard, cli: &Cli, mut selections: Selections) -> Result<()> {
    println!("{}\n", config::DASHBOARD_TITLE);
    loop {
        println!("Select View:");
        println!("[1] Top {} Advertisers by Ad Spend", config::TOP_ADVERTISERS);
        println!("[2] State wise Data (current: {})", selections.state.label());
        println!("[3] Phase wise Data (current: {})", selections.phase.label());
        println!("[4] Export chart specifications");
        println!("[0] Exit\n");
        let Some(choice) = read_choice() else {
            println!();
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                println!();
                show_advertisers(dashboard, cli.preview_rows);
            }
            "2" => {
                println!();
                match prompt_selection("State", &dashboard.state_options()) {
                    Some(scope) => {
                        let slot = selections.apply(SelectionEvent::State(scope));
                        println!();
                        show_slot(dashboard, slot, &selections, cli.preview_rows);
                    }
                    None => println!("Invalid selection.\n"),
                }
            }
            "3" => {
                println!();
                match prompt_selection("Phase", &dashboard.phase_options()) {
                    Some(scope) => {
                        let slot = selections.apply(SelectionEvent::Phase(scope));
                        println!();
                        show_slot(dashboard, slot, &selections, cli.preview_rows);
                    }
                    None => println!("Invalid selection.\n"),
                }
            }
            "4" => {
                let path = cli
                    .export
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(config::DEFAULT_EXPORT_PATH));
                export(dashboard, &selections, &path)?;
            }
            "0" => {
                println!("Exiting the program.");
                return Ok(());
            }
            _ => {
                println!("Invalid choice. Please enter 0-4.\n");
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let dashboard = DASHBOARD.get_or_try_init(|| load(&cli))?;

    let mut selections = Selections::default();
    selections.apply(SelectionEvent::State(Scope::parse(&cli.state)));
    selections.apply(SelectionEvent::Phase(Scope::parse(&cli.phase)));

    if let Some(dir) = &cli.summary_dir {
        write_summaries(dashboard, dir)?;
    }
    if let Some(path) = &cli.export {
        export(dashboard, &selections, path)?;
    }

    if cli.batch || cli.export.is_some() || cli.summary_dir.is_some() {
        show_advertisers(dashboard, cli.preview_rows);
        show_slot(dashboard, Slot::State, &selections, cli.preview_rows);
        show_slot(dashboard, Slot::Phase, &selections, cli.preview_rows);
        info!("Batch render complete");
        return Ok(());
    }

    run_menu(dashboard, &cli, selections)
}
