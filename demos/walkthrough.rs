//  WALKTHROUGH.rs
//    by Lut99
//
//  Created:
//    24 Mar 2025, 11:02:36
//  Last edited:
//    25 Mar 2025, 17:31:09
//  Auto updated?
//    Yes
//
//  Description:
//!   Walks through the minimization of an automaton one iteration at a time.
//

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use console::style;
use error_trace::toplevel;
use humanlog::{DebugMode, HumanLogger};
use log::{debug, error, info};
use myhill::automaton::Automaton;
use myhill::exchange::AutomatonRecord;
use myhill::history::{History, Step};
use myhill::merge::MergedAutomaton;


/***** CONSTANTS *****/
/// The automaton used when no file is given.
const DEFAULT_AUTOMATON: &str = include_str!("scenario_b.json");





/***** ARGUMENTS *****/
/// Defines arguments to the walkthrough.
#[derive(Debug, Parser)]
pub struct Arguments {
    /// If given, enables more verbose logging.
    #[clap(long, global = true)]
    debug: bool,

    /// The path to a JSON file describing the automaton to minimize. If omitted, uses a built-in example.
    #[clap(name = "PATH")]
    path: Option<PathBuf>,

    /// If given, doesn't show the intermediate tables but jumps straight to the fixed point.
    #[clap(long)]
    skip_steps: bool,
    /// If given, doesn't use colours in the output.
    #[clap(long)]
    no_color: bool,
}





/***** HELPER FUNCTIONS *****/
/// Prints the current state of the walkthrough.
///
/// # Arguments
/// - `history`: The [`History`] who's cursor we print.
fn print_snapshot(history: &History) {
    let table = history.current();
    let marked: usize = table.pairs().filter(|(_, marked)| *marked).count();
    println!("{} ({marked} out of {} pair(s) distinguishable)", style(format!("Iteration {}", table.iteration())).bold(), table.pairs().len());
    println!("    {}", table.to_string().replace('\n', "\n    "));

    let merged: MergedAutomaton = history.merged();
    println!("  Merged view:");
    println!("    {}", merged.to_string().replace('\n', "\n    "));
    for (id, symbol, targets) in merged.ambiguities() {
        let label: &str = merged.label(id).unwrap_or("?");
        println!("    {} {label} is ambiguous on '{symbol}' ({} candidates)", style("!").yellow().bold(), targets.len());
    }
    println!();
}





/***** ENTRYPOINT *****/
fn main() {
    // Parse the CLI arguments
    let args = Arguments::parse();

    // Setup the logger
    if let Err(err) = HumanLogger::terminal(if args.debug { DebugMode::Full } else { DebugMode::HumanFriendly }).init() {
        eprintln!("WARNING: Failed to setup logger: {err} (no logging for this session)");
    }
    if args.no_color {
        console::set_colors_enabled(false);
    }
    info!("myhill {} - v{}", env!("CARGO_CRATE_NAME"), env!("CARGO_PKG_VERSION"));

    // Load the automaton
    let raw: String = match &args.path {
        Some(path) => {
            debug!("Reading input file '{}'...", path.display());
            match fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(err) => {
                    error!("{}", toplevel!(("Failed to load input file '{}'", path.display()), err));
                    std::process::exit(1);
                },
            }
        },
        None => {
            debug!("No input file given; using built-in example");
            DEFAULT_AUTOMATON.into()
        },
    };
    let automaton: Automaton = match AutomatonRecord::from_json(&raw).and_then(Automaton::try_from) {
        Ok(automaton) => automaton,
        Err(err) => {
            let what: String = args.path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<built-in>".into());
            error!("{}", toplevel!(("Failed to read automaton from '{}'", what), err));
            std::process::exit(1);
        },
    };
    println!("{}", style("Input automaton:").bold().green());
    println!("    {}", automaton.to_string().replace('\n', "\n    "));
    println!();

    // Walk through it
    let mut history = History::new(automaton);
    if args.skip_steps {
        history.run_to_fixpoint();
        print_snapshot(&history);
    } else {
        print_snapshot(&history);
        loop {
            match history.next() {
                Step::Refined | Step::Replayed => print_snapshot(&history),
                Step::Converged | Step::Finished => {
                    println!("{}", style(format!("Nothing changed; table {} is the fixed point", history.current().iteration())).dim());
                    println!();
                    break;
                },
            }
        }
    }

    // Show the result
    match (history.classes(), history.minimized()) {
        (Some(classes), Some(minimized)) => {
            println!("{} {classes}", style("Equivalence classes:").bold().green());
            println!("{}", style("Minimized automaton:").bold().green());
            println!("    {}", minimized.to_string().replace('\n', "\n    "));
        },
        _ => {
            error!("Walkthrough ended without reaching the fixed point");
            std::process::exit(1);
        },
    }
}
