mod config;
mod report;

use anyhow::{Context, Result};
use chem_infer_core::{PuzzleGraph, Solver};
use clap::{Parser, Subcommand};
use config::Settings;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chem-infer")]
#[command(about = "Solve chemistry inference puzzles", long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a puzzle, one condition per line
    Solve {
        /// Puzzle file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Reaction file replacing the built-in inventory
        #[arg(long)]
        inventory: Option<PathBuf>,

        /// Leave out generated double-displacement reactions
        #[arg(long)]
        no_generated: bool,

        /// Skip candidate propagation before the search
        #[arg(long)]
        no_propagation: bool,

        /// Most solutions to print
        #[arg(long)]
        max_display: Option<usize>,
    },

    /// Print the active reaction inventory
    Inventory {
        /// Reaction file replacing the built-in inventory
        #[arg(long)]
        inventory: Option<PathBuf>,

        /// Leave out generated double-displacement reactions
        #[arg(long)]
        no_generated: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_puzzle(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading puzzle {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading puzzle from stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings_path = cli.config.clone().unwrap_or_else(Settings::path);
    let settings = Settings::load(&settings_path)?;

    match cli.command {
        Command::Solve {
            file,
            json,
            inventory,
            no_generated,
            no_propagation,
            max_display,
        } => {
            let inventory = inventory.or(settings.inventory);
            let kb = config::load_knowledge(inventory.as_deref(), !no_generated)?;

            let mut solver_config = settings.solver;
            if no_propagation {
                solver_config.propagate = false;
            }
            let max_display = max_display.unwrap_or(settings.max_display);

            let text = read_puzzle(file.as_ref())?;
            let mut graph = PuzzleGraph::new(&kb);
            let unparsed = graph.input_all(&text);
            let report = Solver::with_config(solver_config).solve(&mut graph)?;

            if json {
                println!("{}", report::render_json(&report, unparsed)?);
            } else {
                print!("{}", report::render_text(&report, unparsed, max_display));
            }
        }
        Command::Inventory {
            inventory,
            no_generated,
        } => {
            let inventory = inventory.or(settings.inventory);
            for reaction in config::load_reactions(inventory.as_deref(), !no_generated)? {
                println!("{reaction}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_flags() {
        let cli = Cli::try_parse_from([
            "chem-infer",
            "solve",
            "puzzle.txt",
            "--json",
            "--no-propagation",
            "--max-display",
            "20",
        ])
        .unwrap();
        match cli.command {
            Command::Solve {
                file,
                json,
                no_propagation,
                no_generated,
                max_display,
                ..
            } => {
                assert_eq!(file, Some(PathBuf::from("puzzle.txt")));
                assert!(json && no_propagation && !no_generated);
                assert_eq!(max_display, Some(20));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_inventory_subcommand() {
        let cli = Cli::try_parse_from(["chem-infer", "-v", "inventory", "--no-generated"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Inventory {
                no_generated: true,
                inventory: None
            }
        ));
    }
}
