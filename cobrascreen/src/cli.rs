//! Command line arguments
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cobrascreen")]
#[command(about = "Gene essentiality screens and plasmid burden simulations on COBRA models")]
#[command(version)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Knock out every gene of a model in turn and record the resulting growth
    Essentiality(EssentialityArgs),
    /// Add a plasmid to a host model and solve it
    Plasmid(PlasmidArgs),
}

#[derive(Args, Debug)]
pub struct EssentialityArgs {
    /// COBRA json model
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,

    /// Knockout strategies to run, in order
    #[arg(short, long, value_enum, default_values_t = [Strategy::Transcription])]
    pub strategy: Vec<Strategy>,

    /// Directory receiving one gene_essentiality_<strategy>.csv per strategy
    #[arg(short, long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Worker threads, each screening its own copy of the model
    #[arg(short = 'j', long, default_value_t = 1)]
    pub processes: usize,

    /// Solver feasibility tolerance
    #[arg(long, default_value_t = 1e-9)]
    pub feasibility_tolerance: f64,

    /// Solver numeric focus, 0 to 3
    #[arg(long, default_value_t = 3)]
    pub numeric_focus: u8,

    /// Solve without presolve
    #[arg(long)]
    pub no_presolve: bool,

    /// Reaction whose flux is reported for the unperturbed model, may be repeated
    #[arg(short, long, value_name = "REACTION")]
    pub report_reaction: Vec<String>,

    /// Write the time taken by each operation to this csv file
    #[arg(short, long, value_name = "FILE")]
    pub timings: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct PlasmidArgs {
    /// COBRA json host model
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,

    /// JSON plasmid definition
    #[arg(short, long, value_name = "FILE")]
    pub plasmid: PathBuf,

    /// Plasmid copies per cell
    #[arg(short, long, default_value_t = 5.)]
    pub copy_number: f64,

    /// Reaction whose flux is reported, may be repeated
    #[arg(short, long, value_name = "REACTION")]
    pub report_reaction: Vec<String>,
}

/// How genes are knocked out
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Block the gene's transcription reaction
    Transcription,
    /// Mark the gene inactive and block the reactions that need it
    GeneDeletion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn essentiality_arguments() {
        let cli = Cli::parse_from([
            "cobrascreen",
            "essentiality",
            "--model",
            "model.json",
            "--strategy",
            "transcription",
            "--strategy",
            "gene-deletion",
            "-j",
            "4",
            "--no-presolve",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Essentiality(args) => {
                assert_eq!(
                    args.strategy,
                    vec![Strategy::Transcription, Strategy::GeneDeletion]
                );
                assert_eq!(args.processes, 4);
                assert!(args.no_presolve);
                assert_eq!(args.numeric_focus, 3);
                assert_eq!(args.output_dir, PathBuf::from("outputs"));
            }
            other => panic!("Expected the essentiality command, got {:?}", other),
        }
    }

    #[test]
    fn plasmid_defaults() {
        let cli = Cli::parse_from([
            "cobrascreen",
            "plasmid",
            "-m",
            "host.json",
            "-p",
            "plasmid.json",
        ]);
        match cli.command {
            Commands::Plasmid(args) => {
                assert_eq!(args.copy_number, 5.);
                assert!(args.report_reaction.is_empty());
            }
            other => panic!("Expected the plasmid command, got {:?}", other),
        }
    }
}
