//! The two subcommands
use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use tracing::info;

use cobrascreen_core::configuration::{
    SolverConfiguration, SolverConfigurationBuilder, CONFIGURATION,
};
use cobrascreen_core::essentiality::{
    GeneDeletion, KnockoutStrategy, ScreenConfigurationBuilder, Screener, TranscriptionKnockout,
};
use cobrascreen_core::io::plasmid::read_plasmid;
use cobrascreen_core::io::table::{write_knockout_table, write_timing_log};
use cobrascreen_core::metabolic_model::model::Model;
use cobrascreen_core::metabolic_model::solution::Solution;
use cobrascreen_core::timing::TimingLog;
use cobrascreen_core::vector::ExpressionParameters;

use crate::cli::{EssentialityArgs, PlasmidArgs, Strategy};

impl EssentialityArgs {
    fn solver_configuration(&self) -> Result<SolverConfiguration> {
        Ok(SolverConfigurationBuilder::default()
            .feasibility_tolerance(self.feasibility_tolerance)
            .numeric_focus(self.numeric_focus)
            .presolve(!self.no_presolve)
            .build()?)
    }
}

fn knockout_strategy(strategy: Strategy) -> Box<dyn KnockoutStrategy> {
    match strategy {
        Strategy::Transcription => Box::new(TranscriptionKnockout::default()),
        Strategy::GeneDeletion => Box::new(GeneDeletion),
    }
}

/// Run every requested screen, returning the tables written
pub fn run_essentiality(args: &EssentialityArgs) -> Result<Vec<PathBuf>> {
    let mut model = Model::read_json(&args.model)
        .with_context(|| format!("Unable to load model {}", args.model.display()))?;
    let solver = args.solver_configuration()?;
    model.solver = solver.clone();

    let mut timings = TimingLog::new();
    let solution = timings
        .time("optimize", || model.optimize())
        .context("Unable to solve the unperturbed model")?;
    ensure!(
        solution.objective_value.is_some(),
        "The unperturbed model could not be solved: {}",
        solution.status
    );
    print!("{}", solution.summary(&args.report_reaction));

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Unable to create output directory {}",
            args.output_dir.display()
        )
    })?;
    let screener = Screener::new(
        ScreenConfigurationBuilder::default()
            .solver(solver)
            .processes(args.processes)
            .show_progress(args.progress)
            .build()?,
    );
    let threshold = CONFIGURATION
        .read()
        .map(|conf| conf.tolerance)
        .unwrap_or(1e-7);

    let mut tables = Vec::with_capacity(args.strategy.len());
    for strategy in &args.strategy {
        let strategy = knockout_strategy(*strategy);
        let name = strategy.name().to_string();
        let results = timings
            .time(&name, || screener.screen(&mut model, strategy.as_ref()))
            .with_context(|| format!("The {} screen failed", name))?;
        let essential = results.essential_genes(threshold);
        info!(
            "{} of {} genes are essential under the {} strategy",
            essential.len(),
            results.len(),
            name
        );
        let path = args
            .output_dir
            .join(format!("gene_essentiality_{}.csv", name));
        write_knockout_table(&path, &results)
            .with_context(|| format!("Unable to write {}", path.display()))?;
        tables.push(path);
    }

    if let Some(path) = &args.timings {
        write_timing_log(path, &timings)
            .with_context(|| format!("Unable to write {}", path.display()))?;
    }
    Ok(tables)
}

/// Add a plasmid to the host model and solve it once
pub fn run_plasmid(args: &PlasmidArgs) -> Result<Solution> {
    let mut model = Model::read_json(&args.model)
        .with_context(|| format!("Unable to load model {}", args.model.display()))?;
    let parameters = ExpressionParameters::default();
    let plasmid = read_plasmid(&args.plasmid, &parameters)
        .with_context(|| format!("Unable to read plasmid {}", args.plasmid.display()))?;
    model
        .add_vector(&plasmid, args.copy_number, &parameters)
        .with_context(|| format!("Unable to add plasmid {} to the model", plasmid.id))?;
    let solution = model
        .optimize()
        .context("Unable to solve the model with the plasmid")?;
    print!("{}", solution.summary(&args.report_reaction));
    Ok(solution)
}
