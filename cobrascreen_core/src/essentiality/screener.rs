//! Runs a [`KnockoutStrategy`] over every gene of a model, serially or on a thread pool
use derive_builder::Builder;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::configuration::{default_solver, SolverConfiguration, CONFIGURATION};
use crate::essentiality::strategy::KnockoutStrategy;
use crate::essentiality::{KnockoutOutcome, KnockoutResults};
use crate::metabolic_model::model::Model;

/// Settings for a screen
#[derive(Builder, Clone, Debug)]
pub struct ScreenConfiguration {
    /// Solver settings used for every knockout
    #[builder(default = "default_solver()")]
    pub solver: SolverConfiguration,
    /// Number of worker threads, 1 screens in place on the caller's model
    #[builder(default = "default_processes()")]
    pub processes: usize,
    /// Draw a progress bar on stderr
    #[builder(default = "false")]
    pub show_progress: bool,
}

impl Default for ScreenConfiguration {
    fn default() -> Self {
        ScreenConfiguration {
            solver: default_solver(),
            processes: default_processes(),
            show_progress: false,
        }
    }
}

fn default_processes() -> usize {
    CONFIGURATION.read().map(|conf| conf.processes).unwrap_or(1)
}

/// Knocks out every gene of a model in turn
pub struct Screener {
    configuration: ScreenConfiguration,
}

impl Screener {
    pub fn new(configuration: ScreenConfiguration) -> Self {
        Screener { configuration }
    }

    pub fn configuration(&self) -> &ScreenConfiguration {
        &self.configuration
    }

    /// Screen every gene of `model` with `strategy`
    ///
    /// With a single process the knockouts run in place on `model`, each one reverted before
    /// the next. With more, every worker knocks genes out of its own clone of the model and
    /// `model` is only read. Either way the results hold one entry per gene, in model gene
    /// order, and a failed knockout never stops the screen.
    pub fn screen(
        &self,
        model: &mut Model,
        strategy: &dyn KnockoutStrategy,
    ) -> Result<KnockoutResults, ScreenError> {
        if self.configuration.processes <= 1 {
            return Ok(self.screen_serial(model, strategy));
        }
        self.screen_parallel(model, strategy)
    }

    pub(crate) fn screen_serial(
        &self,
        model: &mut Model,
        strategy: &dyn KnockoutStrategy,
    ) -> KnockoutResults {
        let gene_ids = model.gene_ids();
        info!(
            "Screening {} genes with the {} strategy",
            gene_ids.len(),
            strategy.name()
        );
        let progress = self.progress_bar(gene_ids.len(), strategy.name());
        let mut results = KnockoutResults::new();
        for gene_id in gene_ids {
            let outcome = strategy.knock_out(model, &gene_id, &self.configuration.solver);
            results.insert(gene_id, outcome);
            progress.inc(1);
        }
        progress.finish_and_clear();
        log_summary(&results, strategy.name());
        results
    }

    fn screen_parallel(
        &self,
        model: &Model,
        strategy: &dyn KnockoutStrategy,
    ) -> Result<KnockoutResults, ScreenError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.configuration.processes)
            .build()?;
        let gene_ids = model.gene_ids();
        info!(
            "Screening {} genes with the {} strategy on {} threads",
            gene_ids.len(),
            strategy.name(),
            self.configuration.processes
        );
        let progress = self.progress_bar(gene_ids.len(), strategy.name());
        let solver = &self.configuration.solver;
        let outcomes: Vec<(String, KnockoutOutcome)> = pool.install(|| {
            gene_ids
                .par_iter()
                .progress_with(progress.clone())
                .map_init(
                    || model.clone(),
                    |local_model, gene_id| {
                        (
                            gene_id.clone(),
                            strategy.knock_out(local_model, gene_id, solver),
                        )
                    },
                )
                .collect()
        });
        progress.finish_and_clear();
        let results: KnockoutResults = outcomes.into_iter().collect();
        log_summary(&results, strategy.name());
        Ok(results)
    }

    fn progress_bar(&self, length: usize, strategy_name: &str) -> ProgressBar {
        if !self.configuration.show_progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new(length as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{msg} [{elapsed_precise}] {wide_bar} {pos}/{len}")
        {
            progress.set_style(style);
        }
        progress.set_message(format!("{} knockouts", strategy_name));
        progress
    }
}

fn log_summary(results: &KnockoutResults, strategy_name: &str) {
    let (grew, not_applicable, failed) = results.tally();
    info!(
        "{} screen finished: {} solved, {} not applicable, {} failed",
        strategy_name, grew, not_applicable, failed
    );
}

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Unable to build the screening thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essentiality::strategy::{GeneDeletion, TranscriptionKnockout};
    use crate::test_models::{gpr_model, transcription_model};

    fn screener(processes: usize) -> Screener {
        Screener::new(
            ScreenConfigurationBuilder::default()
                .processes(processes)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn parallel_matches_serial() {
        let mut model = gpr_model();
        let serial = screener(1).screen(&mut model, &GeneDeletion).unwrap();
        let parallel = screener(3).screen(&mut model, &GeneDeletion).unwrap();
        assert_eq!(
            serial.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            parallel.iter().map(|(id, _)| id).collect::<Vec<_>>()
        );
        for ((_, a), (_, b)) in serial.iter().zip(parallel.iter()) {
            assert!((a.as_f64() - b.as_f64()).abs() < 1e-6);
        }
        assert!((serial.get("g1").unwrap().as_f64() - 4.).abs() < 1e-5);
        assert!((serial.get("g2").unwrap().as_f64() - 10.).abs() < 1e-5);
    }

    #[test]
    fn parallel_screen_leaves_model_untouched() {
        let mut model = transcription_model();
        let results = screener(2)
            .screen(&mut model, &TranscriptionKnockout::default())
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.get("g2"), Some(&KnockoutOutcome::NotApplicable));
        assert_eq!(model.reactions["g1_transcription"].upper_bound, 1000.);
    }

    #[test]
    fn more_processes_than_genes() {
        let mut model = transcription_model();
        let results = screener(16)
            .screen(&mut model, &TranscriptionKnockout::default())
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn configuration_defaults() {
        let configuration = ScreenConfigurationBuilder::default().build().unwrap();
        assert_eq!(configuration.processes, 1);
        assert!(!configuration.show_progress);
        assert_eq!(configuration.solver, SolverConfiguration::default());
    }
}
