//! Single gene essentiality screens
//!
//! Every gene of a model is knocked out in turn (see [`strategy`] for the available ways of
//! knocking a gene out), the growth objective is re-optimized, and the outcome is recorded.
//! Each trial runs inside a [`crate::metabolic_model::context::ModelContext`], so the model
//! is back in its original state before the next gene is tried.
pub mod screener;
pub mod strategy;

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

use crate::metabolic_model::model::Model;
use crate::optimize::OptimizationStatus;

pub use screener::{ScreenConfiguration, ScreenConfigurationBuilder, ScreenError, Screener};
pub use strategy::{GeneDeletion, KnockoutStrategy, TranscriptionKnockout};

/// Result of knocking out a single gene
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KnockoutOutcome {
    /// The knockout model was solved, with this objective value
    Growth(f64),
    /// The strategy has nothing to knock out for this gene
    NotApplicable,
    /// The knockout model could not be solved to optimality
    SolveFailed(OptimizationStatus),
}

impl KnockoutOutcome {
    /// Growth value, with NaN standing in for both sentinels
    pub fn as_f64(&self) -> f64 {
        match self {
            KnockoutOutcome::Growth(value) => *value,
            KnockoutOutcome::NotApplicable | KnockoutOutcome::SolveFailed(_) => f64::NAN,
        }
    }

    /// Growth value, if the knockout model was solved
    pub fn growth(&self) -> Option<f64> {
        match self {
            KnockoutOutcome::Growth(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for KnockoutOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KnockoutOutcome::Growth(value) => write!(f, "{}", value),
            KnockoutOutcome::NotApplicable => write!(f, "not applicable"),
            KnockoutOutcome::SolveFailed(status) => write!(f, "solve failed ({})", status),
        }
    }
}

/// Outcome of every gene in a screen, in model gene order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnockoutResults {
    outcomes: IndexMap<String, KnockoutOutcome>,
}

impl KnockoutResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a gene, replacing any earlier outcome for it
    pub fn insert(&mut self, gene_id: String, outcome: KnockoutOutcome) {
        self.outcomes.insert(gene_id, outcome);
    }

    pub fn get(&self, gene_id: &str) -> Option<&KnockoutOutcome> {
        self.outcomes.get(gene_id)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KnockoutOutcome)> {
        self.outcomes.iter().map(|(id, outcome)| (id.as_str(), outcome))
    }

    /// Genes whose knockout grows below `threshold`, or whose knockout could not be solved
    pub fn essential_genes(&self, threshold: f64) -> Vec<&str> {
        self.iter()
            .filter(|(_, outcome)| match outcome {
                KnockoutOutcome::Growth(value) => *value < threshold,
                KnockoutOutcome::SolveFailed(_) => true,
                KnockoutOutcome::NotApplicable => false,
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Counts of (growth, not applicable, failed) outcomes
    pub fn tally(&self) -> (usize, usize, usize) {
        self.outcomes
            .values()
            .fold((0, 0, 0), |(grew, skipped, failed), outcome| match outcome {
                KnockoutOutcome::Growth(_) => (grew + 1, skipped, failed),
                KnockoutOutcome::NotApplicable => (grew, skipped + 1, failed),
                KnockoutOutcome::SolveFailed(_) => (grew, skipped, failed + 1),
            })
    }
}

impl FromIterator<(String, KnockoutOutcome)> for KnockoutResults {
    fn from_iter<T: IntoIterator<Item = (String, KnockoutOutcome)>>(iter: T) -> Self {
        KnockoutResults {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Screen every gene of the model by blocking its `<gene>_transcription` reaction
///
/// Runs serially on the given model with the model's own solver configuration. The model is
/// unchanged when this returns.
pub fn screen(model: &mut Model) -> KnockoutResults {
    let configuration = ScreenConfigurationBuilder::default()
        .solver(model.solver.clone())
        .processes(1usize)
        .build()
        .unwrap_or_default();
    Screener::new(configuration).screen_serial(model, &TranscriptionKnockout::default())
}
