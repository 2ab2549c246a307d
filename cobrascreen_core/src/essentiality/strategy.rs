//! Ways of knocking out a single gene
use tracing::{debug, warn};

use crate::configuration::SolverConfiguration;
use crate::essentiality::KnockoutOutcome;
use crate::metabolic_model::model::{Model, ModelError};
use crate::optimize::OptimizationStatus;

/// A way of knocking out one gene and measuring the resulting growth
///
/// Implementations must leave the model exactly as they found it, typically by making every
/// change through a [`crate::metabolic_model::context::ModelContext`].
pub trait KnockoutStrategy: Sync {
    /// Short name, used in logs and output file names
    fn name(&self) -> &str;

    /// Knock out `gene_id` in `model`, optimize, and restore the model
    fn knock_out(
        &self,
        model: &mut Model,
        gene_id: &str,
        solver: &SolverConfiguration,
    ) -> KnockoutOutcome;
}

/// Knock a gene out by blocking the forward flux of its transcription reaction
///
/// Genes without a transcription reaction are [`KnockoutOutcome::NotApplicable`].
#[derive(Clone, Debug)]
pub struct TranscriptionKnockout {
    suffix: String,
}

impl Default for TranscriptionKnockout {
    fn default() -> Self {
        TranscriptionKnockout {
            suffix: "_transcription".to_string(),
        }
    }
}

impl TranscriptionKnockout {
    /// Use a different naming convention, `<gene_id><suffix>`
    pub fn with_suffix(suffix: &str) -> Self {
        TranscriptionKnockout {
            suffix: suffix.to_string(),
        }
    }

    /// Id of the transcription reaction of a gene
    pub fn reaction_id(&self, gene_id: &str) -> String {
        format!("{}{}", gene_id, self.suffix)
    }
}

impl KnockoutStrategy for TranscriptionKnockout {
    fn name(&self) -> &str {
        "transcription"
    }

    fn knock_out(
        &self,
        model: &mut Model,
        gene_id: &str,
        solver: &SolverConfiguration,
    ) -> KnockoutOutcome {
        let reaction_id = self.reaction_id(gene_id);
        if model.reaction(&reaction_id).is_none() {
            debug!("No reaction {} for gene {}", reaction_id, gene_id);
            return KnockoutOutcome::NotApplicable;
        }
        let mut context = model.context();
        if let Err(err) = context.set_upper_bound(&reaction_id, 0.) {
            warn!("Unable to knock out {}: {}", reaction_id, err);
            return KnockoutOutcome::SolveFailed(OptimizationStatus::Unoptimized);
        }
        outcome_of(gene_id, context.slim_optimize_with(solver))
    }
}

/// Classic single gene deletion: the gene is marked inactive and every reaction whose GPR
/// no longer holds is blocked
#[derive(Clone, Copy, Debug, Default)]
pub struct GeneDeletion;

impl KnockoutStrategy for GeneDeletion {
    fn name(&self) -> &str {
        "gene_deletion"
    }

    fn knock_out(
        &self,
        model: &mut Model,
        gene_id: &str,
        solver: &SolverConfiguration,
    ) -> KnockoutOutcome {
        if model.gene(gene_id).is_none() {
            debug!("Gene {} is not in the model", gene_id);
            return KnockoutOutcome::NotApplicable;
        }
        let mut context = model.context();
        if let Err(err) = context.knock_out_gene(gene_id) {
            warn!("Unable to knock out gene {}: {}", gene_id, err);
            return KnockoutOutcome::SolveFailed(OptimizationStatus::Unoptimized);
        }
        outcome_of(gene_id, context.slim_optimize_with(solver))
    }
}

fn outcome_of(gene_id: &str, result: Result<f64, ModelError>) -> KnockoutOutcome {
    match result {
        Ok(growth) => {
            debug!("Knockout of {} grows at {}", gene_id, growth);
            KnockoutOutcome::Growth(growth)
        }
        Err(ModelError::NotOptimal(status)) => {
            warn!("Knockout of {} finished with status {}", gene_id, status);
            KnockoutOutcome::SolveFailed(status)
        }
        Err(err) => {
            warn!("Knockout of {} could not be solved: {}", gene_id, err);
            KnockoutOutcome::SolveFailed(OptimizationStatus::Unoptimized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::gene::GeneActivity;
    use crate::test_models::{gpr_model, transcription_model};

    #[test]
    fn transcription_knockout_restores_bounds() {
        let mut model = transcription_model();
        let solver = model.solver.clone();
        let strategy = TranscriptionKnockout::default();
        let outcome = strategy.knock_out(&mut model, "g1", &solver);
        assert!(outcome.growth().unwrap().abs() < 1e-5);
        assert_eq!(model.reactions["g1_transcription"].upper_bound, 1000.);
        assert_eq!(model.reactions["g1_transcription"].lower_bound, 0.);
        assert_eq!(
            strategy.knock_out(&mut model, "g2", &solver),
            KnockoutOutcome::NotApplicable
        );
    }

    #[test]
    fn custom_suffix() {
        let strategy = TranscriptionKnockout::with_suffix("_expr");
        assert_eq!(strategy.reaction_id("b0001"), "b0001_expr");
        let mut model = transcription_model();
        let solver = model.solver.clone();
        assert_eq!(
            strategy.knock_out(&mut model, "g1", &solver),
            KnockoutOutcome::NotApplicable
        );
    }

    #[test]
    fn transcription_knockout_reports_failure_and_restores() {
        let mut model = transcription_model();
        // Force a minimum biomass so that the knockout is infeasible
        model.set_reaction_bounds("BIOMASS", 0.5, 1000.).unwrap();
        let solver = model.solver.clone();
        let outcome = TranscriptionKnockout::default().knock_out(&mut model, "g1", &solver);
        assert!(matches!(outcome, KnockoutOutcome::SolveFailed(_)));
        assert_eq!(model.reactions["g1_transcription"].upper_bound, 1000.);
        assert!((model.slim_optimize().unwrap() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn gene_deletion() {
        let mut model = gpr_model();
        let solver = model.solver.clone();
        let outcome = GeneDeletion.knock_out(&mut model, "g1", &solver);
        assert!((outcome.growth().unwrap() - 4.).abs() < 1e-5);
        assert_eq!(model.genes["g1"].activity, GeneActivity::Active);
        assert!(model.reactions["R1"].effective_bounds().1 > 0.);
        // g3 controls nothing, the knockout leaves growth unchanged
        let outcome = GeneDeletion.knock_out(&mut model, "g3", &solver);
        assert!((outcome.growth().unwrap() - 10.).abs() < 1e-5);
        assert_eq!(
            GeneDeletion.knock_out(&mut model, "missing", &solver),
            KnockoutOutcome::NotApplicable
        );
    }
}
