//! This module provides a struct for representing reactions
use super::model::Gpr;
use crate::configuration::{default_lower_bound, default_upper_bound};
use crate::metabolic_model::gene::GeneActivity;
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule to determine if reaction is active
    #[builder(default = "None")]
    pub gpr: Option<Gpr>,
    /// Lower flux bound
    #[builder(default = "default_lower_bound()")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "default_upper_bound()")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
    /// Reaction Activity
    #[builder(default = "ReactionActivity::Active")]
    pub activity: ReactionActivity,
    /// Was the reaction activity manually set
    ///
    /// ### Note
    /// This is used for keeping track of Model updates, and enabling the rollback of changes.
    /// Basically this acts as a pin, if the reaction activity was manually set, it will keep
    /// that activity regardless of changes to the gene activity in the GPR.
    #[builder(default = "false")]
    pub(crate) activity_set: bool,
}

impl Reaction {
    /// Flux bounds as seen by the optimization problem
    ///
    /// # Note:
    /// An inactive reaction is fixed at zero flux regardless of its stored bounds
    pub fn effective_bounds(&self) -> (f64, f64) {
        match self.activity {
            ReactionActivity::Active => (self.lower_bound, self.upper_bound),
            ReactionActivity::Inactive => (0f64, 0f64),
        }
    }

    /// Pin the reaction activity, so that GPR re-evaluation no longer changes it
    pub fn pin_activity(&mut self, activity: ReactionActivity) {
        self.activity = activity;
        self.activity_set = true;
    }

    /// Whether the activity has been pinned (see [`Reaction::pin_activity`])
    pub fn activity_pinned(&self) -> bool {
        self.activity_set
    }

    /// Ids of the genes referenced by this reaction's GPR
    pub fn gene_ids(&self) -> Vec<String> {
        match &self.gpr {
            Some(gpr) => gpr.gene_ids(),
            None => Vec::new(),
        }
    }

    /// Whether the reaction can only carry flux in the forward direction
    pub fn is_irreversible(&self) -> bool {
        self.lower_bound >= 0f64
    }
}

/// Whether a Reaction is active or inactive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionActivity {
    /// The Reaction is active and can carry flux
    Active,
    /// The Reaction is inactive and can't carry flux
    Inactive,
}

impl From<GeneActivity> for ReactionActivity {
    fn from(value: GeneActivity) -> Self {
        match value {
            GeneActivity::Active => ReactionActivity::Active,
            GeneActivity::Inactive => ReactionActivity::Inactive,
        }
    }
}
