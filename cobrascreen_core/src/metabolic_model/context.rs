//! Scoped, reversible changes to a [`Model`]
//!
//! Every change made through a [`ModelContext`] records how to undo itself. When the context is
//! dropped, the changes are reverted newest first, so the model is back in the state it was in
//! when the context was opened. This holds for early returns, `?` propagation and panics alike.
use std::ops::Deref;

use tracing::debug;

use crate::metabolic_model::gene::GeneActivity;
use crate::metabolic_model::model::{Model, ModelError};
use crate::metabolic_model::reaction::ReactionActivity;

/// A single reversible change
#[derive(Debug, Clone)]
enum Undo {
    Bounds {
        id: String,
        lower_bound: f64,
        upper_bound: f64,
    },
    GeneActivity {
        id: String,
        activity: GeneActivity,
    },
    ReactionActivity {
        id: String,
        activity: ReactionActivity,
    },
}

/// Mutable view of a model which reverts its changes on drop
///
/// Read access to the model (including optimization) goes through `Deref`, all writes go
/// through the methods below so that each one is recorded.
///
/// # Examples
/// ```rust
/// use cobrascreen_core::metabolic_model::model::Model;
/// use cobrascreen_core::metabolic_model::reaction::ReactionBuilder;
/// let mut model = Model::new_empty();
/// model.add_reaction(ReactionBuilder::default().id("R1".to_string()).build().unwrap());
/// {
///     let mut context = model.context();
///     context.set_upper_bound("R1", 0.).unwrap();
///     assert_eq!(context.reaction("R1").unwrap().upper_bound, 0.);
/// }
/// assert_eq!(model.reaction("R1").unwrap().upper_bound, 1000.);
/// ```
pub struct ModelContext<'m> {
    model: &'m mut Model,
    history: Vec<Undo>,
}

impl<'m> ModelContext<'m> {
    pub(crate) fn new(model: &'m mut Model) -> Self {
        ModelContext {
            model,
            history: Vec::new(),
        }
    }

    /// Set both flux bounds of a reaction
    pub fn set_bounds(
        &mut self,
        reaction_id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ModelError> {
        let (previous_lower, previous_upper) = self.current_bounds(reaction_id)?;
        self.model
            .set_reaction_bounds(reaction_id, lower_bound, upper_bound)?;
        self.history.push(Undo::Bounds {
            id: reaction_id.to_string(),
            lower_bound: previous_lower,
            upper_bound: previous_upper,
        });
        Ok(())
    }

    /// Set the upper bound of a reaction, returning the previous upper bound
    ///
    /// # Note
    /// If the current lower bound is above the new upper bound it is lowered to match, so that
    /// setting an upper bound of zero always fully blocks forward flux.
    pub fn set_upper_bound(&mut self, reaction_id: &str, upper_bound: f64) -> Result<f64, ModelError> {
        let (lower_bound, previous_upper) = self.current_bounds(reaction_id)?;
        self.set_bounds(reaction_id, lower_bound.min(upper_bound), upper_bound)?;
        Ok(previous_upper)
    }

    /// Fix a reaction at zero flux
    pub fn knock_out_reaction(&mut self, reaction_id: &str) -> Result<(), ModelError> {
        self.set_bounds(reaction_id, 0., 0.)
    }

    /// Mark a gene as inactive, and deactivate every reaction whose GPR no longer holds
    pub fn knock_out_gene(&mut self, gene_id: &str) -> Result<(), ModelError> {
        let previous = self.model.set_gene_activity(gene_id, GeneActivity::Inactive)?;
        self.history.push(Undo::GeneActivity {
            id: gene_id.to_string(),
            activity: previous,
        });
        let changed = self.model.update_reaction_activity()?;
        for (id, activity) in changed {
            debug!("Knockout of {} deactivates reaction {}", gene_id, id);
            self.history.push(Undo::ReactionActivity { id, activity });
        }
        Ok(())
    }

    /// Number of changes that will be reverted on drop
    pub fn pending_changes(&self) -> usize {
        self.history.len()
    }

    fn current_bounds(&self, reaction_id: &str) -> Result<(f64, f64), ModelError> {
        self.model
            .reaction(reaction_id)
            .map(|r| (r.lower_bound, r.upper_bound))
            .ok_or_else(|| ModelError::ReactionNotFound(reaction_id.to_string()))
    }

    fn revert(&mut self) {
        while let Some(undo) = self.history.pop() {
            match undo {
                Undo::Bounds {
                    id,
                    lower_bound,
                    upper_bound,
                } => {
                    if let Some(reaction) = self.model.reactions.get_mut(&id) {
                        reaction.lower_bound = lower_bound;
                        reaction.upper_bound = upper_bound;
                    }
                }
                Undo::GeneActivity { id, activity } => {
                    if let Some(gene) = self.model.genes.get_mut(&id) {
                        gene.activity = activity;
                    }
                }
                Undo::ReactionActivity { id, activity } => {
                    if let Some(reaction) = self.model.reactions.get_mut(&id) {
                        reaction.activity = activity;
                    }
                }
            }
        }
    }
}

impl Deref for ModelContext<'_> {
    type Target = Model;

    fn deref(&self) -> &Model {
        self.model
    }
}

impl Drop for ModelContext<'_> {
    fn drop(&mut self) {
        self.revert();
    }
}
