//! This module provides the Model struct for representing an entire metabolic model
use std::fmt::{Display, Formatter};

use crate::configuration::{default_solver, SolverConfiguration};
use crate::metabolic_model::context::ModelContext;
use crate::metabolic_model::gene::{Gene, GeneActivity};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::{Reaction, ReactionActivity};
use crate::metabolic_model::solution::Solution;
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::clarabel::ClarabelSolver;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::OptimizationStatus;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Gene Objects
    pub genes: IndexMap<String, Gene>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
    /// Solver settings used by [`Model::optimize`] and [`Model::slim_optimize`]
    pub solver: SolverConfiguration,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
            solver: default_solver(),
        }
    }

    /// Add a reaction to the model
    ///
    /// # Parameters
    /// - reaction: Reaction to add
    ///
    /// # Examples
    /// ```rust
    /// use cobrascreen_core::metabolic_model::model::Model;
    /// use cobrascreen_core::metabolic_model::reaction::{Reaction, ReactionBuilder};
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// model.add_reaction(new_reaction);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a gene to the model
    ///
    /// # Parameters
    /// - gene: Gene to add
    ///
    /// # Examples
    /// ```rust
    /// use cobrascreen_core::metabolic_model::gene::GeneBuilder;
    /// use cobrascreen_core::metabolic_model::model::Model;
    /// let mut model=Model::new_empty();
    /// let new_gene = GeneBuilder::default().id("new_gene".to_string()).build().unwrap();
    /// model.add_gene(new_gene);
    /// ```
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// Remove a reaction (and its objective coefficient) from the model
    pub fn remove_reaction(&mut self, reaction_id: &str) -> Result<Reaction, ModelError> {
        self.objective.shift_remove(reaction_id);
        self.reactions
            .shift_remove(reaction_id)
            .ok_or_else(|| ModelError::ReactionNotFound(reaction_id.to_string()))
    }

    /// Set the objective coefficient of a reaction
    pub fn set_objective_coefficient(
        &mut self,
        reaction_id: &str,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !self.reactions.contains_key(reaction_id) {
            return Err(ModelError::ReactionNotFound(reaction_id.to_string()));
        }
        self.objective.insert(reaction_id.to_string(), coefficient);
        Ok(())
    }

    /// Look up a reaction by id
    pub fn reaction(&self, reaction_id: &str) -> Option<&Reaction> {
        self.reactions.get(reaction_id)
    }

    /// Look up a gene by id
    pub fn gene(&self, gene_id: &str) -> Option<&Gene> {
        self.genes.get(gene_id)
    }

    /// Ids of every gene in the model, in model order
    pub fn gene_ids(&self) -> Vec<String> {
        self.genes.keys().cloned().collect()
    }

    /// Ids of the reactions whose GPR references `gene_id`
    pub fn reactions_for_gene(&self, gene_id: &str) -> Vec<String> {
        self.reactions
            .values()
            .filter(|r| r.gene_ids().iter().any(|g| g == gene_id))
            .map(|r| r.id.clone())
            .collect()
    }

    /// Update the flux bounds of a reaction
    pub fn set_reaction_bounds(
        &mut self,
        reaction_id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ModelError> {
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidBounds {
                id: reaction_id.to_string(),
                lower_bound,
                upper_bound,
            });
        }
        match self.reactions.get_mut(reaction_id) {
            Some(reaction) => {
                reaction.lower_bound = lower_bound;
                reaction.upper_bound = upper_bound;
                Ok(())
            }
            None => Err(ModelError::ReactionNotFound(reaction_id.to_string())),
        }
    }

    /// Set the activity of a gene, returning the previous activity
    ///
    /// # Note
    /// Reaction activities are not updated until [`Model::update_reaction_activity`] is called
    pub fn set_gene_activity(
        &mut self,
        gene_id: &str,
        activity: GeneActivity,
    ) -> Result<GeneActivity, ModelError> {
        match self.genes.get_mut(gene_id) {
            Some(gene) => {
                let previous = gene.activity;
                gene.activity = activity;
                Ok(previous)
            }
            None => Err(ModelError::GeneNotFound(gene_id.to_string())),
        }
    }

    /// Re-evaluate the GPR of every reaction whose activity is not pinned
    ///
    /// # Returns
    /// The id and previous activity of every reaction whose activity changed
    pub fn update_reaction_activity(
        &mut self,
    ) -> Result<Vec<(String, ReactionActivity)>, ModelError> {
        let mut updates: Vec<(String, ReactionActivity)> = Vec::new();
        for (id, reaction) in &self.reactions {
            if reaction.activity_set {
                continue;
            }
            if let Some(ref gpr) = reaction.gpr {
                let new_activity: ReactionActivity = self.eval_gpr(gpr)?.into();
                if new_activity != reaction.activity {
                    updates.push((id.clone(), new_activity));
                }
            }
        }
        let mut previous = Vec::with_capacity(updates.len());
        for (id, activity) in updates {
            if let Some(reaction) = self.reactions.get_mut(&id) {
                previous.push((id.clone(), reaction.activity));
                reaction.activity = activity;
            }
        }
        Ok(previous)
    }

    /// Open a scoped context: changes made through it are reverted when it is dropped
    pub fn context(&mut self) -> ModelContext<'_> {
        ModelContext::new(self)
    }

    // region Optimization
    /// Solve the flux balance problem with the model's own solver configuration
    pub fn optimize(&self) -> Result<Solution, ModelError> {
        self.optimize_with(&self.solver)
    }

    /// Solve the flux balance problem with an explicit solver configuration
    pub fn optimize_with(&self, configuration: &SolverConfiguration) -> Result<Solution, ModelError> {
        let problem = Problem::from_model(self)?;
        let mut solver = ClarabelSolver::new(configuration.clone());
        let problem_solution = solver.solve(&problem)?;
        Ok(Solution::from_problem_solution(problem_solution))
    }

    /// Solve the flux balance problem, returning only the objective value
    pub fn slim_optimize(&self) -> Result<f64, ModelError> {
        self.slim_optimize_with(&self.solver)
    }

    /// Solve with an explicit solver configuration, returning only the objective value
    ///
    /// # Returns
    /// - `Ok(f64)` when the solver reports an optimal (or almost optimal) solution
    /// - `Err(ModelError::NotOptimal)` carrying the solver status otherwise
    pub fn slim_optimize_with(&self, configuration: &SolverConfiguration) -> Result<f64, ModelError> {
        let solution = self.optimize_with(configuration)?;
        match (solution.status, solution.objective_value) {
            (OptimizationStatus::Optimal, Some(value)) => Ok(value),
            (OptimizationStatus::AlmostOptimal, Some(value)) => {
                debug!("Accepting almost optimal solution with objective {}", value);
                Ok(value)
            }
            (status, _) => Err(ModelError::NotOptimal(status)),
        }
    }
    // endregion Optimization
}

// region GPR Functionality
/// Representation of a Gene Protein Reaction Rule as an AST
#[derive(Clone, Debug, PartialEq)]
pub enum Gpr {
    /// Operation on two genes (see [`GprOperation`])
    Operation(GprOperation),
    /// A terminal gene Node (see [`Gene`])
    GeneNode(String),
}

impl Display for Gpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_id())
    }
}

impl Gpr {
    /// Create a new binary operation node
    pub fn new_binary_operation(
        left: Gpr,
        operator: GprOperatorType,
        right: Gpr,
    ) -> Result<Gpr, GprError> {
        let op = match operator {
            GprOperatorType::Or => GprOperation::Or {
                left: Box::new(left),
                right: Box::new(right),
            },
            GprOperatorType::And => GprOperation::And {
                left: Box::new(left),
                right: Box::new(right),
            },
            GprOperatorType::Not => return Err(GprError::InvalidBinaryOp),
        };
        Ok(Gpr::Operation(op))
    }

    /// Create a new unary operation node
    pub fn new_unary_operation(operator: GprOperatorType, operand: Gpr) -> Result<Gpr, GprError> {
        let op = match operator {
            GprOperatorType::Not => GprOperation::Not {
                val: Box::new(operand),
            },
            _ => return Err(GprError::InvalidUnaryOp),
        };
        Ok(Gpr::Operation(op))
    }

    /// Create a new gene node
    pub fn new_gene_node(gene: &str) -> Gpr {
        Gpr::GeneNode(gene.to_string())
    }

    /// Join several rules with a single operator, returns None for an empty iterator
    pub fn join<I: IntoIterator<Item = Gpr>>(rules: I, operator: GprOperatorType) -> Option<Gpr> {
        let mut rules = rules.into_iter();
        let first = rules.next()?;
        Some(rules.fold(first, |acc, rule| match operator {
            GprOperatorType::And => Gpr::Operation(GprOperation::And {
                left: Box::new(acc),
                right: Box::new(rule),
            }),
            _ => Gpr::Operation(GprOperation::Or {
                left: Box::new(acc),
                right: Box::new(rule),
            }),
        }))
    }

    /// Generate a GPR string with gene ids from the GPR AST
    pub fn to_string_id(&self) -> String {
        match self {
            Gpr::Operation(op) => match op {
                GprOperation::Or { left, right } => {
                    format!("({} or {})", left.to_string_id(), right.to_string_id())
                }
                GprOperation::And { left, right } => {
                    format!("({} and {})", left.to_string_id(), right.to_string_id())
                }
                GprOperation::Not { val } => {
                    format!("(not {})", val)
                }
            },
            Gpr::GeneNode(gene_ref) => gene_ref.to_string(),
        }
    }

    /// Unique gene ids referenced in the rule, in order of first appearance
    pub fn gene_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_gene_ids(&mut ids);
        ids
    }

    fn collect_gene_ids(&self, ids: &mut Vec<String>) {
        match self {
            Gpr::GeneNode(g) => {
                if !ids.contains(g) {
                    ids.push(g.clone());
                }
            }
            Gpr::Operation(GprOperation::Or { left, right })
            | Gpr::Operation(GprOperation::And { left, right }) => {
                left.collect_gene_ids(ids);
                right.collect_gene_ids(ids);
            }
            Gpr::Operation(GprOperation::Not { val }) => val.collect_gene_ids(ids),
        }
    }
}

/// Possible operations on genes
#[derive(Clone, Debug, PartialEq)]
pub enum GprOperation {
    Or { left: Box<Gpr>, right: Box<Gpr> },
    And { left: Box<Gpr>, right: Box<Gpr> },
    Not { val: Box<Gpr> },
}

/// Types of Allowed GPR Operations
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GprOperatorType {
    /// Or, results in active if either left or right are active
    Or,
    /// And, results in active if both left and right are active
    And,
    /// Not, results in active if val is inactive
    Not,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GprError {
    #[error("Invalid Binary Operation")]
    InvalidBinaryOp,
    #[error("Invalid Unary Operation")]
    InvalidUnaryOp,
    #[error("Gene {0} in GPR is not present in the model")]
    GeneNotFound(String),
}

// Model associated functions for working with GPRs
impl Model {
    /// Evaluate whether a GPR evaluates to Active or Inactive
    pub fn eval_gpr(&self, gpr: &Gpr) -> Result<GeneActivity, GprError> {
        match gpr {
            Gpr::Operation(op) => match op {
                GprOperation::Or { left, right } => {
                    let l = self.eval_gpr(left)?;
                    let r = self.eval_gpr(right)?;
                    if l == GeneActivity::Active || r == GeneActivity::Active {
                        Ok(GeneActivity::Active)
                    } else {
                        Ok(GeneActivity::Inactive)
                    }
                }
                GprOperation::And { left, right } => {
                    let l = self.eval_gpr(left)?;
                    let r = self.eval_gpr(right)?;
                    if l == GeneActivity::Active && r == GeneActivity::Active {
                        Ok(GeneActivity::Active)
                    } else {
                        Ok(GeneActivity::Inactive)
                    }
                }
                GprOperation::Not { val } => match self.eval_gpr(val)? {
                    GeneActivity::Active => Ok(GeneActivity::Inactive),
                    GeneActivity::Inactive => Ok(GeneActivity::Active),
                },
            },
            Gpr::GeneNode(gene) => match self.genes.get(gene) {
                Some(g) => Ok(g.activity),
                None => Err(GprError::GeneNotFound(gene.clone())),
            },
        }
    }
}

// endregion GPR Functionality

/// Errors associated with the Model
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    /// A reaction id was not found in the model
    #[error("Reaction {0} is not present in the model")]
    ReactionNotFound(String),
    /// A gene id was not found in the model
    #[error("Gene {0} is not present in the model")]
    GeneNotFound(String),
    /// Tried to set a lower bound greater than the upper bound
    #[error("Invalid bounds for {id}: lower bound {lower_bound} > upper bound {upper_bound}")]
    InvalidBounds {
        id: String,
        lower_bound: f64,
        upper_bound: f64,
    },
    /// Evaluating a GPR failed
    #[error("Unable to evaluate GPR: {0}")]
    Gpr(#[from] GprError),
    /// The optimization problem could not be constructed
    #[error("Unable to build optimization problem: {0}")]
    Problem(#[from] ProblemError),
    /// The solver failed to run
    #[error("Solver failure: {0}")]
    Solver(#[from] SolverError),
    /// The solver ran, but did not find an optimal solution
    #[error("Optimization finished with status {0:?}")]
    NotOptimal(OptimizationStatus),
}


#[cfg(test)]
mod model_tests {
    use super::*;
    use crate::test_models::gpr_model as toy_model;

    #[test]
    fn optimize_toy_model() {
        let model = toy_model();
        let solution = model.optimize().unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 10.).abs() < 1e-5);
        assert!((solution.fluxes["A_in"] - 10.).abs() < 1e-5);
        assert!((model.slim_optimize().unwrap() - 10.).abs() < 1e-5);
    }

    #[test]
    fn set_bounds() {
        let mut model = toy_model();
        model.set_reaction_bounds("A_in", 0., 3.).unwrap();
        assert!((model.slim_optimize().unwrap() - 3.).abs() < 1e-5);
        assert!(matches!(
            model.set_reaction_bounds("A_in", 5., 3.),
            Err(ModelError::InvalidBounds { .. })
        ));
        assert!(matches!(
            model.set_reaction_bounds("missing", 0., 3.),
            Err(ModelError::ReactionNotFound(_))
        ));
    }

    #[test]
    fn gene_activity_propagates_to_reactions() {
        let mut model = toy_model();
        model.set_gene_activity("g1", GeneActivity::Inactive).unwrap();
        let changed = model.update_reaction_activity().unwrap();
        assert_eq!(changed, vec![("R1".to_string(), ReactionActivity::Active)]);
        assert_eq!(model.reactions["R1"].activity, ReactionActivity::Inactive);
        assert!((model.slim_optimize().unwrap() - 4.).abs() < 1e-5);
        assert_eq!(model.reactions_for_gene("g2"), vec!["R2".to_string()]);
    }

    #[test]
    fn pinned_reactions_ignore_genes() {
        let mut model = toy_model();
        model
            .reactions
            .get_mut("R1")
            .unwrap()
            .pin_activity(ReactionActivity::Active);
        model.set_gene_activity("g1", GeneActivity::Inactive).unwrap();
        assert!(model.update_reaction_activity().unwrap().is_empty());
        assert_eq!(model.reactions["R1"].activity, ReactionActivity::Active);
    }

    #[test]
    fn infeasible_model() {
        let mut model = toy_model();
        // Require more biomass than can be produced
        model.set_reaction_bounds("BIOMASS", 20., 1000.).unwrap();
        match model.slim_optimize() {
            Err(ModelError::NotOptimal(status)) => {
                assert_ne!(status, OptimizationStatus::Optimal)
            }
            other => panic!("Expected infeasible solve, got {:?}", other),
        }
    }

    #[test]
    fn remove_reaction() {
        let mut model = toy_model();
        model.remove_reaction("BIOMASS").unwrap();
        assert!(model.objective.is_empty());
        assert!(matches!(
            model.remove_reaction("BIOMASS"),
            Err(ModelError::ReactionNotFound(_))
        ));
    }

    #[test]
    fn empty_model_optimizes_to_zero() {
        let model = Model::new_empty();
        assert!((model.slim_optimize().unwrap()).abs() < 1e-25);
    }
}
