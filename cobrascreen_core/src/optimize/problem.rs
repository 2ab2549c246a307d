//! Provides struct representing an optimization problem
use indexmap::IndexMap;
use thiserror::Error;

use crate::metabolic_model::model::Model;
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense, ObjectiveTerm};
use crate::optimize::problem::ProblemError::{
    NonExistentVariable, NonExistentVariablesInObjective,
};
use crate::optimize::variable::{Variable, VariableBuilder, VariableType};

/// An optimization problem
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, keyed by id
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem, keyed by id
    constraints: IndexMap<String, Constraint>,
    /// Type of problem
    problem_type: ProblemType,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
            problem_type: ProblemType::LinearContinuous,
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Build the flux balance problem of a metabolic model
    ///
    /// One variable per reaction, bounded by the reaction's effective bounds (an
    /// inactive reaction is fixed to zero), one steady state equality constraint per
    /// metabolite appearing in any reaction, and the model's objective maximized.
    pub fn from_model(model: &Model) -> Result<Self, ProblemError> {
        let mut problem = Problem::new_maximization();
        let mut mass_balance: IndexMap<&str, Vec<(&str, f64)>> = IndexMap::new();
        for (reaction_id, reaction) in &model.reactions {
            let (lower_bound, upper_bound) = reaction.effective_bounds();
            problem.add_new_variable(
                reaction_id,
                reaction.name.as_deref(),
                VariableType::Continuous,
                lower_bound,
                upper_bound,
            )?;
            for (metabolite_id, coefficient) in &reaction.metabolites {
                mass_balance
                    .entry(metabolite_id.as_str())
                    .or_default()
                    .push((reaction_id.as_str(), *coefficient));
            }
        }
        for (metabolite_id, terms) in mass_balance {
            let (variables, coefficients): (Vec<&str>, Vec<f64>) = terms.into_iter().unzip();
            problem.add_new_equality_constraint(metabolite_id, &variables, &coefficients, 0.)?;
        }
        for (reaction_id, coefficient) in &model.objective {
            problem.add_new_linear_objective_term(reaction_id, *coefficient)?;
        }
        Ok(problem)
    }
    // endregion Creation Functions

    // region Accessors
    /// Objective of the problem
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Variables of the problem, in column order
    pub fn variables(&self) -> &IndexMap<String, Variable> {
        &self.variables
    }

    /// Constraints of the problem
    pub fn constraints(&self) -> &IndexMap<String, Constraint> {
        &self.constraints
    }

    /// Type of the problem
    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
    // endregion Accessors

    // region Update Objective Sense
    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }
    // endregion Update Objective Sense

    // region Adding Variables
    /// Add a variable to the optimization problem
    pub fn add_variable(&mut self, mut variable: Variable) -> Result<(), ProblemError> {
        self.validate_variable(&variable)?;
        variable.index = self.variables.len();
        if variable.variable_type != VariableType::Continuous {
            self.problem_type = ProblemType::LinearMixedInteger;
        }
        self.variables.insert(variable.id.clone(), variable);
        Ok(())
    }

    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        name: Option<&str>,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let mut builder = VariableBuilder::default();
        builder
            .id(id)
            .variable_type(variable_type)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound);
        if let Some(name) = name {
            builder.name(name);
        }
        let new_var = builder
            .build()
            .map_err(|err| ProblemError::InvalidVariable(err.to_string()))?;
        self.add_variable(new_var)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(&constraint)?;
        self.constraints
            .insert(constraint.get_id().to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint and add it to the problem
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_equality(
            id,
            variables,
            coefficients,
            equals,
        ))
    }

    /// Create a new inequality constraint and add it to the problem
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_inequality(
            id,
            variables,
            coefficients,
            lower_bound,
            upper_bound,
        ))
    }
    // endregion Adding Constraints

    // region Adding Objective Terms
    /// Add a new term to the objective
    pub fn add_objective_term(&mut self, objective_term: ObjectiveTerm) -> Result<(), ProblemError> {
        if !self.variables.contains_key(&objective_term.variable) {
            return Err(NonExistentVariablesInObjective(objective_term.variable));
        }
        self.objective.add_term(objective_term);
        Ok(())
    }

    /// Add a new linear term to the objective using the variable id
    pub fn add_new_linear_objective_term(
        &mut self,
        variable_id: &str,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        self.add_objective_term(ObjectiveTerm::new(variable_id, coefficient))
    }
    // endregion Adding Objective Terms

    // region update variable bounds
    /// Update the bounds of a variable
    pub fn update_variable_bounds(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        if lower_bound > upper_bound {
            return Err(ProblemError::InvalidVariableBounds(id.to_string()));
        }
        match self.variables.get_mut(id) {
            Some(var) => {
                var.lower_bound = lower_bound;
                var.upper_bound = upper_bound;
            }
            None => return Err(NonExistentVariable(id.to_string())),
        };
        Ok(())
    }
    // endregion update variable bounds

    // region Remove Variables
    /// Remove a variable from the problem, will also remove it as a term from all constraints
    /// and any terms in the objective that include this variable
    pub fn delete_variable(&mut self, variable_id: &str) -> Result<(), ProblemError> {
        if self.variables.shift_remove(variable_id).is_none() {
            return Err(NonExistentVariable(variable_id.to_string()));
        }
        self.objective.remove_terms_with_variable(variable_id);
        self.constraints
            .values_mut()
            .for_each(|cons| cons.remove_variable(variable_id));
        self.fix_variable_indices();
        self.fix_problem_type();
        Ok(())
    }
    // endregion Remove Variables

    // region Remove Constraints
    /// Remove a constraint (by id) from the problem
    pub fn remove_constraint(&mut self, constraint_id: &str) -> Option<Constraint> {
        self.constraints.shift_remove(constraint_id)
    }
    // endregion Remove Constraints

    /// Remove all terms from the objective
    pub fn remove_all_objective_terms(&mut self) {
        self.objective.remove_all_terms();
    }

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        if self.variables.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists(variable.id.clone()));
        };
        if variable.lower_bound > variable.upper_bound {
            return Err(ProblemError::InvalidVariableBounds(variable.id.clone()));
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(constraint.get_id()) {
            return Err(ProblemError::ConstraintAlreadyExists(
                constraint.get_id().to_string(),
            ));
        }
        if let Constraint::Inequality {
            lower_bound,
            upper_bound,
            ..
        } = constraint
        {
            if lower_bound > upper_bound {
                return Err(ProblemError::InvalidConstraintBounds(
                    constraint.get_id().to_string(),
                ));
            }
        }
        if let Some(missing) = constraint
            .variable_ids()
            .find(|id| !self.variables.contains_key(*id))
        {
            return Err(ProblemError::NonExistentVariablesInConstraint(
                missing.to_string(),
            ));
        }
        Ok(())
    }
    // endregion Validation Functions

    // region Fix Problem Functions
    fn fix_variable_indices(&mut self) {
        self.variables
            .values_mut()
            .enumerate()
            .for_each(|(ind, var)| var.index = ind);
    }

    fn fix_problem_type(&mut self) {
        self.problem_type = if self.has_integer_variables() {
            ProblemType::LinearMixedInteger
        } else {
            ProblemType::LinearContinuous
        };
    }
    // endregion Fix Problem Functions

    /// Whether any variable is integer or binary
    pub fn has_integer_variables(&self) -> bool {
        self.variables
            .values()
            .any(|var| var.variable_type != VariableType::Continuous)
    }
}

/// Types of optimization problems
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemType {
    /// Problem with linear objectives and constraints, and continuous variables
    LinearContinuous,
    /// Problem with linear objective and constraints, with integer and continuous variables
    LinearMixedInteger,
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add variable {0} but a variable with that id already exists")]
    VariableIdAlreadyExists(String),
    /// Error when the variable builder rejects its input
    #[error("Unable to build variable: {0}")]
    InvalidVariable(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to give variable {0} a lower_bound > upper_bound")]
    InvalidVariableBounds(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add constraint {0} but a constraint with that id already exists")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add inequality constraint {0} with lower_bound > upper_bound")]
    InvalidConstraintBounds(String),
    /// Error when trying to add a constraint that contains variables not in the problem
    #[error("Tried to add a constraint with variable {0} which is not in the problem")]
    NonExistentVariablesInConstraint(String),
    /// Error when trying to add an objective term which includes variables not in the problem
    #[error("Tried adding an objective term with variable {0} which is not in the problem")]
    NonExistentVariablesInObjective(String),
    /// Error when trying to perform an update or drop on a variable that doesn't exist
    #[error("Tried to access variable {0} which doesn't exist")]
    NonExistentVariable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_models::gpr_model;

    #[test]
    fn new_problem() {
        let max_problem = Problem::new_maximization();
        assert_eq!(max_problem.objective.sense(), ObjectiveSense::Maximize);

        let mut min_problem = Problem::new_minimization();
        assert_eq!(min_problem.objective.sense(), ObjectiveSense::Minimize);
        min_problem.update_objective_sense(ObjectiveSense::Maximize);
        assert_eq!(min_problem.objective.sense(), ObjectiveSense::Maximize);
    }

    #[test]
    fn add_variables() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 64., 100.)
            .unwrap();
        let var = &problem.variables()["x"];
        assert_eq!(var.index(), 0);
        assert!((var.lower_bound - 64.).abs() < 1e-25);
        assert!((var.upper_bound - 100.).abs() < 1e-25);
        assert_eq!(problem.problem_type(), ProblemType::LinearContinuous);

        problem
            .add_new_variable("y", Some("why"), VariableType::Integer, 0., 1.)
            .unwrap();
        assert_eq!(problem.variables()["y"].index(), 1);
        assert_eq!(problem.problem_type(), ProblemType::LinearMixedInteger);

        problem.delete_variable("x").unwrap();
        assert_eq!(problem.variables()["y"].index(), 0);
        assert!(matches!(
            problem.delete_variable("x"),
            Err(ProblemError::NonExistentVariable(_))
        ));
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = Problem::new_maximization();
        let res = problem.add_new_variable("x", None, VariableType::Continuous, 100., 64.);
        assert!(matches!(res, Err(ProblemError::InvalidVariableBounds(_))));
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0., 1.)
            .unwrap();
        let res = problem.add_new_variable("x", None, VariableType::Continuous, 0., 1.);
        assert!(matches!(res, Err(ProblemError::VariableIdAlreadyExists(_))));
    }

    #[test]
    fn add_constraint() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 64., 100.)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Continuous, 64., 100.)
            .unwrap();
        problem
            .add_new_equality_constraint("eq", &["x", "y"], &[2., 3.], 200.)
            .unwrap();
        match &problem.constraints()["eq"] {
            Constraint::Equality { equals, .. } => assert!((equals - 200.).abs() < 1e-25),
            Constraint::Inequality { .. } => panic!("Incorrect constraint type added"),
        }

        assert!(matches!(
            problem.add_new_inequality_constraint("bad", &["x", "y"], &[2., 3.], 200., 100.),
            Err(ProblemError::InvalidConstraintBounds(_))
        ));
        assert!(matches!(
            problem.add_new_equality_constraint("eq", &["x"], &[1.], 0.),
            Err(ProblemError::ConstraintAlreadyExists(_))
        ));
        assert!(matches!(
            problem.add_new_equality_constraint("missing", &["z"], &[1.], 0.),
            Err(ProblemError::NonExistentVariablesInConstraint(_))
        ));

        problem.delete_variable("x").unwrap();
        assert_eq!(
            problem.constraints()["eq"].variable_ids().collect::<Vec<_>>(),
            vec!["y"]
        );
        assert!(problem.remove_constraint("eq").is_some());
        assert_eq!(problem.num_constraints(), 0);
    }

    #[test]
    fn objective_requires_existing_variable() {
        let mut problem = Problem::new_maximization();
        assert!(matches!(
            problem.add_new_linear_objective_term("x", 1.),
            Err(ProblemError::NonExistentVariablesInObjective(_))
        ));
    }

    #[test]
    fn from_model() {
        let mut model = gpr_model();
        model.set_gene_activity("g1", crate::metabolic_model::gene::GeneActivity::Inactive).unwrap();
        model.update_reaction_activity().unwrap();
        let problem = Problem::from_model(&model).unwrap();
        assert_eq!(problem.num_variables(), 4);
        // a and b mass balances
        assert_eq!(problem.num_constraints(), 2);
        assert_eq!(problem.constraints()["a"].terms().len(), 3);
        let r1 = &problem.variables()["R1"];
        assert!(r1.is_fixed() && r1.upper_bound == 0.);
        assert_eq!(problem.objective().terms(), &[ObjectiveTerm::new("BIOMASS", 1.)]);
        assert_eq!(problem.objective().sense(), ObjectiveSense::Maximize);
    }
}
