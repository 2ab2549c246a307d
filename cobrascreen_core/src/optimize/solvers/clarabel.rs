//! Implements a solver interface for Clarabel
//!
//! Clarabel solves conic problems of the form
//! `min 1/2 x'Px + q'x  s.t.  Ax + s = b, s in K`.
//! A linear [`Problem`] is translated by stacking every equality row (zero cone)
//! above every inequality row (nonnegative cone, `a'x <= b`). Variable bounds become
//! rows as well, fixed variables become equality rows and infinite bounds are dropped.
use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::*;
use indexmap::IndexMap;
use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use tracing::{debug, trace};

use crate::configuration::SolverConfiguration;
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Solver backed by the Clarabel interior point method
#[derive(Clone, Debug)]
pub struct ClarabelSolver {
    configuration: SolverConfiguration,
}

impl ClarabelSolver {
    /// Create a new solver with the given configuration
    pub fn new(configuration: SolverConfiguration) -> Self {
        ClarabelSolver { configuration }
    }

    fn settings(&self) -> Result<DefaultSettings<f64>, SolverError> {
        // Higher numeric focus spends more effort on scaling and refinement
        let focus = self.configuration.numeric_focus_level() as u32;
        DefaultSettingsBuilder::<f64>::default()
            .verbose(self.configuration.verbose)
            .max_iter(self.configuration.max_iterations)
            .tol_feas(self.configuration.feasibility_tolerance)
            .tol_gap_abs(self.configuration.optimality_tolerance)
            .tol_gap_rel(self.configuration.optimality_tolerance)
            .presolve_enable(self.configuration.presolve)
            .equilibrate_max_iter(10 + 10 * focus)
            .iterative_refinement_max_iter(10 + 10 * focus)
            .build()
            .map_err(|err| SolverError::InvalidSettings(err.to_string()))
    }
}

impl Solver for ClarabelSolver {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn integer_variable_capable(&self) -> bool {
        false
    }

    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        if problem.has_integer_variables() {
            return Err(SolverError::UnsupportedProblemType {
                solver: self.name(),
                problem_type: problem.problem_type(),
            });
        }
        let num_variables = problem.num_variables();
        if num_variables == 0 {
            // Nothing to optimize
            return Ok(ProblemSolution {
                status: OptimizationStatus::Optimal,
                objective_value: Some(0.),
                variable_values: Some(IndexMap::new()),
                dual_values: Some(IndexMap::new()),
            });
        }

        let sense_factor = match problem.objective().sense() {
            ObjectiveSense::Minimize => 1.,
            ObjectiveSense::Maximize => -1.,
        };
        let mut costs = DVector::<f64>::zeros(num_variables);
        for term in problem.objective().terms() {
            // Objective terms are validated against the variables when added
            if let Some(var) = problem.variables().get(&term.variable) {
                costs[var.index()] += term.coefficient;
            }
        }
        let q: Vec<f64> = costs.iter().map(|c| c * sense_factor).collect();

        let rows = ConicRows::from_problem(problem);
        trace!(
            equality_rows = rows.equality.len(),
            inequality_rows = rows.inequality.len(),
            "Assembled conic rows"
        );
        let (a, b) = rows.assemble(num_variables);
        let mut cones = Vec::new();
        if !rows.equality.is_empty() {
            cones.push(ZeroConeT(rows.equality.len()));
        }
        if !rows.inequality.is_empty() {
            cones.push(NonnegativeConeT(rows.inequality.len()));
        }
        let p = ClarabelCsc::<f64>::zeros((num_variables, num_variables));
        let settings = self.settings()?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        solver.solve();
        let status = convert_status(solver.solution.status);
        debug!(
            "Clarabel finished with status {} after {} iterations",
            status, solver.solution.iterations
        );
        if !status.has_value() {
            return Ok(ProblemSolution::without_values(status));
        }

        let x = DVector::from_column_slice(&solver.solution.x);
        let variable_values = problem
            .variables()
            .iter()
            .map(|(id, var)| (id.clone(), x[var.index()]))
            .collect::<IndexMap<_, _>>();
        let dual_values = rows
            .constraint_rows
            .iter()
            .map(|(id, row)| (id.clone(), -sense_factor * solver.solution.z[*row]))
            .collect::<IndexMap<_, _>>();
        Ok(ProblemSolution {
            status,
            objective_value: Some(costs.dot(&x)),
            variable_values: Some(variable_values),
            dual_values: Some(dual_values),
        })
    }
}

/// A sparse row `terms . x (= or <=) rhs`
struct Row {
    terms: Vec<(usize, f64)>,
    rhs: f64,
}

/// Rows of the conic problem, split by cone
struct ConicRows {
    equality: Vec<Row>,
    inequality: Vec<Row>,
    /// Row of each equality constraint, used to report dual values
    constraint_rows: IndexMap<String, usize>,
}

impl ConicRows {
    fn from_problem(problem: &Problem) -> Self {
        let mut rows = ConicRows {
            equality: Vec::new(),
            inequality: Vec::new(),
            constraint_rows: IndexMap::new(),
        };
        let column = |id: &str| problem.variables().get(id).map(|var| var.index());

        for constraint in problem.constraints().values() {
            let terms: Vec<(usize, f64)> = constraint
                .terms()
                .iter()
                .filter_map(|t| column(&t.variable).map(|col| (col, t.coefficient)))
                .collect();
            match constraint {
                Constraint::Equality { id, equals, .. } => {
                    rows.constraint_rows
                        .insert(id.clone(), rows.equality.len());
                    rows.equality.push(Row {
                        terms,
                        rhs: *equals,
                    });
                }
                Constraint::Inequality {
                    id,
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if lower_bound == upper_bound {
                        rows.constraint_rows
                            .insert(id.clone(), rows.equality.len());
                        rows.equality.push(Row {
                            terms,
                            rhs: *upper_bound,
                        });
                        continue;
                    }
                    if upper_bound.is_finite() {
                        rows.inequality.push(Row {
                            terms: terms.clone(),
                            rhs: *upper_bound,
                        });
                    }
                    if lower_bound.is_finite() {
                        rows.inequality.push(Row {
                            terms: terms.iter().map(|(col, coef)| (*col, -coef)).collect(),
                            rhs: -lower_bound,
                        });
                    }
                }
            }
        }

        for var in problem.variables().values() {
            let col = var.index();
            if var.is_fixed() {
                rows.equality.push(Row {
                    terms: vec![(col, 1.)],
                    rhs: var.upper_bound,
                });
                continue;
            }
            if var.upper_bound.is_finite() {
                rows.inequality.push(Row {
                    terms: vec![(col, 1.)],
                    rhs: var.upper_bound,
                });
            }
            if var.lower_bound.is_finite() {
                rows.inequality.push(Row {
                    terms: vec![(col, -1.)],
                    rhs: -var.lower_bound,
                });
            }
        }
        rows
    }

    /// Stack the equality rows above the inequality rows into `A` and `b`
    fn assemble(&self, num_variables: usize) -> (ClarabelCsc<f64>, Vec<f64>) {
        let num_rows = self.equality.len() + self.inequality.len();
        let mut coo = CooMatrix::<f64>::new(num_rows, num_variables);
        let mut b = Vec::with_capacity(num_rows);
        for (row_index, row) in self.equality.iter().chain(&self.inequality).enumerate() {
            for (col, coef) in &row.terms {
                if *coef != 0. {
                    coo.push(row_index, *col, *coef);
                }
            }
            b.push(row.rhs);
        }
        let csc = CscMatrix::from(&coo);
        let (col_offsets, row_indices, values) = csc.disassemble();
        (
            ClarabelCsc::new(num_rows, num_variables, col_offsets, row_indices, values),
            b,
        )
    }
}

fn convert_status(status: SolverStatus) -> OptimizationStatus {
    match status {
        SolverStatus::Solved => OptimizationStatus::Optimal,
        SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            OptimizationStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
            OptimizationStatus::Unbounded
        }
        SolverStatus::MaxIterations
        | SolverStatus::MaxTime
        | SolverStatus::InsufficientProgress => OptimizationStatus::SolverHalted,
        SolverStatus::NumericalError => OptimizationStatus::NumericalError,
        _ => OptimizationStatus::Unoptimized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::variable::VariableType;

    fn solve(problem: &Problem) -> ProblemSolution {
        ClarabelSolver::new(SolverConfiguration::default())
            .solve(problem)
            .unwrap()
    }

    #[test]
    fn simple_lp() {
        // max x + y s.t. x + 2y <= 4, 0 <= x <= 2, y >= 0
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0., 2.)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Continuous, 0., f64::INFINITY)
            .unwrap();
        problem
            .add_new_inequality_constraint("c", &["x", "y"], &[1., 2.], f64::NEG_INFINITY, 4.)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.).unwrap();
        problem.add_new_linear_objective_term("y", 1.).unwrap();
        let solution = solve(&problem);
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 3.).abs() < 1e-5);
        let values = solution.variable_values.unwrap();
        assert!((values["x"] - 2.).abs() < 1e-5);
        assert!((values["y"] - 1.).abs() < 1e-5);
    }

    #[test]
    fn minimization_with_equality() {
        // min x s.t. x - y = 1, 0 <= y <= 5
        let mut problem = Problem::new_minimization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, -10., 10.)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Continuous, 0., 5.)
            .unwrap();
        problem
            .add_new_equality_constraint("link", &["x", "y"], &[1., -1.], 1.)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.).unwrap();
        let solution = solve(&problem);
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 1.).abs() < 1e-5);
        assert!(solution.dual_values.unwrap().contains_key("link"));
    }

    #[test]
    fn infeasible_problem() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0., 1.)
            .unwrap();
        problem
            .add_new_inequality_constraint("c", &["x"], &[1.], 2., 3.)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.).unwrap();
        let solution = solve(&problem);
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert!(solution.objective_value.is_none());
        assert!(solution.variable_values.is_none());
    }

    #[test]
    fn unbounded_problem() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0., f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.).unwrap();
        let solution = solve(&problem);
        assert_eq!(solution.status, OptimizationStatus::Unbounded);
    }

    #[test]
    fn integer_problems_rejected() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Binary, 0., 1.)
            .unwrap();
        let res = ClarabelSolver::new(SolverConfiguration::default()).solve(&problem);
        assert!(matches!(
            res,
            Err(SolverError::UnsupportedProblemType { .. })
        ));
    }

    #[test]
    fn empty_problem_is_trivially_optimal() {
        let solution = solve(&Problem::new_maximization());
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert_eq!(solution.objective_value, Some(0.));
    }
}
