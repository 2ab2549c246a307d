//! Provides the Solution struct, the result of optimizing a model
use std::fmt::Write;

use indexmap::IndexMap;

use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Solution of a flux balance problem
#[derive(Clone, Debug)]
pub struct Solution {
    /// Status reported by the solver
    pub status: OptimizationStatus,
    /// Objective value, None if the solver did not produce a solution
    pub objective_value: Option<f64>,
    /// Reaction id to flux, empty if the solver did not produce a solution
    pub fluxes: IndexMap<String, f64>,
    /// Metabolite id to shadow price, empty if unavailable
    pub shadow_prices: IndexMap<String, f64>,
}

impl Solution {
    pub(crate) fn from_problem_solution(problem_solution: ProblemSolution) -> Self {
        Solution {
            status: problem_solution.status,
            objective_value: problem_solution.objective_value,
            fluxes: problem_solution.variable_values.unwrap_or_default(),
            shadow_prices: problem_solution.dual_values.unwrap_or_default(),
        }
    }

    /// Flux through a reaction, if it is part of the solution
    pub fn flux(&self, reaction_id: &str) -> Option<f64> {
        self.fluxes.get(reaction_id).copied()
    }

    /// Human-readable report of the solution: status, objective, and the fluxes of the
    /// requested reactions
    pub fn summary(&self, reaction_ids: &[String]) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "Status               : {:?}", self.status);
        match self.objective_value {
            Some(value) => {
                let _ = writeln!(report, "Growth               : {}", value);
            }
            None => {
                let _ = writeln!(report, "Growth               : n/a");
            }
        }
        for id in reaction_ids {
            match self.flux(id) {
                Some(flux) => {
                    let _ = writeln!(report, " - {:<20}: {}", id, flux);
                }
                None => {
                    let _ = writeln!(report, " - {:<20}: not in model", id);
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_requested_fluxes() {
        let mut fluxes = IndexMap::new();
        fluxes.insert("EZ_rib".to_string(), 0.25);
        let solution = Solution {
            status: OptimizationStatus::Optimal,
            objective_value: Some(0.8),
            fluxes,
            shadow_prices: IndexMap::new(),
        };
        let report = solution.summary(&["EZ_rib".to_string(), "EZ_rnap".to_string()]);
        assert!(report.contains("Growth               : 0.8"));
        assert!(report.contains("EZ_rib"));
        assert!(report.contains("0.25"));
        assert!(report.contains("EZ_rnap             : not in model"));
    }
}
