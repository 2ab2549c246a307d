//! Process wide defaults, and the explicit solver configuration threaded through every solve
use std::sync::{LazyLock, RwLock};

use derive_builder::Builder;

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Default values used when building new model components
pub struct Configuration {
    /// Default lower flux bound for new reactions
    pub lower_bound: f64,
    /// Default upper flux bound for new reactions
    pub upper_bound: f64,
    /// Values with a magnitude below this are treated as zero when classifying results
    pub tolerance: f64,
    /// Solver configuration copied into newly created or loaded models
    pub solver: SolverConfiguration,
    /// Default number of worker threads for screens
    pub processes: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
            solver: SolverConfiguration::default(),
            processes: 1,
        }
    }
}

/// Default lower bound for new reactions
pub(crate) fn default_lower_bound() -> f64 {
    CONFIGURATION
        .read()
        .map(|conf| conf.lower_bound)
        .unwrap_or(-1000.)
}

/// Default upper bound for new reactions
pub(crate) fn default_upper_bound() -> f64 {
    CONFIGURATION
        .read()
        .map(|conf| conf.upper_bound)
        .unwrap_or(1000.)
}

/// Solver configuration given to new models
pub(crate) fn default_solver() -> SolverConfiguration {
    CONFIGURATION
        .read()
        .map(|conf| conf.solver.clone())
        .unwrap_or_default()
}

/// Settings passed through to the optimizer for a single solve
///
/// # Note
/// Models carry their own copy (see [`crate::metabolic_model::model::Model::solver`]), screens
/// carry theirs, nothing reads a mutable global during a solve.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct SolverConfiguration {
    /// Primal/dual feasibility tolerance
    pub feasibility_tolerance: f64,
    /// Absolute and relative duality gap tolerance
    pub optimality_tolerance: f64,
    /// Whether the solver may drop redundant constraints before solving
    pub presolve: bool,
    /// Numeric focus hint, from 0 (fastest) to 3 (most careful)
    pub numeric_focus: u8,
    /// Maximum number of interior point iterations
    pub max_iterations: u32,
    /// Print solver progress to stdout
    pub verbose: bool,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        SolverConfiguration {
            feasibility_tolerance: 1e-8,
            optimality_tolerance: 1e-8,
            presolve: true,
            numeric_focus: 0,
            max_iterations: 200,
            verbose: false,
        }
    }
}

impl SolverConfiguration {
    /// Numeric focus clamped to the supported range
    pub fn numeric_focus_level(&self) -> u8 {
        self.numeric_focus.min(3)
    }
}
