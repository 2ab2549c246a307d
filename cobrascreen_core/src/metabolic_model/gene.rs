//! This module provides the Gene struct, representing a gene in a metabolic model
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use derive_builder::Builder;

/// Structure Representing a Gene
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Gene {
    /// Used to identify the gene
    pub id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Whether this gene is currently active (see [`GeneActivity`])
    #[builder(default = "GeneActivity::Active")]
    pub activity: GeneActivity,
    /// Notes about the gene
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Gene Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Gene {
    pub fn new(
        id: String,
        name: Option<String>,
        activity: GeneActivity,
        notes: Option<String>,
        annotation: Option<String>,
    ) -> Gene {
        Gene {
            id,
            name,
            activity,
            notes,
            annotation,
        }
    }

    /// Create a new active gene with only an id
    pub fn new_active(id: &str) -> Gene {
        Gene::new(id.to_string(), None, GeneActivity::Active, None, None)
    }

    /// Whether the gene is currently active
    pub fn is_active(&self) -> bool {
        self.activity == GeneActivity::Active
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.activity.hash(state);
    }
}

/// Whether a gene is active or not
#[derive(Clone, Debug, Hash, Eq, PartialEq, Copy)]
pub enum GeneActivity {
    /// Gene is considered active
    Active,
    /// Gene is considered inactive
    Inactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let gene = GeneBuilder::default()
            .id("b0001".to_string())
            .build()
            .unwrap();
        assert_eq!(gene.activity, GeneActivity::Active);
        assert!(gene.name.is_none());
        assert!(gene.is_active());
    }

    #[test]
    fn display() {
        let gene = Gene::new_active("Rv0001");
        assert_eq!(format!("{}", gene), "Rv0001");
    }
}
