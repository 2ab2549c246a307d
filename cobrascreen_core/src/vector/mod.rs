//! Synthetic vectors: plasmids carrying genes whose expression, and whose own replication,
//! draw on the host's metabolism
pub mod expression;
pub mod integration;
pub mod plasmid;

pub use expression::{ExpressionParameters, ExpressionParametersBuilder};
pub use integration::VectorError;
pub use plasmid::{Enzyme, ExpressedGene, Mrna, Plasmid};
