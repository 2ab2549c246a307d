//! Reading and writing models, plasmid definitions, sequences and result tables
pub mod gpr_parse;
pub mod json;
pub mod plasmid;
pub mod sequence;
pub mod table;
