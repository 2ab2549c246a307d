//! JSON plasmid definitions
//!
//! A definition names the plasmid genes (inline sequences or sequence files, with the primers
//! they were cloned with), the metabolites and reactions the plasmid introduces in the COBRA
//! json format, the enzymes made from the genes, and which reactions each enzyme catalyzes.
//! File paths are relative to the definition file.
//!
//! ```json
//! {
//!   "id": "pET-AR-ALS",
//!   "backbone_file": "pET.fasta",
//!   "genes": [{"id": "EBA_als", "sequence_file": "ALS.fasta",
//!              "forward_primer": "GGAATTC", "reverse_primer": "CCGAGCT"}],
//!   "metabolites": [],
//!   "reactions": [{"id": "ALS", "metabolites": {"pyr_c": -2.0, "alac__S_c": 1.0},
//!                  "lower_bound": 0.0}],
//!   "enzymes": [{"id": "ALS", "kcat": 96840.0, "composition": {"EBA_als": 3}}],
//!   "coupling": {"ALS": ["ALS"]}
//! }
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::io::json::{JsonError, JsonMetabolite, JsonReaction};
use crate::io::sequence::{parse_sequence, read_sequence, SequenceError};
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::vector::expression::ExpressionParameters;
use crate::vector::plasmid::{Enzyme, ExpressedGene, Plasmid};

#[derive(Deserialize)]
struct JsonPlasmid {
    id: String,
    /// Complete plasmid sequence, used as is
    #[serde(default)]
    sequence: Option<String>,
    #[serde(default)]
    sequence_file: Option<PathBuf>,
    /// Backbone the genes are inserted into, when no complete sequence is given
    #[serde(default)]
    backbone: Option<String>,
    #[serde(default)]
    backbone_file: Option<PathBuf>,
    genes: Vec<JsonExpressedGene>,
    #[serde(default)]
    metabolites: Vec<JsonMetabolite>,
    #[serde(default)]
    reactions: Vec<JsonReaction>,
    #[serde(default)]
    enzymes: Vec<JsonEnzyme>,
    #[serde(default)]
    coupling: IndexMap<String, Vec<String>>,
    #[serde(default)]
    mrna_kdeg: Option<f64>,
}

#[derive(Deserialize)]
struct JsonExpressedGene {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sequence: Option<String>,
    #[serde(default)]
    sequence_file: Option<PathBuf>,
    #[serde(default)]
    forward_primer: String,
    #[serde(default)]
    reverse_primer: String,
}

#[derive(Deserialize)]
struct JsonEnzyme {
    id: String,
    #[serde(default)]
    kcat: Option<f64>,
    #[serde(default)]
    kdeg: Option<f64>,
    composition: IndexMap<String, u32>,
}

/// Read a plasmid definition
///
/// Enzymes without a `kcat` or `kdeg` get the defaults of `parameters`, and every gene gets a
/// transcript degraded at `mrna_kdeg` (or the default mRNA degradation rate).
pub fn read_plasmid<P: AsRef<Path>>(
    path: P,
    parameters: &ExpressionParameters,
) -> Result<Plasmid, PlasmidError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|err| PlasmidError::UnableToRead(format!("{}: {}", path.display(), err)))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    plasmid_from_str(&text, base_dir, parameters)
}

/// Parse a plasmid definition, resolving sequence files against `base_dir`
pub fn plasmid_from_str(
    text: &str,
    base_dir: &Path,
    parameters: &ExpressionParameters,
) -> Result<Plasmid, PlasmidError> {
    let definition: JsonPlasmid =
        serde_json::from_str(text).map_err(|err| PlasmidError::UnableToParse(err.to_string()))?;

    let mut inserts = Vec::with_capacity(definition.genes.len());
    for gene in definition.genes {
        let sequence = load_sequence(
            &gene.id,
            gene.sequence.as_deref(),
            gene.sequence_file.as_deref(),
            base_dir,
        )?
        .ok_or_else(|| PlasmidError::MissingSequence(gene.id.clone()))?;
        let expressed = ExpressedGene::new(&gene.id, gene.name.as_deref(), &sequence);
        inserts.push((gene.forward_primer, expressed, gene.reverse_primer));
    }

    let sequence = match load_sequence(
        &definition.id,
        definition.sequence.as_deref(),
        definition.sequence_file.as_deref(),
        base_dir,
    )? {
        Some(sequence) => sequence,
        None => {
            let backbone = load_sequence(
                &definition.id,
                definition.backbone.as_deref(),
                definition.backbone_file.as_deref(),
                base_dir,
            )?
            .unwrap_or_default();
            let primed: Vec<(&str, &ExpressedGene, &str)> = inserts
                .iter()
                .map(|(forward, gene, reverse)| (forward.as_str(), gene, reverse.as_str()))
                .collect();
            Plasmid::assemble_sequence(&backbone, &primed)
        }
    };
    let genes: Vec<ExpressedGene> = inserts.into_iter().map(|(_, gene, _)| gene).collect();

    // Rules may name plasmid genes, host genes are resolved when the vector is added
    let mut rule_genes: IndexMap<String, Gene> = genes
        .iter()
        .map(|gene| (gene.id.clone(), Gene::new_active(&gene.id)))
        .collect();
    let reactions = definition
        .reactions
        .into_iter()
        .map(|reaction| reaction.into_reaction(&mut rule_genes))
        .collect::<Result<Vec<_>, JsonError>>()?;
    let metabolites: Vec<Metabolite> = definition
        .metabolites
        .into_iter()
        .map(Metabolite::from)
        .collect();

    let enzymes: IndexMap<String, Enzyme> = definition
        .enzymes
        .into_iter()
        .map(|enzyme| {
            let composition: Vec<(&str, u32)> = enzyme
                .composition
                .iter()
                .map(|(gene, count)| (gene.as_str(), *count))
                .collect();
            let built = Enzyme::new(
                &enzyme.id,
                enzyme.kcat.unwrap_or(parameters.average_kcat),
                enzyme.kdeg.unwrap_or(parameters.kdeg_enzyme),
                &composition,
            );
            (enzyme.id, built)
        })
        .collect();
    let mut coupling = IndexMap::with_capacity(definition.coupling.len());
    for (reaction_id, enzyme_ids) in definition.coupling {
        let isozymes = enzyme_ids
            .iter()
            .map(|enzyme_id| {
                enzymes
                    .get(enzyme_id)
                    .cloned()
                    .ok_or_else(|| PlasmidError::UnknownEnzyme {
                        reaction: reaction_id.clone(),
                        enzyme: enzyme_id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        coupling.insert(reaction_id, isozymes);
    }

    let mut plasmid = Plasmid::new(
        &definition.id,
        &sequence,
        genes,
        metabolites,
        reactions,
        coupling,
    );
    plasmid.build_default_mrna(definition.mrna_kdeg.unwrap_or(parameters.kdeg_mrna));
    debug!(
        "Read plasmid {} with {} bases, {} genes and {} reactions",
        plasmid.id,
        plasmid.sequence.len(),
        plasmid.genes.len(),
        plasmid.reactions.len()
    );
    Ok(plasmid)
}

/// Inline sequence, or the contents of a sequence file, if either is given
fn load_sequence(
    owner: &str,
    inline: Option<&str>,
    file: Option<&Path>,
    base_dir: &Path,
) -> Result<Option<String>, PlasmidError> {
    let sequence = match (inline, file) {
        (Some(text), _) => parse_sequence(text),
        (None, Some(file)) => read_sequence(base_dir.join(file)),
        (None, None) => return Ok(None),
    };
    sequence
        .map(Some)
        .map_err(|source| PlasmidError::Sequence {
            owner: owner.to_string(),
            source,
        })
}

#[derive(Error, Debug)]
pub enum PlasmidError {
    #[error("Unable to read plasmid definition {0}")]
    UnableToRead(String),
    #[error("Unable to parse plasmid definition: {0}")]
    UnableToParse(String),
    #[error("Invalid sequence for {owner}: {source}")]
    Sequence {
        owner: String,
        source: SequenceError,
    },
    #[error("Gene {0} has neither a sequence nor a sequence file")]
    MissingSequence(String),
    #[error("Invalid plasmid reaction: {0}")]
    Reaction(#[from] JsonError),
    #[error("Reaction {reaction} is coupled to undefined enzyme {enzyme}")]
    UnknownEnzyme { reaction: String, enzyme: String },
}

#[cfg(test)]
pub(crate) fn bdo_plasmid_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join("plasmids")
        .join("bdo_plasmid.json")
}
