//! Module providing JSON IO for Models in the COBRA json format
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::configuration::{default_lower_bound, default_upper_bound};
use crate::io::gpr_parse::{parse_optional_gpr, GprParseError};
use crate::metabolic_model::gene::{Gene, GeneActivity};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    #[serde(default)]
    genes: Vec<JsonGene>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compartments: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Metabolite entry of a COBRA json file, also used by plasmid definitions
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct JsonMetabolite {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) compartment: Option<String>,
    #[serde(default)]
    pub(crate) charge: Option<i32>,
    #[serde(default)]
    pub(crate) formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) annotation: Option<Value>,
}

/// Reaction entry of a COBRA json file, also used by plasmid definitions
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct JsonReaction {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
    pub(crate) metabolites: IndexMap<String, f64>,
    #[serde(default = "default_lower_bound")]
    pub(crate) lower_bound: f64,
    #[serde(default = "default_upper_bound")]
    pub(crate) upper_bound: f64,
    #[serde(default)]
    pub(crate) gene_reaction_rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) objective_coefficient: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) subsystem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
/// Notes and annotations are loosely structured, they are kept as their json text
fn value_to_string(value: Option<Value>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn string_to_value(text: &Option<String>) -> Option<Value> {
    text.as_ref()
        .map(|t| serde_json::from_str(t).unwrap_or_else(|_| Value::String(t.clone())))
}

impl From<JsonGene> for Gene {
    fn from(g: JsonGene) -> Self {
        Self {
            id: g.id,
            name: g.name,
            activity: GeneActivity::Active, // All genes start as active
            notes: value_to_string(g.notes),
            annotation: value_to_string(g.annotation),
        }
    }
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: value_to_string(m.notes),
            annotation: value_to_string(m.annotation),
        }
    }
}

impl From<&Gene> for JsonGene {
    fn from(g: &Gene) -> Self {
        Self {
            id: g.id.clone(),
            name: g.name.clone(),
            notes: string_to_value(&g.notes),
            annotation: string_to_value(&g.annotation),
        }
    }
}

impl From<&Metabolite> for JsonMetabolite {
    fn from(m: &Metabolite) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            compartment: m.compartment.clone(),
            charge: Some(m.charge),
            formula: m.formula.clone(),
            notes: string_to_value(&m.notes),
            annotation: string_to_value(&m.annotation),
        }
    }
}

impl JsonReaction {
    /// Convert into a model reaction, parsing the rule against (and extending) `genes`
    pub(crate) fn into_reaction(
        self,
        genes: &mut IndexMap<String, Gene>,
    ) -> Result<Reaction, JsonError> {
        let gpr = parse_optional_gpr(&self.gene_reaction_rule, genes).map_err(|source| {
            JsonError::GprParserError {
                reaction: self.id.clone(),
                source,
            }
        })?;
        Ok(ReactionBuilder::default()
            .id(self.id)
            .metabolites(self.metabolites)
            .name(self.name)
            .gpr(gpr)
            .lower_bound(self.lower_bound)
            .upper_bound(self.upper_bound)
            .subsystem(self.subsystem)
            .notes(value_to_string(self.notes))
            .annotation(value_to_string(self.annotation))
            .build()?)
    }
}

impl Model {
    /// Read a model from a COBRA json file
    ///
    /// Fields not used by the model (e.g. `annotation` of the model itself) are ignored.
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = fs::read_to_string(path.as_ref()).map_err(|err| {
            JsonError::UnableToRead(format!("{}: {}", path.as_ref().display(), err))
        })?;
        Model::from_json_str(&model_str)
    }

    /// Parse a model from a string holding a COBRA json model
    pub fn from_json_str(model_str: &str) -> Result<Model, JsonError> {
        let json_model = serde_json::from_str::<JsonModel>(model_str)
            .map_err(|err| JsonError::UnableToParse(err.to_string()))?;
        Model::from_json(json_model)
    }

    /// Write the model as a COBRA json file
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let model_string = serde_json::to_string_pretty(&self.to_json())?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut model = Model::new_empty();
        model.id = json_model.id;
        model.compartments = json_model.compartments;
        model.version = json_model.version;
        json_model
            .genes
            .into_iter()
            .for_each(|g| model.add_gene(Gene::from(g)));
        json_model
            .metabolites
            .into_iter()
            .for_each(|m| model.add_metabolite(Metabolite::from(m)));
        for rxn in json_model.reactions {
            let objective_coefficient = rxn.objective_coefficient;
            let reaction = rxn.into_reaction(&mut model.genes)?;
            if let Some(coef) = objective_coefficient.filter(|c| *c != 0.) {
                model.objective.insert(reaction.id.clone(), coef);
            }
            model.add_reaction(reaction);
        }
        debug!(
            "Read model {} with {} reactions, {} metabolites and {} genes",
            model.id.as_deref().unwrap_or("<unnamed>"),
            model.reactions.len(),
            model.metabolites.len(),
            model.genes.len()
        );
        Ok(model)
    }

    fn to_json(&self) -> JsonModel {
        let reactions = self
            .reactions
            .values()
            .map(|r| JsonReaction {
                id: r.id.clone(),
                name: r.name.clone(),
                metabolites: r.metabolites.clone(),
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_reaction_rule: r
                    .gpr
                    .as_ref()
                    .map(|rule| rule.to_string_id())
                    .unwrap_or_default(),
                objective_coefficient: self.objective.get(&r.id).copied(),
                subsystem: r.subsystem.clone(),
                notes: string_to_value(&r.notes),
                annotation: string_to_value(&r.annotation),
            })
            .collect();
        JsonModel {
            metabolites: self.metabolites.values().map(JsonMetabolite::from).collect(),
            reactions,
            genes: self.genes.values().map(JsonGene::from).collect(),
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to parse the GPR rule of reaction {reaction}: {source}")]
    GprParserError {
        reaction: String,
        source: GprParseError,
    },
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Unable to build reaction: {0}")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Serde json error: {0}")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to write to file: {0}")]
    UnableToWrite(#[from] std::io::Error),
}

// endregion Conversions

#[cfg(test)]
pub(crate) fn toy_model_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join("test_models")
        .join("toy_model.json")
}
