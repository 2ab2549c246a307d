//! Adding a [`Plasmid`] to a host [`Model`]
//!
//! Each plasmid gene gets a transcription reaction (`<gene>_transcription`, producing
//! `<gene>_mrna`) and a translation reaction (`<gene>_translation`, producing
//! `<gene>_peptide`). Each enzyme gets an assembly reaction (`<enzyme>_assembly`, producing
//! `<enzyme>_enzyme`) and every reaction it catalyzes consumes the enzyme in proportion to its
//! flux. Replicating the plasmid is charged to the objective reactions.
use std::collections::HashSet;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::configuration::default_upper_bound;
use crate::metabolic_model::gene::{Gene, GeneActivity};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::{Gpr, GprOperatorType, Model};
use crate::metabolic_model::reaction::{Reaction, ReactionActivity};
use crate::vector::expression::{
    amino_acid_counts, amino_acid_metabolite, translate, ExpressionError, ExpressionParameters,
    NucleotideCounts, DNTP_IDS, GDP_ID, GTP_ID, GTP_PER_RESIDUE, H2O_ID, H_ID, NTP_IDS, PI_ID,
    PPI_ID,
};
use crate::vector::plasmid::{Enzyme, ExpressedGene, Plasmid};

impl Model {
    /// Add a plasmid, its expression machinery and its replication cost to the model
    ///
    /// Everything is validated before the model is touched, so on error the model is unchanged.
    ///
    /// # Parameters
    /// - plasmid: Plasmid to add
    /// - copy_number: Plasmid copies per cell
    /// - parameters: Kinetic constants used for genes and enzymes without their own
    pub fn add_vector(
        &mut self,
        plasmid: &Plasmid,
        copy_number: f64,
        parameters: &ExpressionParameters,
    ) -> Result<(), VectorError> {
        let proteins = self.validate_vector(plasmid, copy_number)?;

        for metabolite in &plasmid.metabolites {
            self.add_metabolite(metabolite.clone());
        }
        for gene in &plasmid.genes {
            self.add_gene(Gene::new(
                gene.id.clone(),
                gene.name.clone(),
                GeneActivity::Active,
                None,
                None,
            ));
        }
        for reaction in &plasmid.reactions {
            self.add_reaction(reaction.clone());
        }

        for (gene, protein) in plasmid.genes.iter().zip(&proteins) {
            let mrna_kdeg = plasmid
                .mrna(&gene.id)
                .map(|mrna| mrna.kdeg)
                .unwrap_or(parameters.kdeg_mrna);
            self.add_transcription(gene);
            self.add_translation(gene, protein, mrna_kdeg / parameters.translation_rate);
        }

        let enzymes = plasmid.enzymes();
        for enzyme in &enzymes {
            self.add_assembly(enzyme);
        }
        for (reaction_id, isozymes) in &plasmid.coupling {
            self.couple(reaction_id, isozymes);
        }

        self.add_replication_burden(
            &plasmid.sequence,
            parameters.plasmid_mmol_per_gram(copy_number),
        );

        info!(
            "Added vector {} with {} genes and {} enzymes at copy number {}",
            plasmid.id,
            plasmid.genes.len(),
            enzymes.len(),
            copy_number
        );
        Ok(())
    }

    /// Check the plasmid against the model, returning the protein of every gene
    fn validate_vector(
        &self,
        plasmid: &Plasmid,
        copy_number: f64,
    ) -> Result<Vec<String>, VectorError> {
        if !(copy_number > 0. && copy_number.is_finite()) {
            return Err(VectorError::InvalidCopyNumber(copy_number));
        }

        let mut generated_reactions: Vec<String> = Vec::new();
        let mut generated_metabolites: Vec<String> = Vec::new();
        let mut metabolite_ids: HashSet<&str> =
            self.metabolites.keys().map(String::as_str).collect();
        let mut reaction_ids: HashSet<&str> = self.reactions.keys().map(String::as_str).collect();

        for metabolite in &plasmid.metabolites {
            if !metabolite_ids.insert(&metabolite.id) {
                return Err(VectorError::MetaboliteClash(metabolite.id.clone()));
            }
        }
        for reaction in &plasmid.reactions {
            if !reaction_ids.insert(&reaction.id) {
                return Err(VectorError::ReactionClash(reaction.id.clone()));
            }
        }
        for reaction in &plasmid.reactions {
            if let Some(missing) = reaction
                .metabolites
                .keys()
                .find(|id| !metabolite_ids.contains(id.as_str()))
            {
                return Err(VectorError::UnknownMetabolite {
                    reaction: reaction.id.clone(),
                    metabolite: missing.clone(),
                });
            }
        }

        let mut proteins = Vec::with_capacity(plasmid.genes.len());
        let mut gene_ids = HashSet::new();
        for gene in &plasmid.genes {
            if self.genes.contains_key(&gene.id) || !gene_ids.insert(gene.id.as_str()) {
                return Err(VectorError::GeneClash(gene.id.clone()));
            }
            generated_reactions.push(transcription_id(&gene.id));
            generated_reactions.push(translation_id(&gene.id));
            generated_metabolites.push(mrna_id(&gene.id));
            generated_metabolites.push(peptide_id(&gene.id));
            let protein = translate(&gene.sequence).map_err(|source| VectorError::Expression {
                gene: gene.id.clone(),
                source,
            })?;
            proteins.push(protein);
        }

        for (reaction_id, isozymes) in &plasmid.coupling {
            if !reaction_ids.contains(reaction_id.as_str()) {
                return Err(VectorError::UnknownReaction(reaction_id.clone()));
            }
            if isozymes.is_empty() {
                return Err(VectorError::EmptyCoupling(reaction_id.clone()));
            }
            let reversible = self
                .reaction(reaction_id)
                .or_else(|| plasmid.reactions.iter().find(|r| &r.id == reaction_id))
                .is_some_and(|r| !r.is_irreversible());
            if isozymes.len() > 1 || reversible {
                for enzyme in isozymes {
                    generated_reactions.push(arm_id(reaction_id, &enzyme.id));
                    if reversible {
                        generated_reactions.push(reverse_arm_id(reaction_id, &enzyme.id));
                    }
                }
            }
        }

        let enzymes = plasmid.enzymes();
        for enzyme in &enzymes {
            let conflicting = plasmid
                .coupling
                .values()
                .flatten()
                .any(|other| other.id == enzyme.id && other != *enzyme);
            if conflicting {
                return Err(VectorError::ConflictingEnzyme(enzyme.id.clone()));
            }
            if !(enzyme.kcat > 0. && enzyme.kcat.is_finite() && enzyme.kdeg >= 0.) {
                return Err(VectorError::InvalidKinetics(enzyme.id.clone()));
            }
            if enzyme.composition.is_empty() {
                return Err(VectorError::EmptyEnzyme(enzyme.id.clone()));
            }
            if let Some(gene) = enzyme
                .composition
                .keys()
                .find(|gene| !gene_ids.contains(gene.as_str()))
            {
                return Err(VectorError::UnknownGene {
                    enzyme: enzyme.id.clone(),
                    gene: gene.clone(),
                });
            }
            generated_reactions.push(assembly_id(&enzyme.id));
            generated_metabolites.push(enzyme_id(&enzyme.id));
        }

        for id in &generated_reactions {
            if !reaction_ids.insert(id) {
                return Err(VectorError::ReactionClash(id.clone()));
            }
        }
        for id in &generated_metabolites {
            if !metabolite_ids.insert(id) {
                return Err(VectorError::MetaboliteClash(id.clone()));
            }
        }
        Ok(proteins)
    }

    /// Add `coefficient` of a host metabolite to a stoichiometry, if the host has it
    fn add_host_cost(
        &self,
        stoichiometry: &mut IndexMap<String, f64>,
        metabolite_id: &str,
        coefficient: f64,
    ) -> bool {
        if coefficient == 0. {
            return false;
        }
        if !self.metabolites.contains_key(metabolite_id) {
            debug!("Host has no {}, leaving it out of the expression costs", metabolite_id);
            return false;
        }
        *stoichiometry
            .entry(metabolite_id.to_string())
            .or_insert(0.) += coefficient;
        true
    }

    fn add_transcription(&mut self, gene: &ExpressedGene) {
        let counts = NucleotideCounts::of(&gene.sequence);
        let mut stoichiometry = IndexMap::new();
        let mut incorporated = 0.;
        for (base, ntp) in NTP_IDS {
            let count = counts.get(base) as f64;
            if self.add_host_cost(&mut stoichiometry, ntp, -count) {
                incorporated += count;
            }
        }
        self.add_host_cost(&mut stoichiometry, PPI_ID, incorporated);

        let mrna = mrna_id(&gene.id);
        stoichiometry.insert(mrna.clone(), 1.);
        self.add_metabolite(Metabolite::new_pseudo(&mrna, &format!("{} mRNA", gene.id)));
        self.add_reaction(expression_reaction(
            transcription_id(&gene.id),
            format!("Transcription of {}", gene.id),
            stoichiometry,
            Some(Gpr::new_gene_node(&gene.id)),
        ));
    }

    fn add_translation(&mut self, gene: &ExpressedGene, protein: &str, mrna_per_peptide: f64) {
        let mut stoichiometry = IndexMap::new();
        stoichiometry.insert(mrna_id(&gene.id), -mrna_per_peptide);
        for (residue, count) in amino_acid_counts(protein) {
            match amino_acid_metabolite(residue) {
                Some(amino_acid) => {
                    self.add_host_cost(&mut stoichiometry, amino_acid, -(count as f64));
                }
                None => warn!("Unknown residue {} in the product of {}", residue, gene.id),
            }
        }
        let gtp = GTP_PER_RESIDUE * protein.len() as f64;
        self.add_host_cost(&mut stoichiometry, GTP_ID, -gtp);
        self.add_host_cost(&mut stoichiometry, H2O_ID, -gtp);
        self.add_host_cost(&mut stoichiometry, GDP_ID, gtp);
        self.add_host_cost(&mut stoichiometry, PI_ID, gtp);
        self.add_host_cost(&mut stoichiometry, H_ID, gtp);

        let peptide = peptide_id(&gene.id);
        stoichiometry.insert(peptide.clone(), 1.);
        self.add_metabolite(Metabolite::new_pseudo(
            &peptide,
            &format!("{} peptide", gene.id),
        ));
        self.add_reaction(expression_reaction(
            translation_id(&gene.id),
            format!("Translation of {}", gene.id),
            stoichiometry,
            Some(Gpr::new_gene_node(&gene.id)),
        ));
    }

    fn add_assembly(&mut self, enzyme: &Enzyme) {
        let mut stoichiometry: IndexMap<String, f64> = enzyme
            .composition
            .iter()
            .map(|(gene, count)| (peptide_id(gene), -(*count as f64)))
            .collect();
        let complex = enzyme_id(&enzyme.id);
        stoichiometry.insert(complex.clone(), 1.);
        self.add_metabolite(Metabolite::new_pseudo(&complex, &enzyme.id));
        self.add_reaction(expression_reaction(
            assembly_id(&enzyme.id),
            format!("Assembly of {}", enzyme.id),
            stoichiometry,
            enzyme_gpr(enzyme),
        ));
    }

    /// Make a reaction consume its enzymes
    ///
    /// A single enzyme on an irreversible reaction is coupled in place. Otherwise the reaction
    /// is replaced by one arm per enzyme and direction, carrying its objective coefficient.
    fn couple(&mut self, reaction_id: &str, isozymes: &[Enzyme]) {
        let Some(reaction) = self.reactions.get(reaction_id) else {
            return;
        };
        if isozymes.len() == 1 && reaction.is_irreversible() {
            let enzyme = &isozymes[0];
            if let Some(reaction) = self.reactions.get_mut(reaction_id) {
                *reaction
                    .metabolites
                    .entry(enzyme_id(&enzyme.id))
                    .or_insert(0.) -= enzyme.cost_per_flux();
                reaction.gpr = enzyme_gpr(enzyme);
            }
            return;
        }

        let coefficient = self.objective.get(reaction_id).copied();
        let Ok(original) = self.remove_reaction(reaction_id) else {
            return;
        };
        let single = isozymes.len() == 1;
        if !single && (original.lower_bound > 0. || original.upper_bound < 0.) {
            warn!(
                "Reaction {} has a forced flux which is not kept across its {} isozyme arms",
                reaction_id,
                isozymes.len()
            );
        }
        for enzyme in isozymes {
            let mut forward = original.clone();
            forward.id = arm_id(reaction_id, &enzyme.id);
            forward.lower_bound = if single { original.lower_bound.max(0.) } else { 0. };
            forward.upper_bound = original.upper_bound.max(0.);
            self.add_arm(forward, enzyme, coefficient);

            if !original.is_irreversible() {
                let mut reverse = original.clone();
                reverse.id = reverse_arm_id(reaction_id, &enzyme.id);
                reverse.metabolites.values_mut().for_each(|c| *c = -*c);
                reverse.lower_bound = if single {
                    (-original.upper_bound).max(0.)
                } else {
                    0.
                };
                reverse.upper_bound = -original.lower_bound;
                self.add_arm(reverse, enzyme, coefficient.map(|c| -c));
            }
        }
    }

    fn add_arm(&mut self, mut arm: Reaction, enzyme: &Enzyme, coefficient: Option<f64>) {
        *arm.metabolites.entry(enzyme_id(&enzyme.id)).or_insert(0.) -= enzyme.cost_per_flux();
        arm.gpr = enzyme_gpr(enzyme);
        arm.activity = ReactionActivity::Active;
        arm.activity_set = false;
        let id = arm.id.clone();
        self.add_reaction(arm);
        if let Some(coefficient) = coefficient {
            self.objective.insert(id, coefficient);
        }
    }

    /// Charge the deoxynucleotides of both plasmid strands to every objective reaction
    fn add_replication_burden(&mut self, sequence: &str, plasmid_mmol_per_gram: f64) {
        if sequence.is_empty() {
            debug!("Vector has no sequence, no replication burden added");
            return;
        }
        let counts = NucleotideCounts::of(sequence).double_stranded();
        let mut burden = IndexMap::new();
        let mut incorporated = 0.;
        for (base, dntp) in DNTP_IDS {
            let amount = plasmid_mmol_per_gram * counts.get(base) as f64;
            if self.add_host_cost(&mut burden, dntp, -amount) {
                incorporated += amount;
            }
        }
        self.add_host_cost(&mut burden, PPI_ID, incorporated);

        let objective_ids: Vec<String> = self.objective.keys().cloned().collect();
        for id in objective_ids {
            if let Some(reaction) = self.reactions.get_mut(&id) {
                for (metabolite, coefficient) in &burden {
                    *reaction
                        .metabolites
                        .entry(metabolite.clone())
                        .or_insert(0.) += coefficient;
                }
            }
        }
    }
}

fn expression_reaction(
    id: String,
    name: String,
    metabolites: IndexMap<String, f64>,
    gpr: Option<Gpr>,
) -> Reaction {
    Reaction {
        id,
        metabolites,
        name: Some(name),
        gpr,
        lower_bound: 0.,
        upper_bound: default_upper_bound(),
        subsystem: Some("Expression".to_string()),
        notes: None,
        annotation: None,
        activity: ReactionActivity::Active,
        activity_set: false,
    }
}

fn enzyme_gpr(enzyme: &Enzyme) -> Option<Gpr> {
    Gpr::join(
        enzyme.composition.keys().map(|gene| Gpr::new_gene_node(gene)),
        GprOperatorType::And,
    )
}

fn transcription_id(gene_id: &str) -> String {
    format!("{}_transcription", gene_id)
}

fn translation_id(gene_id: &str) -> String {
    format!("{}_translation", gene_id)
}

fn mrna_id(gene_id: &str) -> String {
    format!("{}_mrna", gene_id)
}

fn peptide_id(gene_id: &str) -> String {
    format!("{}_peptide", gene_id)
}

fn assembly_id(enzyme_id: &str) -> String {
    format!("{}_assembly", enzyme_id)
}

fn enzyme_id(enzyme_id: &str) -> String {
    format!("{}_enzyme", enzyme_id)
}

fn arm_id(reaction_id: &str, enzyme_id: &str) -> String {
    format!("{}_{}", reaction_id, enzyme_id)
}

fn reverse_arm_id(reaction_id: &str, enzyme_id: &str) -> String {
    format!("{}_{}_reverse", reaction_id, enzyme_id)
}

/// Errors raised while adding a vector to a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error("Copy number must be positive, got {0}")]
    InvalidCopyNumber(f64),
    #[error("Reaction {0} is already present in the model")]
    ReactionClash(String),
    #[error("Metabolite {0} is already present in the model")]
    MetaboliteClash(String),
    #[error("Gene {0} is already present in the model")]
    GeneClash(String),
    #[error("Reaction {reaction} uses metabolite {metabolite}, found in neither the plasmid nor the model")]
    UnknownMetabolite { reaction: String, metabolite: String },
    #[error("Coupled reaction {0} is in neither the plasmid nor the model")]
    UnknownReaction(String),
    #[error("Reaction {0} is coupled to no enzyme")]
    EmptyCoupling(String),
    #[error("Enzyme {enzyme} is made of gene {gene}, which the plasmid does not carry")]
    UnknownGene { enzyme: String, gene: String },
    #[error("Enzyme {0} has no subunits")]
    EmptyEnzyme(String),
    #[error("Enzyme {0} needs a positive kcat and a non-negative kdeg")]
    InvalidKinetics(String),
    #[error("Enzyme {0} is defined more than once with different parameters")]
    ConflictingEnzyme(String),
    #[error("Unable to express gene {gene}: {source}")]
    Expression {
        gene: String,
        source: ExpressionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essentiality::{KnockoutStrategy, TranscriptionKnockout};
    use crate::metabolic_model::metabolite::Metabolite;
    use crate::test_models::{reaction, vector_host_model};

    fn gene() -> ExpressedGene {
        // Translates to MM
        ExpressedGene::new("pg", Some("converter"), "ATGATGTAA")
    }

    fn e1() -> Enzyme {
        Enzyme::new("E1", 10., 1., &[("pg", 1)])
    }

    fn plasmid(coupling: &[(&str, Vec<Enzyme>)]) -> Plasmid {
        let mut plasmid = Plasmid::new(
            "pTest",
            "ATATGATGTAA",
            vec![gene()],
            vec![Metabolite::new_pseudo("x_c", "product")],
            vec![
                reaction("CONV", &[("a_c", -1.), ("x_c", 1.)], None, (0., 1000.)),
                reaction("REV", &[("a_c", -1.), ("x_c", 1.)], None, (-5., 5.)),
                reaction("EX_x", &[("x_c", -1.)], None, (0., 1000.)),
            ],
            coupling
                .iter()
                .map(|(id, enzymes)| (id.to_string(), enzymes.clone()))
                .collect(),
        );
        plasmid.build_default_mrna(ExpressionParameters::default().kdeg_mrna);
        plasmid
    }

    #[test]
    fn expression_reactions() {
        let mut model = vector_host_model();
        let parameters = ExpressionParameters::default();
        model
            .add_vector(&plasmid(&[("CONV", vec![e1()])]), 5., &parameters)
            .unwrap();
        assert!(model.gene("pg").unwrap().is_active());
        assert!(model.metabolites.contains_key("x_c"));

        let transcription = &model.reactions["pg_transcription"].metabolites;
        assert_eq!(transcription["atp_c"], -4.);
        assert_eq!(transcription["gtp_c"], -2.);
        // utp_c is not in the host, so only the costed bases release pyrophosphate
        assert!(!transcription.contains_key("utp_c"));
        assert_eq!(transcription["ppi_c"], 6.);
        assert_eq!(transcription["pg_mrna"], 1.);

        let translation = &model.reactions["pg_translation"].metabolites;
        assert!((translation["pg_mrna"] + parameters.kdeg_mrna / 300.).abs() < 1e-12);
        assert_eq!(translation["met__L_c"], -2.);
        assert_eq!(translation["gtp_c"], -4.);
        assert_eq!(translation["gdp_c"], 4.);
        assert!(!translation.contains_key("pi_c"));
        assert_eq!(translation["pg_peptide"], 1.);

        let assembly = &model.reactions["E1_assembly"];
        assert_eq!(assembly.metabolites["pg_peptide"], -1.);
        assert_eq!(assembly.metabolites["E1_enzyme"], 1.);
        assert_eq!(assembly.gpr.as_ref().unwrap().to_string(), "pg");

        let conv = &model.reactions["CONV"];
        assert!((conv.metabolites["E1_enzyme"] + 0.1).abs() < 1e-12);
        assert_eq!(conv.gene_ids(), vec!["pg".to_string()]);

        // Both strands of 5 A, 4 T and 2 G
        let amount = parameters.plasmid_mmol_per_gram(5.);
        let biomass = &model.reactions["BIOMASS"].metabolites;
        assert!((biomass["datp_c"] + 9. * amount).abs() < 1e-20);
        assert!((biomass["dttp_c"] + 9. * amount).abs() < 1e-20);
        assert!((biomass["ppi_c"] - 18. * amount).abs() < 1e-20);
        assert!(!biomass.contains_key("dgtp_c"));
    }

    #[test]
    fn expressed_pathway_is_solvable_and_screenable() {
        let mut model = vector_host_model();
        model
            .add_vector(
                &plasmid(&[("CONV", vec![e1()])]),
                5.,
                &ExpressionParameters::default(),
            )
            .unwrap();
        assert!((model.slim_optimize().unwrap() - 10.).abs() < 1e-4);

        // Leave CONV as the only route to x_c
        model.set_reaction_bounds("REV", 0., 0.).unwrap();
        model.objective.clear();
        model.set_objective_coefficient("EX_x", 1.).unwrap();
        assert!((model.slim_optimize().unwrap() - 10.).abs() < 1e-4);

        let solver = model.solver.clone();
        let outcome = TranscriptionKnockout::default().knock_out(&mut model, "pg", &solver);
        assert!(outcome.growth().unwrap().abs() < 1e-4);
        assert_eq!(model.reactions["pg_transcription"].upper_bound, 1000.);
    }

    #[test]
    fn isozymes_and_reversible_reactions_are_split() {
        let e2 = Enzyme::new("E2", 20., 1., &[("pg", 2)]);
        let mut model = vector_host_model();
        model
            .add_vector(
                &plasmid(&[
                    ("CONV", vec![e1(), e2.clone()]),
                    ("REV", vec![e1()]),
                    ("BIOMASS", vec![e1(), e2]),
                ]),
                1.,
                &ExpressionParameters::default(),
            )
            .unwrap();
        assert!(model.reaction("CONV").is_none());
        assert!((model.reactions["CONV_E1"].metabolites["E1_enzyme"] + 0.1).abs() < 1e-12);
        assert!((model.reactions["CONV_E2"].metabolites["E2_enzyme"] + 0.05).abs() < 1e-12);
        assert!(model.reaction("CONV_E1_reverse").is_none());
        assert_eq!(
            model.reactions["E2_assembly"].metabolites["pg_peptide"],
            -2.
        );

        let forward = &model.reactions["REV_E1"];
        assert_eq!((forward.lower_bound, forward.upper_bound), (0., 5.));
        let reverse = &model.reactions["REV_E1_reverse"];
        assert_eq!((reverse.lower_bound, reverse.upper_bound), (0., 5.));
        assert_eq!(reverse.metabolites["a_c"], 1.);
        assert_eq!(reverse.metabolites["x_c"], -1.);
        assert!((reverse.metabolites["E1_enzyme"] + 0.1).abs() < 1e-12);

        // The objective moves to the arms of the split biomass reaction
        assert!(model.reaction("BIOMASS").is_none());
        assert_eq!(model.objective.get("BIOMASS_E1"), Some(&1.));
        assert_eq!(model.objective.get("BIOMASS_E2"), Some(&1.));
        assert!(model.reactions["BIOMASS_E2"]
            .metabolites
            .contains_key("datp_c"));
        assert!((model.slim_optimize().unwrap() - 10.).abs() < 1e-4);
    }

    #[test]
    fn invalid_vectors_leave_model_unchanged() {
        let parameters = ExpressionParameters::default();
        let host = vector_host_model();
        let check = |plasmid: Plasmid, copy_number: f64, expected: VectorError| {
            let mut model = host.clone();
            assert_eq!(
                model.add_vector(&plasmid, copy_number, &parameters),
                Err(expected)
            );
            assert_eq!(model.reactions.len(), host.reactions.len());
            assert_eq!(model.metabolites.len(), host.metabolites.len());
            assert!(model.genes.is_empty());
        };

        check(plasmid(&[]), 0., VectorError::InvalidCopyNumber(0.));

        let mut clash = plasmid(&[]);
        clash
            .reactions
            .push(reaction("EX_a", &[("a_c", 1.)], None, (0., 1.)));
        check(clash, 1., VectorError::ReactionClash("EX_a".to_string()));

        let mut unknown = plasmid(&[]);
        unknown
            .reactions
            .push(reaction("Y", &[("y_c", 1.)], None, (0., 1.)));
        check(
            unknown,
            1.,
            VectorError::UnknownMetabolite {
                reaction: "Y".to_string(),
                metabolite: "y_c".to_string(),
            },
        );

        check(
            plasmid(&[("CONV", vec![Enzyme::new("E3", 1., 1., &[("other", 1)])])]),
            1.,
            VectorError::UnknownGene {
                enzyme: "E3".to_string(),
                gene: "other".to_string(),
            },
        );
        check(
            plasmid(&[("CONV", vec![Enzyme::new("E1", 0., 1., &[("pg", 1)])])]),
            1.,
            VectorError::InvalidKinetics("E1".to_string()),
        );
        check(
            plasmid(&[("MISSING", vec![e1()])]),
            1.,
            VectorError::UnknownReaction("MISSING".to_string()),
        );

        let mut stop = plasmid(&[]);
        stop.genes[0].sequence = "TAAATG".to_string();
        check(
            stop,
            1.,
            VectorError::Expression {
                gene: "pg".to_string(),
                source: ExpressionError::EmptyProtein,
            },
        );

        let mut generated = host.clone();
        generated.add_reaction(reaction("pg_transcription", &[], None, (0., 1.)));
        assert_eq!(
            generated.add_vector(&plasmid(&[]), 1., &parameters),
            Err(VectorError::ReactionClash("pg_transcription".to_string()))
        );
    }
}
