//! Small models shared by unit tests across the crate
use indexmap::IndexMap;

use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::{Gpr, GprOperatorType, Model};
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder};

pub(crate) fn reaction(id: &str, metabolites: &[(&str, f64)], gpr: Option<Gpr>, bounds: (f64, f64)) -> Reaction {
    ReactionBuilder::default()
        .id(id.to_string())
        .metabolites(
            metabolites
                .iter()
                .map(|(met, coef)| (met.to_string(), *coef))
                .collect::<IndexMap<_, _>>(),
        )
        .gpr(gpr)
        .lower_bound(bounds.0)
        .upper_bound(bounds.1)
        .build()
        .unwrap()
}

/// Uptake of `a`, two parallel conversions `a -> b` (R1 by g1, R2 by g2 capped at 4), and
/// a biomass drain of `b`; the optimum is 10.
///
/// g3 is in the model but controls nothing.
pub(crate) fn gpr_model() -> Model {
    let mut model = Model::new_empty();
    model.id = Some("gpr_model".to_string());
    for gene in ["g1", "g2", "g3"] {
        model.add_gene(Gene::new_active(gene));
    }
    model.add_reaction(reaction("A_in", &[("a", 1.)], None, (0., 10.)));
    model.add_reaction(reaction(
        "R1",
        &[("a", -1.), ("b", 1.)],
        Some(Gpr::new_gene_node("g1")),
        (0., 1000.),
    ));
    model.add_reaction(reaction(
        "R2",
        &[("a", -1.), ("b", 1.)],
        Some(Gpr::new_gene_node("g2")),
        (0., 4.),
    ));
    model.add_reaction(reaction("BIOMASS", &[("b", -1.)], None, (0., 1000.)));
    model.set_objective_coefficient("BIOMASS", 1.).unwrap();
    model
}

/// Uptake of `a` capped at 0.8, a transcription reaction for g1 producing the enzyme
/// `e1` which R1 needs to turn `a` into `b`, and a biomass drain of `b`.
///
/// g2 has no transcription reaction. R1 also carries the GPR `g1 or g2`, so deleting
/// either gene alone keeps it active.
pub(crate) fn transcription_model() -> Model {
    let mut model = Model::new_empty();
    model.id = Some("transcription_model".to_string());
    for gene in ["g1", "g2"] {
        model.add_gene(Gene::new_active(gene));
    }
    model.add_reaction(reaction("A_in", &[("a", 1.)], None, (0., 0.8)));
    model.add_reaction(reaction(
        "g1_transcription",
        &[("e1", 1.)],
        Some(Gpr::new_gene_node("g1")),
        (0., 1000.),
    ));
    model.add_reaction(reaction(
        "R1",
        &[("a", -1.), ("e1", -1.), ("b", 1.)],
        Gpr::join(
            [Gpr::new_gene_node("g1"), Gpr::new_gene_node("g2")],
            GprOperatorType::Or,
        ),
        (0., 1000.),
    ));
    model.add_reaction(reaction("BIOMASS", &[("b", -1.)], None, (0., 1000.)));
    model.set_objective_coefficient("BIOMASS", 1.).unwrap();
    model
}

/// Host for vector tests: uptake of `a_c` capped at 10, free supplies of the nucleotides and
/// methionine the test plasmid needs, sinks for their by-products, and a biomass drain of `a_c`.
pub(crate) fn vector_host_model() -> Model {
    let mut model = Model::new_empty();
    model.id = Some("vector_host".to_string());
    for id in [
        "a_c", "atp_c", "gtp_c", "ppi_c", "gdp_c", "met__L_c", "datp_c", "dttp_c",
    ] {
        model.add_metabolite(Metabolite::new_pseudo(id, id));
    }
    model.add_reaction(reaction("EX_a", &[("a_c", 1.)], None, (0., 10.)));
    model.add_reaction(reaction("ATPS", &[("atp_c", 1.)], None, (0., 1000.)));
    model.add_reaction(reaction("GTPS", &[("gtp_c", 1.)], None, (0., 1000.)));
    model.add_reaction(reaction("METS", &[("met__L_c", 1.)], None, (0., 1000.)));
    model.add_reaction(reaction(
        "DNTPS",
        &[("datp_c", 1.), ("dttp_c", 1.)],
        None,
        (0., 1000.),
    ));
    model.add_reaction(reaction("PPI_sink", &[("ppi_c", -1.)], None, (0., 1000.)));
    model.add_reaction(reaction("GDP_sink", &[("gdp_c", -1.)], None, (0., 1000.)));
    model.add_reaction(reaction("BIOMASS", &[("a_c", -1.)], None, (0., 1000.)));
    model.set_objective_coefficient("BIOMASS", 1.).unwrap();
    model
}
