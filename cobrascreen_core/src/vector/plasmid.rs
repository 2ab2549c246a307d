//! Description of a plasmid: its sequence, the genes it expresses, the reactions those genes
//! catalyze, and the enzymes coupling them
use indexmap::IndexMap;

use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

/// A gene carried on the plasmid
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressedGene {
    pub id: String,
    pub name: Option<String>,
    /// Coding sequence, starting at the start codon
    pub sequence: String,
}

impl ExpressedGene {
    pub fn new(id: &str, name: Option<&str>, sequence: &str) -> Self {
        ExpressedGene {
            id: id.to_string(),
            name: name.map(str::to_string),
            sequence: sequence.to_ascii_uppercase(),
        }
    }
}

/// An enzyme made of plasmid gene products
#[derive(Clone, Debug, PartialEq)]
pub struct Enzyme {
    pub id: String,
    /// Turnover number, 1/h
    pub kcat: f64,
    /// Degradation rate, 1/h
    pub kdeg: f64,
    /// Gene id to number of subunits of its peptide
    pub composition: IndexMap<String, u32>,
}

impl Enzyme {
    pub fn new(id: &str, kcat: f64, kdeg: f64, composition: &[(&str, u32)]) -> Self {
        Enzyme {
            id: id.to_string(),
            kcat,
            kdeg,
            composition: composition
                .iter()
                .map(|(gene, count)| (gene.to_string(), *count))
                .collect(),
        }
    }

    /// Enzyme consumed per unit of flux through a reaction it catalyzes
    pub fn cost_per_flux(&self) -> f64 {
        self.kdeg / self.kcat
    }
}

/// Transcript of a plasmid gene
#[derive(Clone, Debug, PartialEq)]
pub struct Mrna {
    pub gene_id: String,
    /// Degradation rate, 1/h
    pub kdeg: f64,
}

/// A plasmid to be added to a host model
#[derive(Clone, Debug, Default)]
pub struct Plasmid {
    pub id: String,
    /// Full plasmid sequence, replicated at every division
    pub sequence: String,
    pub genes: Vec<ExpressedGene>,
    /// Metabolites introduced by the plasmid, absent from the host
    pub metabolites: Vec<Metabolite>,
    /// Reactions introduced by the plasmid, which may use host metabolites
    pub reactions: Vec<Reaction>,
    /// Reaction id to the enzymes (isozymes) catalyzing it
    pub coupling: IndexMap<String, Vec<Enzyme>>,
    pub mrnas: Vec<Mrna>,
}

impl Plasmid {
    pub fn new(
        id: &str,
        sequence: &str,
        genes: Vec<ExpressedGene>,
        metabolites: Vec<Metabolite>,
        reactions: Vec<Reaction>,
        coupling: IndexMap<String, Vec<Enzyme>>,
    ) -> Self {
        Plasmid {
            id: id.to_string(),
            sequence: sequence.to_ascii_uppercase(),
            genes,
            metabolites,
            reactions,
            coupling,
            mrnas: Vec::new(),
        }
    }

    /// One transcript per gene, all degraded at `kdeg`
    pub fn build_default_mrna(&mut self, kdeg: f64) {
        self.mrnas = self
            .genes
            .iter()
            .map(|gene| Mrna {
                gene_id: gene.id.clone(),
                kdeg,
            })
            .collect();
    }

    /// Transcript of a gene, if one was built
    pub fn mrna(&self, gene_id: &str) -> Option<&Mrna> {
        self.mrnas.iter().find(|mrna| mrna.gene_id == gene_id)
    }

    /// Every distinct enzyme of the coupling, in order of first appearance
    pub fn enzymes(&self) -> Vec<&Enzyme> {
        let mut enzymes: IndexMap<&str, &Enzyme> = IndexMap::new();
        for enzyme in self.coupling.values().flatten() {
            enzymes.entry(enzyme.id.as_str()).or_insert(enzyme);
        }
        enzymes.into_values().collect()
    }

    /// Backbone followed by each insert wrapped in its forward and reverse primers
    pub fn assemble_sequence(backbone: &str, inserts: &[(&str, &ExpressedGene, &str)]) -> String {
        let mut sequence = backbone.to_ascii_uppercase();
        for (forward, gene, reverse) in inserts {
            sequence.push_str(&forward.to_ascii_uppercase());
            sequence.push_str(&gene.sequence);
            sequence.push_str(&reverse.to_ascii_uppercase());
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble() {
        let als = ExpressedGene::new("EBA_als", Some("acetolactate synthase"), "atgaaa");
        let ar = ExpressedGene::new("EBA_ar", None, "ATGCCC");
        let sequence =
            Plasmid::assemble_sequence("gg", &[("TT", &als, "AA"), ("C", &ar, "G")]);
        assert_eq!(sequence, "GGTTATGAAAAACATGCCCG");
    }

    #[test]
    fn default_mrna_and_enzymes() {
        let genes = vec![
            ExpressedGene::new("g1", None, "ATG"),
            ExpressedGene::new("g2", None, "ATG"),
        ];
        let shared = Enzyme::new("E2", 10., 1., &[("g2", 4)]);
        let mut coupling = IndexMap::new();
        coupling.insert(
            "R1".to_string(),
            vec![Enzyme::new("E1", 10., 1., &[("g1", 3)])],
        );
        coupling.insert("R2".to_string(), vec![shared.clone()]);
        coupling.insert("R3".to_string(), vec![shared]);
        let mut plasmid = Plasmid::new("p", "ATG", genes, vec![], vec![], coupling);
        plasmid.build_default_mrna(2.);
        assert_eq!(plasmid.mrnas.len(), 2);
        assert_eq!(plasmid.mrna("g2").unwrap().kdeg, 2.);
        assert!(plasmid.mrna("g3").is_none());
        let ids: Vec<&str> = plasmid.enzymes().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E2"]);
        assert!((plasmid.enzymes()[0].cost_per_flux() - 0.1).abs() < 1e-12);
    }
}
