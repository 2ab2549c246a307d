//! Costs of expressing a gene: nucleotides for transcription, amino acids and GTP for
//! translation, deoxynucleotides for replicating the plasmid
use derive_builder::Builder;
use indexmap::IndexMap;
use thiserror::Error;

/// Avogadro constant, 1/mol
pub const AVOGADRO: f64 = 6.02214076e23;

/// Standard genetic code, indexed by `16 * first + 4 * second + third` with T=0, C=1, A=2, G=3
const CODON_TABLE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Host metabolite ids consumed by transcription, per base of the coding strand
pub(crate) const NTP_IDS: [(char, &str); 4] =
    [('A', "atp_c"), ('C', "ctp_c"), ('G', "gtp_c"), ('T', "utp_c")];
/// Host metabolite ids consumed by replication, per base
pub(crate) const DNTP_IDS: [(char, &str); 4] = [
    ('A', "datp_c"),
    ('C', "dctp_c"),
    ('G', "dgtp_c"),
    ('T', "dttp_c"),
];
pub(crate) const PPI_ID: &str = "ppi_c";
pub(crate) const GTP_ID: &str = "gtp_c";
pub(crate) const GDP_ID: &str = "gdp_c";
pub(crate) const PI_ID: &str = "pi_c";
pub(crate) const H2O_ID: &str = "h2o_c";
pub(crate) const H_ID: &str = "h_c";

/// GTP hydrolysed per peptide bond, elongation factors Tu and G
pub(crate) const GTP_PER_RESIDUE: f64 = 2.;

/// Kinetic and physiological constants used when expressing a vector
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct ExpressionParameters {
    /// Enzyme degradation rate, 1/h
    pub kdeg_enzyme: f64,
    /// mRNA degradation rate, 1/h
    pub kdeg_mrna: f64,
    /// Turnover used for enzymes without a measured kcat, 1/h
    pub average_kcat: f64,
    /// Peptides made per transcript per hour
    pub translation_rate: f64,
    /// Cells in one gram of dry weight
    pub cells_per_gram: f64,
}

impl Default for ExpressionParameters {
    fn default() -> Self {
        ExpressionParameters {
            // 20 h enzyme half-life
            kdeg_enzyme: std::f64::consts::LN_2 / 20.,
            // 5 min mRNA half-life
            kdeg_mrna: 60. * std::f64::consts::LN_2 / 5.,
            average_kcat: 65. * 3600.,
            translation_rate: 300.,
            // 0.28 pg dry weight per cell
            cells_per_gram: 1. / 2.8e-13,
        }
    }
}

impl ExpressionParameters {
    /// mmol of plasmid per gram dry weight at the given copy number
    pub fn plasmid_mmol_per_gram(&self, copy_number: f64) -> f64 {
        copy_number * self.cells_per_gram / AVOGADRO * 1000.
    }
}

/// Counts of each base in a nucleotide sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NucleotideCounts {
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
    /// Ambiguous positions, not costed
    pub n: usize,
}

impl NucleotideCounts {
    pub fn of(sequence: &str) -> Self {
        sequence
            .bytes()
            .fold(NucleotideCounts::default(), |mut counts, base| {
                match base.to_ascii_uppercase() {
                    b'A' => counts.a += 1,
                    b'C' => counts.c += 1,
                    b'G' => counts.g += 1,
                    b'T' | b'U' => counts.t += 1,
                    _ => counts.n += 1,
                }
                counts
            })
    }

    /// Counts of the double stranded molecule, the sequence plus its complement
    pub fn double_stranded(&self) -> Self {
        NucleotideCounts {
            a: self.a + self.t,
            c: self.c + self.g,
            g: self.g + self.c,
            t: self.t + self.a,
            n: 2 * self.n,
        }
    }

    pub fn get(&self, base: char) -> usize {
        match base {
            'A' => self.a,
            'C' => self.c,
            'G' => self.g,
            'T' | 'U' => self.t,
            _ => self.n,
        }
    }

    /// Number of costed bases
    pub fn total(&self) -> usize {
        self.a + self.c + self.g + self.t
    }
}

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translate a coding sequence from its first base up to the first stop codon
///
/// Codons with ambiguous bases are skipped, a trailing partial codon is ignored.
pub fn translate(sequence: &str) -> Result<String, ExpressionError> {
    let mut protein = String::new();
    for codon in sequence.as_bytes().chunks_exact(3) {
        let index = match (
            base_index(codon[0]),
            base_index(codon[1]),
            base_index(codon[2]),
        ) {
            (Some(first), Some(second), Some(third)) => 16 * first + 4 * second + third,
            _ => continue,
        };
        match CODON_TABLE[index] {
            b'*' => break,
            residue => protein.push(residue as char),
        }
    }
    if protein.is_empty() {
        return Err(ExpressionError::EmptyProtein);
    }
    Ok(protein)
}

/// BiGG id of the host metabolite for an amino acid one letter code
pub fn amino_acid_metabolite(residue: char) -> Option<&'static str> {
    let id = match residue {
        'A' => "ala__L_c",
        'R' => "arg__L_c",
        'N' => "asn__L_c",
        'D' => "asp__L_c",
        'C' => "cys__L_c",
        'Q' => "gln__L_c",
        'E' => "glu__L_c",
        'G' => "gly_c",
        'H' => "his__L_c",
        'I' => "ile__L_c",
        'L' => "leu__L_c",
        'K' => "lys__L_c",
        'M' => "met__L_c",
        'F' => "phe__L_c",
        'P' => "pro__L_c",
        'S' => "ser__L_c",
        'T' => "thr__L_c",
        'W' => "trp__L_c",
        'Y' => "tyr__L_c",
        'V' => "val__L_c",
        _ => return None,
    };
    Some(id)
}

/// Residue counts of a protein, in order of first appearance
pub fn amino_acid_counts(protein: &str) -> IndexMap<char, usize> {
    let mut counts = IndexMap::new();
    for residue in protein.chars() {
        *counts.entry(residue).or_insert(0) += 1;
    }
    counts
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Coding sequence translates to an empty protein")]
    EmptyProtein,
}
