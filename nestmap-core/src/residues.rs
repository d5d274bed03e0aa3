use std::fmt::Display;

/// The kind of residues a sequence holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResidueType {
    /// A, C, G, T and N only
    Dna,
    /// A, C, G, U and N only
    Rna,
    /// Anything else
    Protein,
}

impl Display for ResidueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResidueType::Dna => write!(f, "dna"),
            ResidueType::Rna => write!(f, "rna"),
            ResidueType::Protein => write!(f, "protein"),
        }
    }
}

/// Guesses the residue type of a sequence fed in chunks.
///
/// Starts out assuming the sequence could be either DNA or RNA and narrows that down as
/// residues come in; once it has seen a residue outside both alphabets it settles on protein.
pub struct ResidueGuesser {
    maybe_dna: bool,
    maybe_rna: bool,
}

impl ResidueGuesser {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        ResidueGuesser {
            maybe_dna: true,
            maybe_rna: true,
        }
    }

    pub fn update(&mut self, residues: &[u8]) {
        for &byte in residues {
            if !self.maybe_dna && !self.maybe_rna {
                return;
            }
            match byte.to_ascii_uppercase() {
                b'A' | b'C' | b'G' | b'N' => {}
                b'T' => self.maybe_rna = false,
                b'U' => self.maybe_dna = false,
                _ => {
                    self.maybe_dna = false;
                    self.maybe_rna = false;
                }
            }
        }
    }

    /// An empty or ambiguous (A/C/G/N only) sequence counts as DNA.
    pub fn guess(&self) -> ResidueType {
        if self.maybe_dna {
            ResidueType::Dna
        } else if self.maybe_rna {
            ResidueType::Rna
        } else {
            ResidueType::Protein
        }
    }
}

/// Classify a residue buffer in one go.
pub fn classify(residues: &[u8]) -> ResidueType {
    let mut guesser = ResidueGuesser::new();
    guesser.update(residues);
    guesser.guess()
}

/// Complement lookup for DNA, preserving case. IUPAC ambiguity codes map to their complements;
/// anything unknown maps to itself.
const DNA_COMPLEMENT: [u8; 256] = {
    let mut arr = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        arr[i] = i as u8;
        i += 1;
    }
    let pairs: [(u8, u8); 8] = [
        (b'A', b'T'),
        (b'C', b'G'),
        (b'R', b'Y'),
        (b'K', b'M'),
        (b'B', b'V'),
        (b'D', b'H'),
        (b'S', b'S'),
        (b'W', b'W'),
    ];
    let mut j = 0;
    while j < pairs.len() {
        let (x, y) = pairs[j];
        arr[x as usize] = y;
        arr[y as usize] = x;
        arr[x.to_ascii_lowercase() as usize] = y.to_ascii_lowercase();
        arr[y.to_ascii_lowercase() as usize] = x.to_ascii_lowercase();
        j += 1;
    }
    arr[b'U' as usize] = b'A';
    arr[b'u' as usize] = b'a';
    arr
};

/// Same as [`DNA_COMPLEMENT`] except that A pairs with U.
const RNA_COMPLEMENT: [u8; 256] = {
    let mut arr = DNA_COMPLEMENT;
    arr[b'A' as usize] = b'U';
    arr[b'a' as usize] = b'u';
    arr
};

///
/// Reverse complement a residue buffer.
///
/// # Arguments
/// - residues: the forward strand residues
/// - residue_type: decides whether A pairs with T or with U
///
pub fn reverse_complement(residues: &[u8], residue_type: ResidueType) -> Vec<u8> {
    let table = match residue_type {
        ResidueType::Rna => &RNA_COMPLEMENT,
        _ => &DNA_COMPLEMENT,
    };
    residues.iter().rev().map(|&b| table[b as usize]).collect()
}
