//! The standard genetic code.

/// 2-bit nucleotide encoding in TCAG order, the order the genetic code table below is laid
/// out in. U reads as T. Anything else is flagged with 0xFF.
const NT_2BIT_ENCODING: [u8; 256] = {
    let mut arr = [0xFFu8; 256];
    arr[b'T' as usize] = 0b00;
    arr[b't' as usize] = 0b00;
    arr[b'U' as usize] = 0b00;
    arr[b'u' as usize] = 0b00;
    arr[b'C' as usize] = 0b01;
    arr[b'c' as usize] = 0b01;
    arr[b'A' as usize] = 0b10;
    arr[b'a' as usize] = 0b10;
    arr[b'G' as usize] = 0b11;
    arr[b'g' as usize] = 0b11;
    arr
};

/// NCBI translation table 1, indexed by `16 * first + 4 * second + third` in TCAG encoding.
const STANDARD_CODE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Marker for codons containing ambiguous residues.
pub const UNKNOWN_AMINO_ACID: u8 = b'X';

/// Translate one codon. Case is ignored; codons with anything but A/C/G/T/U translate to `X`.
#[inline]
pub fn translate_codon(codon: &[u8; 3]) -> u8 {
    let a = NT_2BIT_ENCODING[codon[0] as usize];
    let b = NT_2BIT_ENCODING[codon[1] as usize];
    let c = NT_2BIT_ENCODING[codon[2] as usize];
    if a == 0xFF || b == 0xFF || c == 0xFF {
        return UNKNOWN_AMINO_ACID;
    }
    STANDARD_CODE[(a as usize) * 16 + (b as usize) * 4 + c as usize]
}

/// Translate whole codons of `residues`; a trailing partial codon is ignored.
pub fn translate(residues: &[u8]) -> Vec<u8> {
    residues
        .chunks_exact(3)
        .map(|c| translate_codon(&[c[0], c[1], c[2]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(b"ATG", b'M')]
    #[case(b"atg", b'M')]
    #[case(b"TAA", b'*')]
    #[case(b"TAG", b'*')]
    #[case(b"TGA", b'*')]
    #[case(b"CTG", b'L')]
    #[case(b"TGG", b'W')]
    #[case(b"GGC", b'G')]
    #[case(b"AUG", b'M')]
    #[case(b"ANG", b'X')]
    fn test_translate_codon(#[case] codon: &[u8; 3], #[case] expected: u8) {
        assert_eq!(translate_codon(codon), expected);
    }

    #[rstest]
    fn test_translate_ignores_partial_codon() {
        assert_eq!(translate(b"atgtaactgaa"), b"M*L".to_vec());
    }
}
