use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CoordError;

///
/// Strand of an interval relative to the forward strand of its sequence.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Forward,
    Reverse,
}

impl Orientation {
    /// The opposite strand.
    pub fn flip(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }

    pub fn is_forward(self) -> bool {
        self == Orientation::Forward
    }

    /// On-disk encoding.
    pub fn as_i8(self) -> i8 {
        match self {
            Orientation::Forward => 1,
            Orientation::Reverse => -1,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            1 => Some(Orientation::Forward),
            -1 => Some(Orientation::Reverse),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Orientation {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "1" | "+1" => Ok(Orientation::Forward),
            "-" | "-1" => Ok(Orientation::Reverse),
            _ => Err(CoordError::InvalidOrientation(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("+", Orientation::Forward)]
    #[case("1", Orientation::Forward)]
    #[case("-", Orientation::Reverse)]
    #[case("-1", Orientation::Reverse)]
    fn test_parse_orientation(#[case] input: &str, #[case] expected: Orientation) {
        assert_eq!(input.parse::<Orientation>().unwrap(), expected);
    }

    #[rstest]
    fn test_parse_bad_orientation() {
        assert!("x".parse::<Orientation>().is_err());
    }

    #[rstest]
    fn test_flip() {
        assert_eq!(Orientation::Forward.flip(), Orientation::Reverse);
        assert_eq!(Orientation::Reverse.flip().flip(), Orientation::Reverse);
    }

    #[rstest]
    fn test_disk_encoding() {
        for ori in [Orientation::Forward, Orientation::Reverse] {
            assert_eq!(Orientation::from_i8(ori.as_i8()), Some(ori));
        }
        assert_eq!(Orientation::from_i8(0), None);
    }
}
