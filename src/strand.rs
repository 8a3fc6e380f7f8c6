//! The strand upon which an interval is located.

use std::str::FromStr;

/// An error related to the parsing of a strand.
#[derive(Debug, Eq, PartialEq)]
pub struct ParseStrandError(String);

impl std::fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse strand error: {} is not a valid strand", self.0)
    }
}

impl std::error::Error for ParseStrandError {}

/// The strand of an interval.
///
/// Peak calls and blacklist regions are very often unstranded, so
/// [`Strand::Unknown`] is the default.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Strand {
    /// The positive strand (`+`).
    Positive,
    /// The negative strand (`-`).
    Negative,
    /// No strand information (`.` or `*`).
    #[default]
    Unknown,
}

impl Strand {
    /// Returns whether two strands are compatible for the purposes of a
    /// strand-aware comparison.
    ///
    /// An [`Strand::Unknown`] strand is compatible with every strand.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Strand;
    ///
    /// assert!(Strand::Positive.is_compatible_with(Strand::Positive));
    /// assert!(Strand::Positive.is_compatible_with(Strand::Unknown));
    /// assert!(!Strand::Positive.is_compatible_with(Strand::Negative));
    /// ```
    pub fn is_compatible_with(self, other: Strand) -> bool {
        match (self, other) {
            (Strand::Unknown, _) | (_, Strand::Unknown) => true,
            (a, b) => a == b,
        }
    }
}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Positive),
            "-" => Ok(Self::Negative),
            "." | "*" => Ok(Self::Unknown),
            c => Err(ParseStrandError(c.to_string())),
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Positive => write!(f, "+"),
            Strand::Negative => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_strand_from_str() -> Result<(), Box<dyn std::error::Error>> {
        let strand: Strand = "+".parse()?;
        assert_eq!(strand, Strand::Positive);

        let strand: Strand = "-".parse()?;
        assert_eq!(strand, Strand::Negative);

        let strand: Strand = ".".parse()?;
        assert_eq!(strand, Strand::Unknown);

        let strand: Strand = "*".parse()?;
        assert_eq!(strand, Strand::Unknown);

        let err = "?".parse::<Strand>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse strand error: ? is not a valid strand"
        );

        Ok(())
    }

    #[test]
    fn test_strand_display() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(Strand::Positive.to_string(), "+");
        assert_eq!(Strand::Negative.to_string(), "-");
        assert_eq!(Strand::Unknown.to_string(), ".");
        Ok(())
    }

    #[test]
    fn test_strand_compatibility() {
        assert!(Strand::Negative.is_compatible_with(Strand::Negative));
        assert!(Strand::Unknown.is_compatible_with(Strand::Negative));
        assert!(!Strand::Negative.is_compatible_with(Strand::Positive));
    }
}
