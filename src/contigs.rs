//! The fixed, ordered set of contigs that make up a reference genome.

use std::collections::HashMap;
use std::sync::LazyLock;

use nonempty::NonEmpty;
use regex::Regex;

/// A pattern matching the canonical human chromosomes with or without the
/// `chr` prefix (`chr1`-`chr22`, `chrX`, `chrY`, `chrM`, and `chrMT`).
pub const CANONICAL_PATTERN: &str = r"^(chr)?([1-9]|1[0-9]|2[0-2]|X|Y|M|MT)$";

/// A compiled version of [`CANONICAL_PATTERN`].
pub static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CANONICAL_PATTERN).unwrap());

/// An error related to [`Contigs`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// No contigs were provided.
    Empty,

    /// A contig was provided more than once.
    Duplicate(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Empty => write!(f, "at least one contig is required"),
            Error::Duplicate(name) => write!(f, "duplicate contig: {name}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// An ordered, non-empty list of contig names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contigs {
    /// The contig names in reference order.
    names: NonEmpty<String>,

    /// A lookup from contig name to its rank within the reference.
    ranks: HashMap<String, usize>,
}

impl Contigs {
    /// Attempts to create a new [`Contigs`] from an ordered list of names.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Contigs;
    ///
    /// let contigs = Contigs::try_new(["chr1", "chr2", "chrX"])?;
    ///
    /// assert_eq!(contigs.len(), 3);
    /// assert_eq!(contigs.rank("chrX"), Some(2));
    /// assert!(!contigs.contains("chrUn_gl000220"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<Vec<String>>();
        let mut ranks = HashMap::with_capacity(names.len());

        for (rank, name) in names.iter().enumerate() {
            if ranks.insert(name.clone(), rank).is_some() {
                return Err(Error::Duplicate(name.clone()));
            }
        }

        let names = NonEmpty::from_vec(names).ok_or(Error::Empty)?;
        Ok(Self { names, ranks })
    }

    /// Attempts to create a new [`Contigs`] from every name that matches
    /// `pattern`.
    ///
    /// Names are kept in the order they are first seen and duplicates are
    /// collapsed, which makes this convenient for deriving a reference from
    /// the contigs that appear in a set of records.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::contigs::CANONICAL;
    /// use rangematch::Contigs;
    ///
    /// let seen = ["chr2", "chr1", "chr2", "chrUn_gl000220", "chrM"];
    /// let contigs = Contigs::try_from_matching(seen, &CANONICAL)?;
    ///
    /// assert_eq!(contigs.iter().collect::<Vec<_>>(), vec!["chr2", "chr1", "chrM"]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_matching<I, S>(names: I, pattern: &Regex) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = Vec::new();

        for name in names {
            let name = name.as_ref();

            if pattern.is_match(name) && !kept.iter().any(|k: &String| k == name) {
                kept.push(name.to_string());
            }
        }

        Self::try_new(kept)
    }

    /// Returns whether the contig is part of the reference.
    pub fn contains(&self, name: &str) -> bool {
        self.ranks.contains_key(name)
    }

    /// Gets the rank (0-based order) of a contig within the reference.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.ranks.get(name).copied()
    }

    /// Gets the number of contigs.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`: a reference has at least one contig.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the contig names in reference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
