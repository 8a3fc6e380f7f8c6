//! A 0-based, half-open genomic interval with optional covariates.
//!
//! ```text
//! ================ chr1 ===============
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 |
//! -------------------------------------
//! |   |   | X | X | X | X |   |   |   |  <= chr1:2-6
//! |   |   |   |   |   |   | X | X |   |  <= chr1:6-8
//! ```
//!
//! The two intervals above share the boundary at `6` but do not share a base,
//! so they do _not_ overlap.
//!
//! An interval with `start == end` is allowed (it is a zero-width interval),
//! but it contains no bases and, consequently, overlaps nothing.
//!
//! ## Parsing Intervals
//!
//! Intervals can be parsed from strings in the form `<contig>:<start>-<end>`
//! (e.g., `chr1:100-200`), optionally followed by a strand (e.g.,
//! `chr1:100-200:+`). Parsed intervals carry no name and no covariates.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::Strand;

pub mod builder;

pub use builder::Builder;

/// An error related to an interval.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The start position is greater than the end position.
    StartGreaterThanEnd(u64, u64),

    /// A covariate was assigned a value that is not finite.
    NonFiniteCovariate(String, f64),

    /// Could not parse an interval from the given value.
    Parse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::StartGreaterThanEnd(start, end) => write!(
                f,
                "start position ({start}) cannot be greater than the end position ({end})"
            ),
            Error::NonFiniteCovariate(name, value) => {
                write!(f, "covariate `{name}` has a non-finite value: {value}")
            }
            Error::Parse(value) => write!(f, "could not parse interval from the value: {value}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// An error raised when an interval does not carry a requested covariate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MissingCovariateError {
    /// The name of the requested covariate.
    covariate: String,

    /// The interval that was missing the covariate (as displayed).
    interval: String,
}

impl MissingCovariateError {
    /// Gets the name of the covariate that was missing.
    pub fn covariate(&self) -> &str {
        &self.covariate
    }

    /// Gets the displayed form of the interval missing the covariate.
    pub fn interval(&self) -> &str {
        &self.interval
    }
}

impl std::fmt::Display for MissingCovariateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "interval {} has no value for covariate `{}`",
            self.interval, self.covariate
        )
    }
}

impl std::error::Error for MissingCovariateError {}

/// A 0-based, half-open interval on a named contig.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    /// The contig.
    contig: String,

    /// The start position (inclusive).
    start: u64,

    /// The end position (exclusive).
    end: u64,

    /// The strand.
    strand: Strand,

    /// An optional identifier.
    name: Option<String>,

    /// The covariate values keyed by covariate name.
    covariates: BTreeMap<String, f64>,
}

impl Interval {
    /// Attempts to create a new, unstranded [`Interval`] with no name and no
    /// covariates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Interval;
    ///
    /// let interval = Interval::try_new("chr1", 100, 200)?;
    /// assert_eq!(interval.len(), 100);
    ///
    /// assert!(Interval::try_new("chr1", 200, 100).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(contig: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(Error::StartGreaterThanEnd(start, end));
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
            strand: Strand::default(),
            name: None,
            covariates: BTreeMap::new(),
        })
    }

    /// Sets the strand of the interval.
    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    /// Sets the name of the interval.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attempts to set a covariate on the interval.
    ///
    /// Setting a covariate that already exists replaces the old value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Interval;
    ///
    /// let interval = Interval::try_new("chr1", 100, 200)?.try_with_covariate("psi", 0.5)?;
    /// assert_eq!(interval.covariate("psi")?, 0.5);
    ///
    /// let err = Interval::try_new("chr1", 100, 200)?
    ///     .try_with_covariate("psi", f64::NAN)
    ///     .unwrap_err();
    /// assert_eq!(err.to_string(), "covariate `psi` has a non-finite value: NaN");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_with_covariate(mut self, name: impl Into<String>, value: f64) -> Result<Self> {
        let name = name.into();

        if !value.is_finite() {
            return Err(Error::NonFiniteCovariate(name, value));
        }

        self.covariates.insert(name, value);
        Ok(self)
    }

    /// Gets the contig.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the start position (inclusive).
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Gets the end position (exclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the name, if one was provided.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Gets the number of bases covered by the interval.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns whether the interval covers no bases.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Gets all of the covariates for this interval.
    pub fn covariates(&self) -> &BTreeMap<String, f64> {
        &self.covariates
    }

    /// Looks up a covariate by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Interval;
    ///
    /// let interval = Interval::try_new("chr1", 100, 200)?;
    /// let err = interval.covariate("psi").unwrap_err();
    ///
    /// assert_eq!(
    ///     err.to_string(),
    ///     "interval chr1:100-200 has no value for covariate `psi`"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn covariate(&self, name: &str) -> std::result::Result<f64, MissingCovariateError> {
        self.covariates
            .get(name)
            .copied()
            .ok_or_else(|| MissingCovariateError {
                covariate: name.to_string(),
                interval: self.to_string(),
            })
    }

    /// Returns whether this interval overlaps another interval.
    ///
    /// Two intervals overlap when they are on the same contig and share at
    /// least one base. When `strand_aware` is `true`, the strands must also be
    /// compatible (see [`Strand::is_compatible_with()`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Interval;
    ///
    /// let a = "chr1:100-200".parse::<Interval>()?;
    /// let b = "chr1:150-160".parse::<Interval>()?;
    /// let c = "chr1:200-300".parse::<Interval>()?;
    ///
    /// assert!(a.overlaps(&b, false));
    ///
    /// // Intervals that only touch at a boundary do not overlap.
    /// assert!(!a.overlaps(&c, false));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn overlaps(&self, other: &Interval, strand_aware: bool) -> bool {
        if self.contig != other.contig {
            return false;
        }

        if strand_aware && !self.strand.is_compatible_with(other.strand) {
            return false;
        }

        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end
            && other.start < self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)?;

        match self.strand {
            Strand::Unknown => Ok(()),
            strand => write!(f, ":{strand}"),
        }
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s.split(':').collect::<Vec<_>>();

        let (contig, range, strand) = match parts.as_slice() {
            [contig, range] => (*contig, *range, Strand::Unknown),
            [contig, range, strand] => (
                *contig,
                *range,
                strand
                    .parse::<Strand>()
                    .map_err(|_| Error::Parse(s.to_string()))?,
            ),
            _ => return Err(Error::Parse(s.to_string())),
        };

        if contig.is_empty() {
            return Err(Error::Parse(s.to_string()));
        }

        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| Error::Parse(s.to_string()))?;

        let start = start
            .parse::<u64>()
            .map_err(|_| Error::Parse(s.to_string()))?;
        let end = end.parse::<u64>().map_err(|_| Error::Parse(s.to_string()))?;

        Interval::try_new(contig, start, end).map(|interval| interval.with_strand(strand))
    }
}
