//! A builder for an [`Interval`].
//!
//! External loaders (e.g., a BED parser) emit raw records whose fields may or
//! may not be present. A [`Builder`] collects those fields and validates them
//! all at once in [`Builder::try_build()`].

use crate::interval;
use crate::Interval;
use crate::Strand;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum MissingError {
    /// No contig was provided to the [`Builder`].
    Contig,

    /// No start position was provided to the [`Builder`].
    Start,

    /// No end position was provided to the [`Builder`].
    End,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Contig => write!(f, "contig"),
            MissingError::Start => write!(f, "start"),
            MissingError::End => write!(f, "end"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error related to a [`Builder`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// The provided fields do not describe a valid interval.
    Invalid(interval::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Invalid(err) => write!(f, "invalid interval: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Interval`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    /// The contig.
    contig: Option<String>,

    /// The start position.
    start: Option<u64>,

    /// The end position.
    end: Option<u64>,

    /// The strand.
    strand: Option<Strand>,

    /// The name.
    name: Option<String>,

    /// The covariates in the order they were provided.
    covariates: Vec<(String, f64)>,
}

impl Builder {
    /// Sets the contig for the [`Builder`].
    pub fn contig(mut self, contig: impl Into<String>) -> Self {
        self.contig = Some(contig.into());
        self
    }

    /// Sets the start position for the [`Builder`].
    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the end position for the [`Builder`].
    pub fn end(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the strand for the [`Builder`].
    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    /// Sets the name for the [`Builder`].
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Pushes a covariate into the [`Builder`].
    ///
    /// If the same covariate is pushed more than once, the last value wins.
    pub fn covariate(mut self, name: impl Into<String>, value: f64) -> Self {
        self.covariates.push((name.into(), value));
        self
    }

    /// Gets the contig, if one has been set.
    pub fn contig_name(&self) -> Option<&str> {
        self.contig.as_deref()
    }

    /// Consumes `self` and attempts to build an [`Interval`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::interval::Builder;
    /// use rangematch::Strand;
    ///
    /// let interval = Builder::default()
    ///     .contig("chr1")
    ///     .start(100)
    ///     .end(200)
    ///     .strand(Strand::Positive)
    ///     .name("peak1")
    ///     .covariate("psi", 0.25)
    ///     .try_build()?;
    ///
    /// assert_eq!(interval.to_string(), "chr1:100-200:+");
    /// assert_eq!(interval.covariate("psi")?, 0.25);
    ///
    /// let err = Builder::default().contig("chr1").start(100).try_build().unwrap_err();
    /// assert_eq!(err.to_string(), "missing required field: end");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Interval> {
        let contig = self.contig.ok_or(Error::Missing(MissingError::Contig))?;
        let start = self.start.ok_or(Error::Missing(MissingError::Start))?;
        let end = self.end.ok_or(Error::Missing(MissingError::End))?;

        let mut interval = Interval::try_new(contig, start, end).map_err(Error::Invalid)?;

        if let Some(strand) = self.strand {
            interval = interval.with_strand(strand);
        }

        if let Some(name) = self.name {
            interval = interval.with_name(name);
        }

        for (name, value) in self.covariates {
            interval = interval
                .try_with_covariate(name, value)
                .map_err(Error::Invalid)?;
        }

        Ok(interval)
    }
}

impl From<Interval> for Builder {
    fn from(interval: Interval) -> Self {
        let Interval {
            contig,
            start,
            end,
            strand,
            name,
            covariates,
        } = interval;

        Self {
            contig: Some(contig),
            start: Some(start),
            end: Some(end),
            strand: Some(strand),
            name,
            covariates: covariates.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let err = Builder::default().start(0).end(1).try_build().unwrap_err();
        assert_eq!(err, Error::Missing(MissingError::Contig));

        let err = Builder::default().contig("chr1").end(1).try_build().unwrap_err();
        assert_eq!(err, Error::Missing(MissingError::Start));

        let err = Builder::default()
            .contig("chr1")
            .start(0)
            .try_build()
            .unwrap_err();
        assert_eq!(err, Error::Missing(MissingError::End));
    }

    #[test]
    fn test_invalid_fields() {
        let err = Builder::default()
            .contig("chr1")
            .start(10)
            .end(5)
            .try_build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid interval: start position (10) cannot be greater than the end position (5)"
        );

        let err = Builder::default()
            .contig("chr1")
            .start(0)
            .end(5)
            .covariate("psi", f64::INFINITY)
            .try_build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(interval::Error::NonFiniteCovariate(_, _))
        ));
    }

    #[test]
    fn test_roundtrip_through_builder() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let interval = Interval::try_new("chr2", 5, 50)?
            .with_name("a")
            .try_with_covariate("length", 45.0)?;

        let rebuilt = Builder::from(interval.clone()).try_build()?;
        assert_eq!(rebuilt, interval);

        Ok(())
    }
}
