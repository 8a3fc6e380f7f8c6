//! A builder for an [`IntervalSet`].

use tracing::debug;
use tracing::warn;

use crate::interval;
use crate::Contigs;
use crate::IntervalSet;

/// An error related to a [`Builder`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A raw record did not describe a valid interval (only raised in
    /// [`Mode::Strict`]).
    InvalidInterval {
        /// The position of the offending record in the input.
        index: usize,

        /// The reason the record was rejected.
        source: interval::builder::Error,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInterval { index, source } => {
                write!(f, "invalid interval at record {index}: {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidInterval { source, .. } => Some(source),
        }
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// How a [`Builder`] treats records that do not describe a valid interval.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// The first invalid record aborts construction.
    Strict,

    /// Invalid records are dropped (and counted in the logs).
    #[default]
    Lenient,
}

/// A builder for an [`IntervalSet`].
#[derive(Clone, Debug)]
pub struct Builder {
    /// The reference contigs.
    contigs: Contigs,

    /// The treatment of invalid records.
    mode: Mode,
}

impl Builder {
    /// Creates a new [`Builder`] on the given reference.
    pub fn new(contigs: Contigs) -> Self {
        Self {
            contigs,
            mode: Mode::default(),
        }
    }

    /// Sets the [`Mode`] for the [`Builder`].
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Builds an [`IntervalSet`] from raw interval records.
    ///
    /// Records on contigs that are not part of the reference are silently
    /// dropped regardless of the [`Mode`]. An empty result is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::interval;
    /// use rangematch::set::Mode;
    /// use rangematch::Contigs;
    /// use rangematch::IntervalSet;
    ///
    /// let records = vec![
    ///     interval::Builder::default().contig("chr1").start(0).end(10),
    ///     interval::Builder::default().contig("chr1").start(10).end(5),
    ///     interval::Builder::default().contig("chrUn").start(0).end(10),
    /// ];
    ///
    /// let contigs = Contigs::try_new(["chr1"])?;
    ///
    /// let set = IntervalSet::builder(contigs.clone()).try_build_from(records.clone())?;
    /// assert_eq!(set.len(), 1);
    ///
    /// let err = IntervalSet::builder(contigs)
    ///     .mode(Mode::Strict)
    ///     .try_build_from(records)
    ///     .unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "invalid interval at record 1: invalid interval: start position (10) cannot be \
    ///      greater than the end position (5)"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from<I>(self, records: I) -> Result<IntervalSet>
    where
        I: IntoIterator<Item = interval::Builder>,
    {
        let mut intervals = Vec::new();
        let mut unlisted = 0usize;
        let mut invalid = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            if let Some(contig) = record.contig_name() {
                if !self.contigs.contains(contig) {
                    unlisted += 1;
                    continue;
                }
            }

            match record.try_build() {
                Ok(interval) => intervals.push(interval),
                Err(source) => match self.mode {
                    Mode::Strict => return Err(Error::InvalidInterval { index, source }),
                    Mode::Lenient => {
                        debug!("dropping record {index}: {source}");
                        invalid += 1;
                    }
                },
            }
        }

        if unlisted > 0 {
            debug!("dropped {unlisted} record(s) on contigs outside of the reference");
        }

        if invalid > 0 {
            warn!("dropped {invalid} invalid record(s)");
        }

        Ok(IntervalSet::from_intervals(self.contigs, intervals))
    }
}
