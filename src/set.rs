//! An immutable, indexed collection of intervals on a shared reference.

use std::collections::HashMap;

use rust_lapper as lapper;

use crate::interval::MissingCovariateError;
use crate::Contigs;
use crate::Interval;

pub mod builder;

pub use builder::Builder;
pub use builder::Error;
pub use builder::Mode;

/// The inner value of the overlap lookup data structure.
type Iv = lapper::Interval<u64, usize>;

/// An ordered, immutable collection of [`Interval`]s.
///
/// Every interval in the set lies on a contig known to the set's [`Contigs`].
/// Intervals on other contigs are dropped when the set is constructed.
///
/// An overlap index (one [`lapper::Lapper`] per contig) is built once at
/// construction time so that [`IntervalSet::overlapping()`] runs in
/// `O(log n + k)`.
#[derive(Clone, Debug)]
pub struct IntervalSet {
    /// The reference contigs.
    contigs: Contigs,

    /// The intervals in their original order.
    intervals: Vec<Interval>,

    /// The overlap index for each contig. Values are indices into `intervals`.
    index: HashMap<String, lapper::Lapper<u64, usize>>,
}

impl IntervalSet {
    /// Creates a [`Builder`] for an [`IntervalSet`] on the given reference.
    pub fn builder(contigs: Contigs) -> Builder {
        Builder::new(contigs)
    }

    /// Creates an empty [`IntervalSet`].
    pub fn empty(contigs: Contigs) -> Self {
        Self::from_intervals(contigs, Vec::new())
    }

    /// Creates an [`IntervalSet`] from already-validated intervals.
    ///
    /// Intervals on contigs that are not part of `contigs` are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Contigs;
    /// use rangematch::Interval;
    /// use rangematch::IntervalSet;
    ///
    /// let contigs = Contigs::try_new(["chr1", "chr2"])?;
    /// let set = IntervalSet::from_intervals(
    ///     contigs,
    ///     vec![
    ///         "chr1:100-200".parse::<Interval>()?,
    ///         "chrUn:0-10".parse::<Interval>()?,
    ///         "chr2:5-50".parse::<Interval>()?,
    ///     ],
    /// );
    ///
    /// assert_eq!(set.len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_intervals(contigs: Contigs, intervals: impl IntoIterator<Item = Interval>) -> Self {
        let intervals = intervals
            .into_iter()
            .filter(|interval| contigs.contains(interval.contig()))
            .collect::<Vec<_>>();

        let mut hm = HashMap::<String, Vec<Iv>>::default();

        for (i, interval) in intervals.iter().enumerate() {
            hm.entry(interval.contig().to_string())
                .or_default()
                .push(lapper::Interval {
                    start: interval.start(),
                    stop: interval.end(),
                    val: i,
                });
        }

        let index = hm
            .into_iter()
            .map(|(contig, ivs)| (contig, lapper::Lapper::new(ivs)))
            .collect();

        Self {
            contigs,
            intervals,
            index,
        }
    }

    /// Gets the reference contigs.
    pub fn contigs(&self) -> &Contigs {
        &self.contigs
    }

    /// Gets the number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns whether the set has no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Gets the interval at `index`.
    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    /// Iterates over the intervals in their original order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Gets the intervals as a slice.
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Collects the value of a covariate for every interval in order.
    ///
    /// Fails on the first interval that does not carry the covariate; no value
    /// is ever defaulted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Contigs;
    /// use rangematch::Interval;
    /// use rangematch::IntervalSet;
    ///
    /// let contigs = Contigs::try_new(["chr1"])?;
    /// let set = IntervalSet::from_intervals(
    ///     contigs,
    ///     vec![
    ///         Interval::try_new("chr1", 0, 10)?.try_with_covariate("psi", 0.1)?,
    ///         Interval::try_new("chr1", 20, 30)?.try_with_covariate("psi", 0.9)?,
    ///     ],
    /// );
    ///
    /// assert_eq!(set.covariate_values("psi")?, vec![0.1, 0.9]);
    /// assert!(set.covariate_values("length").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn covariate_values(&self, name: &str) -> Result<Vec<f64>, MissingCovariateError> {
        self.intervals
            .iter()
            .map(|interval| interval.covariate(name))
            .collect()
    }

    /// Gets the indices (in ascending order) of every interval in the set that
    /// overlaps `interval`.
    ///
    /// See [`Interval::overlaps()`] for the definition of an overlap.
    pub fn overlapping(&self, interval: &Interval, strand_aware: bool) -> Vec<usize> {
        let Some(lapper) = self.index.get(interval.contig()) else {
            return Vec::new();
        };

        let mut hits = lapper
            .find(interval.start(), interval.end())
            .map(|iv| iv.val)
            .filter(|&i| self.intervals[i].overlaps(interval, strand_aware))
            .collect::<Vec<_>>();

        hits.sort_unstable();
        hits
    }

    /// Returns whether any interval in the set overlaps `interval`.
    pub fn overlaps_any(&self, interval: &Interval, strand_aware: bool) -> bool {
        self.index
            .get(interval.contig())
            .map(|lapper| {
                lapper
                    .find(interval.start(), interval.end())
                    .any(|iv| self.intervals[iv.val].overlaps(interval, strand_aware))
            })
            .unwrap_or(false)
    }

    /// Reduces the set to the union of its intervals.
    ///
    /// Overlapping and book-ended intervals on the same contig are coalesced.
    /// Zero-width intervals cover no bases and are discarded. The merged
    /// intervals are unstranded, unnamed, and carry no covariates. They are
    /// ordered by contig (in reference order) and then by start position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::Contigs;
    /// use rangematch::Interval;
    /// use rangematch::IntervalSet;
    ///
    /// let contigs = Contigs::try_new(["chr1", "chr2"])?;
    /// let set = IntervalSet::from_intervals(
    ///     contigs,
    ///     ["chr2:0-5", "chr1:20-40", "chr1:10-25", "chr1:40-45", "chr1:50-55"]
    ///         .into_iter()
    ///         .map(|s| s.parse::<Interval>())
    ///         .collect::<Result<Vec<_>, _>>()?,
    /// );
    ///
    /// let merged = set.merged();
    /// let merged = merged.iter().map(|i| i.to_string()).collect::<Vec<_>>();
    /// assert_eq!(merged, vec!["chr1:10-45", "chr1:50-55", "chr2:0-5"]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn merged(&self) -> IntervalSet {
        let mut ranges = self
            .intervals
            .iter()
            .filter(|interval| !interval.is_empty())
            .filter_map(|interval| {
                self.contigs
                    .rank(interval.contig())
                    .map(|rank| (rank, interval.start(), interval.end()))
            })
            .collect::<Vec<_>>();

        ranges.sort_unstable();

        let mut merged: Vec<(usize, u64, u64)> = Vec::with_capacity(ranges.len());

        for (rank, start, end) in ranges {
            match merged.last_mut() {
                Some((last_rank, _, last_end)) if *last_rank == rank && start <= *last_end => {
                    *last_end = (*last_end).max(end);
                }
                _ => merged.push((rank, start, end)),
            }
        }

        let names = self.contigs.iter().collect::<Vec<_>>();
        let intervals = merged
            .into_iter()
            .filter_map(|(rank, start, end)| Interval::try_new(names[rank], start, end).ok())
            .collect::<Vec<_>>();

        IntervalSet::from_intervals(self.contigs.clone(), intervals)
    }

    /// Creates a new set containing the intervals at `indices` (in the order
    /// given) on the same reference.
    pub(crate) fn subset(&self, indices: impl IntoIterator<Item = usize>) -> IntervalSet {
        let intervals = indices
            .into_iter()
            .filter_map(|i| self.intervals.get(i).cloned())
            .collect::<Vec<_>>();

        IntervalSet::from_intervals(self.contigs.clone(), intervals)
    }
}

impl PartialEq for IntervalSet {
    fn eq(&self, other: &Self) -> bool {
        self.contigs == other.contigs && self.intervals == other.intervals
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
