//! Filtering of an interval set against an exclusion set.
//!
//! The most common use is removing peak calls that fall within "blacklist"
//! regions: artefact-prone regions of a genome whose signal should not be
//! trusted.
//!
//! ```
//! use rangematch::filter;
//! use rangematch::Contigs;
//! use rangematch::Interval;
//! use rangematch::IntervalSet;
//!
//! let contigs = Contigs::try_new(["chr1"])?;
//! let peaks = IntervalSet::from_intervals(
//!     contigs.clone(),
//!     vec!["chr1:100-200".parse::<Interval>()?, "chr1:500-600".parse()?],
//! );
//! let blacklist = IntervalSet::from_intervals(contigs, vec!["chr1:150-160".parse()?]);
//!
//! // Keep only the peaks that do _not_ overlap the blacklist.
//! let clean = filter::filter(&peaks, &blacklist, true);
//! assert_eq!(clean.len(), 1);
//! assert_eq!(clean.get(0).unwrap().to_string(), "chr1:500-600");
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use tracing::debug;

use crate::IntervalSet;

/// Filters `query` against `exclude`.
///
/// - When `invert` is `false`, the intervals in `query` that overlap at least
///   one interval in `exclude` are returned.
/// - When `invert` is `true`, the intervals in `query` that overlap no
///   interval in `exclude` are returned.
///
/// Strand is ignored. Input order is preserved. See [`Filter`] for more
/// options.
pub fn filter(query: &IntervalSet, exclude: &IntervalSet, invert: bool) -> IntervalSet {
    Filter::default().invert(invert).apply(query, exclude)
}

/// A configurable overlap filter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// Whether to keep the non-overlapping intervals instead of the
    /// overlapping ones.
    invert: bool,

    /// Whether strands must be compatible for two intervals to overlap.
    strand_aware: bool,

    /// Whether to reduce the exclusion set to its union before filtering.
    merge_exclude: bool,
}

impl Filter {
    /// Sets whether the filter keeps intervals that overlap nothing in the
    /// exclusion set (`true`) or intervals that overlap something (`false`).
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Sets whether strands must be compatible for two intervals to overlap.
    ///
    /// An unknown strand is compatible with every strand.
    pub fn strand_aware(mut self, strand_aware: bool) -> Self {
        self.strand_aware = strand_aware;
        self
    }

    /// Sets whether the exclusion set is reduced to its union (see
    /// [`IntervalSet::merged()`]) before filtering.
    ///
    /// This never changes the result. Merging discards strand, so it is
    /// skipped when the filter is strand aware.
    pub fn merge_exclude(mut self, merge_exclude: bool) -> Self {
        self.merge_exclude = merge_exclude;
        self
    }

    /// Applies the filter.
    pub fn apply(&self, query: &IntervalSet, exclude: &IntervalSet) -> IntervalSet {
        let merged;
        let exclude = if self.merge_exclude && !self.strand_aware {
            merged = exclude.merged();
            &merged
        } else {
            exclude
        };

        let kept = query
            .iter()
            .enumerate()
            .filter(|(_, interval)| exclude.overlaps_any(interval, self.strand_aware) != self.invert)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        debug!(
            "overlap filter retained {} of {} interval(s) (invert = {})",
            kept.len(),
            query.len(),
            self.invert
        );

        query.subset(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Contigs;
    use crate::Interval;

    fn set(intervals: &[&str]) -> Result<IntervalSet, Box<dyn std::error::Error>> {
        let contigs = Contigs::try_new(["chr1", "chr2"])?;
        let intervals = intervals
            .iter()
            .map(|s| s.parse::<Interval>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IntervalSet::from_intervals(contigs, intervals))
    }

    fn render(set: &IntervalSet) -> Vec<String> {
        set.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_single_overlap() -> Result<(), Box<dyn std::error::Error>> {
        let query = set(&["chr1:100-200"])?;
        let exclude = set(&["chr1:150-160"])?;

        assert_eq!(render(&filter(&query, &exclude, false)), vec!["chr1:100-200"]);
        assert!(filter(&query, &exclude, true).is_empty());

        Ok(())
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() -> Result<(), Box<dyn std::error::Error>> {
        let query = set(&["chr1:100-200"])?;
        let exclude = set(&["chr1:200-300", "chr1:50-100"])?;

        assert!(filter(&query, &exclude, false).is_empty());
        assert_eq!(render(&filter(&query, &exclude, true)), vec!["chr1:100-200"]);

        Ok(())
    }

    #[test]
    fn test_empty_exclusion_set() -> Result<(), Box<dyn std::error::Error>> {
        let query = set(&["chr1:300-400", "chr2:0-10", "chr1:100-200"])?;
        let exclude = set(&[])?;

        assert!(filter(&query, &exclude, false).is_empty());
        assert_eq!(filter(&query, &exclude, true), query);

        Ok(())
    }

    #[test]
    fn test_partition() -> Result<(), Box<dyn std::error::Error>> {
        let query = set(&[
            "chr1:0-10",
            "chr1:5-15",
            "chr1:20-30",
            "chr2:0-10",
            "chr1:29-31",
            "chr1:40-40",
        ])?;
        let exclude = set(&["chr1:8-9", "chr1:25-26", "chr1:10-12", "chr2:100-200"])?;

        let hits = render(&filter(&query, &exclude, false));
        let misses = render(&filter(&query, &exclude, true));

        assert_eq!(hits, vec!["chr1:0-10", "chr1:5-15", "chr1:20-30"]);
        assert_eq!(misses, vec!["chr2:0-10", "chr1:29-31", "chr1:40-40"]);

        let mut union = hits.into_iter().chain(misses).collect::<Vec<_>>();
        let mut expected = render(&query);
        union.sort();
        expected.sort();
        assert_eq!(union, expected);

        Ok(())
    }

    #[test]
    fn test_merge_exclude_does_not_change_result() -> Result<(), Box<dyn std::error::Error>> {
        let query = set(&["chr1:0-10", "chr1:50-60", "chr1:95-100", "chr2:0-1"])?;
        let exclude = set(&["chr1:90-96", "chr1:5-7", "chr1:6-9", "chr1:92-93"])?;

        for invert in [false, true] {
            let plain = Filter::default().invert(invert).apply(&query, &exclude);
            let merged = Filter::default()
                .invert(invert)
                .merge_exclude(true)
                .apply(&query, &exclude);

            assert_eq!(plain, merged);
        }

        Ok(())
    }

    #[test]
    fn test_strand_aware() -> Result<(), Box<dyn std::error::Error>> {
        let query = set(&["chr1:0-10:+", "chr1:0-10:-", "chr1:0-10"])?;
        let exclude = set(&["chr1:5-6:-"])?;

        let unstranded = Filter::default().apply(&query, &exclude);
        assert_eq!(unstranded.len(), 3);

        let stranded = Filter::default()
            .strand_aware(true)
            .merge_exclude(true)
            .apply(&query, &exclude);
        assert_eq!(render(&stranded), vec!["chr1:0-10:-", "chr1:0-10"]);

        Ok(())
    }
}
