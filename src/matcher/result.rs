//! The outcome of a covariate-matching run.

use crate::matcher::overview::Overview;
use crate::matcher::overview::Summary;
use crate::matcher::Method;
use crate::Interval;
use crate::IntervalSet;

/// A focal interval paired with the pool interval it was matched to.
#[derive(Clone, Debug, PartialEq)]
pub struct Pair {
    /// The index of the focal interval within the focal set.
    focal_index: usize,

    /// The index of the matched interval within the pool set.
    pool_index: usize,

    /// The focal interval.
    focal: Interval,

    /// The matched pool interval.
    matched: Interval,
}

impl Pair {
    /// Gets the index of the focal interval within the focal set.
    pub fn focal_index(&self) -> usize {
        self.focal_index
    }

    /// Gets the index of the matched interval within the pool set.
    pub fn pool_index(&self) -> usize {
        self.pool_index
    }

    /// Gets the focal interval.
    pub fn focal(&self) -> &Interval {
        &self.focal
    }

    /// Gets the matched pool interval.
    pub fn matched(&self) -> &Interval {
        &self.matched
    }
}

/// A focal interval for which no match was found.
#[derive(Clone, Debug, PartialEq)]
pub struct Unmatched {
    /// The index of the focal interval within the focal set.
    index: usize,

    /// The focal interval.
    interval: Interval,
}

impl Unmatched {
    /// Gets the index of the focal interval within the focal set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets the focal interval.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }
}

/// The result of matching a focal set against a pool set.
///
/// Pairs are in the order of the focal set. Focal intervals that could not be
/// matched are not errors: they are recorded in [`MatchResult::unmatched()`]
/// and it is up to the caller to decide whether the match is acceptable.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// The method used to produce the result.
    method: Method,

    /// The name of the covariate that was matched on.
    covariate: String,

    /// The matched pairs in focal order.
    pairs: Vec<Pair>,

    /// The unmatched focal intervals in focal order.
    unmatched: Vec<Unmatched>,

    /// The covariate values of the focal set.
    focal_values: Vec<f64>,

    /// The covariate values of the pool set.
    pool_values: Vec<f64>,
}

impl MatchResult {
    /// Assembles a result from per-focal assignments.
    ///
    /// `assignments[i]` is the pool index matched to focal interval `i`.
    pub(crate) fn new(
        method: Method,
        covariate: &str,
        focal: &IntervalSet,
        pool: &IntervalSet,
        assignments: Vec<Option<usize>>,
        focal_values: Vec<f64>,
        pool_values: Vec<f64>,
    ) -> Self {
        let mut pairs = Vec::with_capacity(assignments.len());
        let mut unmatched = Vec::new();

        for (focal_index, (interval, assignment)) in focal.iter().zip(assignments).enumerate() {
            match assignment.and_then(|j| pool.get(j).map(|matched| (j, matched))) {
                Some((pool_index, matched)) => pairs.push(Pair {
                    focal_index,
                    pool_index,
                    focal: interval.clone(),
                    matched: matched.clone(),
                }),
                None => unmatched.push(Unmatched {
                    index: focal_index,
                    interval: interval.clone(),
                }),
            }
        }

        Self {
            method,
            covariate: covariate.to_string(),
            pairs,
            unmatched,
            focal_values,
            pool_values,
        }
    }

    /// Gets the method used to produce the result.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Gets the name of the covariate that was matched on.
    pub fn covariate(&self) -> &str {
        &self.covariate
    }

    /// Gets the matched pairs in focal order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Gets the focal intervals that were left unmatched, in focal order.
    pub fn unmatched(&self) -> &[Unmatched] {
        &self.unmatched
    }

    /// Gets the number of focal intervals that were left unmatched.
    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    /// Returns whether every focal interval was matched.
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Iterates over the matched pool intervals in pair order.
    ///
    /// When sampling with replacement, the same pool interval may appear more
    /// than once.
    pub fn matched(&self) -> impl Iterator<Item = &Interval> {
        self.pairs.iter().map(|pair| &pair.matched)
    }

    /// Summarizes the covariate distributions of the focal, matched, pool, and
    /// unmatched intervals.
    pub fn overview(&self) -> Overview {
        let matched = self
            .pairs
            .iter()
            .map(|pair| self.pool_values[pair.pool_index])
            .collect::<Vec<_>>();

        let unmatched = self
            .unmatched
            .iter()
            .map(|entry| self.focal_values[entry.index])
            .collect::<Vec<_>>();

        Overview::new(
            Summary::from_values(&self.focal_values),
            Summary::from_values(&matched),
            Summary::from_values(&self.pool_values),
            Summary::from_values(&unmatched),
        )
    }
}
