//! Shared histogram binning of covariate values.
//!
//! Both the [`rejection`](super::Method::Rejection) and the
//! [`stratified`](super::Method::Stratified) strategies place the focal and
//! the pool covariate values into a single, shared set of equal-width bins
//! spanning the combined range of the two sets.

/// The default number of bins.
pub const DEFAULT_BIN_COUNT: usize = 10;

/// How the combined covariate range is divided into bins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Binning {
    /// A fixed number of equal-width bins.
    Count(usize),

    /// Bins of a fixed width, as many as needed to cover the range.
    Width(f64),
}

impl Default for Binning {
    fn default() -> Self {
        Binning::Count(DEFAULT_BIN_COUNT)
    }
}

/// A realized set of bins over a concrete range of values.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Bins {
    /// The left edge of the first bin.
    min: f64,

    /// The width of each bin.
    width: f64,

    /// The number of bins.
    count: usize,
}

impl Bins {
    /// Creates bins spanning the range of `values`.
    ///
    /// When every value is equal (or there are no values), a single bin is
    /// created.
    pub(crate) fn new(binning: Binning, values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        let range = max - min;

        if !range.is_finite() || range <= 0.0 {
            return Self {
                min: if min.is_finite() { min } else { 0.0 },
                width: 1.0,
                count: 1,
            };
        }

        let (width, count) = match binning {
            Binning::Count(count) => (range / count.max(1) as f64, count.max(1)),
            Binning::Width(width) => (width, ((range / width).ceil() as usize).max(1)),
        };

        Self { min, width, count }
    }

    /// Gets the number of bins.
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// Gets the bin that `value` falls within.
    ///
    /// Bins are closed on the left and open on the right, except the last bin,
    /// which also includes the maximum value.
    pub(crate) fn index(&self, value: f64) -> usize {
        if self.count == 1 {
            return 0;
        }

        let offset = ((value - self.min) / self.width).floor();

        if offset <= 0.0 {
            0
        } else {
            (offset as usize).min(self.count - 1)
        }
    }
}
