//! Drawing a control set from a pool whose covariate distribution matches a
//! focal set.
//!
//! Given a _focal_ set of intervals (e.g., peaks bound by a factor of
//! interest) and a larger _pool_ of candidate intervals, a [`Matcher`] selects
//! intervals from the pool such that the distribution of a single numeric
//! covariate (e.g., length or percent spliced in) approximates that of the
//! focal set. Three strategies are available:
//!
//! - [`Method::Rejection`] draws uniformly from the pool and accepts each
//!   candidate with a probability proportional to the ratio of the focal and
//!   pool densities at the candidate's covariate value.
//! - [`Method::Nearest`] pairs every focal interval with the pool interval
//!   whose covariate is numerically closest. With replacement only.
//! - [`Method::Stratified`] bins both sets on a shared set of bins and draws
//!   randomly within each bin.
//!
//! The stochastic strategies are driven by a [`StdRng`] that is seeded
//! explicitly for every run, so identical inputs, method, and seed always yield
//! an identical [`MatchResult`].
//!
//! ```
//! use rangematch::matcher;
//! use rangematch::matcher::Method;
//! use rangematch::Contigs;
//! use rangematch::Interval;
//! use rangematch::IntervalSet;
//!
//! let contigs = Contigs::try_new(["chr1"])?;
//!
//! let focal = IntervalSet::from_intervals(
//!     contigs.clone(),
//!     vec![
//!         Interval::try_new("chr1", 100, 200)?.try_with_covariate("score", 5.0)?,
//!         Interval::try_new("chr1", 300, 400)?.try_with_covariate("score", 50.0)?,
//!     ],
//! );
//!
//! let pool = IntervalSet::from_intervals(
//!     contigs,
//!     vec![
//!         Interval::try_new("chr1", 10, 20)?.try_with_covariate("score", 5.0)?,
//!         Interval::try_new("chr1", 30, 40)?.try_with_covariate("score", 6.0)?,
//!         Interval::try_new("chr1", 50, 60)?.try_with_covariate("score", 48.0)?,
//!     ],
//! );
//!
//! let result = matcher::match_intervals(&focal, &pool, "score", Method::Nearest, true, 0)?;
//!
//! let matched = result.matched().map(|i| i.to_string()).collect::<Vec<_>>();
//! assert_eq!(matched, vec!["chr1:10-20", "chr1:50-60"]);
//! assert!(result.is_complete());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use tracing::warn;

use crate::interval::MissingCovariateError;
use crate::IntervalSet;

pub mod bins;
pub mod builder;
mod nearest;
pub mod overview;
mod rejection;
pub mod result;
mod stratified;

pub use bins::Binning;
pub use builder::Builder;
pub use builder::UnsupportedConfigurationError;
pub use result::MatchResult;
pub use result::Pair;
pub use result::Unmatched;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to matching.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// An interval in the focal or the pool set lacks the covariate.
    MissingCovariate(MissingCovariateError),

    /// The requested configuration cannot be used.
    UnsupportedConfiguration(UnsupportedConfigurationError),

    /// The pool set is empty.
    EmptyPool,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingCovariate(err) => write!(f, "missing covariate: {err}"),
            Error::UnsupportedConfiguration(err) => {
                write!(f, "unsupported configuration: {err}")
            }
            Error::EmptyPool => write!(f, "the pool set is empty"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Methods
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the parsing of a [`Method`].
#[derive(Debug, Eq, PartialEq)]
pub struct ParseMethodError(String);

impl std::fmt::Display for ParseMethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parse method error: {} is not one of `rejection`, `nearest`, or `stratified`",
            self.0
        )
    }
}

impl std::error::Error for ParseMethodError {}

/// A strategy for matching a focal set to a pool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Method {
    /// Rejection sampling against a histogram density ratio.
    Rejection,

    /// Nearest covariate value (with replacement only).
    Nearest,

    /// Random sampling within shared covariate bins.
    #[default]
    Stratified,
}

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rejection" => Ok(Method::Rejection),
            "nearest" => Ok(Method::Nearest),
            "stratified" => Ok(Method::Stratified),
            other => Err(ParseMethodError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Rejection => write!(f, "rejection"),
            Method::Nearest => write!(f, "nearest"),
            Method::Stratified => write!(f, "stratified"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Matcher
////////////////////////////////////////////////////////////////////////////////////////

/// Matches a focal set to a pool on a single covariate.
///
/// A [`Matcher`] cannot be instantiated directly. Use a [`Builder`], which
/// validates the configuration up front.
#[derive(Clone, Debug)]
pub struct Matcher {
    /// The matching strategy.
    method: Method,

    /// Whether pool intervals may be matched more than once.
    replace: bool,

    /// The seed for the random number generator.
    seed: u64,

    /// The binning used by the histogram-based strategies.
    binning: Binning,

    /// The maximum number of draws per focal interval (rejection only).
    max_attempts: usize,
}

impl Matcher {
    /// Gets the matching strategy.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Gets whether pool intervals may be matched more than once.
    pub fn replace(&self) -> bool {
        self.replace
    }

    /// Gets the seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Matches `focal` against `pool` on `covariate`.
    ///
    /// The run fails as a whole when the pool is empty or when any interval in
    /// either set lacks the covariate. Failing to find a match for an
    /// individual focal interval is _not_ an error; such intervals are reported
    /// by [`MatchResult::unmatched()`].
    pub fn run(&self, focal: &IntervalSet, pool: &IntervalSet, covariate: &str) -> Result<MatchResult> {
        if pool.is_empty() {
            return Err(Error::EmptyPool);
        }

        let focal_values = focal
            .covariate_values(covariate)
            .map_err(Error::MissingCovariate)?;
        let pool_values = pool
            .covariate_values(covariate)
            .map_err(Error::MissingCovariate)?;

        let mut rng = StdRng::seed_from_u64(self.seed);

        let assignments = match self.method {
            Method::Nearest => nearest::assign(&focal_values, &pool_values),
            Method::Rejection => {
                let bins = self.bins(&focal_values, &pool_values);
                rejection::assign(
                    &focal_values,
                    &pool_values,
                    &bins,
                    self.replace,
                    self.max_attempts,
                    &mut rng,
                )
            }
            Method::Stratified => {
                let bins = self.bins(&focal_values, &pool_values);
                stratified::assign(&focal_values, &pool_values, &bins, self.replace, &mut rng)
            }
        };

        let result = MatchResult::new(
            self.method,
            covariate,
            focal,
            pool,
            assignments,
            focal_values,
            pool_values,
        );

        debug!(
            "{} matching on `{}`: {} matched, {} unmatched",
            self.method,
            covariate,
            result.pairs().len(),
            result.unmatched_count()
        );

        if !result.is_complete() {
            warn!(
                "{} of {} focal interval(s) could not be matched on `{}`",
                result.unmatched_count(),
                focal.len(),
                covariate
            );
        }

        Ok(result)
    }

    /// Builds the shared bins over the combined focal and pool values.
    fn bins(&self, focal: &[f64], pool: &[f64]) -> bins::Bins {
        bins::Bins::new(self.binning, focal.iter().chain(pool.iter()).copied())
    }
}

/// Matches `focal` against `pool` on `covariate` with the default binning and
/// number of rejection attempts.
///
/// This is a shorthand for configuring a [`Builder`] and calling
/// [`Matcher::run()`].
pub fn match_intervals(
    focal: &IntervalSet,
    pool: &IntervalSet,
    covariate: &str,
    method: Method,
    replace: bool,
    seed: u64,
) -> Result<MatchResult> {
    Builder::default()
        .method(method)
        .replace(replace)
        .seed(seed)
        .try_build()?
        .run(focal, pool, covariate)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::Contigs;
    use crate::Interval;

    fn set(values: &[f64]) -> std::result::Result<IntervalSet, Box<dyn std::error::Error>> {
        let contigs = Contigs::try_new(["chr1"])?;
        let intervals = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let start = i as u64 * 100;
                Interval::try_new("chr1", start, start + 10)?.try_with_covariate("x", value)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(IntervalSet::from_intervals(contigs, intervals))
    }

    /// A deterministic, uneven spread of values.
    fn spread(n: usize, scale: f64) -> Vec<f64> {
        (0..n).map(|i| ((i * 37 % 101) as f64) * scale).collect()
    }

    #[test]
    fn test_method_parse_and_display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        for method in [Method::Rejection, Method::Nearest, Method::Stratified] {
            assert_eq!(method.to_string().parse::<Method>()?, method);
        }

        let err = "knn".parse::<Method>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse method error: knn is not one of `rejection`, `nearest`, or `stratified`"
        );

        Ok(())
    }

    #[test]
    fn test_nearest_scenario() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let focal = set(&[5.0, 50.0])?;
        let pool = set(&[5.0, 6.0, 48.0])?;

        let result = match_intervals(&focal, &pool, "x", Method::Nearest, true, 0)?;

        let pairs = result
            .pairs()
            .iter()
            .map(|pair| (pair.focal_index(), pair.pool_index()))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![(0, 0), (1, 2)]);
        assert_eq!(result.pairs()[1].matched(), pool.get(2).unwrap());
        assert_eq!(result.unmatched_count(), 0);

        Ok(())
    }

    #[test]
    fn test_nearest_without_replacement_is_rejected() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let focal = set(&[1.0])?;
        let pool = set(&[1.0])?;

        let err = match_intervals(&focal, &pool, "x", Method::Nearest, false, 0).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedConfiguration(UnsupportedConfigurationError::NearestWithoutReplacement)
        );

        Ok(())
    }

    #[test]
    fn test_empty_pool() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let focal = set(&[1.0])?;
        let pool = set(&[])?;

        for method in [Method::Rejection, Method::Nearest, Method::Stratified] {
            let err = match_intervals(&focal, &pool, "x", method, true, 0).unwrap_err();
            assert_eq!(err, Error::EmptyPool);
        }

        Ok(())
    }

    #[test]
    fn test_missing_covariate() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let focal = set(&[1.0])?;
        let contigs = Contigs::try_new(["chr1"])?;
        let pool = IntervalSet::from_intervals(
            contigs,
            vec![
                Interval::try_new("chr1", 0, 10)?.try_with_covariate("x", 1.0)?,
                Interval::try_new("chr1", 20, 30)?,
            ],
        );

        let err = match_intervals(&focal, &pool, "x", Method::Stratified, true, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing covariate: interval chr1:20-30 has no value for covariate `x`"
        );

        let err = match_intervals(&focal, &focal, "y", Method::Nearest, true, 0).unwrap_err();
        assert!(matches!(err, Error::MissingCovariate(_)));

        Ok(())
    }

    #[test]
    fn test_empty_focal() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let focal = set(&[])?;
        let pool = set(&[1.0, 2.0])?;

        for method in [Method::Rejection, Method::Nearest, Method::Stratified] {
            let result = match_intervals(&focal, &pool, "x", method, true, 0)?;
            assert!(result.pairs().is_empty());
            assert!(result.is_complete());
        }

        Ok(())
    }

    #[test]
    fn test_determinism() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let focal = set(&spread(40, 0.5))?;
        let pool = set(&spread(400, 1.0))?;

        for method in [Method::Rejection, Method::Stratified] {
            for replace in [true, false] {
                let matcher = Builder::default()
                    .method(method)
                    .replace(replace)
                    .seed(2024)
                    .try_build()?;

                let a = matcher.run(&focal, &pool, "x")?;
                let b = matcher.run(&focal, &pool, "x")?;
                assert_eq!(a, b);
            }
        }

        Ok(())
    }

    #[test]
    fn test_pairs_preserve_focal_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let focal = set(&spread(30, 1.0))?;
        let pool = set(&spread(300, 0.4))?;

        for method in [Method::Rejection, Method::Nearest, Method::Stratified] {
            let result = match_intervals(&focal, &pool, "x", method, true, 11)?;

            let mut indices = result
                .pairs()
                .iter()
                .map(|pair| pair.focal_index())
                .chain(result.unmatched().iter().map(|entry| entry.index()))
                .collect::<Vec<_>>();

            let pair_indices = result
                .pairs()
                .iter()
                .map(|pair| pair.focal_index())
                .collect::<Vec<_>>();
            assert!(pair_indices.windows(2).all(|w| w[0] < w[1]));

            indices.sort_unstable();
            assert_eq!(indices, (0..focal.len()).collect::<Vec<_>>());
            assert!(result.pairs().len() <= focal.len());
        }

        Ok(())
    }

    #[test]
    fn test_without_replacement_never_reuses_pool() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let focal = set(&spread(50, 1.0))?;
        let pool = set(&spread(60, 1.0))?;

        for method in [Method::Rejection, Method::Stratified] {
            let result = Builder::default()
                .method(method)
                .replace(false)
                .seed(5)
                .binning(Binning::Count(5))
                .try_build()?
                .run(&focal, &pool, "x")?;

            let used = result
                .pairs()
                .iter()
                .map(|pair| pair.pool_index())
                .collect::<Vec<_>>();
            let unique = used.iter().collect::<HashSet<_>>();
            assert_eq!(used.len(), unique.len());
        }

        Ok(())
    }

    #[test]
    fn test_rejection_reports_unmatched() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // The pool has nothing near the focal values, so nothing can be accepted.
        let focal = set(&[0.0, 0.1, 0.2])?;
        let pool = set(&[100.0, 101.0])?;

        let result = Builder::default()
            .method(Method::Rejection)
            .max_attempts(25)
            .try_build()?
            .run(&focal, &pool, "x")?;

        assert_eq!(result.unmatched_count(), 3);
        assert!(!result.is_complete());
        assert_eq!(
            result
                .unmatched()
                .iter()
                .map(|entry| entry.interval().to_string())
                .collect::<Vec<_>>(),
            vec!["chr1:0-10", "chr1:100-110", "chr1:200-210"]
        );

        let overview = result.overview();
        assert_eq!(overview.focal().n(), 3);
        assert_eq!(overview.matched().n(), 0);
        assert_eq!(overview.pool().n(), 2);
        assert_eq!(overview.unmatched().n(), 3);

        Ok(())
    }

    #[test]
    fn test_stratified_matches_distribution() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // Focal values are concentrated at the top of the range, while the pool
        // is spread evenly across it.
        let focal = set(&(0..50).map(|i| 80.0 + (i % 20) as f64).collect::<Vec<_>>())?;
        let pool = set(&(0..500).map(|i| (i % 100) as f64).collect::<Vec<_>>())?;

        let result = match_intervals(&focal, &pool, "x", Method::Stratified, false, 1)?;
        assert!(result.is_complete());

        let overview = result.overview();
        let focal_mean = overview.focal().mean().unwrap();
        let matched_mean = overview.matched().mean().unwrap();
        let pool_mean = overview.pool().mean().unwrap();

        assert!((matched_mean - focal_mean).abs() < (pool_mean - focal_mean).abs());
        assert!(overview.matched().min().unwrap() >= 70.0);

        Ok(())
    }
}
