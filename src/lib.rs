//! `rangematch` is a crate for filtering genomic interval sets against
//! exclusion regions and for drawing covariate-matched control sets.
//!
//! The crate provides two main points of entry:
//!
//! - Removing (or keeping) the intervals of a set that overlap an exclusion
//!   set, such as peak calls that fall within "blacklist" regions.
//! - Selecting intervals from a pool whose distribution of some covariate
//!   (e.g., length) approximates the distribution of a focal set.
//!
//! Both operate on an [`IntervalSet`]: an immutable, ordered collection of
//! [`Interval`]s that all lie on contigs of a shared reference ([`Contigs`]).
//! Intervals are 0-based and half-open, so intervals that merely touch at a
//! boundary do not overlap.
//!
//! ## Filtering
//!
//! [`filter::filter()`] returns the intervals of a query set that overlap at
//! least one interval of an exclusion set or, when inverted, those that overlap
//! none. The [`filter::Filter`] facility exposes additional options such as
//! strand-aware overlaps.
//!
//! ```
//! use rangematch::filter;
//! use rangematch::Contigs;
//! use rangematch::Interval;
//! use rangematch::IntervalSet;
//!
//! let contigs = Contigs::try_new(["chr1", "chr2"])?;
//!
//! let peaks = IntervalSet::from_intervals(
//!     contigs.clone(),
//!     vec!["chr1:100-200".parse::<Interval>()?, "chr2:0-50".parse()?],
//! );
//! let blacklist = IntervalSet::from_intervals(contigs, vec!["chr1:150-160".parse()?]);
//!
//! let blacklisted = filter::filter(&peaks, &blacklist, false);
//! let clean = filter::filter(&peaks, &blacklist, true);
//!
//! assert_eq!(blacklisted.len(), 1);
//! assert_eq!(clean.len(), 1);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Matching
//!
//! A [`matcher::Matcher`] is configured with a [`matcher::Builder`] (method,
//! replacement, seed, binning) and then run against a focal and a pool set.
//! The resulting [`matcher::MatchResult`] holds the matched pairs in focal
//! order along with any focal intervals that could not be matched.
//!
//! ```
//! use rangematch::matcher;
//! use rangematch::matcher::Method;
//! use rangematch::Contigs;
//! use rangematch::Interval;
//! use rangematch::IntervalSet;
//!
//! let contigs = Contigs::try_new(["chr1"])?;
//! let with_length = |s: &str| -> Result<Interval, Box<dyn std::error::Error>> {
//!     let interval = s.parse::<Interval>()?;
//!     let length = interval.len() as f64;
//!     Ok(interval.try_with_covariate("length", length)?)
//! };
//!
//! let focal = IntervalSet::from_intervals(
//!     contigs.clone(),
//!     vec![with_length("chr1:0-100")?, with_length("chr1:500-1000")?],
//! );
//! let pool = IntervalSet::from_intervals(
//!     contigs,
//!     (0..100)
//!         .map(|i| with_length(&format!("chr1:{}-{}", i * 1000, i * 1000 + 10 * (i + 1))))
//!         .collect::<Result<Vec<_>, _>>()?,
//! );
//!
//! let matcher = matcher::Builder::default()
//!     .method(Method::Stratified)
//!     .replace(false)
//!     .seed(42)
//!     .try_build()?;
//!
//! let result = matcher.run(&focal, &pool, "length")?;
//! assert_eq!(result.pairs().len() + result.unmatched_count(), focal.len());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod contigs;
pub mod filter;
pub mod interval;
pub mod matcher;
pub mod set;
pub mod strand;

pub use contigs::Contigs;
pub use interval::Interval;
pub use set::IntervalSet;
pub use strand::Strand;
