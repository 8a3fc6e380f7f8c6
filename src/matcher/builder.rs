//! A builder for a [`Matcher`].

use crate::matcher::bins::Binning;
use crate::matcher::Error;
use crate::matcher::Matcher;
use crate::matcher::Method;

/// The default maximum number of candidates drawn per focal interval during
/// rejection sampling.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// A configuration that cannot be used to match intervals.
#[derive(Clone, Debug, PartialEq)]
pub enum UnsupportedConfigurationError {
    /// Nearest-value matching was requested without replacement.
    NearestWithoutReplacement,

    /// A bin count of zero was requested.
    ZeroBins,

    /// A bin width that is not a positive, finite number was requested.
    InvalidBinWidth(f64),

    /// A maximum of zero rejection-sampling attempts was requested.
    ZeroAttempts,
}

impl std::fmt::Display for UnsupportedConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedConfigurationError::NearestWithoutReplacement => {
                write!(f, "the nearest method only supports sampling with replacement")
            }
            UnsupportedConfigurationError::ZeroBins => {
                write!(f, "the number of bins must be greater than zero")
            }
            UnsupportedConfigurationError::InvalidBinWidth(width) => {
                write!(f, "the bin width must be a positive number, found {width}")
            }
            UnsupportedConfigurationError::ZeroAttempts => {
                write!(f, "the maximum number of attempts must be greater than zero")
            }
        }
    }
}

impl std::error::Error for UnsupportedConfigurationError {}

/// A builder for a [`Matcher`].
#[derive(Clone, Debug)]
pub struct Builder {
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

impl Default for Builder {
    fn default() -> Self {
        Self {
            method: Method::default(),
            replace: true,
            seed: 0,
            binning: Binning::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Builder {
    /// Sets the matching [`Method`].
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets whether pool intervals may be matched more than once.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Sets the seed for the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the [`Binning`] used by the rejection and stratified methods.
    pub fn binning(mut self, binning: Binning) -> Self {
        self.binning = binning;
        self
    }

    /// Sets the maximum number of candidates drawn per focal interval during
    /// rejection sampling.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Consumes `self` and attempts to build a [`Matcher`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::matcher::Builder;
    /// use rangematch::matcher::Method;
    ///
    /// Builder::default()
    ///     .method(Method::Rejection)
    ///     .replace(false)
    ///     .seed(42)
    ///     .try_build()?;
    ///
    /// let err = Builder::default()
    ///     .method(Method::Nearest)
    ///     .replace(false)
    ///     .try_build()
    ///     .unwrap_err();
    ///
    /// assert_eq!(
    ///     err.to_string(),
    ///     "unsupported configuration: the nearest method only supports sampling with \
    ///      replacement"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Matcher, Error> {
        if self.method == Method::Nearest && !self.replace {
            return Err(Error::UnsupportedConfiguration(
                UnsupportedConfigurationError::NearestWithoutReplacement,
            ));
        }

        match self.binning {
            Binning::Count(0) => {
                return Err(Error::UnsupportedConfiguration(
                    UnsupportedConfigurationError::ZeroBins,
                ));
            }
            Binning::Width(width) if !(width.is_finite() && width > 0.0) => {
                return Err(Error::UnsupportedConfiguration(
                    UnsupportedConfigurationError::InvalidBinWidth(width),
                ));
            }
            _ => {}
        }

        if self.max_attempts == 0 {
            return Err(Error::UnsupportedConfiguration(
                UnsupportedConfigurationError::ZeroAttempts,
            ));
        }

        Ok(Matcher {
            method: self.method,
            replace: self.replace,
            seed: self.seed,
            binning: self.binning,
            max_attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_binning() {
        let err = Builder::default()
            .binning(Binning::Count(0))
            .try_build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedConfiguration(UnsupportedConfigurationError::ZeroBins)
        ));

        for width in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Builder::default()
                .binning(Binning::Width(width))
                .try_build()
                .unwrap_err();
            assert!(matches!(
                err,
                Error::UnsupportedConfiguration(UnsupportedConfigurationError::InvalidBinWidth(_))
            ));
        }
    }

    #[test]
    fn test_zero_attempts() {
        let err = Builder::default().max_attempts(0).try_build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported configuration: the maximum number of attempts must be greater than zero"
        );
    }

    #[test]
    fn test_nearest_with_replacement() {
        assert!(Builder::default()
            .method(Method::Nearest)
            .replace(true)
            .try_build()
            .is_ok());
    }
}
