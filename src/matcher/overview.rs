//! Summaries of the covariate distributions involved in a match.

/// Summary statistics for a collection of covariate values.
///
/// All statistics other than the count are [`None`] for an empty collection,
/// and the standard deviation is [`None`] for fewer than two values.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// The number of values.
    n: usize,

    /// The arithmetic mean.
    mean: Option<f64>,

    /// The sample standard deviation.
    sd: Option<f64>,

    /// The minimum value.
    min: Option<f64>,

    /// The median value.
    median: Option<f64>,

    /// The maximum value.
    max: Option<f64>,
}

impl Summary {
    /// Summarizes a collection of values.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangematch::matcher::overview::Summary;
    ///
    /// let summary = Summary::from_values(&[1.0, 2.0, 3.0, 4.0]);
    ///
    /// assert_eq!(summary.n(), 4);
    /// assert_eq!(summary.mean(), Some(2.5));
    /// assert_eq!(summary.median(), Some(2.5));
    /// assert_eq!(summary.min(), Some(1.0));
    /// assert_eq!(summary.max(), Some(4.0));
    ///
    /// let summary = Summary::from_values(&[]);
    /// assert_eq!(summary.mean(), None);
    /// ```
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();

        if n == 0 {
            return Self {
                n,
                mean: None,
                sd: None,
                min: None,
                median: None,
                max: None,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / n as f64;

        let sd = match n {
            1 => None,
            _ => {
                let ss = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
                Some((ss / (n - 1) as f64).sqrt())
            }
        };

        let median = match n % 2 {
            0 => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
            _ => sorted[n / 2],
        };

        Self {
            n,
            mean: Some(mean),
            sd,
            min: sorted.first().copied(),
            median: Some(median),
            max: sorted.last().copied(),
        }
    }

    /// Gets the number of values.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Gets the arithmetic mean.
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    /// Gets the sample standard deviation.
    pub fn sd(&self) -> Option<f64> {
        self.sd
    }

    /// Gets the minimum value.
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Gets the median value.
    pub fn median(&self) -> Option<f64> {
        self.median
    }

    /// Gets the maximum value.
    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

/// A side-by-side summary of the focal, matched, pool, and unmatched covariate
/// distributions of a [`MatchResult`](super::MatchResult).
#[derive(Clone, Debug, PartialEq)]
pub struct Overview {
    /// The focal set.
    focal: Summary,

    /// The matched intervals drawn from the pool.
    matched: Summary,

    /// The entire pool.
    pool: Summary,

    /// The focal intervals that were left unmatched.
    unmatched: Summary,
}

impl Overview {
    /// Creates a new [`Overview`].
    pub(crate) fn new(focal: Summary, matched: Summary, pool: Summary, unmatched: Summary) -> Self {
        Self {
            focal,
            matched,
            pool,
            unmatched,
        }
    }

    /// Gets the focal summary.
    pub fn focal(&self) -> &Summary {
        &self.focal
    }

    /// Gets the matched summary.
    pub fn matched(&self) -> &Summary {
        &self.matched
    }

    /// Gets the pool summary.
    pub fn pool(&self) -> &Summary {
        &self.pool
    }

    /// Gets the unmatched summary.
    pub fn unmatched(&self) -> &Summary {
        &self.unmatched
    }

    /// Iterates over each summary alongside its name.
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, &Summary)> {
        [
            ("focal", &self.focal),
            ("matched", &self.matched),
            ("pool", &self.pool),
            ("unmatched", &self.unmatched),
        ]
        .into_iter()
    }
}

impl std::fmt::Display for Overview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        /// Renders an optional statistic.
        fn stat(value: Option<f64>) -> String {
            value.map(|v| format!("{v:.4}")).unwrap_or_else(|| String::from("NA"))
        }

        writeln!(f, "set\tn\tmean\tsd\tmin\tmedian\tmax")?;

        for (name, summary) in self.rows() {
            writeln!(
                f,
                "{name}\t{}\t{}\t{}\t{}\t{}\t{}",
                summary.n(),
                stat(summary.mean()),
                stat(summary.sd()),
                stat(summary.min()),
                stat(summary.median()),
                stat(summary.max())
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let summary = Summary::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_eq!(summary.n(), 8);
        assert_eq!(summary.mean(), Some(5.0));
        assert_eq!(summary.median(), Some(4.5));

        let sd = summary.sd().unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);

        let summary = Summary::from_values(&[3.0]);
        assert_eq!(summary.sd(), None);
        assert_eq!(summary.median(), Some(3.0));
    }

    #[test]
    fn test_display() {
        let overview = Overview::new(
            Summary::from_values(&[1.0, 3.0]),
            Summary::from_values(&[1.0]),
            Summary::from_values(&[1.0, 2.0, 3.0]),
            Summary::from_values(&[3.0]),
        );

        assert_eq!(
            overview.to_string(),
            "set\tn\tmean\tsd\tmin\tmedian\tmax\n\
             focal\t2\t2.0000\t1.4142\t1.0000\t2.0000\t3.0000\n\
             matched\t1\t1.0000\tNA\t1.0000\t1.0000\t1.0000\n\
             pool\t3\t2.0000\t1.0000\t1.0000\t2.0000\t3.0000\n\
             unmatched\t1\t3.0000\tNA\t3.0000\t3.0000\t3.0000\n"
        );
    }
}
