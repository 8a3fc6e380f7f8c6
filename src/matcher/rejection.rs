//! Rejection-sampling matching.
//!
//! Candidates are drawn uniformly from the pool and accepted with a
//! probability proportional to `f(x) / g(x)`, where `f` and `g` are the focal
//! and pool densities at the candidate's covariate value `x`. Accepted
//! candidates are therefore distributed (approximately) like the focal set.
//!
//! Densities are estimated with a histogram over the shared [`Bins`]. Because
//! the focal and pool histograms share bin edges, the bin widths cancel in the
//! ratio and only the normalized counts matter. The ratio is scaled by its
//! maximum so that the most under-represented bin is always accepted.

use std::collections::BTreeMap;

use rand::Rng;

use crate::matcher::bins::Bins;

/// Computes the acceptance probability for every pool value.
fn acceptance(focal: &[f64], pool: &[f64], bins: &Bins) -> Vec<f64> {
    if focal.is_empty() || pool.is_empty() {
        return vec![0.0; pool.len()];
    }

    let mut focal_counts = BTreeMap::<usize, usize>::new();
    for &value in focal {
        *focal_counts.entry(bins.index(value)).or_default() += 1;
    }

    let mut pool_counts = BTreeMap::<usize, usize>::new();
    for &value in pool {
        *pool_counts.entry(bins.index(value)).or_default() += 1;
    }

    let n_focal = focal.len() as f64;
    let n_pool = pool.len() as f64;

    let ratios = pool_counts
        .iter()
        .map(|(bin, &count)| {
            let f = focal_counts.get(bin).copied().unwrap_or_default() as f64 / n_focal;
            let g = count as f64 / n_pool;
            (*bin, f / g)
        })
        .collect::<BTreeMap<_, _>>();

    let max = ratios.values().copied().fold(0.0, f64::max);

    pool.iter()
        .map(|&value| match max > 0.0 {
            true => ratios.get(&bins.index(value)).copied().unwrap_or_default() / max,
            false => 0.0,
        })
        .collect()
}

/// Assigns each focal value (in focal order) a pool index by rejection
/// sampling.
///
/// At most `max_attempts` candidates are drawn per focal value. When sampling
/// without replacement, accepted candidates are removed from the draw pool. A
/// focal value whose attempts are exhausted, or for which the draw pool has run
/// dry, is left unmatched (`None`).
pub(crate) fn assign<R: Rng>(
    focal: &[f64],
    pool: &[f64],
    bins: &Bins,
    replace: bool,
    max_attempts: usize,
    rng: &mut R,
) -> Vec<Option<usize>> {
    let acceptance = acceptance(focal, pool, bins);
    let mut available = (0..pool.len()).collect::<Vec<_>>();
    let mut assignments = Vec::with_capacity(focal.len());

    for _ in focal {
        let mut assignment = None;

        for _ in 0..max_attempts {
            if available.is_empty() {
                break;
            }

            let slot = rng.gen_range(0..available.len());
            let candidate = available[slot];

            if rng.gen::<f64>() < acceptance[candidate] {
                if !replace {
                    available.swap_remove(slot);
                }

                assignment = Some(candidate);
                break;
            }
        }

        assignments.push(assignment);
    }

    assignments
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::matcher::bins::Binning;

    #[test]
    fn test_acceptance_follows_density_ratio() {
        let focal = [0.5, 0.5, 0.5, 9.5];
        let pool = [0.5, 9.5, 9.5, 9.5];
        let bins = Bins::new(Binning::Count(2), focal.iter().chain(pool.iter()).copied());

        // f = (0.75, 0.25), g = (0.25, 0.75), so the ratios are (3, 1/3).
        let acceptance = acceptance(&focal, &pool, &bins);
        assert_eq!(acceptance[0], 1.0);
        assert!((acceptance[1] - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_distributions_never_accept() {
        let focal = [0.0, 0.1];
        let pool = [10.0, 10.1];
        let bins = Bins::new(Binning::Count(4), focal.iter().chain(pool.iter()).copied());

        let mut rng = StdRng::seed_from_u64(7);
        let assignments = assign(&focal, &pool, &bins, true, 50, &mut rng);

        assert_eq!(assignments, vec![None, None]);
    }

    #[test]
    fn test_without_replacement_exhausts_pool() {
        let focal = [1.0, 1.0, 1.0];
        let pool = [1.0, 1.0];
        let bins = Bins::new(Binning::Count(1), focal.iter().chain(pool.iter()).copied());

        let mut rng = StdRng::seed_from_u64(42);
        let assignments = assign(&focal, &pool, &bins, false, 100, &mut rng);

        let mut matched = assignments.iter().flatten().copied().collect::<Vec<_>>();
        matched.sort_unstable();

        assert_eq!(matched, vec![0, 1]);
        assert_eq!(assignments[2], None);
    }
}
