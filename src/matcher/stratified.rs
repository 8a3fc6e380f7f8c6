//! Stratified matching.
//!
//! Focal and pool values are placed into the shared [`Bins`]. Within each bin,
//! pool members are randomly assigned to the focal members of that bin.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::matcher::bins::Bins;

/// The focal and pool members that fall within a single bin.
#[derive(Debug, Default)]
struct Stratum {
    /// Indices of the focal values within the bin.
    focal: Vec<usize>,

    /// Indices of the pool values within the bin.
    pool: Vec<usize>,
}

/// Assigns each focal value a pool index from the same bin.
///
/// Bins are processed in ascending order and, within a bin, focal members are
/// visited in a random order. Focal members in a bin without pool members, or
/// in a bin whose pool members have been used up (without replacement), are
/// left unmatched (`None`).
pub(crate) fn assign<R: Rng>(
    focal: &[f64],
    pool: &[f64],
    bins: &Bins,
    replace: bool,
    rng: &mut R,
) -> Vec<Option<usize>> {
    let mut strata = BTreeMap::<usize, Stratum>::new();

    for (i, &value) in focal.iter().enumerate() {
        strata.entry(bins.index(value)).or_default().focal.push(i);
    }

    for (j, &value) in pool.iter().enumerate() {
        // Pool members in bins without focal members can never be drawn.
        if let Some(stratum) = strata.get_mut(&bins.index(value)) {
            stratum.pool.push(j);
        }
    }

    let mut assignments = vec![None; focal.len()];

    for Stratum {
        focal: mut members,
        pool: mut candidates,
    } in strata.into_values()
    {
        if candidates.is_empty() {
            continue;
        }

        members.shuffle(rng);

        if replace {
            for i in members {
                assignments[i] = Some(candidates[rng.gen_range(0..candidates.len())]);
            }
        } else {
            candidates.shuffle(rng);

            for (i, j) in members.into_iter().zip(candidates) {
                assignments[i] = Some(j);
            }
        }
    }

    assignments
}
