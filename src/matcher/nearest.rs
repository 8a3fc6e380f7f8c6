//! Nearest-value matching.
//!
//! Every focal value is paired with the pool value that is numerically
//! closest to it. Pool members are never consumed, so this strategy only
//! supports sampling with replacement.

/// Assigns each focal value the index of the closest pool value.
///
/// Focal values are visited in ascending order of their value. Ties in
/// distance are broken by choosing the lowest pool index. The returned vector
/// is in focal order and is always fully populated unless `pool` is empty.
pub(crate) fn assign(focal: &[f64], pool: &[f64]) -> Vec<Option<usize>> {
    let mut sorted = (0..pool.len()).collect::<Vec<_>>();
    sorted.sort_by(|&a, &b| pool[a].total_cmp(&pool[b]).then(a.cmp(&b)));

    let mut order = (0..focal.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| focal[a].total_cmp(&focal[b]).then(a.cmp(&b)));

    let mut assignments = vec![None; focal.len()];

    for i in order {
        assignments[i] = closest(&sorted, pool, focal[i]);
    }

    assignments
}

/// Finds the index of the pool value closest to `value`.
///
/// `sorted` holds the pool indices ordered by (value, index), so the first
/// index within a run of equal values is always the lowest one.
fn closest(sorted: &[usize], pool: &[f64], value: f64) -> Option<usize> {
    let upper = sorted.partition_point(|&j| pool[j] < value);
    let above = sorted.get(upper).copied();

    let below = match upper {
        0 => None,
        position => {
            let nearest_below = pool[sorted[position - 1]];
            let first = sorted.partition_point(|&j| pool[j] < nearest_below);
            Some(sorted[first])
        }
    };

    match (below, above) {
        (Some(b), Some(a)) => {
            let distance_below = value - pool[b];
            let distance_above = pool[a] - value;

            if distance_below < distance_above {
                Some(b)
            } else if distance_above < distance_below {
                Some(a)
            } else {
                Some(a.min(b))
            }
        }
        (below, above) => below.or(above),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_nearest() {
        let assignments = assign(&[5.0, 50.0], &[5.0, 6.0, 48.0]);
        assert_eq!(assignments, vec![Some(0), Some(2)]);
    }

    #[test]
    fn test_ties_prefer_lowest_pool_index() {
        // 4 and 6 are equally far from 5.
        let assignments = assign(&[5.0], &[6.0, 4.0]);
        assert_eq!(assignments, vec![Some(0)]);

        // Duplicated values resolve to the first occurrence.
        let assignments = assign(&[1.0, 9.0], &[9.0, 1.0, 1.0, 9.0]);
        assert_eq!(assignments, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_out_of_range_values() {
        let assignments = assign(&[-100.0, 100.0], &[0.0, 1.0, 2.0]);
        assert_eq!(assignments, vec![Some(0), Some(2)]);
    }

    #[test]
    fn test_local_optimality() {
        let pool = [3.0, 17.5, 9.25, 12.0, 0.5, 17.5, 30.0];
        let focal = [0.0, 4.0, 10.6, 14.75, 17.5, 25.0, 31.0, 9.25];

        for (i, assignment) in assign(&focal, &pool).into_iter().enumerate() {
            let chosen = assignment.unwrap();
            let distance = (focal[i] - pool[chosen]).abs();

            for (j, value) in pool.iter().enumerate() {
                let other = (focal[i] - value).abs();
                assert!(distance <= other);

                if distance == other {
                    assert!(chosen <= j);
                }
            }
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert!(assign(&[], &[1.0]).is_empty());
        assert_eq!(assign(&[1.0], &[]), vec![None]);
    }
}
