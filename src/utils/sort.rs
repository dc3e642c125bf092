use std::cmp::Ordering;

/// Positions of `scores` ordered by score descending.
/// - Equal scores keep their original relative order (stable)
/// - NaN ranks after every number
///
/// # Returns
/// * `Vec<usize>` - permutation of `0..scores.len()`
#[inline]
pub fn rank_desc_stable(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // slice::sort_by is stable, ties fall back to the original position
    order.sort_by(|&a, &b| cmp_desc(scores[a], scores[b]));
    order
}

#[inline(always)]
fn cmp_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compare with an explicit (score desc, original index asc) key sort.
    fn baseline(scores: &[f64]) -> Vec<usize> {
        let mut pairs: Vec<(f64, usize)> = scores.iter().copied().enumerate().map(|(i, s)| (s, i)).collect();
        pairs.sort_unstable_by(|a, b| {
            let key = |s: f64| if s.is_nan() { f64::NEG_INFINITY } else { s };
            key(b.0).total_cmp(&key(a.0)).then_with(|| a.1.cmp(&b.1))
        });
        pairs.into_iter().map(|(_, i)| i).collect()
    }

    /// tiny deterministic PRNG (xorshift32)
    struct Rng(u32);
    impl Rng {
        fn new(seed: u32) -> Self { Self(seed) }
        fn next_u32(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }
    }

    #[test]
    fn rank_handles_empty_and_single() {
        assert!(rank_desc_stable(&[]).is_empty());
        assert_eq!(rank_desc_stable(&[0.3]), vec![0]);
    }

    #[test]
    fn rank_keeps_ties_in_original_order() {
        let scores = [0.5, 0.9, 0.5, 0.1, 0.9];
        assert_eq!(rank_desc_stable(&scores), vec![1, 4, 0, 2, 3]);
    }

    #[test]
    fn rank_puts_nan_last() {
        let scores = [f64::NAN, 0.2, f64::NEG_INFINITY, 1.0];
        assert_eq!(rank_desc_stable(&scores), vec![3, 1, 2, 0]);
    }

    #[test]
    fn rank_matches_baseline_many_sizes() {
        let mut rng = Rng::new(0x1234_5678);
        for &n in &[2usize, 3, 7, 16, 33, 128, 1024] {
            // few distinct values so ties are common
            let scores: Vec<f64> = (0..n).map(|_| (rng.next_u32() % 8) as f64 * 0.125).collect();
            assert_eq!(rank_desc_stable(&scores), baseline(&scores), "mismatch at n={n}");
        }
    }
}
