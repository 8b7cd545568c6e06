// ============================================================
// Layer 4 — Sample Grouper & Splitter
// ============================================================
// Splits matched pairs into train / val / test *by sample*,
// so every variant of a sample (`3192_005`, `3192_010`, ...)
// lands in the same split.
//
// Algorithm:
//   1. Sort pairs by stem
//   2. Group into sample name → pairs (BTreeMap, sorted keys)
//   3. Shuffle the sorted sample names with the caller's RNG
//   4. n_test = floor(n * test), n_val = floor(n * val)
//      shuffled[..n_test]              → test
//      shuffled[n_test..n_test+n_val]  → val
//      shuffled[n_test+n_val..]        → train
//   5. Concatenate each split's pairs in sample order
//   6. Draw min(20, |val|) pairs from val for visualisation,
//      continuing with the same RNG
//
// The slice order in step 4 and the RNG sharing in step 6 are
// part of the output contract: changing either changes which
// samples land where for a given seed.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom and
// rand::seq::index::sample for drawing without replacement.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::domain::pair::PairRecord;
use crate::domain::split::{DatasetSplits, SplitRatios};
use crate::error::{PrepError, PrepResult};

/// Upper bound on the visualisation subset.
pub const MAX_VIS_PAIRS: usize = 20;

/// The generator every split run starts from.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Group pairs by sample name. Within a group, pairs keep the
/// order they are given in, so callers pass them sorted by stem.
pub fn group_by_sample(pairs: Vec<PairRecord>) -> BTreeMap<String, Vec<PairRecord>> {
    let mut groups: BTreeMap<String, Vec<PairRecord>> = BTreeMap::new();
    for pair in pairs {
        groups
            .entry(pair.sample_id().to_string())
            .or_default()
            .push(pair);
    }
    groups
}

/// Split `pairs` into train/val/test by sample name and draw the
/// visualisation subset from val.
pub fn split_by_sample<R: Rng + ?Sized>(
    mut pairs: Vec<PairRecord>,
    ratios:    SplitRatios,
    rng:       &mut R,
) -> PrepResult<DatasetSplits> {
    if pairs.is_empty() {
        return Err(PrepError::EmptyInput);
    }

    pairs.sort_by(|a, b| a.stem.cmp(&b.stem));
    let mut groups = group_by_sample(pairs);

    // BTreeMap keys come out sorted; shuffle from that fixed start
    let mut names: Vec<String> = groups.keys().cloned().collect();
    names.shuffle(rng);

    let n = names.len();
    let (n_test, n_val) = ratios.counts(n);

    let train_samples = names.split_off(n_test + n_val);
    let val_samples   = names.split_off(n_test);
    let test_samples  = names;

    let test  = take_pairs(&mut groups, &test_samples);
    let val   = take_pairs(&mut groups, &val_samples);
    let train = take_pairs(&mut groups, &train_samples);

    let vis = sample_visualization(&val, rng);

    tracing::debug!(
        "Sample split: {} train, {} val, {} test ({} total)",
        train_samples.len(),
        val_samples.len(),
        test_samples.len(),
        n,
    );

    Ok(DatasetSplits {
        train,
        val,
        test,
        vis,
        train_samples,
        val_samples,
        test_samples,
    })
}

/// Concatenate the pair lists of `samples`, in that order.
fn take_pairs(groups: &mut BTreeMap<String, Vec<PairRecord>>, samples: &[String]) -> Vec<PairRecord> {
    samples
        .iter()
        .flat_map(|name| groups.remove(name).unwrap_or_default())
        .collect()
}

/// Draw `min(MAX_VIS_PAIRS, val.len())` pairs uniformly without
/// replacement. Returns an empty list for an empty `val`.
pub fn sample_visualization<R: Rng + ?Sized>(val: &[PairRecord], rng: &mut R) -> Vec<PairRecord> {
    let amount = MAX_VIS_PAIRS.min(val.len());
    if amount == 0 {
        return Vec::new();
    }
    index::sample(rng, val.len(), amount)
        .iter()
        .map(|i| val[i].clone())
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// `samples` samples with `variants` variants each: s000_0, s000_1, ...
    fn make_pairs(samples: usize, variants: usize) -> Vec<PairRecord> {
        let mut pairs = Vec::new();
        for s in 0..samples {
            for v in 0..variants {
                let stem = format!("s{s:03}_{v}");
                pairs.push(PairRecord::new(
                    stem.clone(),
                    format!("input/{stem}.png"),
                    format!("target/{stem}.npy"),
                ));
            }
        }
        pairs
    }

    fn sample_set(pairs: &[PairRecord]) -> BTreeSet<String> {
        pairs.iter().map(|p| p.sample_id().to_string()).collect()
    }

    fn split(pairs: Vec<PairRecord>, val: f64, test: f64, seed: u64) -> DatasetSplits {
        let ratios = SplitRatios::new(val, test).unwrap();
        split_by_sample(pairs, ratios, &mut seeded_rng(seed)).unwrap()
    }

    #[test]
    fn test_grouping_by_sample_name() {
        let pairs = vec![
            PairRecord::new("3192_005", "i/3192_005.png", "t/3192_005.npy"),
            PairRecord::new("3192_010", "i/3192_010.png", "t/3192_010.npy"),
            PairRecord::new("4201", "i/4201.png", "t/4201.npy"),
        ];
        let groups = group_by_sample(pairs);
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["3192", "4201"]);
        assert_eq!(groups["3192"].len(), 2);
        assert_eq!(groups["3192"][0].stem, "3192_005");
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let a = split(make_pairs(50, 3), 0.2, 0.1, 7);
        let b = split(make_pairs(50, 3), 0.2, 0.1, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut reversed = make_pairs(30, 2);
        reversed.reverse();
        let a = split(make_pairs(30, 2), 0.2, 0.1, 11);
        let b = split(reversed, 0.2, 0.1, 11);
        assert_eq!(a, b);
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let s = split(make_pairs(40, 4), 0.25, 0.15, 3);

        let train = sample_set(&s.train);
        let val   = sample_set(&s.val);
        let test  = sample_set(&s.test);

        assert!(train.is_disjoint(&val));
        assert!(train.is_disjoint(&test));
        assert!(val.is_disjoint(&test));

        let all: BTreeSet<String> = train.union(&val).chain(test.iter()).cloned().collect();
        assert_eq!(all.len(), 40);
        assert_eq!(s.total_pairs(), 160);
    }

    #[test]
    fn test_ratio_adherence() {
        // 40 * 0.25 = 10, 40 * 0.5 = 20
        let s = split(make_pairs(40, 2), 0.25, 0.5, 5);
        assert_eq!(s.test_samples.len(), 20);
        assert_eq!(s.val_samples.len(), 10);
        assert_eq!(s.train_samples.len(), 10);
        assert_eq!(s.total_samples(), 40);
    }

    #[test]
    fn test_slices_follow_shuffled_order() {
        let s = split(make_pairs(20, 1), 0.25, 0.25, 9);

        let mut expected: Vec<String> = (0..20).map(|i| format!("s{i:03}")).collect();
        expected.shuffle(&mut seeded_rng(9));

        assert_eq!(s.test_samples, expected[..5].to_vec());
        assert_eq!(s.val_samples, expected[5..10].to_vec());
        assert_eq!(s.train_samples, expected[10..].to_vec());
    }

    #[test]
    fn test_variants_stay_together_in_stem_order() {
        let s = split(make_pairs(10, 3), 0.5, 0.0, 1);
        for chunk in s.val.chunks(3) {
            let stems: Vec<&str> = chunk.iter().map(|p| p.stem.as_str()).collect();
            let name = chunk[0].sample_id();
            assert_eq!(stems, vec![
                format!("{name}_0"), format!("{name}_1"), format!("{name}_2"),
            ]);
        }
    }

    #[test]
    fn test_zero_test_ratio_gives_empty_test() {
        let s = split(make_pairs(10, 1), 0.5, 0.0, 2);
        assert!(s.test.is_empty());
        assert!(s.test_samples.is_empty());
        assert_eq!(s.val.len(), 5);
    }

    #[test]
    fn test_visualization_bound_and_membership() {
        let s = split(make_pairs(100, 2), 0.25, 0.0, 4);
        assert_eq!(s.val.len(), 50);
        assert_eq!(s.vis.len(), MAX_VIS_PAIRS);
        assert!(s.vis.iter().all(|p| s.val.contains(p)));

        let unique: BTreeSet<&str> = s.vis.iter().map(|p| p.stem.as_str()).collect();
        assert_eq!(unique.len(), s.vis.len());

        let small = split(make_pairs(10, 1), 0.5, 0.0, 4);
        assert_eq!(small.vis.len(), 5);
    }

    #[test]
    fn test_visualization_continues_split_rng() {
        let pairs = make_pairs(30, 1);
        let ratios = SplitRatios::new(0.5, 0.0).unwrap();
        let s = split_by_sample(pairs.clone(), ratios, &mut seeded_rng(42)).unwrap();

        let mut rng = seeded_rng(42);
        let mut names: Vec<String> = group_by_sample(pairs).keys().cloned().collect();
        names.shuffle(&mut rng);
        let expected_vis = sample_visualization(&s.val, &mut rng);

        assert_eq!(s.vis, expected_vis);
    }

    #[test]
    fn test_empty_val_gives_empty_vis() {
        let s = split(make_pairs(3, 1), 0.1, 0.0, 0);
        assert!(s.val.is_empty());
        assert!(s.vis.is_empty());
        assert_eq!(s.train.len(), 3);
    }

    #[test]
    fn test_two_samples_half_val() {
        let pairs = vec![
            PairRecord::new("a_1", "input/a_1.png", "target/a_1.png"),
            PairRecord::new("a_2", "input/a_2.png", "target/a_2.png"),
            PairRecord::new("b_1", "input/b_1.png", "target/b_1.png"),
        ];
        for seed in 0..10 {
            let s = split(pairs.clone(), 0.5, 0.0, seed);
            assert_eq!(s.val_samples.len(), 1);
            assert_eq!(s.train_samples.len(), 1);
            assert_ne!(s.val_samples, s.train_samples);

            let expected = if s.val_samples[0] == "a" { (2, 1) } else { (1, 2) };
            assert_eq!((s.val.len(), s.train.len()), expected);
        }
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let ratios = SplitRatios::new(0.1, 0.0).unwrap();
        let result = split_by_sample(Vec::new(), ratios, &mut seeded_rng(0));
        assert!(matches!(result, Err(PrepError::EmptyInput)));
    }
}
