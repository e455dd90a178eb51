//! Tests for the RIQ table.

use super::*;
use rand::Rng;
use routeforge_core::Interval;
use routeforge_test::seeded_rng;

struct Sequence {
    capacities: Vec<ExtendedInterval>,
    transits: Vec<Interval>,
    prefixes: Vec<ExtendedInterval>,
    table: RiqTable,
}

/// `transits[t]` enters index `t`; `transits[0]` is unused.
fn sequence(capacities: Vec<Interval>, transits: Vec<Interval>) -> Sequence {
    let capacities: Vec<ExtendedInterval> = capacities.into_iter().map(Into::into).collect();
    let mut prefixes = vec![ExtendedInterval::ZERO];
    let mut leaves = Vec::new();
    for t in 1..capacities.len() {
        let prefix = prefixes[t - 1] + ExtendedInterval::from(transits[t]);
        prefixes.push(prefix);
        leaves.push(RiqNode::leaf(capacities[t], prefix, !transits[t].is_empty()).unwrap());
    }
    leaves.push(RiqNode::PLACEHOLDER);
    let mut table = RiqTable::default();
    table.push_path(&leaves);
    Sequence {
        capacities,
        transits,
        prefixes,
        table,
    }
}

fn linear(seq: &Sequence, cumul: ExtendedInterval, i: usize, j: usize) -> Option<ExtendedInterval> {
    let mut cumul = cumul;
    for t in i + 1..=j {
        if seq.transits[t].is_empty() {
            return None;
        }
        cumul = (cumul + ExtendedInterval::from(seq.transits[t])).intersection(&seq.capacities[t]);
        if cumul.is_empty() {
            return None;
        }
    }
    Some(cumul)
}

fn fast(seq: &Sequence, cumul: ExtendedInterval, i: usize, j: usize) -> Option<ExtendedInterval> {
    seq.table
        .window(i, j)
        .propagate(cumul, seq.prefixes[i], seq.prefixes[j])
        .unwrap()
}

fn random_interval<R: Rng>(rng: &mut R, low: i64, high: i64) -> Interval {
    let a = rng.random_range(low..=high);
    let b = rng.random_range(low..=high);
    let mut interval = Interval::new(a.min(b), a.max(b));
    match rng.random_range(0..20) {
        0 => interval.min = i64::MIN,
        1 => interval.max = i64::MAX,
        2 => interval = Interval::new(interval.max + 1, interval.min),
        _ => {}
    }
    interval
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_overflowing_chain_is_rejected() {
    // Capacity [0, 10], transits 4, 3, 5: cumuls 4, 7, 12.
    let seq = sequence(
        vec![Interval::new(0, 10); 4],
        vec![
            Interval::point(0),
            Interval::point(4),
            Interval::point(3),
            Interval::point(5),
        ],
    );
    let start = ExtendedInterval::from(Interval::point(0));
    assert_eq!(fast(&seq, start, 0, 2), Some(Interval::point(7).into()));
    assert_eq!(fast(&seq, start, 0, 3), None);
    assert_eq!(linear(&seq, start, 0, 3), None);
    assert_eq!(fast(&seq, start, 1, 3), Some(Interval::point(8).into()));
}

#[test]
fn test_unbounded_transit_keeps_infinity_count() {
    let seq = sequence(
        vec![Interval::unbounded(); 3],
        vec![
            Interval::point(0),
            Interval::new(1, i64::MAX),
            Interval::new(2, i64::MAX),
        ],
    );
    let cumul = fast(&seq, Interval::point(0).into(), 0, 2).unwrap();
    assert_eq!(cumul, linear(&seq, Interval::point(0).into(), 0, 2).unwrap());
    assert_eq!(cumul.to_interval(), Interval::new(3, i64::MAX));
}

#[test]
fn test_empty_transit_is_infeasible() {
    let seq = sequence(
        vec![Interval::new(0, 100); 5],
        vec![
            Interval::point(0),
            Interval::point(1),
            Interval::new(3, 2),
            Interval::point(1),
            Interval::point(1),
        ],
    );
    let start = ExtendedInterval::from(Interval::point(0));
    assert_eq!(fast(&seq, start, 0, 4), None);
    assert!(fast(&seq, start, 2, 4).is_some());
}

#[test]
fn test_out_of_range_values_are_reported() {
    let wide = ExtendedInterval::from(Interval::new(-(1 << 62), 1 << 62));
    let capacity = ExtendedInterval::from(Interval::new(0, 10));
    // Lower aggregates of capacity 0 minus a prefix of -2^63 overflow.
    let saturated = ExtendedInterval::from(Interval::new(i64::MIN + 1, 0)) + wide + wide;
    assert!(RiqNode::leaf(capacity, saturated, true).is_none());

    let leaf = RiqNode::leaf(capacity, wide, true).unwrap();
    let entry = ExtendedInterval::from(Interval::point(i64::MAX - 1));
    let from = ExtendedInterval::from(Interval::point(-2));
    assert_eq!(leaf.propagate(entry, from, wide), None);
    assert_eq!(
        leaf.propagate(Interval::point(3).into(), ExtendedInterval::ZERO, wide),
        Some(Some(Interval::new(0, 10).into()))
    );
}

#[test]
fn test_layers_cover_longest_window() {
    let seq = sequence(vec![Interval::unbounded(); 9], vec![Interval::point(1); 9]);
    // Span 8 needs windows of 1, 2, 4 and 8.
    assert_eq!(seq.table.num_layers(), 4);
    assert_eq!(seq.table.len(), 9);
}

// ============================================================================
// Differential
// ============================================================================

#[test]
fn test_every_window_matches_linear_walk() {
    let mut rng = seeded_rng(42);
    for _ in 0..200 {
        let len = rng.random_range(2..24);
        let capacities = (0..len).map(|_| random_interval(&mut rng, -5, 30)).collect();
        let transits = (0..len).map(|_| random_interval(&mut rng, -3, 8)).collect();
        let seq = sequence(capacities, transits);
        for i in 0..len {
            for j in i + 1..len {
                let entry = ExtendedInterval::from(random_interval(&mut rng, -5, 30))
                    .intersection(&seq.capacities[i]);
                if entry.is_empty() {
                    continue;
                }
                assert_eq!(fast(&seq, entry, i, j), linear(&seq, entry, i, j), "window ({i}, {j}]");
            }
        }
    }
}

#[test]
fn test_tables_of_several_paths_stay_separate() {
    let mut rng = seeded_rng(43);
    let mut table = RiqTable::default();
    let mut sequences = Vec::new();
    for _ in 0..5 {
        let len = rng.random_range(2..12);
        let capacities = (0..len).map(|_| random_interval(&mut rng, 0, 20)).collect();
        let transits = (0..len).map(|_| random_interval(&mut rng, 0, 5)).collect();
        let seq = sequence(capacities, transits);
        sequences.push(seq);
    }
    let mut offsets = Vec::new();
    for seq in &sequences {
        offsets.push(table.len());
        let mut leaves = Vec::new();
        for t in 1..seq.capacities.len() {
            leaves.push(RiqNode::leaf(seq.capacities[t], seq.prefixes[t], !seq.transits[t].is_empty()).unwrap());
        }
        leaves.push(RiqNode::PLACEHOLDER);
        table.push_path(&leaves);
    }
    let ranges: Vec<(usize, usize)> = offsets
        .iter()
        .zip(&sequences)
        .map(|(&o, s)| (o, o + s.capacities.len()))
        .collect();
    table.assert_consistent(&ranges);
    for (seq, &offset) in sequences.iter().zip(&offsets) {
        let len = seq.capacities.len();
        for i in 0..len {
            for j in i + 1..len {
                assert_eq!(table.window(offset + i, offset + j), seq.table.window(i, j));
            }
        }
    }
}
