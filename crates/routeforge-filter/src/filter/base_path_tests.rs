//! Tests for BasePathFilter.

use super::*;
use routeforge_test::{init_tracing, seeded_rng, MoveGenerator, RandomRoutes};

/// Hooks recording every call they receive.
#[derive(Debug, Default)]
struct Recorder {
    disabled: bool,
    reject_initialize: bool,
    reject_path: Option<usize>,
    accepted: Vec<(usize, usize, usize)>,
    synced: Vec<usize>,
    after_calls: usize,
}

impl PathFilterHooks for Recorder {
    fn name(&self) -> &str {
        "Recorder"
    }

    fn on_synchronize_path_from_start(&mut self, _state: &PathFilterState, start: usize) {
        self.synced.push(start);
    }

    fn on_before_synchronize_paths(&mut self, _state: &PathFilterState) {
        self.synced.clear();
    }

    fn on_after_synchronize_paths(&mut self, _state: &PathFilterState) {
        self.after_calls += 1;
    }

    fn initialize_accept_path(&mut self, _state: &PathFilterState) -> bool {
        self.accepted.clear();
        !self.reject_initialize
    }

    fn accept_path(&mut self, state: &PathFilterState, path_start: usize, chain_start: usize, chain_end: usize) -> bool {
        self.accepted.push((path_start, chain_start, chain_end));
        self.reject_path != state.topology().path_of_start(path_start)
    }

    fn finalize_accept_path(&mut self, _state: &PathFilterState, objective_min: i64, objective_max: i64) -> bool {
        objective_min <= objective_max
    }

    fn disable_filtering(&self) -> bool {
        self.disabled
    }
}

/// Two paths: 0 -> 2 and 1 -> 3; customers 4..8.
fn topology() -> PathTopology {
    PathTopology::new(8, vec![0, 1], vec![2, 3]).unwrap()
}

/// `0 4 5 2` and `1 6 3`; customer 7 unperformed.
fn assignment() -> Assignment {
    Assignment::from_routes(&topology(), &[vec![0, 4, 5, 2], vec![1, 6, 3]])
}

fn synced(hooks: Recorder) -> BasePathFilter<Recorder> {
    let mut filter = BasePathFilter::new(topology(), hooks);
    filter.synchronize(&assignment(), None);
    filter
}

// ============================================================================
// Synchronize
// ============================================================================

#[test]
fn test_full_sync_ranks_and_path_starts() {
    init_tracing();
    let filter = synced(Recorder::default());
    let state = filter.state();

    assert_eq!(state.rank(0), Some(0));
    assert_eq!(state.rank(4), Some(1));
    assert_eq!(state.rank(5), Some(2));
    assert_eq!(state.rank(2), Some(3));
    assert_eq!(state.rank(6), Some(1));
    assert_eq!(state.rank(3), Some(2));
    assert_eq!(state.rank(7), None);

    assert_eq!(state.get_path_start(5), Some(0));
    assert_eq!(state.get_path_start(6), Some(1));
    assert_eq!(state.get_path_start(7), None);
    assert_eq!(state.value(4), Some(5));
    assert_eq!(state.value(2), None);
    assert!(state.is_var_synced(7));
    assert_eq!(state.new_synchronized_unperformed_nodes(), &[7]);

    assert_eq!(filter.hooks().synced, vec![0, 1]);
    assert_eq!(filter.hooks().after_calls, 1);
}

#[test]
fn test_incremental_sync_touches_only_changed_paths() {
    let mut filter = synced(Recorder::default());
    // Unperform 5 on path 0.
    let delta: Delta = [(4, 2), (5, 5)].into_iter().collect();
    let topology = topology();
    let next = Assignment::from_routes(&topology, &[vec![0, 4, 2], vec![1, 6, 3]]);
    filter.synchronize(&next, Some(&delta));

    assert_eq!(filter.hooks().synced, vec![0]);
    assert_eq!(filter.state().new_synchronized_unperformed_nodes(), &[5]);
    assert_eq!(filter.state().rank(5), None);
    assert_eq!(filter.state().get_path_start(5), None);
    assert_eq!(filter.state().rank(2), Some(2));
    assert_eq!(filter.state().rank(6), Some(1));
}

#[test]
fn test_incremental_sync_matches_full_sync() {
    let mut rng = seeded_rng(17);
    let mut solution = RandomRoutes::generate(&mut rng, 3, 12);
    let generator = MoveGenerator::new(&solution.topology);
    let mut incremental = BasePathFilter::new(solution.topology.clone(), Recorder::default());
    incremental.synchronize(&solution.assignment(), None);

    for _ in 0..200 {
        let Some(step) = generator.random_move(&mut rng, &solution.routes) else {
            continue;
        };
        solution.routes = step.routes;
        let assignment = solution.assignment();
        incremental.synchronize(&assignment, Some(&step.delta));

        let mut full = BasePathFilter::new(solution.topology.clone(), Recorder::default());
        full.synchronize(&assignment, None);
        for node in 0..solution.num_nodes() {
            assert_eq!(incremental.state().rank(node), full.state().rank(node), "rank of {node}");
            assert_eq!(
                incremental.state().get_path_start(node),
                full.state().get_path_start(node),
                "path start of {node}"
            );
            assert_eq!(incremental.state().value(node), full.state().value(node), "next of {node}");
        }
    }
}

#[test]
fn test_reset_forces_full_sync() {
    let mut filter = synced(Recorder::default());
    filter.reset();
    assert!(!filter.state().has_any_synced_path());
    assert_eq!(filter.state().value(0), None);

    let delta: Delta = [(4, 2), (5, 5)].into_iter().collect();
    let topology = topology();
    let next = Assignment::from_routes(&topology, &[vec![0, 4, 2], vec![1, 6, 3]]);
    filter.synchronize(&next, Some(&delta));

    // The baseline was dropped, so the whole assignment is reloaded.
    assert_eq!(filter.hooks().synced, vec![0, 1]);
    assert_eq!(filter.state().rank(4), Some(1));
    assert_eq!(filter.state().rank(2), Some(2));
    assert_eq!(filter.state().rank(3), Some(2));
}

// ============================================================================
// Accept
// ============================================================================

#[test]
fn test_touched_paths_and_chain_bounds() {
    let mut filter = synced(Recorder::default());
    // Relocate 5 between 6 and 3.
    let delta: Delta = [(4, 2), (6, 5), (5, 3)].into_iter().collect();
    assert!(filter.accept(&delta, None, i64::MIN, i64::MAX));

    let state = filter.state();
    assert_eq!(state.touched_path_starts(), &[0, 1]);
    assert!(state.path_start_touched(0));
    assert!(state.path_start_touched(1));
    assert!(!state.path_start_touched(4));
    assert_eq!(filter.hooks().accepted, vec![(0, 4, 5), (1, 6, 6)]);

    assert_eq!(state.get_next(4), Some(2));
    assert_eq!(state.get_next(6), Some(5));
    assert_eq!(state.get_next(5), Some(3));
    assert_eq!(state.get_next(0), Some(4));
    // Synchronized values are untouched.
    assert_eq!(state.value(5), Some(2));
}

#[test]
fn test_inserted_loop_does_not_touch_extra_path() {
    let mut filter = synced(Recorder::default());
    let delta: Delta = [(6, 7), (7, 3)].into_iter().collect();
    assert!(filter.accept(&delta, None, i64::MIN, i64::MAX));
    assert_eq!(filter.state().touched_path_starts(), &[1]);
    assert_eq!(filter.hooks().accepted, vec![(1, 6, 6)]);
}

#[test]
fn test_lns_short_circuits() {
    let mut filter = synced(Recorder::default());
    let mut delta: Delta = [(4, 2)].into_iter().collect();
    delta.set_unbound(5);

    assert!(filter.accept(&delta, None, i64::MIN, i64::MAX));
    assert!(filter.state().lns_detected());
    assert!(filter.hooks().accepted.is_empty());
    assert!(filter.state().touched_path_starts().is_empty());

    filter.revert();
    assert!(!filter.state().lns_detected());
}

#[test]
fn test_path_rejection() {
    let mut filter = synced(Recorder {
        reject_path: Some(1),
        ..Recorder::default()
    });
    let on_path_0: Delta = [(4, 2), (5, 5)].into_iter().collect();
    assert!(filter.accept(&on_path_0, None, i64::MIN, i64::MAX));

    let on_path_1: Delta = [(1, 3), (6, 6)].into_iter().collect();
    assert!(!filter.accept(&on_path_1, None, i64::MIN, i64::MAX));
}

#[test]
fn test_initialize_and_finalize_rejection() {
    let mut filter = synced(Recorder {
        reject_initialize: true,
        ..Recorder::default()
    });
    let delta: Delta = [(4, 2), (5, 5)].into_iter().collect();
    assert!(!filter.accept(&delta, None, i64::MIN, i64::MAX));
    assert!(filter.hooks().accepted.is_empty());

    let mut filter = synced(Recorder::default());
    assert!(!filter.accept(&delta, None, 1, 0));
    assert_eq!(filter.hooks().accepted.len(), 1);
}

#[test]
fn test_disabled_filter_accepts_and_skips_sync() {
    let filter = synced(Recorder {
        disabled: true,
        reject_initialize: true,
        ..Recorder::default()
    });
    assert!(filter.hooks().synced.is_empty());
    assert_eq!(filter.hooks().after_calls, 0);
    // Values are still kept.
    assert_eq!(filter.state().value(0), Some(4));
    assert_eq!(filter.state().rank(0), None);

    let mut filter = filter;
    let delta: Delta = [(4, 2), (5, 5)].into_iter().collect();
    assert!(filter.accept(&delta, None, 1, 0));
}
