//! Tests for domain types.

use super::*;
use crate::RouteForgeError;

// ============================================================================
// PathTopology Tests
// ============================================================================

mod topology {
    use super::*;

    #[test]
    fn test_valid_topology() {
        let topology = PathTopology::new(8, vec![0, 2, 4], vec![1, 3, 5]).unwrap();
        assert_eq!(topology.num_nodes(), 8);
        assert_eq!(topology.num_paths(), 3);
        assert_eq!(topology.start(2), 4);
        assert_eq!(topology.path_of_end(3), Some(1));
        assert!(topology.is_end(5));
        assert!(!topology.is_end(6));
    }

    #[test]
    fn test_length_mismatch() {
        let err = PathTopology::new(4, vec![0, 2], vec![1]).unwrap_err();
        assert!(matches!(err, RouteForgeError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_node_out_of_range() {
        let err = PathTopology::new(4, vec![0], vec![9]).unwrap_err();
        assert!(matches!(
            err,
            RouteForgeError::NodeOutOfRange {
                node: 9,
                num_nodes: 4
            }
        ));
    }

    #[test]
    fn test_shared_endpoint_rejected() {
        assert!(PathTopology::new(4, vec![0, 1], vec![1, 2]).is_err());
        assert!(PathTopology::new(4, vec![0], vec![0]).is_err());
    }
}

// ============================================================================
// Delta Tests
// ============================================================================

mod delta {
    use super::*;

    #[test]
    fn test_set_next_and_unbound() {
        let mut delta = Delta::with_capacity(4);
        assert!(delta.is_empty());
        delta.set_next(1, 2);
        delta.set_unbound(3);

        assert_eq!(delta.len(), 2);
        assert!(delta.has_unbound());
        assert_eq!(
            delta.elements()[0],
            DeltaElement {
                index: 1,
                value: 2,
                bound: true
            }
        );
        assert!(!delta.elements()[1].bound);

        delta.clear();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_collect_from_pairs() {
        let delta: Delta = vec![(0, 3), (3, 1)].into_iter().collect();
        assert_eq!(delta.len(), 2);
        assert!(!delta.has_unbound());
    }
}

// ============================================================================
// Assignment Tests
// ============================================================================

mod assignment {
    use super::*;

    fn topology() -> PathTopology {
        PathTopology::new(7, vec![0, 2], vec![1, 3]).unwrap()
    }

    #[test]
    fn test_from_routes() {
        let topology = topology();
        let assignment = Assignment::from_routes(&topology, &[vec![0, 4, 1], vec![2, 3]]);
        assert_eq!(assignment.next(0), Some(4));
        assert_eq!(assignment.next(4), Some(1));
        assert_eq!(assignment.next(2), Some(3));
        assert_eq!(assignment.next(1), None);
        assert!(assignment.is_loop(5));
        assert!(assignment.is_loop(6));
    }

    #[test]
    fn test_apply_delta() {
        let topology = topology();
        let mut assignment = Assignment::from_routes(&topology, &[vec![0, 4, 1], vec![2, 3]]);
        let mut delta = Delta::new();
        delta.set_next(0, 1);
        delta.set_next(4, 4);
        delta.set_next(2, 4);
        delta.set_next(4, 3);
        delta.set_unbound(6);
        assignment.apply(&delta);

        assert_eq!(assignment.route(&topology, 0), vec![0, 1]);
        assert_eq!(assignment.route(&topology, 1), vec![2, 4, 3]);
        assert!(assignment.is_loop(6));
    }

    #[test]
    fn test_to_delta_rebuilds_assignment() {
        let topology = topology();
        let assignment = Assignment::from_routes(&topology, &[vec![0, 5, 4, 1], vec![2, 3]]);
        let mut rebuilt = Assignment::new(7);
        rebuilt.apply(&assignment.to_delta());
        assert_eq!(rebuilt, assignment);
    }
}
