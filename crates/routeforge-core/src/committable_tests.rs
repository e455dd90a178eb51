//! Tests for committable containers.

use super::*;

// ============================================================================
// CommittableArray Tests
// ============================================================================

mod committable_array {
    use super::*;

    #[test]
    fn test_new_is_committed() {
        let array = CommittableArray::new(4, 3i64);
        assert_eq!(array.len(), 4);
        for i in 0..4 {
            assert_eq!(array.get(i), 3);
            assert_eq!(array.get_committed(i), 3);
        }
        assert!(array.changed_indices().is_empty());
    }

    #[test]
    fn test_set_commit_round_trip() {
        let mut array = CommittableArray::new(5, 0i64);
        array.set(3, 11);
        array.commit();

        assert_eq!(array.get(3), 11);
        assert_eq!(array.get_committed(3), 11);
        assert!(array.changed_indices().is_empty());
    }

    #[test]
    fn test_set_revert_restores_committed() {
        let mut array = CommittableArray::new(5, 0i64);
        array.set(2, 4);
        array.commit();

        array.set(2, 9);
        assert_eq!(array.get(2), 9);
        assert_eq!(array.get_committed(2), 4);
        assert_eq!(array.changed_indices(), &[2]);

        array.revert();
        assert_eq!(array.get(2), 4);
        assert!(array.changed_indices().is_empty());
    }

    #[test]
    fn test_changed_indices_have_no_duplicates() {
        let mut array = CommittableArray::new(6, 0u32);
        array.set(4, 1);
        array.set(1, 2);
        array.set(4, 3);
        array.set(1, 4);
        array.set(0, 5);

        assert_eq!(array.changed_indices(), &[4, 1, 0]);
        assert_eq!(array.get(4), 3);
        assert_eq!(array.get(1), 4);
    }

    #[test]
    fn test_commit_only_touches_changed() {
        let mut array = CommittableArray::new(3, 1i64);
        array.set(0, 10);
        array.commit();
        array.set(1, 20);
        array.revert();

        let committed: Vec<_> = array.committed_values().collect();
        assert_eq!(committed, vec![10, 1, 1]);
    }

    #[test]
    fn test_index_can_change_again_after_commit() {
        let mut array = CommittableArray::new(2, 0i64);
        array.set(1, 5);
        array.commit();
        array.set(1, 6);
        assert_eq!(array.changed_indices(), &[1]);
        array.commit();
        assert_eq!(array.get_committed(1), 6);
    }

    #[test]
    fn test_set_all_and_commit() {
        let mut array = CommittableArray::new(3, 0i64);
        array.set(0, 8);
        array.set_all_and_commit(-1);

        assert!(array.changed_indices().is_empty());
        for i in 0..3 {
            assert_eq!(array.get(i), -1);
            assert_eq!(array.get_committed(i), -1);
        }
        // A stale changed flag would suppress this registration.
        array.set(0, 2);
        assert_eq!(array.changed_indices(), &[0]);
    }

    #[test]
    fn test_empty_array() {
        let mut array: CommittableArray<i64> = CommittableArray::new(0, 0);
        assert!(array.is_empty());
        array.commit();
        array.revert();
    }
}

// ============================================================================
// CommittableValue Tests
// ============================================================================

mod committable_value {
    use super::*;

    #[test]
    fn test_set_commit() {
        let mut value = CommittableValue::new(1i64);
        value.set(2);
        assert_eq!(value.get(), 2);
        assert_eq!(value.get_committed(), 1);
        value.commit();
        assert_eq!(value.get_committed(), 2);
        assert!(!value.has_changed());
    }

    #[test]
    fn test_set_revert() {
        let mut value = CommittableValue::new(1i64);
        value.set(2);
        value.revert();
        assert_eq!(value.get(), 1);
        assert!(!value.has_changed());
    }

    #[test]
    fn test_set_and_commit() {
        let mut value = CommittableValue::new(1i64);
        value.set(5);
        value.set_and_commit(9);
        assert_eq!(value.get(), 9);
        assert_eq!(value.get_committed(), 9);
        assert!(!value.has_changed());
    }
}
