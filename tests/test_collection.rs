use halcyon::collection::RemovalList;

fn list_of(items: &[i32]) -> RemovalList<i32> {
    let mut list = RemovalList::new();
    list.extend(items.iter().copied());
    list
}

fn contents(list: &RemovalList<i32>) -> Vec<i32> {
    list.iter().copied().collect()
}

// ── queue_removal ─────────────────────────────────────────────────────────────

#[test]
fn queued_items_stay_until_applied() {
    let mut list = list_of(&[1, 2, 3]);
    assert!(list.queue_removal(1));
    assert_eq!(list.len(), 3);
    assert!(list.is_pending(1));
    assert_eq!(list[1], 2);
}

#[test]
fn queue_twice_reports_only_first() {
    let mut list = list_of(&[1, 2, 3]);
    assert!(list.queue_removal(0));
    assert!(!list.queue_removal(0));
    assert_eq!(list.pending_count(), 1);
}

#[test]
fn queue_out_of_range_is_noop() {
    let mut list = list_of(&[1, 2]);
    assert!(!list.queue_removal(5));
    assert_eq!(list.pending_count(), 0);
    assert_eq!(list.apply_pending_removals(), 0);
    assert_eq!(contents(&list), vec![1, 2]);
}

#[test]
fn live_skips_pending() {
    let mut list = list_of(&[10, 20, 30]);
    list.queue_removal(1);
    let live: Vec<(usize, i32)> = list.live().map(|(i, v)| (i, *v)).collect();
    assert_eq!(live, vec![(0, 10), (2, 30)]);
}

// ── apply_pending_removals ────────────────────────────────────────────────────

#[test]
fn apply_removes_exactly_queued_and_keeps_order() {
    let mut list = list_of(&[1, 2, 3, 4, 5, 6]);
    list.queue_removal(0);
    list.queue_removal(3);
    list.queue_removal(5);
    assert_eq!(list.apply_pending_removals(), 3);
    assert_eq!(contents(&list), vec![2, 3, 5]);
    assert_eq!(list.pending_count(), 0);
}

#[test]
fn apply_resets_marks_for_survivors() {
    let mut list = list_of(&[1, 2, 3]);
    list.queue_removal(0);
    list.apply_pending_removals();
    // Indices shifted; nothing left is pending.
    assert!(!list.is_pending(0));
    assert!(!list.is_pending(1));
    assert!(list.queue_removal(1));
    list.apply_pending_removals();
    assert_eq!(contents(&list), vec![2]);
}

#[test]
fn push_after_queue_is_not_pending() {
    let mut list = list_of(&[1]);
    list.queue_removal(0);
    list.push(2);
    assert!(!list.is_pending(1));
    list.apply_pending_removals();
    assert_eq!(contents(&list), vec![2]);
}

#[test]
fn clear_empties_everything() {
    let mut list = list_of(&[1, 2]);
    list.queue_removal(0);
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.pending_count(), 0);
}
