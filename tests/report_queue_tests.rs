use alex::kernel::reports::{Report, ReportQueue};

#[test]
fn drain_returns_newest_first() {
    let queue = ReportQueue::new();
    queue.enqueue("A", "news");
    queue.enqueue("B", "weather");
    queue.enqueue("C", "mail");

    let messages: Vec<String> = queue.drain_all().map(|r| r.message).collect();
    assert_eq!(messages, vec!["C", "B", "A"]);
    assert!(queue.is_empty());
}

#[test]
fn partial_drain_leaves_the_rest_queued() {
    let queue = ReportQueue::new();
    queue.enqueue("A", "news");
    queue.enqueue("B", "news");

    let first = queue.drain_all().next();
    assert_eq!(
        first,
        Some(Report {
            message: "B".into(),
            category: "news".into()
        })
    );
    assert_eq!(queue.len(), 1);
}

#[test]
fn reports_added_during_drain_are_picked_up() {
    let queue = ReportQueue::new();
    queue.enqueue("A", "news");

    let mut drain = queue.drain_all();
    assert_eq!(drain.next().map(|r| r.message).as_deref(), Some("A"));
    queue.enqueue("late", "news");
    assert_eq!(drain.next().map(|r| r.message).as_deref(), Some("late"));
    assert_eq!(drain.next(), None);
}

#[test]
fn empty_queue_drains_nothing() {
    let queue = ReportQueue::new();
    assert_eq!(queue.drain_all().count(), 0);
}
