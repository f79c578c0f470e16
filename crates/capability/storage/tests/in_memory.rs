use domain::Sample;
use plc_storage::{AppendOutcome, InMemorySampleLog, SampleLog};

#[tokio::test]
async fn in_memory_log_skips_duplicates() {
    let log = InMemorySampleLog::new();
    assert!(log.is_empty());

    let a = Sample::new(42, 17, 500, 3);
    let b = Sample::new(43, 17, 500, 3);
    log.append_if_changed(a).await.expect("append");
    let outcome = log.append_if_changed(a).await.expect("append");
    assert_eq!(outcome, AppendOutcome::Unchanged);
    log.append_if_changed(b).await.expect("append");

    let records = log.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sample, a);
    assert_eq!(records[1].sample, b);
    assert!(records[1].timestamp >= records[0].timestamp);

    let last = log.last_record().await.expect("last").expect("some");
    assert_eq!(last.sample, b);
}
