//! Jog log ordering under concurrent writers

use gantrykit_core::{JogLog, JogLogConfig, LogLevel};
use std::thread;

#[test]
fn test_concurrent_appends_keep_one_order() {
    let log = JogLog::new();
    let mut subscription = log.subscribe();

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let log = log.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    log.info(format!("writer {} entry {}", w, i));
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let entries = log.entries();
    assert_eq!(entries.len(), 200);
    assert!(entries.windows(2).all(|w| w[0].sequence < w[1].sequence));

    // Subscribers see the same order as the history
    let received: Vec<u64> = subscription.drain().iter().map(|e| e.sequence).collect();
    let history: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
    assert_eq!(received, history);

    // Each writer's own entries stay in the order it wrote them
    for w in 0..4 {
        let prefix = format!("writer {} entry ", w);
        let own: Vec<usize> = entries
            .iter()
            .filter_map(|e| e.message.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(own, (0..50).collect::<Vec<_>>());
    }
}

#[test]
fn test_levels_and_bounded_history() {
    let log = JogLog::with_config(JogLogConfig {
        channel_capacity: 16,
        history_limit: Some(2),
    });

    log.info("connected");
    log.warn("alarm");
    log.error("timeout");

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].level, LogLevel::Warning);
    assert_eq!(entries[1].level, LogLevel::Error);
    assert_eq!(log.len(), 3);
}
