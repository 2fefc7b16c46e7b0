//! Integration tests for the sender capability
//!
//! Tests the recording sender hosts use for consoles and tests.

use std::sync::Arc;
use std::thread;

use switchback_foundation::{CommandSender, RecordingSender, SenderHandle, SenderKind};

#[test]
fn kinds_and_names() {
    let console = RecordingSender::console();
    assert_eq!(console.kind(), SenderKind::Console);
    assert_eq!(console.name(), "CONSOLE");

    let bot = RecordingSender::new("scheduler", SenderKind::Automation);
    assert_eq!(bot.kind().to_string(), "automation");
    assert!(bot.id().is_none());
    assert!(!bot.has_permission("anything"));
}

#[test]
fn permissions_are_exact_nodes() {
    let player = RecordingSender::player("alice")
        .with_permission("zone.flag")
        .with_permission("zone.list");
    assert!(player.has_permission("zone.flag"));
    assert!(player.has_permission("zone.list"));
    assert!(!player.has_permission("zone"));
    assert!(!player.has_permission("zone.flag.set"));
}

#[test]
fn handles_are_shared_across_threads() {
    let sender = RecordingSender::player("alice").into_handle();
    let handle: SenderHandle = sender.clone();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || handle.send_message(&format!("line {i}")))
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let mut messages = sender.take_messages();
    messages.sort();
    assert_eq!(messages, vec!["line 0", "line 1", "line 2", "line 3"]);
}
