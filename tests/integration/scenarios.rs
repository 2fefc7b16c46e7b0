//! End-to-end scenarios through a console session

use std::io::Cursor;
use std::sync::Arc;

use proptest::prelude::*;
use switchback_foundation::{RecordingSender, SenderHandle, SenderKind};
use switchback_parser::{EntityDirectory, MemoryDirectory};
use switchback_router::{Router, RouterConfig};
use switchback_runtime::demo::{self, CHUNK_PERMISSION};
use switchback_runtime::{HostConfig, Session, SessionOptions, run_batch};

fn console() -> Session {
    Session::new(RouterConfig::default(), &SessionOptions::default()).unwrap()
}

fn as_player(name: &str, grants: &[&str], online: &[&str]) -> Session {
    let options = SessionOptions {
        player: Some(name.to_string()),
        grants: grants.iter().map(ToString::to_string).collect(),
        online: online.iter().map(ToString::to_string).collect(),
    };
    Session::new(RouterConfig::default(), &options).unwrap()
}

// =============================================================================
// Chunks
// =============================================================================

#[test]
fn console_manages_chunks() {
    let session = console();
    assert_eq!(session.execute("chunk status").unwrap(), vec!["No chunks preloaded."]);
    assert_eq!(
        session.execute("/chunk preload 16").unwrap(),
        vec!["Preloading chunks within radius 16."]
    );
    assert_eq!(
        session.execute("/CHUNK STATUS").unwrap(),
        vec!["Chunks preloaded within radius 16."]
    );
    assert_eq!(session.execute("chunk clear").unwrap(), vec!["Cleared preloaded chunks."]);
    assert_eq!(session.execute("chunk status").unwrap(), vec!["No chunks preloaded."]);
}

#[test]
fn chunk_mistakes_are_explained() {
    let session = console();
    assert_eq!(
        session.execute("/chunk preload 40").unwrap(),
        vec!["Command help", "Warning: Must be less than 32.", "/chunk preload <Whole #>"]
    );
    assert_eq!(
        session.execute("/chunk bogus").unwrap(),
        vec![
            "Command help",
            "Warning: No match.",
            "/chunk clear",
            "/chunk status",
            "/chunk preload <Whole #>",
        ]
    );
}

#[test]
fn players_need_the_chunk_permission() {
    let denied = as_player("alice", &[], &[]);
    assert_eq!(
        denied.execute("chunk preload 4").unwrap(),
        vec!["Command help", "Warning: No permission.", "/chunk preload <Whole #>"]
    );
    assert_eq!(denied.execute("chunk status").unwrap(), vec!["No chunks preloaded."]);

    let granted = as_player("alice", &[CHUNK_PERMISSION], &[]);
    assert_eq!(
        granted.execute("chunk preload 4").unwrap(),
        vec!["Preloading chunks within radius 4."]
    );
}

// =============================================================================
// Messaging and Presence
// =============================================================================

#[test]
fn msg_bare_and_with_text() {
    let session = as_player("alice", &[], &["bob"]);
    assert_eq!(session.execute("msg").unwrap(), vec!["Usage: /msg <player> <message...>"]);
    assert_eq!(
        session.execute("msg Bob see you at spawn").unwrap(),
        vec!["[alice -> bob] see you at spawn"]
    );
    assert_eq!(
        session.execute("msg bob").unwrap(),
        vec!["Command help", "Warning: Not enough arguments.", "/msg <Player> <String...>"]
    );
    assert_eq!(
        session.execute("msg carol hello").unwrap(),
        vec!["Command help", "Warning: Not a Player.", "/msg <Player> <String...>"]
    );
}

#[test]
fn who_tracks_presence() {
    let session = as_player("alice", &[], &["bob"]);
    assert_eq!(session.execute("who").unwrap(), vec!["Online (2): bob, alice"]);
    assert_eq!(session.execute("who bob").unwrap(), vec!["bob is online."]);

    assert!(session.directory().disconnect("bob"));
    assert_eq!(session.execute("who").unwrap(), vec!["Online (1): alice"]);
    assert_eq!(session.execute("who BOB").unwrap(), vec!["bob is offline."]);
    assert_eq!(
        session.execute("who nobody").unwrap(),
        vec!["Command help", "Warning: Not a Player.", "/who <Player>"]
    );
}

#[test]
fn reminders_are_for_players_only() {
    let session = console();
    assert_eq!(
        session.execute("remind 0s0m12h stretch").unwrap(),
        vec![
            "Command help",
            "Warning: Cannot be run by a console.",
            "/remind <Date> <String...>",
        ]
    );

    let session = as_player("alice", &[], &[]);
    let reply = session.execute("remind 0s0m12h stretch your legs").unwrap();
    assert_eq!(reply.len(), 1);
    assert!(reply[0].starts_with("Reminder set for "));
    assert!(reply[0].ends_with("12:00:00: stretch your legs"));
}

// =============================================================================
// Help
// =============================================================================

#[test]
fn help_lists_every_command_word() {
    let session = console();
    assert_eq!(
        session.execute("help").unwrap(),
        vec![
            "/chunk - Manage preloaded chunks",
            "/msg - Send a private message",
            "/who - List online players",
            "/remind - Schedule a reminder",
            "/commands - List every command path",
            "/help - Show help",
        ]
    );
}

#[test]
fn help_topics() {
    let session = console();
    assert_eq!(
        session.execute("help /chunk").unwrap(),
        vec![
            "/chunk - Manage preloaded chunks",
            "Usage: /chunk <preload|status|clear>",
            "Registered by switchback-demo",
        ]
    );
    assert_eq!(
        session.execute("help nothing").unwrap(),
        vec![session.router().config().no_help_message.clone()]
    );
}

#[test]
fn commands_lists_every_path() {
    let session = console();
    let lines = session.execute("commands").unwrap();
    assert!(lines.contains(&"/chunk preload <Whole #>".to_string()));
    assert!(lines.contains(&"/msg <Player> <String...>".to_string()));
    assert!(lines.contains(&"/who <Player>".to_string()));
    assert!(lines.contains(&"/help <String>".to_string()));
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn session_completion() {
    let session = as_player("alice", &[], &["bob", "barbara"]);
    assert_eq!(session.complete("/"), session.router().labels());
    assert_eq!(session.complete("/ch"), vec!["chunk"]);
    assert_eq!(session.complete("chunk "), vec!["preload", "status", "clear"]);
    assert_eq!(session.complete("msg b"), vec!["bob", "barbara"]);
    assert_eq!(session.complete("msg bob "), vec!["<String...>"]);
}

// =============================================================================
// Batch Mode and Configuration
// =============================================================================

#[test]
fn batch_runs_each_line() {
    let session = console();
    let script = "# warm up\nchunk preload 8\n\n   \nchunk status\nnope\n";
    let mut out = Vec::new();
    let executed = run_batch(&session, Cursor::new(script), &mut out).unwrap();

    assert_eq!(executed, 3);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "Preloading chunks within radius 8.",
            "Chunks preloaded within radius 8.",
            "Command not found. Try /help for more commands.",
        ]
    );
}

#[test]
fn configured_session() {
    let config = HostConfig::parse(
        r#"
        [router]
        unknown_command_message = "Unknown command."
        warning_prefix = "!! "

        [session]
        player = "alice"
        grants = ["switchback.chunk"]
        online = ["bob"]
        "#,
    )
    .unwrap();
    let session = Session::new(config.router, &config.session).unwrap();

    assert_eq!(session.sender().kind(), SenderKind::Player);
    assert_eq!(session.execute("nope").unwrap(), vec!["Unknown command."]);
    assert_eq!(session.execute("chunk preload 2").unwrap(), vec!["Preloading chunks within radius 2."]);
    assert_eq!(
        session.execute("chunk preload x").unwrap(),
        vec!["Command help", "!! Not a Whole #.", "/chunk preload <Whole #>"]
    );
}

// =============================================================================
// Property Tests
// =============================================================================

fn demo_router() -> (Arc<Router>, SenderHandle, Arc<RecordingSender>) {
    let directory = Arc::new(MemoryDirectory::new());
    let shared: Arc<dyn EntityDirectory> = directory.clone();
    let router = Arc::new(Router::default().with_entity_directory(shared));
    demo::register(&router, &directory).unwrap();
    let sender = Arc::new(RecordingSender::console());
    let handle: SenderHandle = sender.clone();
    (router, handle, sender)
}

proptest! {
    #[test]
    fn preload_accepts_exactly_the_bounds(radius in -100_i64..100) {
        let (router, handle, sender) = demo_router();
        let outcome = router.dispatch(&handle, "chunk", &["preload".to_string(), radius.to_string()]);
        prop_assert_eq!(outcome.is_handled(), (0..=32).contains(&radius));
        if !(0..=32).contains(&radius) {
            let messages = sender.messages();
            prop_assert_eq!(messages.len(), 3);
        }
    }
}
