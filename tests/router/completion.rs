//! Integration tests for completion

use std::sync::Arc;

use switchback_foundation::RecordingSender;
use switchback_parser::{MemoryDirectory, names};
use switchback_router::{CommandSpec, ParamSpec, Router, RouterConfig};

fn noop(name: &str) -> CommandSpec {
    CommandSpec::new(name, |_| Ok(()))
}

fn settings_router() -> Router {
    let router = Router::default();
    for (name, path) in [("level", "set level"), ("less", "set less"), ("other", "set Other")] {
        router.register(noop(name).path(path)).unwrap();
    }
    router
}

#[test]
fn literal_prefixes() {
    let router = settings_router();
    let sender = RecordingSender::console();
    assert_eq!(router.complete(&sender, "set", &["le"]), vec!["level", "less"]);
    assert_eq!(router.complete(&sender, "set", &["LE"]), vec!["level", "less"]);
    assert_eq!(router.complete(&sender, "set", &["o"]), vec!["Other"]);
    assert!(router.complete(&sender, "set", &["x"]).is_empty());
    assert!(router.complete(&sender, "nothing", &["le"]).is_empty());
}

#[test]
fn command_words_complete_from_the_line() {
    let router = settings_router();
    router.register(noop("say").path("say")).unwrap();
    let sender = RecordingSender::console();
    assert_eq!(router.complete_line(&sender, "/s"), vec!["set", "say"]);
    assert_eq!(router.complete_line(&sender, "/set le"), vec!["level", "less"]);
    assert_eq!(router.complete_line(&sender, "set "), vec!["level", "less", "Other"]);
}

#[test]
fn typed_slots_offer_placeholders_and_defaults() {
    let router = Router::default();
    router
        .register(noop("radius").path("chunk preload <?>").param(ParamSpec::new(names::INT)))
        .unwrap();
    router
        .register(noop("toggle").path("chunk auto <?>").param(ParamSpec::new(names::BOOL)))
        .unwrap();
    let sender = RecordingSender::console();

    assert_eq!(router.complete(&sender, "chunk", &["preload", ""]), vec!["<Whole #>"]);
    assert_eq!(router.complete(&sender, "chunk", &["auto", ""]), vec!["true", "false"]);
    assert_eq!(router.complete(&sender, "chunk", &["auto", "f"]), vec!["false"]);
}

#[test]
fn overrides_replace_defaults_and_hash_entries_always_show() {
    let router = Router::default();
    router
        .register(
            noop("radius")
                .path("chunk preload <?>")
                .param(ParamSpec::new(names::INT).suggestions(["8", "16", "32", "#list"])),
        )
        .unwrap();
    let sender = RecordingSender::console();

    assert_eq!(router.complete(&sender, "chunk", &["preload", ""]), vec!["8", "16", "32", "#list"]);
    assert_eq!(router.complete(&sender, "chunk", &["preload", "1"]), vec!["16", "#list"]);
}

#[test]
fn always_shown_prefix_is_configurable() {
    let router = Router::new(RouterConfig::default().with_always_shown_prefix("@")).unwrap();
    router
        .register(
            noop("target")
                .path("tp <?>")
                .param(ParamSpec::new(names::STRING).suggestions(["@nearest", "#list", "spawn"])),
        )
        .unwrap();
    let sender = RecordingSender::console();
    assert_eq!(router.complete(&sender, "tp", &["s"]), vec!["@nearest", "spawn"]);
}

#[test]
fn walks_through_typed_slots() {
    let router = Router::default();
    router
        .register(
            noop("preload_now")
                .path("chunk preload <?> now")
                .param(ParamSpec::new(names::INT).filter("min:0")),
        )
        .unwrap();
    let sender = RecordingSender::console();

    assert_eq!(router.complete(&sender, "chunk", &["preload", "16", ""]), vec!["now"]);
    // -1 fails the filter, so the walk stops there.
    assert!(router.complete(&sender, "chunk", &["preload", "-1", ""]).is_empty());
    assert!(router.complete(&sender, "chunk", &["preload", "many", ""]).is_empty());
}

#[test]
fn greedy_slots_keep_offering_themselves() {
    let directory = Arc::new(MemoryDirectory::with_online(["alice", "albert", "bob"]));
    let router = Router::default().with_entity_directory(directory);
    router
        .register(
            noop("invite")
                .path("party invite <?>")
                .param(ParamSpec::new(names::PLAYER).greedy()),
        )
        .unwrap();
    let sender = RecordingSender::console();

    assert_eq!(router.complete(&sender, "party", &["invite", "al"]), vec!["alice", "albert"]);
    assert_eq!(router.complete(&sender, "party", &["invite", "bob", "a"]), vec!["alice", "albert"]);
}

#[test]
fn duplicates_are_removed_keeping_first_position() {
    let router = Router::default();
    router
        .register(noop("a").path("warp <?>").param(ParamSpec::new(names::STRING).suggestions(["home", "spawn"])))
        .unwrap();
    router
        .register(
            noop("b")
                .path("warp <?>")
                .param(ParamSpec::new(names::STRING).filter("regex:[a-z]+").suggestions(["spawn", "mine"])),
        )
        .unwrap();
    let sender = RecordingSender::console();
    assert_eq!(router.complete(&sender, "warp", &[""]), vec!["home", "spawn", "mine"]);
}

#[test]
fn empty_partial_is_one_empty_token() {
    let router = settings_router();
    let sender = RecordingSender::console();
    assert_eq!(
        router.complete(&sender, "set", &[] as &[&str]),
        router.complete(&sender, "set", &[""])
    );
}
