//! Integration tests for command registration
//!
//! Tests tree growth, replacement, pruning, and compile errors.

use switchback_foundation::ErrorKind;
use switchback_parser::names;
use switchback_router::{CommandSpec, ParamSpec, Router};

fn noop(name: &str) -> CommandSpec {
    CommandSpec::new(name, |_| Ok(()))
}

// =============================================================================
// Tree Shape
// =============================================================================

#[test]
fn shared_prefixes_share_nodes() {
    let router = Router::default();
    router.register(noop("set").path("zone flag set")).unwrap();
    router.register(noop("clear").path("zone flag clear")).unwrap();
    router.register(noop("list").path("zone list")).unwrap();
    // zone, flag, set, clear, list
    assert_eq!(router.node_count(), 5);
    assert_eq!(router.labels(), vec!["zone"]);
}

#[test]
fn filters_distinguish_typed_slots() {
    let router = Router::default();
    router
        .register(noop("small").path("give <?>").param(ParamSpec::new(names::INT).filter("max:5")))
        .unwrap();
    router
        .register(noop("large").path("give <?>").param(ParamSpec::new(names::INT).filter("min:6")))
        .unwrap();
    assert_eq!(router.node_count(), 3);
    assert_eq!(router.all_commands(), vec!["/give <Whole #>", "/give <Whole #>"]);
}

#[test]
fn reregistering_a_typed_path_does_not_grow_the_tree() {
    let router = Router::default();
    let preload = || {
        noop("preload")
            .path("chunk preload <?>")
            .param(ParamSpec::new(names::INT).filter("min:0"))
    };
    let first = router.register(preload()).unwrap();
    let nodes = router.node_count();
    let second = router.register(preload()).unwrap();

    assert_ne!(first, second);
    assert_eq!(router.node_count(), nodes);
    assert!(router.contains(second, "chunk preload <?>"));
    assert!(!router.contains(first, "chunk preload <?>"));
}

#[test]
fn replacing_one_path_keeps_the_others() {
    let router = Router::default();
    let multi = router
        .register(noop("multi").path("home").path("house"))
        .unwrap();
    let single = router.register(noop("single").path("HOME")).unwrap();

    assert!(router.contains(multi, "house"));
    assert!(!router.contains(multi, "home"));
    assert!(router.contains(single, "home"));
    assert!(router.timings(multi).is_some());
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn pruning_stops_at_a_shared_node() {
    let router = Router::default();
    router.register(noop("set").path("zone flag set")).unwrap();
    let clear = router.register(noop("clear").path("zone flag clear")).unwrap();
    assert_eq!(router.node_count(), 4);

    router.unregister(clear).unwrap();
    assert_eq!(router.node_count(), 3);
    assert_eq!(router.all_commands(), vec!["/zone flag set"]);
}

#[test]
fn unregister_removes_every_path() {
    let router = Router::default();
    let id = router
        .register(noop("tp").path("tp <?>").path("teleport <?>").param(ParamSpec::new(names::STRING)))
        .unwrap();
    assert_eq!(router.node_count(), 4);
    router.unregister(id).unwrap();
    assert_eq!(router.node_count(), 0);
    assert!(router.labels().is_empty());
    assert!(router.timings(id).is_none());
}

#[test]
fn inner_node_keeps_its_handler_when_children_go() {
    let router = Router::default();
    let root = router.register(noop("root").path("warp")).unwrap();
    let child = router.register(noop("child").path("warp home")).unwrap();
    router.unregister(child).unwrap();
    assert_eq!(router.node_count(), 1);
    assert!(router.contains(root, "warp"));
}

// =============================================================================
// Help Metadata
// =============================================================================

#[test]
fn first_registration_owns_the_label() {
    let router = Router::default();
    router
        .register(
            noop("a")
                .path("chunk status")
                .description("Manage chunks")
                .owner("world")
                .usage("/chunk <status|preload>"),
        )
        .unwrap();
    router
        .register(noop("b").path("chunk clear").description("Something else"))
        .unwrap();

    let info = router.label_info("Chunk").unwrap();
    assert_eq!(info.label, "chunk");
    assert_eq!(info.owner.as_deref(), Some("world"));
    assert_eq!(info.description.as_deref(), Some("Manage chunks"));
    assert_eq!(info.usage.as_deref(), Some("/chunk <status|preload>"));
}

// =============================================================================
// Compile Errors
// =============================================================================

#[test]
fn unknown_parameter_type() {
    let router = Router::default();
    let err = router
        .register(noop("x").path("zone flag <?>").param(ParamSpec::new("estate")))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownParameterType(ref name) if name == "estate"));
    assert_eq!(err.context.unwrap().source.as_deref(), Some("x"));
}

#[test]
fn malformed_filter_is_caught_at_registration() {
    let router = Router::default();
    let err = router
        .register(noop("x").path("give <?>").param(ParamSpec::new(names::INT).filter("range:9to1")))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedFilter { .. }));
    assert_eq!(router.node_count(), 0);
}

#[test]
fn descriptor_grammar() {
    let router = Router::default();
    let cases = [
        noop("empty"),
        noop("blank").path("   "),
        noop("leading").path("<?> list").param(ParamSpec::new(names::INT)),
        noop("greedy_mid")
            .path("say <?> now")
            .param(ParamSpec::new(names::STRING).greedy()),
        noop("duplicate").path("spawn").path("SPAWN"),
    ];
    for spec in cases {
        let name = spec.name().to_string();
        let err = router.register(spec).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::InvalidDescriptor { .. }),
            "{name}: unexpected {err}"
        );
    }
    assert_eq!(router.node_count(), 0);
}

#[test]
fn greedy_parameter_must_be_last() {
    let router = Router::default();
    let err = router
        .register(
            noop("x")
                .path("say <?> <?>")
                .param(ParamSpec::new(names::STRING).greedy())
                .param(ParamSpec::new(names::INT)),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDescriptor { .. }));
}

#[test]
fn unbound_parameters_are_appended() {
    let router = Router::default();
    let id = router
        .register(
            noop("give")
                .path("give")
                .param(ParamSpec::new(names::STRING))
                .param(ParamSpec::new(names::INT)),
        )
        .unwrap();
    assert_eq!(router.all_commands(), vec!["/give <String> <Whole #>"]);
    assert!(router.contains(id, "give <?> <?>"));
}

#[test]
fn failed_batch_registers_nothing() {
    let router = Router::default();
    let err = router
        .register_all([
            noop("ok").path("spawn"),
            noop("bad").path("warp <?>").param(ParamSpec::new("nope")),
        ])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownParameterType(_)));
    assert_eq!(router.node_count(), 0);
}
