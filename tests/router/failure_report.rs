//! Integration tests for failure reports
//!
//! Tests ranking, grouping, usage ordering, and configurable rendering.

use std::sync::Arc;

use switchback_foundation::{RecordingSender, SenderHandle};
use switchback_parser::names;
use switchback_router::{
    CommandSpec, DispatchOutcome, FailureGroup, FailureKind, FailureReport, ParamSpec, Resolution, Router,
    RouterConfig,
};

fn noop(name: &str) -> CommandSpec {
    CommandSpec::new(name, |_| Ok(()))
}

#[test]
fn ranks() {
    let ordered = [
        FailureKind::TooManyArguments,
        FailureKind::NoMatch,
        FailureKind::NotEnoughArguments,
        FailureKind::SenderMismatch,
        FailureKind::PermissionDenied,
        FailureKind::Internal,
    ];
    for pair in ordered.windows(2) {
        assert!(pair[0].rank() < pair[1].rank(), "{} should rank below {}", pair[0], pair[1]);
    }
    assert_eq!(FailureKind::NotParsed.rank(), FailureKind::FilterRejected.rank());
}

#[test]
fn deeper_failures_win() {
    let router = Router::default();
    router
        .register(noop("deep").path("zone flag set <?>").param(ParamSpec::new(names::BOOL)))
        .unwrap();
    router.register(noop("shallow").path("zone list").permission("zone.list")).unwrap();
    let sender = RecordingSender::player("alice");

    let Resolution::Rejected(report) = router.resolve(&sender, "zone", &["flag", "set", "maybe"]) else {
        panic!("maybe is not a boolean");
    };
    assert_eq!(report.depth, 3);
    assert_eq!(report.kind(), Some(FailureKind::NotParsed));
    assert_eq!(report.groups[0].usages, vec!["/zone flag set <True/False>"]);
}

#[test]
fn groups_are_ordered_by_reason() {
    let router = Router::default();
    router
        .register(noop("whole").path("tp <?>").param(ParamSpec::new(names::INT)))
        .unwrap();
    router
        .register(noop("decimal").path("tp <?>").param(ParamSpec::new(names::DOUBLE)))
        .unwrap();
    let sender = RecordingSender::console();

    let Resolution::Rejected(report) = router.resolve(&sender, "tp", &["here"]) else {
        panic!("here is not a number");
    };
    assert_eq!(
        report.groups,
        vec![
            FailureGroup {
                kind: FailureKind::NotParsed,
                reason: "Not a #.".to_string(),
                usages: vec!["/tp <#>".to_string()],
            },
            FailureGroup {
                kind: FailureKind::NotParsed,
                reason: "Not a Whole #.".to_string(),
                usages: vec!["/tp <Whole #>".to_string()],
            },
        ]
    );
}

#[test]
fn usages_are_shortest_first() {
    let router = Router::default();
    router.register(noop("a").path("home set default here")).unwrap();
    router.register(noop("b").path("home go")).unwrap();
    router.register(noop("c").path("home set")).unwrap();
    let sender = RecordingSender::console();

    let Resolution::Rejected(report) = router.resolve(&sender, "home", &["nowhere"]) else {
        panic!("nowhere is not a subcommand");
    };
    assert_eq!(
        report.groups[0].usages,
        vec!["/home go", "/home set", "/home set default here"]
    );
}

#[test]
fn rendering_follows_the_config() {
    let config = RouterConfig::default()
        .with_help_header("-- usage --")
        .with_warning_prefix("! ")
        .with_command_prefix(".");
    let router = Router::new(config).unwrap();
    router.register(noop("status").path("chunk status")).unwrap();

    let sender = Arc::new(RecordingSender::console());
    let handle: SenderHandle = sender.clone();
    let outcome = router.dispatch(&handle, "chunk", &["stats"]);
    assert!(matches!(outcome, DispatchOutcome::Rejected(_)));
    assert_eq!(sender.messages(), vec!["-- usage --", "! No match.", ".chunk status"]);
}

#[test]
fn empty_report_renders_the_fallback() {
    let config = RouterConfig::default();
    let report = FailureReport {
        depth: 0,
        groups: Vec::new(),
    };
    assert!(report.is_empty());
    assert_eq!(report.kind(), None);
    assert_eq!(report.lines(&config), vec![config.no_help_message.clone()]);
}
