//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use switchback_foundation::{Error, ErrorContext, ErrorKind, ValueType};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_argument_type() {
    let err = Error::argument_type(2, ValueType::Entity, ValueType::String);
    assert!(matches!(err.kind, ErrorKind::ArgumentType { index: 2, .. }));
    let msg = format!("{err}");
    assert!(msg.contains("entity"));
    assert!(msg.contains("string"));
}

#[test]
fn error_argument_missing() {
    let err = Error::argument_missing(4);
    assert!(matches!(err.kind, ErrorKind::ArgumentMissing(4)));
    assert!(format!("{err}").contains('4'));
}

#[test]
fn error_unknown_parameter_type() {
    let err = Error::unknown_parameter_type("estate");
    assert!(matches!(err.kind, ErrorKind::UnknownParameterType(_)));
    assert!(format!("{err}").contains("estate"));
}

#[test]
fn error_invalid_descriptor() {
    let err = Error::invalid_descriptor("<?> preload", "the first word must be a literal command word");
    assert!(matches!(err.kind, ErrorKind::InvalidDescriptor { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("<?> preload"));
    assert!(msg.contains("literal"));
}

#[test]
fn error_unknown_handler() {
    let err = Error::unknown_handler(12);
    assert!(matches!(err.kind, ErrorKind::UnknownHandler(12)));
    assert_eq!(format!("{err}"), "unknown handler #12");
}

#[test]
fn error_handler_and_config() {
    assert!(format!("{}", Error::handler("chunk not loaded")).contains("chunk not loaded"));
    assert!(matches!(Error::config("bad").kind, ErrorKind::Config(_)));
    assert!(matches!(Error::internal("oops").kind, ErrorKind::Internal(_)));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_attached() {
    let err = Error::malformed_filter("range:1", "expected two bounds")
        .with_context(ErrorContext::new().with_source("chunk_preload").with_descriptor("chunk preload <?>"));
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.source.as_deref(), Some("chunk_preload"));
    assert_eq!(ctx.descriptor.as_deref(), Some("chunk preload <?>"));
}

#[test]
fn context_display_lists_frames() {
    let ctx = ErrorContext::default()
        .with_source("msg")
        .with_frame("resolving parameters")
        .with_frame("registering batch");
    let text = ctx.to_string();
    assert!(text.starts_with("in msg"));
    assert!(text.contains("  while resolving parameters"));
    assert!(text.contains("  while registering batch"));
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
    assert_error(&Error::internal("x"));
}
