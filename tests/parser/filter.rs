//! Integration tests for the filter language

use switchback_parser::FilterError;
use switchback_parser::filter::{self, NumericClause, PatternCache};

// =============================================================================
// Numeric Bounds
// =============================================================================

#[test]
fn min_max_is_inclusive_on_both_ends() {
    let expr = "min:0,max:10";
    assert_eq!(filter::check_numeric(-1_i64, expr), Err(FilterError::rejected("Must be greater than 0.")));
    assert_eq!(filter::check_numeric(11_i64, expr), Err(FilterError::rejected("Must be less than 10.")));
    assert!(filter::check_numeric(0_i64, expr).is_ok());
    assert!(filter::check_numeric(10_i64, expr).is_ok());
}

#[test]
fn range_message() {
    let err = filter::check_numeric(400_i32, "range:-64to320").unwrap_err();
    assert_eq!(err.to_string(), "Must be between -64 and 320.");
    assert!(filter::check_numeric(-64_i32, "range:-64to320").is_ok());
}

#[test]
fn first_failing_clause_wins() {
    let err = filter::check_numeric(50_i64, "max:10,range:0to5").unwrap_err();
    assert_eq!(err, FilterError::rejected("Must be less than 10."));
}

#[test]
fn keys_are_case_insensitive() {
    let parsed = filter::numeric_clauses::<i64>("MIN:1, Max:4").unwrap();
    assert_eq!(parsed, vec![NumericClause::Min(1), NumericClause::Max(4)]);
}

#[test]
fn broken_bounds_are_malformed() {
    for expr in ["min:abc", "range:1", "range:5to1", "range:1to2to3"] {
        let err = filter::numeric_clauses::<i64>(expr).unwrap_err();
        assert!(err.is_malformed(), "{expr} should be malformed");
    }
}

#[test]
fn unknown_keys_pass() {
    assert!(filter::check_numeric(99_i64, "colour:red,,junk").is_ok());
}

// =============================================================================
// Patterns
// =============================================================================

#[test]
fn patterns_match_the_whole_token() {
    let cache = PatternCache::new();
    assert!(cache.check("steve_01", "regex:[a-z_0-9]{3,16}").is_ok());
    assert_eq!(
        cache.check("no spaces!", "regex:[a-z]+").unwrap_err().to_string(),
        "Must match [a-z]+."
    );
    assert_eq!(cache.len(), 2);
}

#[test]
fn patterns_are_compiled_once() {
    let cache = PatternCache::new();
    for word in ["alpha", "beta", "gamma"] {
        cache.check(word, "regex:[a-z]+").unwrap();
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn invalid_patterns_are_malformed() {
    assert!(filter::validate_patterns("regex:(unclosed").unwrap_err().is_malformed());
    assert!(filter::validate_patterns("min:3,regex:ok").is_ok());
}

#[test]
fn pattern_takes_the_rest_of_the_expression() {
    let parsed: Vec<_> = filter::clauses("max:9,regex:[a-z]{2,4},x").collect();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].argument, "[a-z]{2,4},x");
    assert!(filter::validate_patterns("regex:[a-z_]{3,16}").is_ok());
}

#[test]
fn malformed_filters_convert_to_foundation_errors() {
    let err: switchback_foundation::Error = FilterError::malformed("min:x", "bad bound").into();
    assert!(matches!(
        err.kind,
        switchback_foundation::ErrorKind::MalformedFilter { .. }
    ));
}
