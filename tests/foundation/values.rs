//! Integration tests for Value
//!
//! Tests accessors, display, equality, and custom payloads.

use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use switchback_foundation::{EntityRef, Value, ValueType};
use uuid::Uuid;

// =============================================================================
// Accessors
// =============================================================================

#[test]
fn accessors_match_variants() {
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from(7_i64).as_int(), Some(7));
    assert_eq!(Value::from(7_i32).as_int(), Some(7));
    assert_eq!(Value::from(0.25).as_float(), Some(0.25));
    assert_eq!(Value::from("hi").as_str(), Some("hi"));

    let id = Uuid::new_v4();
    assert_eq!(Value::from(id).as_uuid(), Some(id));
}

#[test]
fn accessors_reject_other_variants() {
    let v = Value::from("16");
    assert_eq!(v.as_int(), None);
    assert_eq!(v.as_bool(), None);
    assert!(v.as_entity().is_none());
    assert!(v.as_list().is_none());
}

#[test]
fn datetime_keeps_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let at = offset.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap();
    let v = Value::DateTime(at);
    assert_eq!(v.value_type(), ValueType::DateTime);
    assert_eq!(v.as_datetime().map(|d| d.offset().local_minus_utc()), Some(7200));
    assert_eq!(v.to_string(), "2024-05-17 12:00:00 +02:00");
}

// =============================================================================
// Entities and Lists
// =============================================================================

#[test]
fn entity_values_compare_by_id() {
    let id = Uuid::new_v4();
    let a = Value::from(EntityRef::new(id, "alice"));
    let b = Value::from(EntityRef::new(id, "Alice"));
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "alice");
}

#[test]
fn list_preserves_order() {
    let v = Value::from(vec![Value::from("b"), Value::from("a"), Value::from(3_i64)]);
    let items = v.as_list().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_str(), Some("b"));
    assert_eq!(v.to_string(), "b a 3");
}

#[test]
fn clones_share_storage() {
    let v = Value::String(Arc::from("shared"));
    let w = v.clone();
    match (&v, &w) {
        (Value::String(a), Value::String(b)) => assert!(Arc::ptr_eq(a, b)),
        _ => unreachable!(),
    }
}

// =============================================================================
// Custom Payloads
// =============================================================================

#[derive(Debug, PartialEq)]
struct Region {
    name: &'static str,
}

#[test]
fn custom_payload_round_trip() {
    let v = Value::custom(Region { name: "spawn" });
    assert_eq!(v.value_type(), ValueType::Custom);
    assert_eq!(v.downcast_ref::<Region>(), Some(&Region { name: "spawn" }));
    assert!(v.downcast_ref::<u32>().is_none());
    assert!(format!("{v:?}").contains("Region"));
}
