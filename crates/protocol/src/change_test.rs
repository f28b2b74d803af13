//! Tests for change type module

use std::str::FromStr;

use crate::change::ChangeType;

// =============================================================================
// Wire value round trips
// =============================================================================

#[test]
fn test_change_type_wire_values() {
    assert_eq!(ChangeType::Added.as_u8(), 1);
    assert_eq!(ChangeType::Modified.as_u8(), 2);
    assert_eq!(ChangeType::Deleted.as_u8(), 3);
}

#[test]
fn test_change_type_from_u8() {
    assert_eq!(ChangeType::from_u8(1), Some(ChangeType::Added));
    assert_eq!(ChangeType::from_u8(2), Some(ChangeType::Modified));
    assert_eq!(ChangeType::from_u8(3), Some(ChangeType::Deleted));
    assert_eq!(ChangeType::from_u8(0), None);
    assert_eq!(ChangeType::from_u8(4), None);
}

#[test]
fn test_change_type_try_from() {
    assert_eq!(ChangeType::try_from(1), Ok(ChangeType::Added));
    assert!(ChangeType::try_from(0).is_err());
}

// =============================================================================
// Watch tag normalization
// =============================================================================

#[test]
fn test_from_watch_tag_recognized() {
    assert_eq!(ChangeType::from_watch_tag("ADDED"), Some(ChangeType::Added));
    assert_eq!(
        ChangeType::from_watch_tag("MODIFIED"),
        Some(ChangeType::Modified)
    );
    assert_eq!(
        ChangeType::from_watch_tag("DELETED"),
        Some(ChangeType::Deleted)
    );
}

#[test]
fn test_from_watch_tag_discards_other_tags() {
    assert_eq!(ChangeType::from_watch_tag("BOOKMARK"), None);
    assert_eq!(ChangeType::from_watch_tag("ERROR"), None);
    assert_eq!(ChangeType::from_watch_tag(""), None);
    // Tags are case-sensitive on the watch side
    assert_eq!(ChangeType::from_watch_tag("added"), None);
}

// =============================================================================
// Display and parsing
// =============================================================================

#[test]
fn test_display() {
    assert_eq!(ChangeType::Added.to_string(), "added");
    assert_eq!(ChangeType::Modified.to_string(), "modified");
    assert_eq!(ChangeType::Deleted.to_string(), "deleted");
}

#[test]
fn test_from_str_case_insensitive() {
    assert_eq!(ChangeType::from_str("added"), Ok(ChangeType::Added));
    assert_eq!(ChangeType::from_str("Modified"), Ok(ChangeType::Modified));
    assert_eq!(ChangeType::from_str("DELETED"), Ok(ChangeType::Deleted));
    assert!(ChangeType::from_str("bookmark").is_err());
    assert!(ChangeType::from_str("").is_err());
}
