use super::common::*;
use crate::workflows::merge::conflicts::count_conflicts;

#[test]
fn counts_identity_disagreements() {
    let fields = vec![
        pair("First Name", "Mary-Ann", "maryann"),
        pair("Last Name", "Lopez", "Nguyen"),
        pair("Date of Birth", "Feb 14, 2006", "Feb 14, 2008"),
        pair("Address", "123 Oak Ave, Redlands, CA", "456 Pine Rd, Redlands, CA"),
        pair("Phone", "909-555-0100", "909-555-0199"),
    ];

    let report = count_conflicts(&fields);

    assert_eq!(report.count, 3);
    assert_eq!(report.conflicts, vec!["Last Name", "Date of Birth", "Address"]);
    assert!(report.exceeds(2));
}

#[test]
fn blank_sides_and_short_addresses_are_skipped() {
    let fields = vec![
        pair("First Name", "", "Jose"),
        pair("Address", "1 A St", "2 B St"),
    ];

    let report = count_conflicts(&fields);

    assert_eq!(report.count, 0);
    assert!(!report.exceeds(2));
}

#[test]
fn same_address_in_different_formats_is_not_a_conflict() {
    let fields = vec![pair(
        "Address",
        "1234 Main St, San Bernardino, CA 92407",
        "1234 Main Street San Bernardino CA",
    )];

    assert_eq!(count_conflicts(&fields).count, 0);
}

#[test]
fn corrupted_address_counts_as_a_conflict() {
    let fields = vec![pair(
        "Address",
        "200 University Pkwy University Pkwy San Bernardino CA",
        "200 University Pkwy, San Bernardino, CA 92407",
    )];

    let report = count_conflicts(&fields);

    assert_eq!(report.count, 1);
    assert_eq!(report.conflicts, vec!["Address"]);
}

#[test]
fn address_length_is_measured_in_characters() {
    // ten characters, twelve bytes
    let fields = vec![pair("Address", "1 Ñuñoa Ct", "2 Elm Drive")];

    assert_eq!(count_conflicts(&fields).count, 0);
}
