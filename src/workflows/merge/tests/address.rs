use crate::workflows::merge::address::{
    comparison_key, compare_addresses, completeness_score, has_duplicate_components,
    leading_street_key_for_tests, parse_address, AddressWinner,
};

#[test]
fn same_location_prefers_the_more_complete_address() {
    let comparison = compare_addresses(
        "1234 Main St, San Bernardino, CA 92407",
        "1234 Main Street San Bernardino CA",
    );

    assert!(comparison.are_same);
    assert_eq!(comparison.winner, AddressWinner::Left);
    assert_eq!(comparison.left_score, 55);
    assert_eq!(comparison.right_score, 35);
}

#[test]
fn different_streets_tie() {
    let comparison = compare_addresses("123 Oak Ave", "456 Pine Rd");

    assert!(!comparison.are_same);
    assert_eq!(comparison.winner, AddressWinner::Tie);
    assert_eq!(comparison.reason, "Different addresses");
}

#[test]
fn corrupted_side_loses() {
    let comparison = compare_addresses(
        "200 University Pkwy University Pkwy San Bernardino CA",
        "200 University Pkwy, San Bernardino, CA 92407",
    );

    assert!(!comparison.are_same);
    assert_eq!(comparison.winner, AddressWinner::Right);
    assert_eq!(comparison.reason, "Left has duplicates");
}

#[test]
fn sameness_does_not_depend_on_argument_order() {
    let pairs = [
        (
            "1234 Main St, San Bernardino, CA 92407",
            "1234 Main Street San Bernardino CA",
        ),
        ("123 Oak Ave", "456 Pine Rd"),
        (
            "200 University Pkwy University Pkwy San Bernardino CA",
            "200 University Pkwy, San Bernardino, CA 92407",
        ),
        ("77 Pine Rd Redlands", "Home, 77 Pine Road, Redlands, CA 92373, USA"),
        ("12 Elm Rd Apt 4 Apt 4", "9 Oak St, Fontana, Fontana CA 92335"),
    ];

    for (left, right) in pairs {
        assert_eq!(
            compare_addresses(left, right).are_same,
            compare_addresses(right, left).are_same,
            "{left} vs {right}"
        );
    }
}

#[test]
fn a_unit_adds_fifteen_points() {
    let base = completeness_score(&parse_address("1234 Main St, San Bernardino, CA 92407"));
    let with_unit = completeness_score(&parse_address("1234 Main St Apt 5, San Bernardino, CA 92407"));

    assert_eq!(base, 55);
    assert_eq!(with_unit, base + 15);
}

#[test]
fn both_corrupted_keeps_neither() {
    let comparison = compare_addresses(
        "12 Elm Rd Apt 4 Apt 4",
        "9 Oak St, Fontana, Fontana CA 92335",
    );

    assert_eq!(comparison.winner, AddressWinner::Neither);
}

#[test]
fn right_wins_when_strictly_more_complete() {
    let comparison = compare_addresses(
        "77 Pine Rd Redlands",
        "Home, 77 Pine Road, Redlands, CA 92373, USA",
    );

    assert!(comparison.are_same);
    assert_eq!(comparison.winner, AddressWinner::Right);
    assert!(comparison.right_score > comparison.left_score);
}

#[test]
fn comparison_key_joins_number_and_normalized_street() {
    let parsed = parse_address("55 N Mountain View Avenue, Redlands, CA");
    assert_eq!(comparison_key(&parsed), "55|mountain view");

    let empty = parse_address("");
    assert_eq!(comparison_key(&empty), "");
}

#[test]
fn fallback_key_reads_leading_number_and_street() {
    assert_eq!(
        leading_street_key_for_tests("4410 Sierra Way, San Bernardino").as_deref(),
        Some("4410sierraway")
    );
    assert_eq!(leading_street_key_for_tests("Sierra Way"), None);
}

#[test]
fn duplicate_components_cost_a_hundred_points() {
    let parsed = parse_address("1234 Main St, 1234 Main St, Fontana, CA");
    assert!(has_duplicate_components(&parsed.raw_original));
    assert!(completeness_score(&parsed) < 0);
}

#[test]
fn stray_zip_before_comma_is_penalized() {
    let parsed = parse_address("Main St 92407, San Bernardino");
    assert_eq!(parsed.number, None);
    assert_eq!(parsed.city.as_deref(), Some("San Bernardino"));
    // city only, minus the misplaced-number penalty
    assert_eq!(completeness_score(&parsed), 10 - 20);
}
