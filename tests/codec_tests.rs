// Codec laws: aggregation, canonical ordering, round-trips, and the
// strict delimiter grammar.

use craftflip::codec::{combine, decode, encode, output_token};
use craftflip::error::FlipError;
use craftflip::model::Ingredient;

fn ings(entries: &[(u32, u32)]) -> Vec<Ingredient> {
    entries
        .iter()
        .map(|&(id, count)| Ingredient::new(id, count))
        .collect()
}

#[test]
fn encode_aggregates_and_orders_canonically() {
    // duplicate item 5 pre-aggregates; larger counts sort first
    let entries = ings(&[(5, 3), (5, 2), (9, 1)]);
    let encoded = encode(&entries);
    assert_eq!(encoded, "!5*5,!9*1,");

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded, ings(&[(5, 5), (9, 1)]));
}

#[test]
fn ties_break_by_ascending_item_id() {
    let encoded = encode(&ings(&[(7, 2), (3, 2), (40, 9)]));
    // 40 encodes to base36 "14"; count 9 leads, then the tied pair by id
    assert_eq!(encoded, "!14*9,!3*2,!7*2,");
}

#[test]
fn decode_encode_round_trip_sums_quantities() {
    let entries = ings(&[(12157, 8), (19700, 3), (12157, 4), (1, 1)]);
    let decoded = decode(&encode(&entries)).unwrap();

    let total: u64 = decoded.iter().map(|i| i.count as u64).sum();
    assert_eq!(total, 16);
    assert!(decoded.iter().any(|i| i.item_id == 12157 && i.count == 12));
}

#[test]
fn reencoding_is_idempotent() {
    for entries in [
        ings(&[(5, 3), (5, 2), (9, 1)]),
        ings(&[(1, 1)]),
        ings(&[(100, 7), (2, 7), (3, 7)]),
        ings(&[]),
    ] {
        let once = encode(&entries);
        let twice = encode(&decode(&once).unwrap());
        assert_eq!(once, twice);
    }
}

#[test]
fn empty_multiset_encodes_to_empty_string() {
    assert_eq!(encode(&[]), "");
    assert_eq!(decode("").unwrap(), vec![]);
}

#[test]
fn malformed_encodings_are_fatal() {
    let cases = [
        "5*3,",      // missing '!'
        "!5 3,",     // missing '*'
        "!*3,",      // empty item id
        "!#Q*3,",    // bad base36
        "!5*x,",     // bad count
        "!5*,",      // empty count
        "!5*0,",     // zero count violates the multiset invariant
        "!5*3,junk", // trailing garbage entry
    ];
    for case in cases {
        let err = decode(case).unwrap_err();
        assert!(
            matches!(err, FlipError::MalformedEncoding(_)),
            "expected MalformedEncoding for {case:?}, got {err:?}"
        );
    }
}

#[test]
fn combine_unions_and_excludes() {
    let product = ings(&[(10, 4), (3, 1)]);
    let component = ings(&[(1, 1), (2, 1)]);
    let combined = combine(&[&product, &component, &component], Some(10));

    assert!(combined.iter().all(|i| i.item_id != 10));
    assert!(combined.contains(&Ingredient::new(1, 2)));
    assert!(combined.contains(&Ingredient::new(2, 2)));
    assert!(combined.contains(&Ingredient::new(3, 1)));
    assert_eq!(combined.len(), 3);
}

#[test]
fn combine_without_exclusion_keeps_everything() {
    let a = ings(&[(1, 1)]);
    let b = ings(&[(1, 2), (2, 5)]);
    let combined = combine(&[&a, &b], None);
    assert_eq!(combined, ings(&[(2, 5), (1, 3)]));
}

#[test]
fn output_token_matches_only_its_own_item() {
    // base36(1) = "1" is a prefix of base36(36) = "10"; the bracketed
    // token must still distinguish them
    let encoded = encode(&ings(&[(36, 2), (72, 1)]));
    assert!(!encoded.contains(&output_token(1)));
    assert!(encoded.contains(&output_token(36)));
    assert!(encoded.contains(&output_token(72)));
}
