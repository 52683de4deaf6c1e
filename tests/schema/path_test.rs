//! Qualified-path parsing edge cases.

use strata::schema::{parse_qualified_path, PathSegment, SchemaPathError};

#[test]
fn segment_keeps_everything_after_the_first_delimiter() {
    let segment = PathSegment::parse("table=name=with=equals").unwrap();
    assert_eq!(segment.key, "table");
    assert_eq!(segment.value, "name=with=equals");
}

#[test]
fn empty_key_or_value_still_parses() {
    // The delimiter is what matters; odd names are the driver's business.
    let segment = PathSegment::parse("=public").unwrap();
    assert_eq!(segment.key, "");
    assert_eq!(segment.value, "public");

    let segment = PathSegment::parse("schema=").unwrap();
    assert_eq!(segment.value, "");
}

#[test]
fn delimiterless_segment_fails_rather_than_defaulting() {
    let err = parse_qualified_path("schema=public/customer/table=orders").unwrap_err();
    assert_eq!(
        err,
        SchemaPathError::MissingDelimiter("customer".to_string())
    );
}

#[test]
fn empty_path_is_invalid() {
    assert_eq!(parse_qualified_path("").unwrap_err(), SchemaPathError::Empty);
}

#[test]
fn segments_preserve_path_order() {
    let segments = parse_qualified_path("catalog=main/schema=dbo/table=fact_sales").unwrap();
    let keys: Vec<_> = segments.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, ["catalog", "schema", "table"]);
}
