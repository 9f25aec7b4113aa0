use chrono::{DateTime, TimeZone, Utc};

use super::*;
use crate::notation::ToFlux;
use crate::types::{DurationUnit, FluxRegex, ToFluxValue};

fn round_trip(value: FluxValue) {
    let text = value.to_flux_notation();
    let parsed = parse_literal(&text).unwrap_or_else(|e| panic!("{}: {}", text, e));
    assert_eq!(parsed, value, "notation {}", text);
}

#[test]
fn test_scalars_round_trip() {
    for value in [
        FluxValue::Bool(true),
        FluxValue::Bool(false),
        FluxValue::Int(0),
        FluxValue::Int(-17),
        FluxValue::Int(i64::MAX),
        FluxValue::Int(i64::MIN),
        FluxValue::UInt(u64::MAX),
        FluxValue::Float(0.1),
        FluxValue::Float(-2.5),
        FluxValue::Float(1e21),
        FluxValue::Float(f64::INFINITY),
        FluxValue::Float(f64::NEG_INFINITY),
    ] {
        round_trip(value);
    }
}

#[test]
fn test_nan_round_trips_as_nan() {
    let parsed = parse_literal(r#"float(v: "NaN")"#).unwrap();
    assert!(matches!(parsed, FluxValue::Float(f) if f.is_nan()));
}

#[test]
fn test_strings_round_trip() {
    for s in [
        "",
        "cpu",
        r#"O'Brien"s"#,
        r"C:\temp\",
        "${secret}",
        "$${x}",
        "line\nbreak\ttab\rreturn",
        "bell\u{7}del\u{7f}",
        "zürich ☃",
        r#"" or true or ""#,
    ] {
        round_trip(FluxValue::from(s));
    }
}

#[test]
fn test_times_round_trip() {
    let whole = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
    round_trip(FluxValue::DateTime(whole));
    round_trip(FluxValue::DateTime(whole + chrono::Duration::nanoseconds(1)));
    round_trip(FluxValue::Duration(FluxDuration::zero()));
    round_trip(FluxValue::Duration(
        FluxDuration::years(1)
            .with(2, DurationUnit::Month)
            .and_then(|d| d.with(3, DurationUnit::Nanosecond))
            .unwrap(),
    ));
    round_trip(FluxValue::Duration(FluxDuration::minutes(90).negate()));
}

#[test]
fn test_time_range_edges_round_trip() {
    let earliest = DateTime::from_timestamp_nanos(i64::MIN);
    let latest = DateTime::from_timestamp_nanos(i64::MAX);
    for instant in [earliest, latest] {
        let value = instant.to_flux_value().unwrap();
        round_trip(value);
    }

    let beyond = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
    assert!(beyond.to_flux_value().is_err());
    assert!(FluxValue::DateTime(beyond).to_flux_value().is_err());
}

#[test]
fn test_regex_round_trips() {
    round_trip(FluxValue::Regex(FluxRegex::new("^cpu[0-9]+$").unwrap()));
    round_trip(FluxValue::Regex(FluxRegex::new("a/b").unwrap()));
    round_trip(FluxValue::Regex(FluxRegex::new(r"\d+\.\d+").unwrap()));
    round_trip(FluxValue::Regex(FluxRegex::new("line\nbreak").unwrap()));
    round_trip(FluxValue::Regex(FluxRegex::new(r"a\/b\\/c").unwrap()));
}

#[test]
fn test_unescaped_interpolation_rejected() {
    assert!(parse_literal(r#""${x}""#).is_err());
    assert_eq!(parse_string(r#""\${x}""#).unwrap(), "${x}");
}

#[test]
fn test_trailing_tokens_rejected() {
    let err = parse_literal(r#""a" or true"#).unwrap_err();
    assert!(matches!(err, FluxError::Parse { position: 3, .. }));
    assert!(parse_literal("1h extra").is_err());
    assert!(parse_literal("").is_err());
}

#[test]
fn test_bare_date() {
    let parsed = parse_literal("2024-02-29").unwrap();
    assert_eq!(
        parsed,
        FluxValue::DateTime(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_duration_from_str() {
    let d: FluxDuration = "1h30m".parse().unwrap();
    assert_eq!(d, FluxDuration::hours(1).with(30, DurationUnit::Minute).unwrap());
    let ms: FluxDuration = "250ms".parse().unwrap();
    assert_eq!(ms, FluxDuration::milliseconds(250));
    assert!("1x".parse::<FluxDuration>().is_err());
    assert!("9223372036854775807ns".parse::<FluxDuration>().is_ok());
    assert!("9223372036854775808ns".parse::<FluxDuration>().is_err());
    assert!("9223372036854775807s1s".parse::<FluxDuration>().is_err());
    assert!("h".parse::<FluxDuration>().is_err());
}
