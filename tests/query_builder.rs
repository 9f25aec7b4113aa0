use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use flux_builder::prelude::*;
use pretty_assertions::assert_eq;

fn dashboard_query(policy: ParameterizedTypes) -> FluxQuery {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let tags = BTreeMap::from([("host", "web-01"), ("region", "eu-west")]);
    FluxQueryBuilder::new(FluxBuilderOptions::new(policy))
        .from("telegraf")
        .unwrap()
        .range(start, Some(FluxTime::Now))
        .unwrap()
        .filter(and([
            Condition::match_measurement("cpu"),
            Condition::match_any_fields(["usage_user", "usage_system"]),
            Condition::match_all_tags(tags),
        ]))
        .unwrap()
        .aggregate_window(
            FluxIdentifier::MEAN,
            FluxDuration::minutes(5),
            AggregateWindowOptions::default(),
        )
        .unwrap()
        .yield_(Some("mean"))
        .unwrap()
        .build()
}

#[test]
fn test_fully_parameterized_query() {
    let query = dashboard_query(ParameterizedTypes::ALL);
    assert_eq!(
        query.to_flux_notation(),
        r#"import "experimental/record"

option params = {
  from_bucket_0: "telegraf",
  range_start_1: 2024-03-01T00:00:00Z,
  filter_measurement_2: "cpu",
  filter_field_3: "usage_user",
  filter_field_4: "usage_system",
  filter_key_5: "host",
  filter_value_6: "web-01",
  filter_key_7: "region",
  filter_value_8: "eu-west",
  aggregateWindow_every_9: 5m,
  yield_name_10: "mean",
}

from(bucket: params.from_bucket_0)
  |> range(start: params.range_start_1, stop: now())
  |> filter(fn: (r) => (r._measurement == params.filter_measurement_2 and (r._field == params.filter_field_3 or r._field == params.filter_field_4) and (record.get(r: r, key: params.filter_key_5, default: "") == params.filter_value_6 and record.get(r: r, key: params.filter_key_7, default: "") == params.filter_value_8)))
  |> aggregateWindow(every: params.aggregateWindow_every_9, fn: mean)
  |> yield(name: params.yield_name_10)"#
    );
}

#[test]
fn test_inlined_query() {
    let query = dashboard_query(ParameterizedTypes::NONE);
    assert!(query.parameters().is_empty());
    assert_eq!(
        query.to_flux_notation(),
        r#"import "experimental/record"

from(bucket: "telegraf")
  |> range(start: 2024-03-01T00:00:00Z, stop: now())
  |> filter(fn: (r) => (r._measurement == "cpu" and (r._field == "usage_user" or r._field == "usage_system") and (record.get(r: r, key: "host", default: "") == "web-01" and record.get(r: r, key: "region", default: "") == "eu-west")))
  |> aggregateWindow(every: 5m, fn: mean)
  |> yield(name: "mean")"#
    );
}

#[test]
fn test_builds_are_deterministic() {
    let a = dashboard_query(ParameterizedTypes::STRING);
    let b = dashboard_query(ParameterizedTypes::STRING);
    assert_eq!(a.to_flux_notation(), b.to_flux_notation());
    assert_eq!(a.to_flux_ast(), b.to_flux_ast());
    assert_eq!(a.to_request_json().unwrap(), b.to_request_json().unwrap());
}

#[test]
fn test_parameter_names_unique_and_increasing() {
    let query = dashboard_query(ParameterizedTypes::ALL);
    let ordinals: Vec<usize> = query
        .parameters()
        .iter()
        .map(|(name, _)| name.rsplit('_').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(ordinals, (0..ordinals.len()).collect::<Vec<_>>());
}

#[test]
fn test_partial_policy() {
    let query = dashboard_query(ParameterizedTypes::DURATION | ParameterizedTypes::DATE_TIME);
    let kinds: Vec<ValueKind> = query.parameters().iter().map(|(_, v)| v.kind()).collect();
    assert_eq!(kinds, vec![ValueKind::DateTime, ValueKind::Duration]);
    assert!(query.body().contains(r#"from(bucket: "telegraf")"#));
}

#[test]
fn test_independent_sessions() {
    let first = FluxQueryBuilder::default().from("a").unwrap().build();
    let second = FluxQueryBuilder::default().from("b").unwrap().build();
    assert_eq!(first.parameters().get("from_bucket_0"), Some(&FluxValue::from("a")));
    assert_eq!(second.parameters().get("from_bucket_0"), Some(&FluxValue::from("b")));
}

#[test]
fn test_options_from_toml() {
    let options = FluxBuilderOptions::from_toml_str(
        r#"
        parameterize = ["string"]
        now = "2024-06-01T12:00:00Z"
        imports = ["strings"]
        "#,
    )
    .unwrap();
    let query = FluxQueryBuilder::new(options)
        .from("b")
        .unwrap()
        .filter(RecordKey::VALUE.gt(0.5))
        .unwrap()
        .build();
    assert_eq!(
        query.to_flux_notation(),
        "import \"strings\"\n\n\
         option params = {\n  from_bucket_0: \"b\",\n}\n\n\
         option now = () => 2024-06-01T12:00:00Z\n\n\
         from(bucket: params.from_bucket_0)\n  |> filter(fn: (r) => r._value > 0.5)"
    );
}

#[test]
fn test_windowed_pipeline() {
    let query = FluxQueryBuilder::new(FluxBuilderOptions::new(ParameterizedTypes::NONE))
        .from("metrics")
        .unwrap()
        .range(FluxTime::ago(FluxDuration::days(7)), None)
        .unwrap()
        .window(
            FluxDuration::days(1),
            WindowOptions {
                location: Some(FluxLocation::fixed(FluxDuration::hours(2))),
                ..Default::default()
            },
        )
        .unwrap()
        .sum(None)
        .unwrap()
        .moving_average(3)
        .unwrap()
        .build();
    assert_eq!(
        query.to_flux_notation(),
        "import \"timezone\"\n\n\
         from(bucket: \"metrics\")\n  \
         |> range(start: -7d)\n  \
         |> window(every: 1d, location: timezone.fixed(offset: 2h))\n  \
         |> sum()\n  \
         |> movingAverage(n: 3)"
    );
}
