//! Flux value kinds and host-type conversions.
//!
//! [`FluxValue`] is the closed set of values the builder knows how to emit.
//! Host types reach it either infallibly through `From`, or through
//! [`ToFluxValue`] when the input may be absent (`Option`, JSON `null`).

pub mod duration;
pub mod identifier;
pub mod regex;
pub mod time;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FluxError, FluxResult};

pub use self::duration::{DurationUnit, FluxDuration};
pub use self::identifier::FluxIdentifier;
pub use self::regex::FluxRegex;
pub use self::time::{FluxLocation, FluxTime};

/// A value that can be written as a Flux literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FluxValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Duration(FluxDuration),
    Regex(FluxRegex),
}

/// The kind of a [`FluxValue`], used by the parameterization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    Integer,
    #[serde(rename = "uinteger")]
    UInteger,
    Float,
    #[serde(alias = "datetime")]
    DateTime,
    Duration,
    String,
    Regex,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::UInteger => write!(f, "uinteger"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::DateTime => write!(f, "date_time"),
            ValueKind::Duration => write!(f, "duration"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Regex => write!(f, "regex"),
        }
    }
}

/// Reject instants Flux cannot represent. Flux times are int64 nanoseconds
/// since the Unix epoch, which spans 1677-09-21 to 2262-04-11.
pub fn check_date_time(instant: DateTime<Utc>) -> FluxResult<DateTime<Utc>> {
    match instant.timestamp_nanos_opt() {
        Some(_) => Ok(instant),
        None => Err(FluxError::invalid(
            "value",
            format!(
                "{} is outside the Flux time range (1677-09-21 to 2262-04-11)",
                instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
        )),
    }
}

impl FluxValue {
    /// The value itself, or an error if no valid Flux literal exists for it.
    pub fn checked(self) -> FluxResult<Self> {
        match self {
            FluxValue::DateTime(instant) => check_date_time(instant).map(FluxValue::DateTime),
            other => Ok(other),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            FluxValue::Bool(_) => ValueKind::Boolean,
            FluxValue::Int(_) => ValueKind::Integer,
            FluxValue::UInt(_) => ValueKind::UInteger,
            FluxValue::Float(_) => ValueKind::Float,
            FluxValue::String(_) => ValueKind::String,
            FluxValue::DateTime(_) => ValueKind::DateTime,
            FluxValue::Duration(_) => ValueKind::Duration,
            FluxValue::Regex(_) => ValueKind::Regex,
        }
    }
}

/// Conversion of a possibly-absent host value into a [`FluxValue`].
///
/// Implement this for your own types by mapping them onto one of the
/// existing variants; the builder then escapes and parameterizes them like
/// any built-in value.
pub trait ToFluxValue {
    fn to_flux_value(&self) -> FluxResult<FluxValue>;

    /// Literal notation of the converted value.
    fn try_flux_notation(&self) -> FluxResult<String> {
        use crate::notation::ToFlux;
        Ok(self.to_flux_value()?.to_flux_notation())
    }

    /// AST node of the converted value.
    fn try_flux_ast(&self) -> FluxResult<crate::ast::Expression> {
        use crate::notation::ToFlux;
        Ok(self.to_flux_value()?.to_flux_ast())
    }
}

macro_rules! impl_host_value {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for FluxValue {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl ToFluxValue for $ty {
                fn to_flux_value(&self) -> FluxResult<FluxValue> {
                    Ok(FluxValue::from(self.clone()))
                }
            }
        )*
    };
}

impl_host_value! {
    bool => |v| FluxValue::Bool(v),
    i8 => |v| FluxValue::Int(v.into()),
    i16 => |v| FluxValue::Int(v.into()),
    i32 => |v| FluxValue::Int(v.into()),
    i64 => |v| FluxValue::Int(v),
    isize => |v| FluxValue::Int(v as i64),
    u8 => |v| FluxValue::UInt(v.into()),
    u16 => |v| FluxValue::UInt(v.into()),
    u32 => |v| FluxValue::UInt(v.into()),
    u64 => |v| FluxValue::UInt(v),
    usize => |v| FluxValue::UInt(v as u64),
    f32 => |v| FluxValue::Float(v.into()),
    f64 => |v| FluxValue::Float(v),
    char => |v| FluxValue::String(v.to_string()),
    String => |v| FluxValue::String(v),
    FluxDuration => |v| FluxValue::Duration(v),
    FluxRegex => |v| FluxValue::Regex(v),
    chrono::Duration => |v| FluxValue::Duration(v.into()),
    std::time::Duration => |v| FluxValue::Duration(v.into()),
}

impl From<&str> for FluxValue {
    fn from(s: &str) -> Self {
        FluxValue::String(s.to_string())
    }
}

impl From<&String> for FluxValue {
    fn from(s: &String) -> Self {
        FluxValue::String(s.clone())
    }
}

impl From<NaiveDateTime> for FluxValue {
    fn from(dt: NaiveDateTime) -> Self {
        FluxValue::DateTime(Utc.from_utc_datetime(&dt))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FluxValue {
    fn from(dt: DateTime<Tz>) -> Self {
        FluxValue::DateTime(dt.with_timezone(&Utc))
    }
}

impl ToFluxValue for str {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        Ok(FluxValue::String(self.to_string()))
    }
}

impl<Tz: TimeZone> ToFluxValue for DateTime<Tz> {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        check_date_time(self.with_timezone(&Utc)).map(FluxValue::DateTime)
    }
}

/// Naive date-times are taken as UTC.
impl ToFluxValue for NaiveDateTime {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        check_date_time(Utc.from_utc_datetime(self)).map(FluxValue::DateTime)
    }
}

/// Dates are taken as midnight UTC.
impl ToFluxValue for NaiveDate {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        let midnight = self
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| FluxError::invalid("value", format!("{} has no midnight", self)))?;
        NaiveDateTime::to_flux_value(&midnight)
    }
}

impl ToFluxValue for FluxValue {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        self.clone().checked()
    }
}

impl<T: ToFluxValue + ?Sized> ToFluxValue for &T {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        (**self).to_flux_value()
    }
}

impl<T: ToFluxValue> ToFluxValue for Option<T> {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        match self {
            Some(value) => value.to_flux_value(),
            None => Err(FluxError::null_value("value")),
        }
    }
}

/// JSON scalars map onto the matching kind. Integers that fit `i64` are
/// signed, larger ones unsigned.
impl ToFluxValue for serde_json::Value {
    fn to_flux_value(&self) -> FluxResult<FluxValue> {
        use serde_json::Value as Json;

        match self {
            Json::Null => Err(FluxError::null_value("value")),
            Json::Bool(b) => Ok(FluxValue::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FluxValue::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(FluxValue::UInt(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(FluxValue::Float(f))
                } else {
                    Err(FluxError::UnsupportedKind(format!("number {}", n)))
                }
            }
            Json::String(s) => Ok(FluxValue::String(s.clone())),
            Json::Array(_) => Err(FluxError::UnsupportedKind("array".to_string())),
            Json::Object(_) => Err(FluxError::UnsupportedKind("object".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    #[test]
    fn test_value_from() {
        assert_eq!(FluxValue::from(true), FluxValue::Bool(true));
        assert_eq!(FluxValue::from(42i32), FluxValue::Int(42));
        assert_eq!(FluxValue::from(42u16), FluxValue::UInt(42));
        assert_eq!(FluxValue::from(1.5f32), FluxValue::Float(1.5));
        assert_eq!(FluxValue::from("cpu"), FluxValue::String("cpu".to_string()));
        assert_eq!(FluxValue::from('x').kind(), ValueKind::String);
    }

    #[test]
    fn test_datetime_normalized_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(FluxValue::from(local), FluxValue::DateTime(expected));
    }

    #[test]
    fn test_naive_date_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(date.to_flux_value().unwrap(), FluxValue::DateTime(expected));
    }

    #[test]
    fn test_date_time_range() {
        let earliest = DateTime::from_timestamp_nanos(i64::MIN);
        let latest = DateTime::from_timestamp_nanos(i64::MAX);
        assert!(earliest.to_flux_value().is_ok());
        assert!(latest.to_flux_value().is_ok());

        let past_end = latest + chrono::Duration::nanoseconds(1);
        let err = past_end.to_flux_value().unwrap_err();
        assert!(matches!(err, FluxError::InvalidArgument { ref name, .. } if name == "value"));
        assert!((earliest - chrono::Duration::nanoseconds(1)).to_flux_value().is_err());

        let far = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        assert!(far.to_flux_value().is_err());
        assert!(FluxValue::from(far.and_hms_opt(0, 0, 0).unwrap()).checked().is_err());
    }

    #[test]
    fn test_absent_value_rejected() {
        let missing: Option<&str> = None;
        let err = missing.to_flux_value().unwrap_err();
        assert!(matches!(err, FluxError::InvalidArgument { ref name, .. } if name == "value"));
        assert_eq!(
            Some("cpu").to_flux_value().unwrap(),
            FluxValue::String("cpu".to_string())
        );
    }

    #[test]
    fn test_json_values() {
        assert_eq!(json!(7).to_flux_value().unwrap(), FluxValue::Int(7));
        assert_eq!(
            json!(u64::MAX).to_flux_value().unwrap(),
            FluxValue::UInt(u64::MAX)
        );
        assert_eq!(json!(0.25).to_flux_value().unwrap(), FluxValue::Float(0.25));
        assert!(matches!(
            json!(null).to_flux_value(),
            Err(FluxError::InvalidArgument { .. })
        ));
        assert!(matches!(
            json!([1, 2]).to_flux_value(),
            Err(FluxError::UnsupportedKind(kind)) if kind == "array"
        ));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValueKind::DateTime.to_string(), "date_time");
        assert_eq!(ValueKind::UInteger.to_string(), "uinteger");
    }
}
