//! Literal notation and AST leaves for every value kind.
//!
//! Each kind has exactly one rule. The output of [`ToFlux::to_flux_notation`]
//! always scans back as a single literal of the same kind.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::ast::{DurationComponent, Expression, Property};
use crate::types::{FluxDuration, FluxRegex, FluxValue};

/// Convert a value to Flux literal text and to the matching AST node.
pub trait ToFlux {
    fn to_flux_notation(&self) -> String;
    fn to_flux_ast(&self) -> Expression;
}

/// Escape the body of a Flux string literal (without the surrounding quotes).
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\x{:02x}", byte));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Escape a regex pattern for a `/.../` literal.
pub fn escape_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                match chars.next() {
                    Some('\n') => out.push_str("n"),
                    Some(next) => out.push(next),
                    None => out.push('\\'),
                }
            }
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// `name(v: <arg>)`, the conversion-call form of a literal.
fn conversion_call(name: &str, argument: Expression) -> Expression {
    Expression::call(
        Expression::identifier(name),
        vec![Property::new("v", argument)],
    )
}

fn float_text(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("+Inf")
    } else if value == f64::NEG_INFINITY {
        Some("-Inf")
    } else {
        None
    }
}

impl ToFlux for bool {
    fn to_flux_notation(&self) -> String {
        self.to_string()
    }

    fn to_flux_ast(&self) -> Expression {
        Expression::BooleanLiteral { value: *self }
    }
}

impl ToFlux for i64 {
    fn to_flux_notation(&self) -> String {
        if *self == i64::MIN {
            format!("int(v: \"{}\")", self)
        } else {
            self.to_string()
        }
    }

    fn to_flux_ast(&self) -> Expression {
        if *self == i64::MIN {
            return conversion_call("int", Expression::string(self.to_string()));
        }
        let literal = Expression::IntegerLiteral {
            value: self.unsigned_abs().to_string(),
        };
        if *self < 0 {
            Expression::negate(literal)
        } else {
            literal
        }
    }
}

impl ToFlux for u64 {
    fn to_flux_notation(&self) -> String {
        format!("uint(v: {})", self)
    }

    fn to_flux_ast(&self) -> Expression {
        Expression::UnsignedIntegerLiteral {
            value: self.to_string(),
        }
    }
}

impl ToFlux for f64 {
    fn to_flux_notation(&self) -> String {
        match non_finite_text(*self) {
            Some(text) => format!("float(v: \"{}\")", text),
            None => float_text(*self),
        }
    }

    fn to_flux_ast(&self) -> Expression {
        if let Some(text) = non_finite_text(*self) {
            return conversion_call("float", Expression::string(text));
        }
        let literal = Expression::FloatLiteral { value: self.abs() };
        if self.is_sign_negative() {
            Expression::negate(literal)
        } else {
            literal
        }
    }
}

impl ToFlux for str {
    fn to_flux_notation(&self) -> String {
        format!("\"{}\"", escape_string(self))
    }

    fn to_flux_ast(&self) -> Expression {
        Expression::string(self)
    }
}

impl ToFlux for String {
    fn to_flux_notation(&self) -> String {
        self.as_str().to_flux_notation()
    }

    fn to_flux_ast(&self) -> Expression {
        self.as_str().to_flux_ast()
    }
}

/// RFC 3339 in UTC. Only instants inside the Flux time range have a valid
/// literal; every conversion path into the builder checks that first.
impl ToFlux for DateTime<Utc> {
    fn to_flux_notation(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn to_flux_ast(&self) -> Expression {
        Expression::DateTimeLiteral {
            value: self.to_flux_notation(),
        }
    }
}

impl ToFlux for FluxDuration {
    fn to_flux_notation(&self) -> String {
        if self.is_zero() {
            return "0s".to_string();
        }
        let mut out = String::new();
        if self.is_negative() {
            out.push('-');
        }
        for (unit, magnitude) in self.components() {
            out.push_str(&magnitude.to_string());
            out.push_str(unit.suffix());
        }
        out
    }

    fn to_flux_ast(&self) -> Expression {
        let values = if self.is_zero() {
            vec![DurationComponent {
                magnitude: 0,
                unit: "s".to_string(),
            }]
        } else {
            self.components()
                .iter()
                .map(|(unit, magnitude)| DurationComponent {
                    magnitude: *magnitude,
                    unit: unit.suffix().to_string(),
                })
                .collect()
        };
        let literal = Expression::DurationLiteral { values };
        if self.is_negative() {
            Expression::negate(literal)
        } else {
            literal
        }
    }
}

impl ToFlux for FluxRegex {
    fn to_flux_notation(&self) -> String {
        format!("/{}/", escape_regex(self.as_str()))
    }

    fn to_flux_ast(&self) -> Expression {
        Expression::RegexpLiteral {
            value: self.as_str().to_string(),
        }
    }
}

impl ToFlux for FluxValue {
    fn to_flux_notation(&self) -> String {
        match self {
            FluxValue::Bool(v) => v.to_flux_notation(),
            FluxValue::Int(v) => v.to_flux_notation(),
            FluxValue::UInt(v) => v.to_flux_notation(),
            FluxValue::Float(v) => v.to_flux_notation(),
            FluxValue::String(v) => v.to_flux_notation(),
            FluxValue::DateTime(v) => v.to_flux_notation(),
            FluxValue::Duration(v) => v.to_flux_notation(),
            FluxValue::Regex(v) => v.to_flux_notation(),
        }
    }

    fn to_flux_ast(&self) -> Expression {
        match self {
            FluxValue::Bool(v) => v.to_flux_ast(),
            FluxValue::Int(v) => v.to_flux_ast(),
            FluxValue::UInt(v) => v.to_flux_ast(),
            FluxValue::Float(v) => v.to_flux_ast(),
            FluxValue::String(v) => v.to_flux_ast(),
            FluxValue::DateTime(v) => v.to_flux_ast(),
            FluxValue::Duration(v) => v.to_flux_ast(),
            FluxValue::Regex(v) => v.to_flux_ast(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DurationUnit;
    use chrono::TimeZone;

    #[test]
    fn test_bool_and_ints() {
        assert_eq!(true.to_flux_notation(), "true");
        assert_eq!((-42i64).to_flux_notation(), "-42");
        assert_eq!(i64::MIN.to_flux_notation(), r#"int(v: "-9223372036854775808")"#);
        assert_eq!(7u64.to_flux_notation(), "uint(v: 7)");
    }

    #[test]
    fn test_negative_int_ast_is_unary() {
        let ast = (-5i64).to_flux_ast();
        assert_eq!(
            ast,
            Expression::negate(Expression::IntegerLiteral {
                value: "5".to_string()
            })
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(1.0f64.to_flux_notation(), "1.0");
        assert_eq!(0.1f64.to_flux_notation(), "0.1");
        assert_eq!(1e21f64.to_flux_notation(), "1000000000000000000000.0");
        assert_eq!((-2.5f64).to_flux_notation(), "-2.5");
        assert_eq!(f64::NAN.to_flux_notation(), r#"float(v: "NaN")"#);
        assert_eq!(f64::NEG_INFINITY.to_flux_notation(), r#"float(v: "-Inf")"#);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(r#"O'Brien"s"#.to_flux_notation(), r#""O'Brien\"s""#);
        assert_eq!(r"a\b".to_flux_notation(), r#""a\\b""#);
        assert_eq!("cost ${price}".to_flux_notation(), r#""cost \${price}""#);
        assert_eq!("$5".to_flux_notation(), r#""$5""#);
        assert_eq!("a\nb\tc".to_flux_notation(), r#""a\nb\tc""#);
        assert_eq!("\u{7}".to_flux_notation(), r#""\x07""#);
    }

    #[test]
    fn test_datetime_notation() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(dt.to_flux_notation(), "2024-01-01T00:00:00Z");
        let precise = dt + chrono::Duration::milliseconds(250);
        assert_eq!(precise.to_flux_notation(), "2024-01-01T00:00:00.250Z");
    }

    #[test]
    fn test_duration_notation() {
        assert_eq!(FluxDuration::zero().to_flux_notation(), "0s");
        let d = FluxDuration::days(1).with(30, DurationUnit::Minute).unwrap();
        assert_eq!(d.to_flux_notation(), "1d30m");
        assert_eq!(d.clone().negate().to_flux_notation(), "-1d30m");
        assert_eq!(
            FluxDuration::months(1)
                .with(2, DurationUnit::Year)
                .unwrap()
                .to_flux_notation(),
            "2y1mo"
        );
        assert!(matches!(
            d.negate().to_flux_ast(),
            Expression::UnaryExpression { ref operator, .. } if operator == "-"
        ));
    }

    #[test]
    fn test_largest_duration_text_matches_ast() {
        let d = FluxDuration::try_new(FluxDuration::MAX_MAGNITUDE, DurationUnit::Nanosecond)
            .unwrap();
        assert_eq!(d.to_flux_notation(), "9223372036854775807ns");
        assert_eq!(
            d.to_flux_ast(),
            Expression::DurationLiteral {
                values: vec![DurationComponent {
                    magnitude: i64::MAX,
                    unit: "ns".to_string(),
                }],
            }
        );
    }

    #[test]
    fn test_regex_notation() {
        let re = FluxRegex::new("a/b").unwrap();
        assert_eq!(re.to_flux_notation(), r"/a\/b/");
        let escaped = FluxRegex::new(r"a\/b").unwrap();
        assert_eq!(escaped.to_flux_notation(), r"/a\/b/");
        let dotted = FluxRegex::new(r"^cpu\.total$").unwrap();
        assert_eq!(dotted.to_flux_notation(), r"/^cpu\.total$/");
    }

    #[test]
    fn test_value_dispatch() {
        assert_eq!(FluxValue::from("cpu").to_flux_notation(), r#""cpu""#);
        assert_eq!(FluxValue::UInt(3).to_flux_ast().kind(), "UnsignedIntegerLiteral");
        assert_eq!(FluxValue::Float(f64::NAN).to_flux_ast().kind(), "CallExpression");
    }
}
