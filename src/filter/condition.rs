use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{FluxError, FluxResult};
use crate::options::FluxBuilderOptions;
use crate::params::Parameters;
use crate::template::FluxTemplate;
use crate::types::{FluxDuration, FluxRegex, FluxValue, ToFluxValue};

use super::record_key::RecordKey;

/// Prefix under which comparison values are bound.
pub const VALUE_PREFIX: &str = "filter_value";
/// Prefix under which template arguments of a filter are bound.
pub const CUSTOM_FLUX_PREFIX: &str = "filter_withCustomFlux";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Matches,
    NotMatches,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Matches => "=~",
            ComparisonOperator::NotMatches => "!~",
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Key(RecordKey),
    Value(FluxValue),
    /// An absent value. Evaluating a comparison against it fails.
    Null,
}

impl From<RecordKey> for Operand {
    fn from(key: RecordKey) -> Self {
        Operand::Key(key)
    }
}

impl From<&RecordKey> for Operand {
    fn from(key: &RecordKey) -> Self {
        Operand::Key(key.clone())
    }
}

impl From<FluxValue> for Operand {
    fn from(value: FluxValue) -> Self {
        Operand::Value(value)
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Operand::Null, Into::into)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Operand {
    fn from(value: DateTime<Tz>) -> Self {
        Operand::Value(value.into())
    }
}

impl From<NaiveDate> for Operand {
    fn from(value: NaiveDate) -> Self {
        value.to_flux_value().map_or(Operand::Null, Operand::Value)
    }
}

macro_rules! impl_value_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Value(FluxValue::from(value))
                }
            }
        )*
    };
}

impl_value_operand!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    char,
    &str,
    &String,
    String,
    NaiveDateTime,
    FluxDuration,
    FluxRegex,
    chrono::Duration,
    std::time::Duration,
);

/// Raw predicate text produced by caller code.
pub type UnsafeFluxFn = dyn Fn(&mut Parameters) -> FluxResult<String> + Send + Sync;

/// A boolean predicate, evaluated into Flux text on demand.
///
/// Building a condition has no side effects. Parameters are bound and
/// imports registered only by [`Condition::evaluate`], which walks the tree
/// left to right, depth first, so parameter names follow evaluation order.
#[derive(Clone)]
pub enum Condition {
    Compare {
        left: Operand,
        operator: ComparisonOperator,
        right: Operand,
        value_prefix: Cow<'static, str>,
    },
    Group {
        operator: LogicalOperator,
        conditions: Vec<Condition>,
    },
    /// A template whose arguments are bound under `prefix`.
    Template {
        template: FluxTemplate,
        prefix: Cow<'static, str>,
    },
    /// Caller-built text. Nothing in it is escaped or bound automatically.
    Unsafe(Arc<UnsafeFluxFn>),
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Compare {
                left,
                operator,
                right,
                value_prefix,
            } => f
                .debug_struct("Compare")
                .field("left", left)
                .field("operator", operator)
                .field("right", right)
                .field("value_prefix", value_prefix)
                .finish(),
            Condition::Group {
                operator,
                conditions,
            } => f
                .debug_struct("Group")
                .field("operator", operator)
                .field("conditions", conditions)
                .finish(),
            Condition::Template { template, prefix } => f
                .debug_struct("Template")
                .field("template", template)
                .field("prefix", prefix)
                .finish(),
            Condition::Unsafe(_) => f.write_str("Unsafe(..)"),
        }
    }
}

impl Condition {
    pub fn compare(
        left: impl Into<Operand>,
        operator: ComparisonOperator,
        right: impl Into<Operand>,
    ) -> Self {
        Condition::Compare {
            left: left.into(),
            operator,
            right: right.into(),
            value_prefix: Cow::Borrowed(VALUE_PREFIX),
        }
    }

    /// Bind values of this comparison under `prefix` instead of
    /// `filter_value`. No effect on other conditions.
    pub fn with_value_prefix(mut self, prefix: &'static str) -> Self {
        if let Condition::Compare { value_prefix, .. } = &mut self {
            *value_prefix = Cow::Borrowed(prefix);
        }
        self
    }

    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Group {
            operator: LogicalOperator::And,
            conditions: conditions.into_iter().collect(),
        }
    }

    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Group {
            operator: LogicalOperator::Or,
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Raw Flux whose interpolated values are bound automatically.
    pub fn custom_flux(template: FluxTemplate) -> Self {
        Condition::Template {
            template,
            prefix: Cow::Borrowed(CUSTOM_FLUX_PREFIX),
        }
    }

    /// Raw Flux built by `f` with no protection against injection.
    ///
    /// Every value that did not come from a trusted source must be passed
    /// through [`Parameters::bind`] inside `f`.
    pub fn custom_flux_unsafe<F>(f: F) -> Self
    where
        F: Fn(&mut Parameters) -> FluxResult<String> + Send + Sync + 'static,
    {
        Condition::Unsafe(Arc::new(f))
    }

    /// `r._measurement == <measurement>`
    pub fn match_measurement(measurement: impl Into<String>) -> Self {
        let measurement: String = measurement.into();
        RecordKey::MEASUREMENT
            .eq(measurement)
            .with_value_prefix("filter_measurement")
    }

    pub fn match_any_measurements<I, S>(measurements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::or(measurements.into_iter().map(Self::match_measurement))
    }

    /// `r._field == <field>`
    pub fn match_field(field: impl Into<String>) -> Self {
        let field: String = field.into();
        RecordKey::FIELD.eq(field).with_value_prefix("filter_field")
    }

    pub fn match_any_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::or(fields.into_iter().map(Self::match_field))
    }

    /// Tag `key` equals `value`. The key is looked up dynamically.
    pub fn match_tag(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        RecordKey::dynamic(key).eq(value)
    }

    /// Any of the tag pairs matches. Pairs are visited in iteration order.
    pub fn match_any_tags<I, K, V>(tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::or(tags.into_iter().map(|(k, v)| Self::match_tag(k, v)))
    }

    /// Every tag pair matches. Pairs are visited in iteration order.
    pub fn match_all_tags<I, K, V>(tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::and(tags.into_iter().map(|(k, v)| Self::match_tag(k, v)))
    }

    /// Append the predicate text to `out`, binding values into `params` and
    /// registering imports in `options`.
    pub fn evaluate(
        &self,
        out: &mut String,
        options: &mut FluxBuilderOptions,
        params: &mut Parameters,
    ) -> FluxResult<()> {
        match self {
            Condition::Compare {
                left,
                operator,
                right,
                value_prefix,
            } => {
                render_operand(left, value_prefix, out, options, params)?;
                out.push(' ');
                out.push_str(operator.as_str());
                out.push(' ');
                render_operand(right, value_prefix, out, options, params)
            }
            Condition::Group {
                operator,
                conditions,
            } => {
                if conditions.is_empty() {
                    return Err(FluxError::invalid(
                        "conditions",
                        "No filtering condition has been provided.",
                    ));
                }
                out.push('(');
                for (i, condition) in conditions.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                        out.push_str(operator.as_str());
                        out.push(' ');
                    }
                    condition.evaluate(out, options, params)?;
                }
                out.push(')');
                Ok(())
            }
            Condition::Template { template, prefix } => {
                out.push_str(&params.bind_template(template, prefix)?);
                Ok(())
            }
            Condition::Unsafe(f) => {
                out.push_str(&f(params)?);
                Ok(())
            }
        }
    }

    /// Evaluate into a fresh string.
    pub fn to_flux(
        &self,
        options: &mut FluxBuilderOptions,
        params: &mut Parameters,
    ) -> FluxResult<String> {
        let mut out = String::new();
        self.evaluate(&mut out, options, params)?;
        Ok(out)
    }
}

fn render_operand(
    operand: &Operand,
    value_prefix: &str,
    out: &mut String,
    options: &mut FluxBuilderOptions,
    params: &mut Parameters,
) -> FluxResult<()> {
    let text = match operand {
        Operand::Key(key) => key.render(options, params)?,
        Operand::Value(value) => params.bind_value(value_prefix, value.clone())?,
        Operand::Null => return Err(FluxError::null_value(value_prefix)),
    };
    out.push_str(&text);
    Ok(())
}
