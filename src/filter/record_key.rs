use crate::error::FluxResult;
use crate::options::{FluxBuilderOptions, FluxPackage};
use crate::params::Parameters;
use crate::types::FluxRegex;

use super::condition::{ComparisonOperator, Condition, Operand};

/// Prefix under which dynamic key names are bound.
pub const KEY_PREFIX: &str = "filter_key";

/// A reference to a column of the record under evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// A well-known column, accessed directly as `r.<name>`.
    Trusted(&'static str),
    /// A caller-supplied column name, looked up through `record.get`.
    Dynamic(String),
}

impl RecordKey {
    pub const MEASUREMENT: RecordKey = RecordKey::Trusted("_measurement");
    pub const FIELD: RecordKey = RecordKey::Trusted("_field");
    pub const VALUE: RecordKey = RecordKey::Trusted("_value");
    pub const TIME: RecordKey = RecordKey::Trusted("_time");
    pub const START: RecordKey = RecordKey::Trusted("_start");
    pub const STOP: RecordKey = RecordKey::Trusted("_stop");

    /// A column whose name comes from outside, typically a tag key.
    pub fn dynamic(name: impl Into<String>) -> Self {
        RecordKey::Dynamic(name.into())
    }

    pub fn render(
        &self,
        options: &mut FluxBuilderOptions,
        params: &mut Parameters,
    ) -> FluxResult<String> {
        match self {
            RecordKey::Trusted(name) => Ok(format!("r.{}", name)),
            RecordKey::Dynamic(name) => {
                // `r[key]` does not accept a variable key in Flux.
                let key = params.bind(KEY_PREFIX, name.as_str())?;
                options.import_package(FluxPackage::EXPERIMENTAL_RECORD);
                Ok(format!("record.get(r: r, key: {}, default: \"\")", key))
            }
        }
    }

    fn compare(&self, operator: ComparisonOperator, right: impl Into<Operand>) -> Condition {
        Condition::compare(self.clone(), operator, right)
    }

    pub fn eq(&self, value: impl Into<Operand>) -> Condition {
        self.compare(ComparisonOperator::Equal, value)
    }

    pub fn ne(&self, value: impl Into<Operand>) -> Condition {
        self.compare(ComparisonOperator::NotEqual, value)
    }

    pub fn lt(&self, value: impl Into<Operand>) -> Condition {
        self.compare(ComparisonOperator::Less, value)
    }

    pub fn lte(&self, value: impl Into<Operand>) -> Condition {
        self.compare(ComparisonOperator::LessOrEqual, value)
    }

    pub fn gt(&self, value: impl Into<Operand>) -> Condition {
        self.compare(ComparisonOperator::Greater, value)
    }

    pub fn gte(&self, value: impl Into<Operand>) -> Condition {
        self.compare(ComparisonOperator::GreaterOrEqual, value)
    }

    /// `=~` against a regular expression.
    pub fn matches(&self, pattern: FluxRegex) -> Condition {
        self.compare(ComparisonOperator::Matches, pattern)
    }

    /// `!~` against a regular expression.
    pub fn not_matches(&self, pattern: FluxRegex) -> Condition {
        self.compare(ComparisonOperator::NotMatches, pattern)
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKey::Trusted(name) => write!(f, "r.{}", name),
            RecordKey::Dynamic(name) => write!(f, "r[{:?}]", name),
        }
    }
}
