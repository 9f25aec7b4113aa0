//! # flux-builder
//!
//! > **Stop concatenating strings. Bind your values.**
//!
//! Builds InfluxDB Flux queries in which no caller-supplied value can turn
//! into syntax. Every value is either escaped into its literal form or bound
//! into an `option params = {...}` record, depending on the
//! [`ParameterizedTypes`](options::ParameterizedTypes) policy.
//!
//! ## Quick Example
//!
//! ```
//! use flux_builder::prelude::*;
//!
//! let query = FluxQueryBuilder::default()
//!     .from("telegraf")?
//!     .range(FluxTime::ago(FluxDuration::hours(1)), None)?
//!     .filter(or([RecordKey::FIELD.eq("cpu"), RecordKey::FIELD.eq("mem")]))?
//!     .build();
//!
//! assert!(query.body().ends_with(
//!     "filter(fn: (r) => (r._field == params.filter_value_2 or r._field == params.filter_value_3))"
//! ));
//! # Ok::<(), FluxError>(())
//! ```
//!
//! ## Layout
//!
//! | Module     | Role                                        |
//! |------------|---------------------------------------------|
//! | `notation` | One literal rule per value kind             |
//! | `params`   | Inline-or-bind decisions, parameter names   |
//! | `filter`   | Record keys and the condition tree          |
//! | `options`  | Policy, `now` override, import registry     |
//! | `builder`  | Pipeline stages and the finished query      |
//! | `parser`   | Reads literals back, used to verify output  |

pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod filter;
pub mod notation;
pub mod options;
pub mod params;
pub mod parser;
pub mod template;
pub mod types;

pub use error::{FluxError, FluxResult};

pub mod prelude {
    pub use crate::builder::{AggregateWindowOptions, FluxQuery, FluxQueryBuilder, WindowOptions};
    pub use crate::error::*;
    pub use crate::filter::{
        Condition, Operand, RecordKey, and, eq, gt, gte, key, lt, lte, matches, ne, not_matches,
        or,
    };
    pub use crate::flux;
    pub use crate::notation::ToFlux;
    pub use crate::options::{FluxBuilderOptions, FluxPackage, ParameterizedTypes};
    pub use crate::params::Parameters;
    pub use crate::template::FluxTemplate;
    pub use crate::types::{
        DurationUnit, FluxDuration, FluxIdentifier, FluxLocation, FluxRegex, FluxTime, FluxValue,
        ToFluxValue, ValueKind,
    };
}

/// Read one Flux literal back into a value.
///
/// # Example
///
/// ```
/// use flux_builder::{parse_literal, types::FluxValue};
///
/// let value = parse_literal(r#""O'Brien\"s""#).unwrap();
/// assert_eq!(value, FluxValue::from(r#"O'Brien"s"#));
/// ```
pub fn parse_literal(input: &str) -> FluxResult<types::FluxValue> {
    parser::parse_literal(input)
}
