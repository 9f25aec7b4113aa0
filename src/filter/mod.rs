//! Filter predicates.
//!
//! Conditions are plain data until a query evaluates them:
//!
//! ```
//! use flux_builder::filter::{or, RecordKey};
//!
//! let cpu_or_mem = or([RecordKey::FIELD.eq("cpu"), RecordKey::FIELD.eq("mem")]);
//! ```

pub mod builders;
pub mod condition;
pub mod record_key;

pub use self::builders::{and, eq, gt, gte, key, lt, lte, matches, ne, not_matches, or};
pub use self::condition::{
    ComparisonOperator, Condition, LogicalOperator, Operand, UnsafeFluxFn, CUSTOM_FLUX_PREFIX,
    VALUE_PREFIX,
};
pub use self::record_key::{RecordKey, KEY_PREFIX};
