//! Free-function condition builders.

use super::condition::{ComparisonOperator, Condition, Operand};
use super::record_key::RecordKey;
use crate::types::FluxRegex;

/// A dynamically named column, e.g. a tag key.
pub fn key(name: impl Into<String>) -> RecordKey {
    RecordKey::dynamic(name)
}

/// Create an equality condition (left == right)
pub fn eq(left: impl Into<Operand>, right: impl Into<Operand>) -> Condition {
    Condition::compare(left, ComparisonOperator::Equal, right)
}

/// Create a not-equal condition (left != right)
pub fn ne(left: impl Into<Operand>, right: impl Into<Operand>) -> Condition {
    Condition::compare(left, ComparisonOperator::NotEqual, right)
}

/// Create a less-than condition (left < right)
pub fn lt(left: impl Into<Operand>, right: impl Into<Operand>) -> Condition {
    Condition::compare(left, ComparisonOperator::Less, right)
}

/// Create a less-than-or-equal condition (left <= right)
pub fn lte(left: impl Into<Operand>, right: impl Into<Operand>) -> Condition {
    Condition::compare(left, ComparisonOperator::LessOrEqual, right)
}

/// Create a greater-than condition (left > right)
pub fn gt(left: impl Into<Operand>, right: impl Into<Operand>) -> Condition {
    Condition::compare(left, ComparisonOperator::Greater, right)
}

/// Create a greater-than-or-equal condition (left >= right)
pub fn gte(left: impl Into<Operand>, right: impl Into<Operand>) -> Condition {
    Condition::compare(left, ComparisonOperator::GreaterOrEqual, right)
}

/// Create a regex match condition (left =~ /pattern/)
pub fn matches(left: impl Into<Operand>, pattern: FluxRegex) -> Condition {
    Condition::compare(left, ComparisonOperator::Matches, pattern)
}

/// Create a negated regex match condition (left !~ /pattern/)
pub fn not_matches(left: impl Into<Operand>, pattern: FluxRegex) -> Condition {
    Condition::compare(left, ComparisonOperator::NotMatches, pattern)
}

/// All conditions hold.
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::and(conditions)
}

/// At least one condition holds.
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::or(conditions)
}
