//! Flux abstract syntax tree.
//!
//! Only the nodes the builder emits are modelled: literals, identifiers,
//! member access, records, calls, the unary minus, function literals,
//! option statements and import declarations.

pub mod expr;
pub mod statements;

pub use self::expr::{DurationComponent, Expression, Property};
pub use self::statements::{File, ImportDeclaration, Statement, VariableAssignment};
