/// OData filter expression tree
///
/// The protocol URI parser (an external collaborator) hands the translator
/// an already-parsed, immutable expression tree. This module defines that
/// tree; the translator backends only visit it, they never construct or
/// mutate it during translation. The constructors on [`Expression`] and
/// [`PathSegment`] exist for callers and tests that need to assemble trees
/// by hand.
pub mod ast;

pub use ast::{
    BinaryOperator, Expression, Literal, LiteralType, MemberPath, MethodKind, PathSegment,
    UnaryOperator,
};
