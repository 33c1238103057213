/// In-memory filter backend
///
/// The second consumer of the shared expression tree: instead of emitting
/// SQL it answers "does this one entity match" directly, walking the
/// entity's live property values. Shares path, literal and lambda handling
/// with the SQL backend so both give the same verdict on the same filter.
pub mod entity;
pub mod evaluate;

pub use entity::{Entity, EntityAttribute, PropertyValue};
pub use evaluate::{EntityFilter, TypedScalar};
