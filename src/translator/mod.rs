/// Filter expression translation
///
/// Turns an OData `$filter` expression tree into a SQL WHERE fragment.
/// Path resolution, literal coercion and the attribute-lambda
/// sub-translator are shared with the in-memory backend in
/// `entity_filter`; only the final rendering differs per backend.
pub mod attribute_lambda;
pub mod errors;
pub mod literal;
pub mod path;
pub mod sql;

pub use attribute_lambda::{AttributeDescriptor, ComparisonOp};
pub use errors::TranslationError;
pub use literal::{TypedLiteral, SQL_TIMESTAMP_FORMAT};
pub use path::{ResolvedPath, resolve};
pub use sql::SqlFilterGenerator;
