//! odasql - OData `$filter` translation for the product catalog
//!
//! This crate turns parsed OData filter expression trees into:
//! - SQL WHERE fragments for catalog database queries
//! - direct match verdicts against in-memory entities
//!
//! Both backends share one path resolver, one literal coercion layer and
//! one attribute-lambda sub-translator, so a filter means the same thing
//! whichever way it is checked. The crate does not parse filter text;
//! callers hand it an already-parsed expression tree.

pub mod config;
pub mod entity_filter;
pub mod odata_ast;
pub mod schema_map;
pub mod translator;

pub use config::SqlTableConfig;
pub use entity_filter::{Entity, EntityFilter, PropertyValue};
pub use odata_ast::{BinaryOperator, Expression, Literal, LiteralType, MemberPath, PathSegment};
pub use schema_map::ColumnMapping;
pub use translator::{SqlFilterGenerator, TranslationError};
