/// Member path resolution
///
/// Walks the segments of a member path left to right, accumulating the
/// `/`-joined logical field name, and resolves it against the column
/// mapping. A lambda-any segment hands the remainder of resolution to the
/// attribute-lambda sub-translator; its descriptor replaces the column
/// lookup entirely.
use super::attribute_lambda::{self, AttributeDescriptor};
use super::errors::TranslationError;
use crate::odata_ast::PathSegment;
use crate::schema_map::{ColumnLookup, ColumnMapping};

/// Result of resolving a member path.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPath {
    /// The logical field is backed by this physical column.
    Column(String),
    /// The logical field is known to the schema but intentionally has no
    /// backing column; the carried string is the logical field name.
    Unmapped(String),
    /// Resolution passed through an `any(...)` quantifier over the dynamic
    /// attribute collection.
    AttributeMatch(AttributeDescriptor),
}

/// Resolve a member path to a column, an unmapped marker, or an attribute
/// match descriptor.
///
/// `bound_variable` is the variable bound by an enclosing `any(...)`, if
/// resolution happens inside a lambda body; a leading lambda-variable
/// segment must match it.
pub fn resolve(
    segments: &[PathSegment],
    bound_variable: Option<&str>,
    mapping: &ColumnMapping,
) -> Result<ResolvedPath, TranslationError> {
    log::trace!("resolve path of {} segment(s)", segments.len());

    let mut logical_field = String::new();

    for (position, segment) in segments.iter().enumerate() {
        if position > 0 {
            logical_field.push('/');
        }
        match segment {
            PathSegment::Primitive(name)
            | PathSegment::Complex(name)
            | PathSegment::Navigation(name) => logical_field.push_str(name),
            PathSegment::LambdaVariable(name) => {
                if position != 0 {
                    return Err(TranslationError::UnsupportedPathShape(format!(
                        "lambda variable '{}' in the middle of a path",
                        name
                    )));
                }
                match bound_variable {
                    Some(bound) if bound == name => logical_field.push_str(name),
                    Some(bound) => {
                        return Err(TranslationError::UnboundVariable {
                            bound: bound.to_string(),
                            found: name.clone(),
                        })
                    }
                    None => {
                        return Err(TranslationError::UnsupportedPathShape(format!(
                            "lambda variable '{}' outside of a lambda expression",
                            name
                        )))
                    }
                }
            }
            PathSegment::LambdaAny { variable, body } => {
                // The quantifier consumes the rest of the path.
                let descriptor = attribute_lambda::translate(variable, body)?;
                log::trace!("... attribute condition: {:?}", descriptor);
                return Ok(ResolvedPath::AttributeMatch(descriptor));
            }
            PathSegment::Index(index) => {
                return Err(TranslationError::UnsupportedPathShape(format!(
                    "collection index addressing ({})",
                    index
                )))
            }
            PathSegment::Count => {
                return Err(TranslationError::UnsupportedPathShape(
                    "$count segments".to_string(),
                ))
            }
        }
    }

    log::trace!("... derived logical field: {}", logical_field);
    match mapping.lookup(&logical_field) {
        ColumnLookup::Column(column) => Ok(ResolvedPath::Column(column.to_string())),
        ColumnLookup::Unmapped => Ok(ResolvedPath::Unmapped(logical_field)),
        ColumnLookup::Unknown => Err(TranslationError::UnknownField(logical_field)),
    }
}

/// The plain name of a segment, for backends that walk live data instead
/// of the column table. Quantifiers and index segments have no name.
pub fn segment_name(segment: &PathSegment) -> Result<&str, TranslationError> {
    match segment {
        PathSegment::Primitive(name)
        | PathSegment::Complex(name)
        | PathSegment::Navigation(name)
        | PathSegment::LambdaVariable(name) => Ok(name),
        PathSegment::LambdaAny { .. } => Err(TranslationError::UnsupportedPathShape(
            "lambda 'any' segment has no property name".to_string(),
        )),
        PathSegment::Index(index) => Err(TranslationError::UnsupportedPathShape(format!(
            "collection index addressing ({})",
            index
        ))),
        PathSegment::Count => Err(TranslationError::UnsupportedPathShape(
            "$count segments".to_string(),
        )),
    }
}
