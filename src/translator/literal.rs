/// Literal coercion
///
/// The URI parser guarantees a literal's text is lexically valid for its
/// declared type; this layer converts it into the representation a backend
/// needs. SQL gets re-quoted/reformatted text, the in-memory backend gets
/// typed values. Every literal embedded in generated SQL passes through
/// here — never verbatim client text.
use chrono::{DateTime, Utc};

use super::errors::TranslationError;
use crate::odata_ast::LiteralType;

/// Timestamp rendering used in SQL literals: `yyyy-MM-dd HH:mm:ss.SSSSSS Z`
/// in UTC, matching the storage layer's timestamp columns.
pub const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f %z";

/// A coerced literal, carrying both the typed value and enough of the
/// original text to re-render it per backend.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedLiteral {
    /// String body with the protocol quotes already stripped. A doubled
    /// inner quote is passed through unchanged; this layer does not
    /// unescape.
    Text(String),
    Timestamp(DateTime<Utc>),
    /// Numeric literal without a decimal separator in its text.
    Integer { raw: String, value: i64 },
    /// Numeric literal with a decimal separator in its text. The raw text
    /// is kept because SQL receives it verbatim.
    Decimal { raw: String, value: f64 },
    Boolean { raw: String, value: bool },
}

impl TypedLiteral {
    /// Coerce a raw protocol literal into its typed representation.
    pub fn coerce(declared_type: LiteralType, raw: &str) -> Result<TypedLiteral, TranslationError> {
        log::trace!("coerce({:?}, {})", declared_type, raw);

        match declared_type {
            LiteralType::String => Ok(TypedLiteral::Text(strip_protocol_quotes(raw))),
            LiteralType::DateTimeOffset => {
                let instant = DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| TranslationError::InvalidTimestamp(raw.to_string()))?;
                Ok(TypedLiteral::Timestamp(instant.with_timezone(&Utc)))
            }
            t if t.is_numeric() => coerce_numeric(raw),
            LiteralType::Boolean => {
                let value = match raw {
                    "true" => true,
                    "false" => false,
                    _ => return Err(TranslationError::UnsupportedLiteralType(raw.to_string())),
                };
                Ok(TypedLiteral::Boolean {
                    raw: raw.to_string(),
                    value,
                })
            }
            _ => Err(TranslationError::UnsupportedLiteralType(raw.to_string())),
        }
    }

    /// Render the literal as SQL text. String and timestamp literals are
    /// single-quoted; numeric and boolean literals keep their raw text,
    /// which is valid SQL syntax by construction.
    pub fn to_sql(&self) -> String {
        match self {
            TypedLiteral::Text(body) => format!("'{}'", body),
            TypedLiteral::Timestamp(instant) => {
                format!("'{}'", instant.format(SQL_TIMESTAMP_FORMAT))
            }
            TypedLiteral::Integer { raw, .. } => raw.clone(),
            TypedLiteral::Decimal { raw, .. } => raw.clone(),
            TypedLiteral::Boolean { raw, .. } => raw.clone(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TypedLiteral::Text(_) => "text",
            TypedLiteral::Timestamp(_) => "timestamp",
            TypedLiteral::Integer { .. } => "integer",
            TypedLiteral::Decimal { .. } => "decimal",
            TypedLiteral::Boolean { .. } => "boolean",
        }
    }
}

/// Strip exactly one leading and one trailing protocol quote. A literal of
/// two characters or fewer (i.e. `''`) yields the empty string; text that
/// arrives without its quote pair is kept as-is.
fn strip_protocol_quotes(raw: &str) -> String {
    if raw.len() > 2 {
        raw.strip_prefix('\'')
            .and_then(|body| body.strip_suffix('\''))
            .unwrap_or(raw)
            .to_string()
    } else {
        String::new()
    }
}

/// Integer vs decimal is decided by the presence of a decimal separator in
/// the literal's *text*, not by its declared type. `3` stays integer even
/// when declared Edm.Double; `3.0` becomes decimal even when the operand
/// sits in an integer-typed comparison.
fn coerce_numeric(raw: &str) -> Result<TypedLiteral, TranslationError> {
    if raw.contains('.') || raw.contains(',') {
        let value: f64 = raw
            .parse()
            .map_err(|_| TranslationError::UnsupportedLiteralType(raw.to_string()))?;
        Ok(TypedLiteral::Decimal {
            raw: raw.to_string(),
            value,
        })
    } else {
        let value: i64 = raw
            .parse()
            .map_err(|_| TranslationError::UnsupportedLiteralType(raw.to_string()))?;
        Ok(TypedLiteral::Integer {
            raw: raw.to_string(),
            value,
        })
    }
}
