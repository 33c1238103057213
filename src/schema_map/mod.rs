/// Logical-field to physical-column mapping
///
/// The protocol schema exposes logical field names (`Name`,
/// `ContentDate/Start`); the storage layer knows physical columns
/// (`ppf.product_file_name`, `p.sensing_start_time`). The mapping between
/// the two is fixed per deployment: it is built once at process start and
/// never mutated afterwards, so concurrent translations can read it
/// without synchronization. A schema change means redeploying the table,
/// not mutating it at runtime.
use std::collections::HashMap;

use lazy_static::lazy_static;

/// Built-in mapping for the product entity set.
///
/// `None` marks fields that exist in the protocol schema but have no
/// backing column (computed or constant on the wire); the translator must
/// fail on those distinctly from fields it has never heard of.
static PRODUCT_FIELD_MAPPING: &[(&str, Option<&str>)] = &[
    ("Id", Some("p.uuid")),
    ("Name", Some("ppf.product_file_name")),
    ("ContentType", None),
    ("ContentLength", Some("ppf.file_size")),
    ("PublicationDate", Some("p.generation_time")),
    ("ProductionType", Some("p.production_type")),
    ("Checksums", Some("ppf.checksum")),
    ("ContentDate/Start", Some("p.sensing_start_time")),
    ("ContentDate/End", Some("p.sensing_stop_time")),
    ("Checksums/Algorithm", None),
    ("Checksums/Value", Some("ppf.checksum")),
    ("Checksums/ChecksumDate", Some("ppf.checksum_time")),
];

lazy_static! {
    static ref PRODUCT_COLUMN_MAP: ColumnMapping = ColumnMapping::from_entries(
        PRODUCT_FIELD_MAPPING
            .iter()
            .map(|(field, column)| ((*field).to_string(), column.map(str::to_string))),
    );
}

/// Outcome of a logical-field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLookup<'a> {
    /// The field is backed by this physical column.
    Column(&'a str),
    /// The field is part of the protocol schema but has no backing column.
    Unmapped,
    /// The field is not part of the protocol schema at all.
    Unknown,
}

/// Read-only table mapping logical fields to physical columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    entries: HashMap<String, Option<String>>,
}

impl ColumnMapping {
    /// The process-wide mapping for the product entity set.
    pub fn product_default() -> &'static ColumnMapping {
        &PRODUCT_COLUMN_MAP
    }

    /// Build a mapping from `(logical field, physical column)` pairs.
    /// A `None` column marks a known-but-unmapped field.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        ColumnMapping {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn lookup(&self, logical_field: &str) -> ColumnLookup<'_> {
        match self.entries.get(logical_field) {
            Some(Some(column)) => ColumnLookup::Column(column),
            Some(None) => ColumnLookup::Unmapped,
            None => ColumnLookup::Unknown,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Protocol name of the production type enum.
pub const EN_PRODUCTION_TYPE: &str = "ProductionType";

/// Map a protocol production-type enum value to its storage representation.
pub fn production_type_value(protocol_value: &str) -> Option<&'static str> {
    match protocol_value {
        "systematic_production" => Some("SYSTEMATIC"),
        "on_demand_default" => Some("ON_DEMAND_DEFAULT"),
        "on_demand_non_default" => Some("ON_DEMAND_NON_DEFAULT"),
        _ => None,
    }
}
