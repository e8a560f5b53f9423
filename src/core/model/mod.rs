use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker rendered for attributes the document never declared.
///
/// An absent attribute is `None` in the model, which is distinct from a
/// declared-but-empty attribute (`Some("")`). Only the former renders as this
/// marker.
pub const UNKNOWN_MARKER: &str = "N/A";

/// Which side of the workflow an entity definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Source,
    Target,
}

/// Role a field plays in its table's key, derived from the raw KEYTYPE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyRole {
    NotAKey,
    Primary,
    Foreign,
}

/// A named source or target definition with its fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: Option<String>,
    pub kind: EntityKind,
    /// Every XML attribute except NAME, verbatim, in declaration order.
    pub attrs: IndexMap<String, String>,
    pub fields: Vec<Field>,
}

impl Entity {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// One field of an entity. All values are verbatim copies of XML attributes;
/// `None` means the attribute was absent from the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: Option<String>,
    pub ordinal: Option<String>,
    pub data_type: Option<String>,
    pub length: Option<String>,
    pub precision: Option<String>,
    pub scale: Option<String>,
    pub nullable: Option<String>,
    pub key_type: Option<String>,
    pub default_value: Option<String>,
}

impl Field {
    pub fn key_role(&self) -> KeyRole {
        match self.key_type.as_deref() {
            Some("PRIMARY KEY") => KeyRole::Primary,
            Some("FOREIGN KEY") => KeyRole::Foreign,
            _ => KeyRole::NotAKey,
        }
    }
}

/// A directed field-level edge between two mapping instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from_instance: String,
    pub from_field: String,
    pub to_instance: String,
    pub to_field: String,
    pub to_instance_type: Option<String>,
}

/// Placement of a transformation within a mapping. `transformation_name` is
/// the indirection key connectors resolve through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub name: Option<String>,
    pub transformation_name: String,
    pub transformation_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingVariable {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// A transformation definition and the fields it declares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transformation {
    pub name: String,
    pub kind: Option<String>,
    pub fields: Vec<Field>,
}

impl Transformation {
    /// First declared field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.as_deref() == Some(name))
    }
}

/// One parsed MAPPING element. All lists preserve document declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingGraph {
    pub name: Option<String>,
    pub description: Option<String>,
    pub variables: Vec<MappingVariable>,
    pub instances: Vec<Instance>,
    pub transformations: Vec<Transformation>,
    pub connectors: Vec<Connector>,
}

impl MappingGraph {
    /// Mapping name for display and diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_MARKER)
    }
}

/// Destination key of a lineage record: `(to_instance, to_field)`.
pub type LineageKey = (String, String);

/// One accepted source-to-target attribution. Values are verbatim copies from
/// the resolved transformation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageRecord {
    pub source_field: String,
    pub target_field: String,
    pub transformation: String,
    pub default_value: Option<String>,
    pub data_type: Option<String>,
    pub precision: Option<String>,
    pub scale: Option<String>,
}

/// Why a connector produced no lineage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    UnknownInstance,
    UnknownTransformation,
    UnknownField,
}

/// Diagnostic for a qualifying connector that resolved to nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedConnector {
    pub connector: Connector,
    pub reason: SkipReason,
}

/// Result of resolving one mapping: at most one record per destination key,
/// in the document order of the winning connectors. Read-only once built.
#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    pub mapping_name: String,
    records: IndexMap<LineageKey, LineageRecord>,
    pub skipped: Vec<SkippedConnector>,
}

impl ResolvedMapping {
    pub fn new(mapping_name: String) -> Self {
        ResolvedMapping {
            mapping_name,
            records: IndexMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Insert a record unless the destination key is already claimed.
    /// Returns whether the record was accepted.
    pub(crate) fn insert_first(&mut self, key: LineageKey, record: LineageRecord) -> bool {
        if self.records.contains_key(&key) {
            return false;
        }
        self.records.insert(key, record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, to_instance: &str, to_field: &str) -> Option<&LineageRecord> {
        self.records
            .get(&(to_instance.to_string(), to_field.to_string()))
    }

    /// Records in insertion order, which equals the document order of the
    /// winning connectors.
    pub fn records(&self) -> impl Iterator<Item = &LineageRecord> {
        self.records.values()
    }

    /// Destination keys paired with their records, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&LineageKey, &LineageRecord)> {
        self.records.iter()
    }
}

/// Session configuration lifted from a SESSION element. `attributes` keeps
/// every ATTRIBUTE pair lossless, a `None` value meaning the element declared
/// no VALUE; the renderer applies its own filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub name: Option<String>,
    pub mapping_name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub components: Vec<SessionComponent>,
    pub connections: Vec<SessionConnection>,
    pub writer_settings: Vec<(String, Option<String>)>,
    pub attributes: Vec<(String, Option<String>)>,
}

/// One SESSTRANSFORMATIONINST row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionComponent {
    pub instance_name: Option<String>,
    pub transformation_type: Option<String>,
    pub stage: Option<String>,
    pub pipeline: Option<String>,
    pub repartitioning: Option<String>,
}

/// A CONNECTIONREFERENCE row paired with its owning extension instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConnection {
    pub instance: Option<String>,
    pub connection_name: Option<String>,
    pub connection_type: Option<String>,
    pub connection_subtype: Option<String>,
}
