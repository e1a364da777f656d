//! Explicit entity metadata.
//!
//! Every selectable type describes its public fields once through an
//! [`EntitySchema`]. The derive macro builds these lazily, one per type, so
//! path resolution and default-field discovery never need runtime reflection.

use std::fmt;

/// Lazily resolved schema of a nested entity type.
///
/// A function pointer rather than a reference so self-referential entities
/// (`Category { parent: Option<Box<Category>> }`) can describe themselves.
pub type SchemaRef = fn() -> &'static EntitySchema;

/// Leaf value categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Integer,
    Float,
    String,
    DateTime,
    Enum,
    Json,
}

/// Declared type of an entity field.
#[derive(Clone)]
pub enum FieldType {
    Scalar(ScalarKind),
    Optional(Box<FieldType>),
    List(Box<FieldType>),
    Object(SchemaRef),
}

impl FieldType {
    /// The entity that further path segments walk into, if any.
    ///
    /// `Optional` and `List` wrappers are looked through, so both
    /// `Option<Box<Address>>` and `Vec<Order>` resolve to their element entity.
    pub fn entity(&self) -> Option<&'static EntitySchema> {
        match self {
            Self::Scalar(_) => None,
            Self::Optional(inner) | Self::List(inner) => inner.entity(),
            Self::Object(schema) => Some(schema()),
        }
    }

    /// True for lists whose elements are entities. Lists of scalars behave
    /// like arrays and are read as a single leaf value.
    pub fn is_collection(&self) -> bool {
        match self {
            Self::Optional(inner) => inner.is_collection(),
            Self::List(inner) => inner.entity().is_some(),
            _ => false,
        }
    }

    /// Fields that can be surfaced without further traversal: scalars,
    /// optional scalars and arrays of scalars.
    pub fn is_simple(&self) -> bool {
        match self {
            Self::Scalar(_) => true,
            Self::Optional(inner) => inner.is_scalar(),
            Self::List(inner) => inner.is_scalar(),
            Self::Object(_) => false,
        }
    }

    fn is_scalar(&self) -> bool {
        match self {
            Self::Scalar(_) => true,
            Self::Optional(inner) => inner.is_scalar(),
            _ => false,
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Optional(a), Self::Optional(b)) | (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a().type_name == b().type_name,
            _ => false,
        }
    }
}

impl Eq for FieldType {}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "Scalar({:?})", kind),
            Self::Optional(inner) => write!(f, "Optional({:?})", inner),
            Self::List(inner) => write!(f, "List({:?})", inner),
            Self::Object(schema) => write!(f, "Object({})", schema().type_name),
        }
    }
}

/// One public field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// The ordered public fields of one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl EntitySchema {
    pub fn new(type_name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { type_name, fields }
    }

    /// Fully qualified Rust type name; the entity's identity in shape keys.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Case-insensitive lookup returning the field's position and descriptor.
    pub fn find(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name.eq_ignore_ascii_case(name))
    }
}
