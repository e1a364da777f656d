//! Field access traits.
//!
//! [`Selectable`] ties a Rust type to its [`EntitySchema`]; [`Entity`] is the
//! object-safe half used while projecting; [`FieldAccess`] describes how a
//! single field's type is classified and read. All three are normally produced
//! by `#[derive(Selectable)]`:
//!
//! ```ignore
//! use autoselect::Selectable;
//!
//! #[derive(Selectable)]
//! #[selectable(rename_all = "camelCase")]
//! struct Customer {
//!     id: i64,
//!     display_name: String,
//!     orders: Vec<Order>,
//!     #[selectable(skip)]
//!     password_hash: String,
//! }
//! ```

use crate::schema::{EntitySchema, FieldType, ScalarKind};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Object-safe view of an entity instance.
pub trait Entity {
    /// Schema of the concrete type behind this reference.
    fn entity_schema(&self) -> &'static EntitySchema;

    /// Read the field at `index` in [`Entity::entity_schema`] order.
    /// Out-of-range indexes read as [`FieldRef::Null`].
    fn field(&self, index: usize) -> FieldRef<'_>;

    /// The full, unprojected value of this entity. Profiles do not apply;
    /// selectors always project nested entities through a shape instead.
    fn to_value(&self) -> Value {
        let schema = self.entity_schema();
        let mut map = Map::with_capacity(schema.fields().len());
        for (index, field) in schema.fields().iter().enumerate() {
            map.insert(field.name.to_string(), self.field(index).into_value());
        }
        Value::Object(map)
    }
}

/// A type that can be the root of a selection.
pub trait Selectable: Entity + Sized {
    /// The schema for this type, built once per process.
    fn schema() -> &'static EntitySchema;
}

/// Classification and read access for one field type.
pub trait FieldAccess {
    fn field_type() -> FieldType
    where
        Self: Sized;

    fn field_ref(&self) -> FieldRef<'_>;
}

/// A borrowed field value, either already a leaf [`Value`] or a nested
/// entity that may be projected further.
pub enum FieldRef<'a> {
    Null,
    Value(Value),
    Entity(&'a dyn Entity),
    List(Vec<FieldRef<'a>>),
}

impl FieldRef<'_> {
    /// Convert to a value, serializing nested entities in full.
    pub fn into_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Value(value) => value,
            Self::Entity(entity) => entity.to_value(),
            Self::List(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Value(value) => write!(f, "Value({})", value),
            Self::Entity(entity) => write!(f, "Entity({})", entity.entity_schema().type_name()),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

macro_rules! scalar_field {
    ($kind:ident => $($ty:ty),+) => {
        $(
            impl FieldAccess for $ty {
                fn field_type() -> FieldType {
                    FieldType::Scalar(ScalarKind::$kind)
                }

                fn field_ref(&self) -> FieldRef<'_> {
                    FieldRef::Value(Value::from(*self))
                }
            }
        )+
    };
}

scalar_field!(Bool => bool);
scalar_field!(Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
scalar_field!(Float => f32, f64);

impl FieldAccess for String {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::String)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Value(Value::String(self.clone()))
    }
}

impl FieldAccess for char {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::String)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Value(Value::String(self.to_string()))
    }
}

// DateTime serializes as an ISO 8601 string, matching its serde form.
impl FieldAccess for chrono::DateTime<chrono::Utc> {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::DateTime)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Value(Value::String(self.to_rfc3339()))
    }
}

impl FieldAccess for chrono::NaiveDate {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::DateTime)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Value(Value::String(self.to_string()))
    }
}

impl FieldAccess for Value {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::Json)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Value(self.clone())
    }
}

impl<T: FieldAccess> FieldAccess for Option<T> {
    fn field_type() -> FieldType {
        FieldType::Optional(Box::new(T::field_type()))
    }

    fn field_ref(&self) -> FieldRef<'_> {
        match self {
            Some(inner) => inner.field_ref(),
            None => FieldRef::Null,
        }
    }
}

impl<T: FieldAccess> FieldAccess for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::List(Box::new(T::field_type()))
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::List(self.iter().map(FieldAccess::field_ref).collect())
    }
}

macro_rules! pointer_field {
    ($($ptr:ident),+) => {
        $(
            impl<T: FieldAccess> FieldAccess for $ptr<T> {
                fn field_type() -> FieldType {
                    T::field_type()
                }

                fn field_ref(&self) -> FieldRef<'_> {
                    (**self).field_ref()
                }
            }
        )+
    };
}

pointer_field!(Box, Rc, Arc);
