//! Compiling selection trees into selectors.
//!
//! Every node list in the tree becomes one [`Shape`] plus one accessor per
//! output field. Scalar leaves read their source field directly; nested
//! objects are always projected through their own shape; nested collections
//! project each element through the element shape, preserving order.

use crate::access::{Entity, FieldRef, Selectable};
use crate::error::SelectError;
use crate::schema::EntitySchema;
use crate::shape::{FieldSource, Shape, ShapeCache, ShapeField};
use crate::tree::{NodeId, SelectionTree};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug)]
enum Accessor {
    Read { index: usize },
    Object { index: usize, projection: Projection },
    Collection { index: usize, projection: Projection },
}

impl Accessor {
    fn read(&self, entity: &dyn Entity) -> Value {
        match self {
            Self::Read { index } => entity.field(*index).into_value(),
            Self::Object { index, projection } | Self::Collection { index, projection } => {
                projection.project_ref(entity.field(*index))
            }
        }
    }
}

/// A shape together with the accessors that populate it, in field order.
#[derive(Debug)]
struct Projection {
    shape: Arc<Shape>,
    accessors: Vec<Accessor>,
}

impl Projection {
    fn compile(
        tree: &SelectionTree,
        nodes: &[NodeId],
        schema: &'static EntitySchema,
        cache: &ShapeCache,
    ) -> Result<Self, SelectError> {
        let mut fields = Vec::with_capacity(nodes.len());
        let mut accessors = Vec::with_capacity(nodes.len());

        for id in nodes {
            let node = tree.node(*id);
            let index = node.field_index();
            let ty = node.source_field_type();

            let (source, accessor) = match ty.entity() {
                None => (
                    FieldSource::Field {
                        name: node.field_name(),
                        ty: ty.clone(),
                    },
                    Accessor::Read { index },
                ),
                Some(nested) => {
                    let projection = Self::compile(tree, node.sub_nodes(), nested, cache)?;
                    let key = projection.shape.key().clone();
                    if ty.is_collection() {
                        (
                            FieldSource::Collection(key),
                            Accessor::Collection { index, projection },
                        )
                    } else {
                        (
                            FieldSource::Object(key),
                            Accessor::Object { index, projection },
                        )
                    }
                }
            };
            fields.push(ShapeField::new(node.field_name(), source));
            accessors.push(accessor);
        }

        let shape = cache.intern(schema.type_name(), fields)?;
        Ok(Self { shape, accessors })
    }

    fn project(&self, entity: &dyn Entity) -> Value {
        let mut map = Map::with_capacity(self.accessors.len());
        for (field, accessor) in self.shape.fields().iter().zip(&self.accessors) {
            map.insert(field.name.clone(), accessor.read(entity));
        }
        Value::Object(map)
    }

    fn project_ref(&self, field: FieldRef<'_>) -> Value {
        match field {
            FieldRef::Null => Value::Null,
            FieldRef::Value(value) => value,
            FieldRef::Entity(entity) => self.project(entity),
            FieldRef::List(items) => {
                Value::Array(items.into_iter().map(|item| self.project_ref(item)).collect())
            }
        }
    }
}

/// A compiled projection from `E` to its selected fields.
///
/// Holds no mutable state; share it freely across threads and requests.
pub struct Selector<E> {
    projection: Projection,
    _entity: PhantomData<fn(&E)>,
}

impl<E: Selectable> Selector<E> {
    /// Compile `tree`, interning every shape it needs in `cache`.
    ///
    /// An empty tree compiles to a selector producing `{}`. A tree built for
    /// another entity type is rejected with [`SelectError::EntityMismatch`].
    pub fn compile(tree: &SelectionTree, cache: &ShapeCache) -> Result<Self, SelectError> {
        let schema = E::schema();
        if !std::ptr::eq(tree.root_schema(), schema) {
            return Err(SelectError::EntityMismatch {
                expected: schema.type_name().to_string(),
                found: tree.root_schema().type_name().to_string(),
            });
        }
        let projection = Projection::compile(tree, tree.roots(), schema, cache)?;
        Ok(Self {
            projection,
            _entity: PhantomData,
        })
    }

    pub fn apply(&self, entity: &E) -> Value {
        self.projection.project(entity)
    }

    pub fn apply_all<'a, I>(&self, entities: I) -> Vec<Value>
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        entities.into_iter().map(|entity| self.apply(entity)).collect()
    }

    /// The top-level output shape.
    pub fn shape(&self) -> &Arc<Shape> {
        &self.projection.shape
    }
}

impl<E> fmt::Debug for Selector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("shape", &self.projection.shape.key())
            .finish()
    }
}
