//! Project arbitrary entity graphs through flat, dotted field selections.
//!
//! A selection such as `"id,name,orders.total,orders.items.*"` is parsed into
//! a [`SelectionTree`], compiled into a [`Selector`], and applied to entity
//! instances to produce `serde_json::Value`s shaped exactly like the tree.
//! Output shapes are interned in a [`ShapeCache`] so identical selections
//! share a single [`Shape`].
//!
//! ```ignore
//! use autoselect::{Profile, Projector, Selectable};
//!
//! #[derive(Selectable)]
//! struct Order { total: i64, status: String }
//!
//! #[derive(Selectable)]
//! struct Customer { id: i64, name: String, orders: Vec<Order> }
//!
//! let projector = Projector::new(Profile::default());
//! let selector = projector.selector::<Customer>(Some("id,orders.total"))?;
//! let value = selector.apply(&customer);
//! ```

// Lets the derive's `::autoselect::` paths resolve inside this crate's own tests.
extern crate self as autoselect;

pub mod access;
pub mod compile;
pub mod defaults;
pub mod error;
pub mod path;
pub mod profile;
pub mod projector;
pub mod schema;
pub mod shape;
pub mod tree;

// Re-export key types at crate root for convenience.
pub use access::{Entity, FieldAccess, FieldRef, Selectable};
pub use autoselect_derive::Selectable;
pub use compile::Selector;
pub use error::SelectError;
pub use path::FieldPaths;
pub use profile::Profile;
pub use projector::Projector;
pub use schema::{EntitySchema, FieldDescriptor, FieldType, ScalarKind, SchemaRef};
pub use shape::{Shape, ShapeCache, ShapeKey};
pub use tree::{InclusionPolicy, NodeId, SelectionNode, SelectionTree};

// Used by `#[derive(Selectable)]` output for enum values.
#[doc(hidden)]
pub use serde_json;
