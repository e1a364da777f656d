//! Output shapes and their process-wide intern table.
//!
//! A [`Shape`] describes one projected object: which output fields it has and
//! where each one comes from. Shapes are keyed by a SHA-256 fingerprint of the
//! source entity type and the ordered `(output name, source)` pairs, so two
//! selections that resolve to the same fields share one `Arc<Shape>`.

use crate::error::SelectError;
use crate::schema::FieldType;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Structural identity of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeKey(String);

impl ShapeKey {
    /// Fingerprint `type_name` plus the ordered field list.
    ///
    /// Every name and source is length-prefixed, so no choice of field names
    /// can make two different lists serialize to the same input.
    pub fn compute(type_name: &str, fields: &[ShapeField]) -> Self {
        let fingerprint = fields.iter().fold(String::new(), |mut acc, field| {
            let source = field.source.to_string();
            let _ = write!(
                acc,
                "{}:{}{}:{}",
                field.name.len(),
                field.name,
                source.len(),
                source
            );
            acc
        });
        let digest = Sha256::digest(fingerprint.as_bytes());
        let hash = digest.iter().fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{:02x}", byte);
            acc
        });
        Self(format!("{}:{}", type_name, hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an output field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Read the source field as-is.
    Field { name: &'static str, ty: FieldType },
    /// Project a nested object into another shape.
    Object(ShapeKey),
    /// Project every element of a nested collection into another shape.
    Collection(ShapeKey),
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { name, .. } => write!(f, "field:{}", name),
            Self::Object(key) => write!(f, "object:{}", key),
            Self::Collection(key) => write!(f, "list:{}", key),
        }
    }
}

/// One output field of a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeField {
    pub name: String,
    pub source: FieldSource,
}

impl ShapeField {
    pub fn new(name: impl Into<String>, source: FieldSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// An interned output shape.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    key: ShapeKey,
    type_name: &'static str,
    fields: Vec<ShapeField>,
}

impl Shape {
    pub fn key(&self) -> &ShapeKey {
        &self.key
    }

    /// The entity type this shape projects from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[ShapeField] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Process-lifetime intern table of shapes. Entries are never evicted.
///
/// Use [`ShapeCache::global`] in applications; tests usually build their own
/// with [`ShapeCache::new`] to observe [`ShapeCache::builds`].
#[derive(Debug, Default)]
pub struct ShapeCache {
    shapes: RwLock<HashMap<ShapeKey, Arc<Shape>>>,
    builds: AtomicUsize,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared cache, created on first use and kept until process exit.
    pub fn global() -> Arc<ShapeCache> {
        static GLOBAL: OnceLock<Arc<ShapeCache>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ShapeCache::new())).clone()
    }

    /// Intern the shape for `fields` read from `type_name`.
    pub fn intern(
        &self,
        type_name: &'static str,
        fields: Vec<ShapeField>,
    ) -> Result<Arc<Shape>, SelectError> {
        let key = ShapeKey::compute(type_name, &fields);
        self.get_or_create(key, type_name, fields)
    }

    /// Return the shape stored under `key`, building it if absent.
    ///
    /// Concurrent callers with the same key observe a single construction and
    /// all receive the same `Arc`. A stored shape whose fields differ from
    /// `fields` is reported as [`SelectError::ShapeConflict`] to this caller
    /// only; the stored entry is left untouched.
    pub fn get_or_create(
        &self,
        key: ShapeKey,
        type_name: &'static str,
        fields: Vec<ShapeField>,
    ) -> Result<Arc<Shape>, SelectError> {
        // A panic while holding the lock cannot leave the map half-written.
        let existing = self
            .shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(shape) = existing {
            tracing::trace!(key = %key, "shape cache hit");
            return Self::verify(shape, type_name, &fields);
        }

        let mut shapes = self.shapes.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(shape) = shapes.get(&key) {
            return Self::verify(shape.clone(), type_name, &fields);
        }

        let shape = Arc::new(Shape {
            key: key.clone(),
            type_name,
            fields,
        });
        shapes.insert(key.clone(), shape.clone());
        self.builds.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, fields = shape.len(), "built new shape");
        Ok(shape)
    }

    /// Number of shapes currently interned.
    pub fn len(&self) -> usize {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of shapes this cache has constructed.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    fn verify(
        shape: Arc<Shape>,
        type_name: &'static str,
        fields: &[ShapeField],
    ) -> Result<Arc<Shape>, SelectError> {
        if shape.type_name == type_name && shape.fields == fields {
            Ok(shape)
        } else {
            Err(SelectError::ShapeConflict {
                key: shape.key.to_string(),
                type_name: type_name.to_string(),
            })
        }
    }
}
