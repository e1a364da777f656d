//! Entry point tying a [`Profile`] to a [`ShapeCache`].

use crate::access::Selectable;
use crate::compile::Selector;
use crate::error::SelectError;
use crate::profile::Profile;
use crate::shape::ShapeCache;
use crate::tree::SelectionTree;
use serde_json::Value;
use std::sync::Arc;

/// Builds selectors for any [`Selectable`] entity under one profile.
///
/// # Example
///
/// ```ignore
/// let projector = Projector::new(Profile::default().unselectable(["password_hash"]));
/// let selector = projector.selector::<Customer>(Some("id,name,orders.total"))?;
/// let rows: Vec<serde_json::Value> = selector.apply_all(&customers);
/// ```
#[derive(Debug, Clone)]
pub struct Projector {
    cache: Arc<ShapeCache>,
    profile: Profile,
}

impl Projector {
    /// Use the process-wide shape cache.
    pub fn new(profile: Profile) -> Self {
        Self::with_cache(ShapeCache::global(), profile)
    }

    pub fn with_cache(cache: Arc<ShapeCache>, profile: Profile) -> Self {
        Self { cache, profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn cache(&self) -> &Arc<ShapeCache> {
        &self.cache
    }

    /// Resolve `selection` against `E` without compiling it.
    pub fn tree<E: Selectable>(&self, selection: Option<&str>) -> SelectionTree {
        SelectionTree::for_entity::<E>(selection, &self.profile)
    }

    pub fn selector<E: Selectable>(
        &self,
        selection: Option<&str>,
    ) -> Result<Selector<E>, SelectError> {
        Selector::compile(&self.tree::<E>(selection), &self.cache)
    }

    /// One-off projection of a single entity.
    pub fn project<E: Selectable>(
        &self,
        entity: &E,
        selection: Option<&str>,
    ) -> Result<Value, SelectError> {
        Ok(self.selector::<E>(selection)?.apply(entity))
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(Profile::default())
    }
}
