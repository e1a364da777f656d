//! Selection tree construction.
//!
//! Each parsed path is walked against the entity schema one segment at a
//! time. Nodes are keyed by their lowercased dotted path, so overlapping
//! paths (`orders.total`, `orders.status`) share their common prefix. Nodes
//! live in an arena and refer to each other by [`NodeId`]; the parent link is
//! a plain index, never an owning pointer.
//!
//! Anything that cannot be resolved is dropped without error:
//! - an unknown segment drops itself and the rest of its path,
//! - an unselectable or disallowed key is not created, nor is anything below it,
//! - segments past the profile's `max_depth` are dropped.
//!
//! An object or collection field with nothing selected below it is never
//! read whole: it expands to every field the profile allows, recursively,
//! down to `max_depth`. At the depth limit it projects to an empty object.

use crate::access::Selectable;
use crate::defaults::default_fields;
use crate::path::{FieldPaths, WILDCARD};
use crate::profile::Profile;
use crate::schema::{EntitySchema, FieldType};
use std::collections::HashMap;
use std::fmt;

/// Index of a node inside its [`SelectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How a composite node fills in sub-fields nobody named explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InclusionPolicy {
    /// Only the listed sub-fields.
    #[default]
    Explicit,
    /// The bare parent path was selected too: add its simple fields.
    BaseFields,
    /// `parent.*` was selected: add every field.
    AllFields,
}

/// One requested field at one depth.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode {
    key: String,
    name: String,
    field_name: &'static str,
    field_index: usize,
    source_field_type: FieldType,
    sub_nodes: Vec<NodeId>,
    parent: Option<NodeId>,
    inclusion_policy: InclusionPolicy,
}

impl SelectionNode {
    /// Full lowercased dotted path; unique within the tree.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The field name as the caller spelled it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field name as declared on the parent entity.
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Position of the field in the parent entity's schema.
    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn source_field_type(&self) -> &FieldType {
        &self.source_field_type
    }

    pub fn sub_nodes(&self) -> &[NodeId] {
        &self.sub_nodes
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn inclusion_policy(&self) -> InclusionPolicy {
        self.inclusion_policy
    }

    /// Number of path segments in the key.
    pub fn depth(&self) -> usize {
        self.key.split('.').count()
    }
}

/// The validated set of fields requested from one root entity.
///
/// Built fresh for every selection string and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SelectionTree {
    root: &'static EntitySchema,
    nodes: Vec<SelectionNode>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

impl SelectionTree {
    /// Parse `selection` and build the tree for entity `E`.
    pub fn for_entity<E: Selectable>(selection: Option<&str>, profile: &Profile) -> Self {
        Self::build(E::schema(), &FieldPaths::parse(selection), profile)
    }

    pub fn build(root: &'static EntitySchema, paths: &FieldPaths, profile: &Profile) -> Self {
        let mut tree = Self {
            root,
            nodes: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
        };
        for path in paths.iter() {
            tree.insert_path(path, profile);
        }
        tree.apply_policies(paths);
        tree.expand_defaults(profile);
        tree
    }

    pub fn root_schema(&self) -> &'static EntitySchema {
        self.root
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &SelectionNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SelectionNode> {
        self.nodes[id.0].sub_nodes.iter().map(|child| self.node(*child))
    }

    pub fn parent(&self, id: NodeId) -> Option<&SelectionNode> {
        self.nodes[id.0].parent.map(|parent| self.node(parent))
    }

    /// Look up a node by dotted path, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&SelectionNode> {
        self.index
            .get(&key.to_ascii_lowercase())
            .map(|id| self.node(*id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert_path(&mut self, path: &[String], profile: &Profile) {
        let mut schema = Some(self.root);
        let mut parent: Option<NodeId> = None;
        let mut key = String::new();

        for (depth, segment) in path.iter().enumerate() {
            if !profile.allows_depth(depth + 1) {
                tracing::debug!(path = %path.join("."), depth, "selection deeper than max_depth, truncating");
                return;
            }
            let Some((field_index, field)) = schema.and_then(|s| s.find(segment)) else {
                if segment != WILDCARD {
                    tracing::debug!(path = %path.join("."), segment = %segment, "unknown field in selection, truncating");
                }
                return;
            };

            if !key.is_empty() {
                key.push('.');
            }
            key.push_str(&segment.to_ascii_lowercase());

            let id = match self.index.get(&key) {
                Some(id) => *id,
                None => {
                    if !profile.accepts(&key) {
                        tracing::debug!(key = %key, "field is not selectable, truncating");
                        return;
                    }
                    self.push_node(
                        parent,
                        key.clone(),
                        segment.clone(),
                        field.name,
                        field_index,
                        field.ty.clone(),
                    )
                }
            };

            schema = field.ty.entity();
            parent = Some(id);
        }
    }

    fn push_node(
        &mut self,
        parent: Option<NodeId>,
        key: String,
        name: String,
        field_name: &'static str,
        field_index: usize,
        source_field_type: FieldType,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(key.clone(), id);
        self.nodes.push(SelectionNode {
            key,
            name,
            field_name,
            field_index,
            source_field_type,
            sub_nodes: Vec::new(),
            parent,
            inclusion_policy: InclusionPolicy::Explicit,
        });
        match parent {
            Some(parent) => self.nodes[parent.0].sub_nodes.push(id),
            None => self.roots.push(id),
        }
        id
    }

    // `parent.*` wins over a bare `parent` when both are present. A composite
    // field with nothing resolved below it takes every field.
    fn apply_policies(&mut self, paths: &FieldPaths) {
        for node in &mut self.nodes {
            if paths.contains_wildcard(&node.key) {
                node.inclusion_policy = InclusionPolicy::AllFields;
            } else if node.sub_nodes.is_empty() {
                if node.source_field_type.entity().is_some() {
                    node.inclusion_policy = InclusionPolicy::AllFields;
                }
            } else if paths.contains(&node.key) {
                node.inclusion_policy = InclusionPolicy::BaseFields;
            }
        }
    }

    fn expand_defaults(&mut self, profile: &Profile) {
        // Composite fields added here are marked `AllFields` and picked up
        // again as the arena grows.
        let mut position = 0;
        while position < self.nodes.len() {
            let id = NodeId(position);
            position += 1;
            let node = &self.nodes[id.0];
            if node.inclusion_policy == InclusionPolicy::Explicit {
                continue;
            }
            let Some(schema) = node.source_field_type.entity() else {
                continue;
            };
            if !profile.allows_depth(node.depth() + 1) {
                tracing::debug!(key = %node.key, "expansion deeper than max_depth, truncating");
                continue;
            }

            let parent_key = node.key.clone();
            let policy = node.inclusion_policy;
            let mut added = 0;
            for (field_index, field) in default_fields(schema, policy, profile) {
                let already_selected = self
                    .children(id)
                    .any(|child| child.field_name.eq_ignore_ascii_case(field.name));
                if already_selected {
                    continue;
                }
                let key = format!("{}.{}", parent_key, field.name.to_ascii_lowercase());
                if self.index.contains_key(&key) || !profile.accepts(&key) {
                    continue;
                }
                let nested = field.ty.entity();
                if nested.is_some_and(|nested| self.is_open(id, nested)) {
                    tracing::debug!(key = %key, "recursive field not expanded");
                    continue;
                }
                let child = self.push_node(
                    Some(id),
                    key,
                    field.name.to_string(),
                    field.name,
                    field_index,
                    field.ty.clone(),
                );
                if nested.is_some() {
                    self.nodes[child.0].inclusion_policy = InclusionPolicy::AllFields;
                }
                added += 1;
            }
            tracing::debug!(key = %parent_key, ?policy, added, "expanded default fields");
        }
    }

    /// Whether `schema` is the root entity or the entity of `id` or one of
    /// its ancestors.
    fn is_open(&self, id: NodeId, schema: &EntitySchema) -> bool {
        if std::ptr::eq(self.root, schema) {
            return true;
        }
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if node
                .source_field_type
                .entity()
                .is_some_and(|entity| std::ptr::eq(entity, schema))
            {
                return true;
            }
            current = node.parent;
        }
        false
    }

    fn write_leaves(&self, id: NodeId, prefix: &str, out: &mut Vec<String>) {
        let node = self.node(id);
        let path = if prefix.is_empty() {
            node.field_name.to_string()
        } else {
            format!("{}.{}", prefix, node.field_name)
        };
        if node.sub_nodes.is_empty() {
            out.push(path);
        } else {
            for child in &node.sub_nodes {
                self.write_leaves(*child, &path, out);
            }
        }
    }
}

/// Canonical selection string: one path per leaf, in tree order.
impl fmt::Display for SelectionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut leaves = Vec::new();
        for root in &self.roots {
            self.write_leaves(*root, "", &mut leaves);
        }
        write!(f, "{}", leaves.join(","))
    }
}
