//! Default-field discovery for `parent` and `parent.*` selections.

use crate::profile::Profile;
use crate::schema::{EntitySchema, FieldDescriptor};
use crate::tree::InclusionPolicy;

/// Fields of `schema` that `policy` selects when no explicit sub-field names
/// them, in schema order, minus the profile's unselectable names.
///
/// - [`InclusionPolicy::BaseFields`]: fields that need no further traversal
///   (scalars, optional scalars, arrays of scalars).
/// - [`InclusionPolicy::AllFields`]: every field.
/// - [`InclusionPolicy::Explicit`]: nothing.
pub fn default_fields<'s>(
    schema: &'s EntitySchema,
    policy: InclusionPolicy,
    profile: &Profile,
) -> Vec<(usize, &'s FieldDescriptor)> {
    schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| match policy {
            InclusionPolicy::Explicit => false,
            InclusionPolicy::BaseFields => field.ty.is_simple(),
            InclusionPolicy::AllFields => true,
        })
        .filter(|(_, field)| !profile.is_unselectable(field.name))
        .collect()
}
