//! End-to-end selection tests against the shared fixture graph.
//!
//! Each test gets its own `ShapeCache` so build counters stay isolated.

use autoselect::{InclusionPolicy, Profile, Projector, ShapeCache};
use autoselect_test_utils::{category_tree, sample_customer, sparse_customer, Customer};
use serde_json::{json, Value};
use std::sync::Arc;

fn projector(profile: Profile) -> Projector {
    Projector::with_cache(Arc::new(ShapeCache::new()), profile)
}

fn project(selection: &str) -> Value {
    projector(Profile::default())
        .project(&sample_customer(), Some(selection))
        .unwrap()
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scalars_and_collection_fields() {
    assert_eq!(
        project("id,name,orders.total"),
        json!({"id": 1, "name": "X", "orders": [{"total": 5}, {"total": 7}]})
    );
}

#[test]
fn wildcard_populates_every_element_field() {
    let value = project("orders.*");
    let top: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(top, vec!["orders"]);
    assert_eq!(
        value["orders"][0],
        json!({
            "id": 10,
            "total": 5,
            "status": "pending",
            "note": null,
            "items": [
                {"sku": "A-1", "quantity": 1, "unit_price": 2.5},
                {"sku": "B-2", "quantity": 1, "unit_price": 2.5}
            ]
        })
    );
    assert_eq!(value["orders"][1]["status"], "delivered");
}

#[test]
fn unselectable_field_is_omitted() {
    let value = projector(Profile::default().unselectable(["name"]))
        .project(&sample_customer(), Some("id,name"))
        .unwrap();
    assert_eq!(value, json!({"id": 1}));
}

#[test]
fn empty_selection_reaches_compiler_empty() {
    let projector = projector(Profile::default());
    assert!(projector.tree::<Customer>(None).is_empty());
    assert!(projector.tree::<Customer>(Some("")).is_empty());
    let selector = projector.selector::<Customer>(None).unwrap();
    assert_eq!(selector.apply(&sample_customer()), json!({}));
}

// ── Inclusion policies ──────────────────────────────────────────────────────

#[test]
fn bare_parent_adds_simple_sibling_fields() {
    let projector = projector(Profile::default());
    let tree = projector.tree::<Customer>(Some("orders.total,orders"));
    assert_eq!(
        tree.get("orders").unwrap().inclusion_policy(),
        InclusionPolicy::BaseFields
    );
    let value = projector
        .project(&sample_customer(), Some("orders.total,orders"))
        .unwrap();
    assert_eq!(
        value["orders"][1],
        json!({"total": 7, "id": 11, "status": "delivered", "note": null})
    );
}

#[test]
fn nested_wildcard_expands_inner_collection() {
    assert_eq!(
        project("orders.items.*")["orders"][1],
        json!({"items": [{"sku": "C-3", "quantity": 7, "unit_price": 1.0}]})
    );
}

#[test]
fn case_and_whitespace_do_not_change_output() {
    assert_eq!(
        project(" ID ,Orders . TOTAL,,name"),
        project("id,orders.total,name")
    );
}

// ── Silent truncation ───────────────────────────────────────────────────────

#[test]
fn unknown_fields_are_dropped() {
    // Nothing resolved below `orders`, so it expands like a bare `orders`.
    assert_eq!(
        project("id,nope,orders.bogus.total"),
        json!({"id": 1, "orders": project("orders")["orders"].clone()})
    );
    assert_eq!(
        project("id,nope,orders.bogus.total")["orders"][1],
        json!({
            "id": 11,
            "total": 7,
            "status": "delivered",
            "note": null,
            "items": [{"sku": "C-3", "quantity": 7, "unit_price": 1.0}]
        })
    );
}

#[test]
fn max_depth_truncates_nested_paths() {
    let value = projector(Profile::default().max_depth(1))
        .project(&sample_customer(), Some("id,address.city"))
        .unwrap();
    assert_eq!(value, json!({"id": 1, "address": {}}));
}

#[test]
fn max_depth_bounds_bare_and_wildcard_selections_alike() {
    let shallow = projector(Profile::default().max_depth(1));
    let bare = shallow.project(&sample_customer(), Some("orders")).unwrap();
    let wildcard = shallow.project(&sample_customer(), Some("orders.*")).unwrap();
    assert_eq!(bare, json!({"orders": [{}, {}]}));
    assert_eq!(bare, wildcard);

    let value = projector(Profile::default().max_depth(2))
        .project(&sample_customer(), Some("orders"))
        .unwrap();
    assert_eq!(
        value["orders"][1],
        json!({"id": 11, "total": 7, "status": "delivered", "note": null, "items": [{}]})
    );
}

#[test]
fn selectable_list_restricts_fields() {
    let value = projector(Profile::default().selectable(["id", "orders.total"]))
        .project(&sample_customer(), Some("id,name,orders.total,orders.status"))
        .unwrap();
    assert_eq!(
        value,
        json!({"id": 1, "orders": [{"total": 5}, {"total": 7}]})
    );
}

#[test]
fn unselectable_nested_path_is_dropped() {
    let value = projector(Profile::default().unselectable(["orders.items"]))
        .project(&sample_customer(), Some("orders.items.sku,orders.id"))
        .unwrap();
    assert_eq!(value, json!({"orders": [{"id": 10}, {"id": 11}]}));
}

// ── Unselectable fields under composites ────────────────────────────────────

#[test]
fn bare_collection_omits_unselectable_fields() {
    let projector = projector(Profile::default().unselectable(["orders.note", "orders.items"]));
    let bare = projector.project(&sample_customer(), Some("orders")).unwrap();
    assert_eq!(
        bare["orders"][0],
        json!({"id": 10, "total": 5, "status": "pending"})
    );
    let wildcard = projector
        .project(&sample_customer(), Some("orders.*"))
        .unwrap();
    assert_eq!(bare, wildcard);
}

#[test]
fn bare_object_omits_unselectable_fields() {
    let value = projector(Profile::default().unselectable(["address.street", "country"]))
        .project(&sample_customer(), Some("address"))
        .unwrap();
    assert_eq!(value, json!({"address": {"city": "Springfield"}}));
}

#[test]
fn wildcard_expansion_filters_nested_collections() {
    let value = projector(Profile::default().unselectable(["orders.items.sku"]))
        .project(&sample_customer(), Some("orders.*"))
        .unwrap();
    assert_eq!(
        value["orders"][0]["items"],
        json!([
            {"quantity": 1, "unit_price": 2.5},
            {"quantity": 1, "unit_price": 2.5}
        ])
    );
}

// ── Value categories ────────────────────────────────────────────────────────

#[test]
fn timestamps_enums_and_arrays() {
    assert_eq!(
        project("created_at,tags,orders.status"),
        json!({
            "created_at": "2024-01-15T09:30:00+00:00",
            "tags": ["vip", "beta"],
            "orders": [{"status": "pending"}, {"status": "delivered"}]
        })
    );
}

#[test]
fn missing_optionals_project_to_null() {
    let value = projector(Profile::default())
        .project(&sparse_customer(), Some("email,address.city,orders.total"))
        .unwrap();
    assert_eq!(
        value,
        json!({"email": null, "address": null, "orders": []})
    );
}

#[test]
fn recursive_entities_use_renamed_fields() {
    let value = projector(Profile::default())
        .project(
            &category_tree(),
            Some("displayName,parent.displayname,children.categoryId"),
        )
        .unwrap();
    assert_eq!(
        value,
        json!({
            "displayName": "Books",
            "parent": {"displayName": "Root"},
            "children": [{"categoryId": 3}]
        })
    );
}

// ── Shape reuse ─────────────────────────────────────────────────────────────

#[test]
fn same_selection_reuses_shape() {
    let projector = projector(Profile::default());
    let first = projector
        .selector::<Customer>(Some("id,orders.items.sku"))
        .unwrap();
    let builds = projector.cache().builds();
    let second = projector
        .selector::<Customer>(Some("id,orders.items.sku"))
        .unwrap();
    assert!(Arc::ptr_eq(first.shape(), second.shape()));
    assert_eq!(projector.cache().builds(), builds);
    assert_eq!(
        first.apply(&sample_customer()),
        second.apply(&sample_customer())
    );
}

#[test]
fn equivalent_selections_share_shape() {
    let projector = projector(Profile::default());
    let a = projector
        .selector::<Customer>(Some("orders.total,orders.status"))
        .unwrap();
    let b = projector
        .selector::<Customer>(Some("Orders.Total, orders.total ,ORDERS.status"))
        .unwrap();
    assert!(Arc::ptr_eq(a.shape(), b.shape()));
}

#[test]
fn tree_display_reparses_to_same_shape() {
    let projector = projector(Profile::default());
    let tree = projector.tree::<Customer>(Some("orders.*,id,address"));
    let original = projector
        .selector::<Customer>(Some("orders.*,id,address"))
        .unwrap();
    let reparsed = projector
        .selector::<Customer>(Some(&tree.to_string()))
        .unwrap();
    assert!(Arc::ptr_eq(original.shape(), reparsed.shape()));
    assert_eq!(
        original.apply(&sample_customer()),
        reparsed.apply(&sample_customer())
    );
}
