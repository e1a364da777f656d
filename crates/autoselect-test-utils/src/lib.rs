//! Shared fixture entities for autoselect tests.
//!
//! A small customer/order graph covering every field category the selector
//! handles: scalars, optional scalars, enums, timestamps, scalar arrays,
//! optional nested objects, and nested collections two levels deep.

use autoselect::Selectable;
use chrono::{DateTime, TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Selectable)]
#[selectable(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
}

#[derive(Debug, Clone, Selectable)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Selectable)]
pub struct LineItem {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Selectable)]
pub struct Order {
    pub id: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, Selectable)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub address: Option<Address>,
    pub orders: Vec<Order>,
    pub password_hash: String,
}

/// Self-referential entity for recursive schemas.
#[derive(Debug, Clone, Selectable)]
#[selectable(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    pub display_name: String,
    pub parent: Option<Box<Category>>,
    pub children: Vec<Category>,
}

pub fn line_item(sku: &str, quantity: u32, unit_price: f64) -> LineItem {
    LineItem {
        sku: sku.to_string(),
        quantity,
        unit_price,
    }
}

pub fn order(id: i64, total: i64, status: OrderStatus, items: Vec<LineItem>) -> Order {
    Order {
        id,
        total,
        status,
        note: None,
        items,
    }
}

/// Customer 1 ("X") with two orders totalling 5 and 7.
pub fn sample_customer() -> Customer {
    Customer {
        id: 1,
        name: "X".to_string(),
        email: Some("x@example.com".to_string()),
        tags: vec!["vip".to_string(), "beta".to_string()],
        created_at: created_at(),
        address: Some(Address {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            country: "US".to_string(),
        }),
        orders: vec![
            order(
                10,
                5,
                OrderStatus::Pending,
                vec![line_item("A-1", 1, 2.5), line_item("B-2", 1, 2.5)],
            ),
            order(11, 7, OrderStatus::Delivered, vec![line_item("C-3", 7, 1.0)]),
        ],
        password_hash: "$argon2id$fixture".to_string(),
    }
}

/// Customer 2 with no address, no email and no orders.
pub fn sparse_customer() -> Customer {
    Customer {
        id: 2,
        name: "Y".to_string(),
        email: None,
        tags: Vec::new(),
        created_at: created_at(),
        address: None,
        orders: Vec::new(),
        password_hash: "$argon2id$fixture".to_string(),
    }
}

pub fn category_tree() -> Category {
    let root = Category {
        category_id: 1,
        display_name: "Root".to_string(),
        parent: None,
        children: Vec::new(),
    };
    Category {
        category_id: 2,
        display_name: "Books".to_string(),
        parent: Some(Box::new(root)),
        children: vec![Category {
            category_id: 3,
            display_name: "Sci-Fi".to_string(),
            parent: None,
            children: Vec::new(),
        }],
    }
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
        .single()
        .unwrap_or_default()
}
