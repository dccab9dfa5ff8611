//! Restaurant and menu models

use serde::{Deserialize, Serialize};

/// Menu item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price per unit
    pub price: f64,
    /// Section name, e.g. "Appetizers", "Main Courses"
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Menu section grouping items by category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub id: String,
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// Restaurant entity
///
/// `region` is the access-scoping attribute; the server never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    pub cuisine: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional rating, 1-5 stars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub menu: Vec<MenuSection>,
}
