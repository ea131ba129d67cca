//! Menu catalogue shapes. Plain data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Menu {
    pub attributes: Vec<MenuAttribute>,
    pub attribute_groups: Vec<AttributeGroup>,
    pub products: Vec<MenuProduct>,
    pub collections: Vec<Collection>,
    pub supercollections: Vec<Supercollection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuAttribute {
    pub id: String,
    pub name: String,
    pub selected_by_default: bool,
    pub price_impact: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeGroup {
    pub id: String,
    pub name: String,
    pub min: u32,
    pub max: u32,
    pub collapse: bool,
    pub multiple_selection: bool,
    /// Ids of [`MenuAttribute`]s.
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuProduct {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_image_urls: Option<Vec<String>>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Restrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tobacco: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_alcoholic: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub name: String,
    pub position: u32,
    pub image_url: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub name: String,
    pub position: u32,
    /// Ids of [`MenuProduct`]s.
    pub products: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supercollection {
    pub name: String,
    pub position: u32,
    pub image_url: String,
    /// Names of [`Collection`]s.
    pub collections: Vec<String>,
}
