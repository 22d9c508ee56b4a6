//! Cart item types
//!
//! `CartItemInput` is what the catalog hands to the cart when a guest taps
//! "add"; `CartLineItem` is the stored entry, stamped with its identity key.

use crate::util::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Product ID
// ============================================================================

/// Catalog product identifier
///
/// Backends send either numbers or strings; both normalize to the textual
/// form so that `5` and `"5"` name the same product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "product id must be a number or string, got {other}"
            ))),
        }
    }
}

// ============================================================================
// Modifiers
// ============================================================================

/// One selected option inside a modifier group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierOption {
    #[serde(default, alias = "optionName", alias = "name", deserialize_with = "lenient::string")]
    pub option_name: String,
    /// Extra charge per unit; absent or non-numeric prices count as free
    #[serde(
        default,
        alias = "optionPrice",
        alias = "price",
        deserialize_with = "lenient::f64_or_zero"
    )]
    pub option_price: f64,
}

impl ModifierOption {
    pub fn new(option_name: impl Into<String>, option_price: f64) -> Self {
        Self {
            option_name: option_name.into(),
            option_price,
        }
    }

    /// Option without a surcharge
    pub fn free(option_name: impl Into<String>) -> Self {
        Self::new(option_name, 0.0)
    }
}

/// A modifier group (e.g. "Toppings") with the options the guest picked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedModifier {
    #[serde(default, alias = "modifierName", alias = "name", deserialize_with = "lenient::string")]
    pub modifier_name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub options: Vec<ModifierOption>,
}

impl SelectedModifier {
    pub fn new(
        modifier_name: impl Into<String>,
        options: impl IntoIterator<Item = ModifierOption>,
    ) -> Self {
        Self {
            modifier_name: modifier_name.into(),
            options: options.into_iter().collect(),
        }
    }
}

// ============================================================================
// Cart Items
// ============================================================================

fn default_quantity() -> i32 {
    1
}

/// Cart item input - a candidate for adding to the cart (no identity key yet)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItemInput {
    #[serde(alias = "baseId", alias = "id", alias = "product_id")]
    pub base_id: ProductId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Generic catalog price
    #[serde(default, deserialize_with = "lenient::option_f64")]
    pub price: Option<f64>,
    /// Table-side price, preferred over `price` when present
    #[serde(default, alias = "indiningPrice", deserialize_with = "lenient::option_f64")]
    pub indining_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(
        default,
        alias = "selectedModifiers",
        deserialize_with = "lenient::null_as_default"
    )]
    pub selected_modifiers: Vec<SelectedModifier>,
    #[serde(default, alias = "tableId", deserialize_with = "lenient::non_blank")]
    pub table_id: Option<String>,
}

impl CartItemInput {
    /// Create an input with quantity 1 and no modifiers
    pub fn new(base_id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            base_id: base_id.into(),
            name: name.into(),
            price: Some(price),
            indining_price: None,
            image: String::new(),
            quantity: 1,
            selected_modifiers: Vec::new(),
            table_id: None,
        }
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_modifier(
        mut self,
        modifier_name: impl Into<String>,
        options: impl IntoIterator<Item = ModifierOption>,
    ) -> Self {
        self.selected_modifiers
            .push(SelectedModifier::new(modifier_name, options));
        self
    }

    pub fn with_indining_price(mut self, price: f64) -> Self {
        self.indining_price = Some(price);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    /// Effective unit price: table-side price, then catalog price, then 0
    pub fn unit_price(&self) -> f64 {
        resolve_unit_price(self.indining_price, self.price)
    }
}

/// Cart line item - a stored cart entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Identity key (content-addressed hash of product + modifier set)
    pub identity_key: String,
    pub base_id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indining_price: Option<f64>,
    pub image: String,
    pub quantity: i32,
    #[serde(default)]
    pub selected_modifiers: Vec<SelectedModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}

impl CartLineItem {
    /// Build a stored entry from an input and its precomputed identity key
    pub fn from_input(input: CartItemInput, identity_key: String) -> Self {
        Self {
            identity_key,
            base_id: input.base_id,
            name: input.name,
            price: input.price,
            indining_price: input.indining_price,
            image: input.image,
            quantity: input.quantity,
            selected_modifiers: input.selected_modifiers,
            table_id: input.table_id,
        }
    }

    /// Effective unit price: table-side price, then catalog price, then 0
    pub fn unit_price(&self) -> f64 {
        resolve_unit_price(self.indining_price, self.price)
    }

    /// Candidate form of this entry, for identity-based cart operations
    pub fn to_input(&self) -> CartItemInput {
        CartItemInput {
            base_id: self.base_id.clone(),
            name: self.name.clone(),
            price: self.price,
            indining_price: self.indining_price,
            image: self.image.clone(),
            quantity: self.quantity,
            selected_modifiers: self.selected_modifiers.clone(),
            table_id: self.table_id.clone(),
        }
    }

    /// Every selected option price, across all groups
    pub fn option_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.selected_modifiers
            .iter()
            .flat_map(|m| m.options.iter().map(|o| o.option_price))
    }
}

fn resolve_unit_price(indining_price: Option<f64>, price: Option<f64>) -> f64 {
    indining_price
        .filter(|p| p.is_finite())
        .or(price.filter(|p| p.is_finite()))
        .unwrap_or(0.0)
}
