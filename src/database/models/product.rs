//! Product model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open-ended attribute bag. Key order is preserved.
pub type Attributes = Map<String, Value>;

/// A product in the catalog.
///
/// `specs` and `warranty` hold arbitrarily nested data with no fixed
/// schema, e.g. `{"processor": "i9", "memory": {"size": "32GB"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier. Absent until the product is first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Classification attribute, used for secondary lookups.
    pub model: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub price: f64,

    /// Flexible, nested specifications.
    #[serde(default)]
    pub specs: Attributes,

    /// Warranty information.
    #[serde(default)]
    pub warranty: Attributes,
}

impl Product {
    /// Create an unsaved product of the given model.
    pub fn new(model: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            model: model.into(),
            name: name.into(),
            price,
            specs: Attributes::new(),
            warranty: Attributes::new(),
        }
    }

    /// Set the specs map (builder pattern).
    #[must_use]
    pub fn with_specs(mut self, specs: Attributes) -> Self {
        self.specs = specs;
        self
    }

    /// Set the warranty map (builder pattern).
    #[must_use]
    pub fn with_warranty(mut self, warranty: Attributes) -> Self {
        self.warranty = warranty;
        self
    }

    /// Check that the classification attribute is usable.
    pub fn has_model(&self) -> bool {
        !self.model.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_model_is_rejected() {
        let result = serde_json::from_str::<Product>(r#"{"name":"Laptop","price":10.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let product: Product = serde_json::from_str(r#"{"model":"laptop"}"#).unwrap();
        assert_eq!(product.id, None);
        assert_eq!(product.name, "");
        assert_eq!(product.price, 0.0);
        assert!(product.specs.is_empty());
        assert!(product.warranty.is_empty());
    }

    #[test]
    fn test_attribute_key_order_preserved() {
        let raw = r#"{"model":"laptop","name":"X","price":1.5,"specs":{"zeta":1,"alpha":{"y":2,"b":[1,{"k":"v"}]}},"warranty":{}}"#;
        let product: Product = serde_json::from_str(raw).unwrap();

        let keys: Vec<&str> = product.specs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(serde_json::to_string(&product).unwrap(), raw);
    }

    #[test]
    fn test_id_omitted_when_unsaved() {
        let product = Product::new("phone", "P1", 99.0);
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["model"], json!("phone"));
    }

    #[test]
    fn test_has_model() {
        assert!(Product::new("tv", "", 0.0).has_model());
        assert!(!Product::new("  ", "", 0.0).has_model());
    }
}
