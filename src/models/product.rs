use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A single catalog entry
///
/// Only `id` is required in the source data. Everything else is optional and
/// renders as empty text when formatted for the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// Creates a product with only the identifying fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            subcategory: String::new(),
            brand: String::new(),
            price: None,
            rating: None,
            description: String::new(),
            features: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Category trimmed and lowercased, as used by the preference filter
    pub fn normalized_category(&self) -> String {
        self.category.trim().to_lowercase()
    }
}

/// Fixed-field block handed to the model, one per candidate product
impl Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(
            f,
            "Category: {}, Subcategory: {}",
            self.category, self.subcategory
        )?;
        writeln!(f, "Brand: {}", self.brand)?;
        match self.price {
            Some(price) => writeln!(f, "Price: ${:?}", price)?,
            None => writeln!(f, "Price: ")?,
        }
        match self.rating {
            Some(rating) => writeln!(f, "Rating: {:?}", rating)?,
            None => writeln!(f, "Rating: ")?,
        }
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Features: {}", self.features.join(", "))?;
        write!(f, "Tags: {}", self.tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_product() {
        let json = r#"{
            "id": "p1",
            "name": "Noise Cancelling Headphones",
            "category": "Electronics",
            "subcategory": "Audio",
            "brand": "Sonic",
            "price": 199.99,
            "rating": 4.6,
            "description": "Over-ear wireless headphones.",
            "features": ["Bluetooth 5.3", "30h battery"],
            "tags": ["wireless", "travel"]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "p1");
        assert_eq!(product.subcategory, "Audio");
        assert_eq!(product.price, Some(199.99));
        assert_eq!(product.features.len(), 2);
    }

    #[test]
    fn test_deserialize_minimal_product() {
        let product: Product = serde_json::from_str(r#"{"id": "p9"}"#).unwrap();
        assert_eq!(product, Product::new("p9", ""));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_str::<Product>(r#"{"name": "No id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_absent_numbers() {
        let value = serde_json::to_value(Product::new("p1", "Lamp")).unwrap();
        assert!(value.get("price").is_none());
        assert!(value.get("rating").is_none());
        assert_eq!(value["name"], "Lamp");
    }

    #[test]
    fn test_display_block() {
        let mut product = Product::new("p1", "Trail Shoe")
            .with_category("Footwear")
            .with_price(89.5);
        product.subcategory = "Running".to_string();
        product.brand = "Stride".to_string();
        product.rating = Some(4.2);
        product.description = "Grippy trail runner.".to_string();
        product.features = vec!["Waterproof".to_string(), "Vibram sole".to_string()];
        product.tags = vec!["outdoor".to_string()];

        let expected = "ID: p1\n\
                        Name: Trail Shoe\n\
                        Category: Footwear, Subcategory: Running\n\
                        Brand: Stride\n\
                        Price: $89.5\n\
                        Rating: 4.2\n\
                        Description: Grippy trail runner.\n\
                        Features: Waterproof, Vibram sole\n\
                        Tags: outdoor";
        assert_eq!(product.to_string(), expected);
    }

    #[test]
    fn test_display_whole_numbers_keep_decimal() {
        let mut product = Product::new("p1", "Headphones").with_price(100.0);
        product.rating = Some(4.0);
        let rendered = product.to_string();
        assert!(rendered.contains("Price: $100.0\n"));
        assert!(rendered.contains("Rating: 4.0\n"));
    }

    #[test]
    fn test_display_absent_fields_are_empty() {
        let rendered = Product::new("p2", "Mystery Box").to_string();
        assert!(rendered.contains("Brand: \n"));
        assert!(rendered.contains("Price: \n"));
        assert!(rendered.contains("Rating: \n"));
        assert!(rendered.ends_with("Tags: "));
    }

    #[test]
    fn test_normalized_category() {
        let product = Product::new("p1", "x").with_category("  Home & Kitchen ");
        assert_eq!(product.normalized_category(), "home & kitchen");
    }
}
