//! Product types.

use crate::ids::ProductId;
use crate::ledger::lenient;
use crate::money::{Currency, Money};
use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    /// Price per kilogram.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
    /// Regular price, shown struck through when higher than `price`.
    #[serde(
        default,
        deserialize_with = "lenient::option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<f64>,
    /// Image URLs in display order.
    #[serde(default, deserialize_with = "lenient::strings")]
    pub images: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    /// URL-friendly identifier, unique across products when present.
    #[serde(
        default,
        deserialize_with = "lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<String>,
    /// Unix timestamp in milliseconds.
    #[serde(default, deserialize_with = "lenient::millis")]
    pub created_at: i64,
}

impl Product {
    /// Create a product with just a title and price.
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            id: ProductId::unassigned(),
            title: title.into(),
            description: String::new(),
            price,
            original_price: None,
            images: Vec::new(),
            category: None,
            slug: None,
            created_at: crate::now_millis(),
        }
    }

    /// First image, used as the listing thumbnail.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Check if the product is on sale.
    pub fn has_discount(&self) -> bool {
        self.original_price.map_or(false, |orig| orig > self.price)
    }

    /// Discount off the original price, in percent.
    pub fn discount_percentage(&self) -> Option<f64> {
        match self.original_price {
            Some(orig) if orig > self.price && orig > 0.0 => Some((orig - self.price) / orig * 100.0),
            _ => None,
        }
    }

    pub fn price_money(&self, currency: Currency) -> Money {
        Money::new(self.price, currency)
    }

    /// Path segment used in product URLs: the slug, else the id.
    pub fn url_key(&self) -> &str {
        self.slug.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Input from the admin "add product" form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Slug typed by the admin; derived from the title when absent.
    #[serde(default)]
    pub slug: Option<String>,
}

impl ProductDraft {
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            price: Some(price),
            ..Self::default()
        }
    }

    /// Check the required fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }

        match self.price {
            None => errors.add("price", "Price is required"),
            Some(p) if !p.is_finite() || p < 0.0 => errors.add("price", "Price must be zero or more"),
            Some(_) => {}
        }

        if let Some(orig) = self.original_price {
            if !orig.is_finite() || orig < 0.0 {
                errors.add("originalPrice", "Original price must be zero or more");
            }
        }

        errors.into_result()
    }

    /// Build the product to persist, with an already allocated slug.
    pub fn into_product(self, slug: Option<String>) -> Product {
        Product {
            id: ProductId::unassigned(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.unwrap_or(0.0),
            original_price: self.original_price,
            images: self.images,
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            slug,
            created_at: crate::now_millis(),
        }
    }
}

/// Fields an admin may change on an existing product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears the original price.
    pub original_price: Option<Option<f64>>,
    pub images: Option<Vec<String>>,
    pub category: Option<Option<String>>,
    pub slug: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.add("title", "Title is required");
            }
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                errors.add("price", "Price must be zero or more");
            }
        }
        if let Some(Some(orig)) = self.original_price {
            if !orig.is_finite() || orig < 0.0 {
                errors.add("originalPrice", "Original price must be zero or more");
            }
        }
        errors.into_result()
    }

    /// Document fields to merge, using the persisted field names.
    ///
    /// `slug` is passed separately because it must be allocated first.
    pub fn to_fields(&self, slug: Option<&str>) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(title) = &self.title {
            fields.insert("title".into(), Value::from(title.trim()));
        }
        if let Some(description) = &self.description {
            fields.insert("description".into(), Value::from(description.trim()));
        }
        if let Some(price) = self.price {
            fields.insert("price".into(), Value::from(price));
        }
        if let Some(orig) = self.original_price {
            fields.insert("originalPrice".into(), orig.map(Value::from).unwrap_or(Value::Null));
        }
        if let Some(images) = &self.images {
            fields.insert("images".into(), Value::from(images.clone()));
        }
        if let Some(category) = &self.category {
            fields.insert(
                "category".into(),
                category.clone().map(Value::from).unwrap_or(Value::Null),
            );
        }
        if let Some(slug) = slug {
            fields.insert("slug".into(), Value::from(slug));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount() {
        let mut product = Product::new("Black Seed Honey", 800.0);
        assert!(!product.has_discount());

        product.original_price = Some(1000.0);
        assert!(product.has_discount());
        assert!((product.discount_percentage().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_url_key_prefers_slug() {
        let mut product = Product::new("Ghee", 1200.0);
        product.id = ProductId::new("abc123");
        assert_eq!(product.url_key(), "abc123");
        product.slug = Some("ghee".to_string());
        assert_eq!(product.url_key(), "ghee");
    }

    #[test]
    fn test_draft_validation() {
        assert!(ProductDraft::new("Dates", 650.0).validate().is_ok());

        let draft = ProductDraft {
            title: " ".to_string(),
            price: None,
            original_price: Some(-1.0),
            ..ProductDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.for_field("price"), Some("Price is required"));
    }

    #[test]
    fn test_draft_into_product_trims() {
        let draft = ProductDraft {
            title: "  Dates ".to_string(),
            category: Some("   ".to_string()),
            ..ProductDraft::new("x", 10.0)
        };
        let product = draft.into_product(Some("dates".to_string()));
        assert_eq!(product.title, "Dates");
        assert_eq!(product.category, None);
        assert_eq!(product.slug.as_deref(), Some("dates"));
    }

    #[test]
    fn test_legacy_document_without_optional_fields() {
        let value = serde_json::json!({ "id": "p1", "title": "Salt", "price": 40 });
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.price, 40.0);
        assert!(product.images.is_empty());
        assert_eq!(product.slug, None);
    }

    #[test]
    fn test_loosely_typed_document_degrades() {
        let value = serde_json::json!({
            "id": "p2",
            "title": "Old Ghee",
            "price": "1200",
            "originalPrice": "n/a",
            "images": "https://img.example.com/ghee.jpg",
            "slug": null,
            "createdAt": { "seconds": 1_700_000_000, "nanoseconds": 500_000_000 }
        });
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.price, 1200.0);
        assert_eq!(product.original_price, None);
        assert_eq!(product.images, vec!["https://img.example.com/ghee.jpg"]);
        assert_eq!(product.slug, None);
        assert_eq!(product.created_at, 1_700_000_000_500);

        let product: Product = serde_json::from_value(serde_json::json!({ "price": {} })).unwrap();
        assert_eq!(product.price, 0.0);
        assert_eq!(product.title, "");
    }

    #[test]
    fn test_update_fields() {
        let update = ProductUpdate {
            price: Some(90.0),
            original_price: Some(None),
            ..ProductUpdate::default()
        };
        let fields = update.to_fields(None);
        assert_eq!(fields["price"], 90.0);
        assert!(fields["originalPrice"].is_null());
        assert!(!fields.contains_key("title"));
        assert!(ProductUpdate::default().is_empty());
    }
}
