use serde::Serialize;
use serde_json::Value;

use crate::model::product::{Product, ProductDetails};
use crate::model::validation::{DataValidationError, FieldReader, MAX_NAME_LENGTH};

const ENTITY: &str = "Wishlist";

/// A named collection of products owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wishlist {
    pub id: i32,
    pub user_id: i32,
    pub wishlist_name: String,
    pub archived: bool,
    pub wishlist_products: Vec<Product>, // insertion order
}

/// Validated wishlist payload, used both for creation and full updates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWishlist {
    pub user_id: i32,
    pub wishlist_name: String,
    /// `None` when the payload did not mention the flag
    pub archived: Option<bool>,
    pub products: Vec<ProductDetails>,
}

impl NewWishlist {
    pub fn from_json(data: &Value) -> Result<Self, DataValidationError> {
        let reader = FieldReader::new(ENTITY, data)?;
        let user_id = reader.integer("user_id")?;
        let wishlist_name = reader.bounded_string("wishlist_name", MAX_NAME_LENGTH)?;
        let archived = reader.optional_bool("archived")?;

        let products = match reader.optional_array("wishlist_products")? {
            Some(items) => items
                .iter()
                .map(ProductDetails::from_json)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            user_id,
            wishlist_name,
            archived,
            products,
        })
    }
}

impl Wishlist {
    /// Apply a full update. Products are left untouched; the archived flag
    /// only changes when the payload supplied it.
    pub fn apply(&mut self, update: NewWishlist) {
        self.user_id = update.user_id;
        self.wishlist_name = update.wishlist_name;
        if let Some(archived) = update.archived {
            self.archived = archived;
        }
    }

    pub fn archive(&mut self) {
        self.archived = true;
    }

    pub fn unarchive(&mut self) {
        self.archived = false;
    }

    /// Narrow the product collection to entries carrying the given SKU.
    pub fn retain_product_id(&mut self, product_id: i32) {
        self.wishlist_products
            .retain(|product| product.product_id == product_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Wishlist {
        Wishlist {
            id: 1,
            user_id: 5,
            wishlist_name: "bday".to_string(),
            archived: false,
            wishlist_products: vec![
                Product {
                    id: 1,
                    wishlist_id: 1,
                    product_id: 77,
                    product_name: "Book".to_string(),
                    product_price: 12.0,
                },
                Product {
                    id: 2,
                    wishlist_id: 1,
                    product_id: 78,
                    product_name: "Pen".to_string(),
                    product_price: 1.5,
                },
            ],
        }
    }

    #[test]
    fn test_minimal_payload() {
        let wishlist = NewWishlist::from_json(&json!({"user_id": 1, "wishlist_name": "bday"})).unwrap();
        assert_eq!(wishlist.user_id, 1);
        assert_eq!(wishlist.wishlist_name, "bday");
        assert_eq!(wishlist.archived, None);
        assert!(wishlist.products.is_empty());
    }

    #[test]
    fn test_wrong_types_name_the_expected_type() {
        let err = NewWishlist::from_json(&json!({"user_id": "1", "wishlist_name": "x"})).unwrap_err();
        assert!(err.to_string().contains("user_id must be an integer"));

        let err = NewWishlist::from_json(&json!({"user_id": 1, "wishlist_name": 42})).unwrap_err();
        assert!(err.to_string().contains("wishlist_name must be a string"));

        let err = NewWishlist::from_json(&json!({"user_id": 1, "wishlist_name": "x", "archived": "yes"})).unwrap_err();
        assert!(err.to_string().contains("archived must be a boolean"));
    }

    #[test]
    fn test_name_length_limit() {
        let ok = NewWishlist::from_json(&json!({"user_id": 1, "wishlist_name": "w".repeat(63)}));
        assert!(ok.is_ok());

        let err = NewWishlist::from_json(&json!({"user_id": 1, "wishlist_name": "w".repeat(64)})).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Wishlist: wishlist_name must be at most 63 characters");
    }

    #[test]
    fn test_embedded_products_are_validated() {
        let data = json!({
            "user_id": 1,
            "wishlist_name": "gifts",
            "wishlist_products": [
                {"product_id": 1, "product_name": "Book", "product_price": 3.0},
                {"product_id": 2, "product_name": "Pen"}
            ]
        });
        let err = NewWishlist::from_json(&data).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Product: missing product_price");
    }

    #[test]
    fn test_embedded_products_are_collected() {
        let data = json!({
            "user_id": 1,
            "wishlist_name": "gifts",
            "wishlist_products": [{"product_id": 1, "product_name": "Book", "product_price": 3.0}]
        });
        let wishlist = NewWishlist::from_json(&data).unwrap();
        assert_eq!(wishlist.products.len(), 1);
        assert_eq!(wishlist.products[0].product_name, "Book");
    }

    #[test]
    fn test_apply_keeps_archived_unless_supplied() {
        let mut wishlist = sample();
        wishlist.archive();
        wishlist.apply(NewWishlist {
            user_id: 9,
            wishlist_name: "renamed".to_string(),
            archived: None,
            products: Vec::new(),
        });
        assert!(wishlist.archived);
        assert_eq!(wishlist.wishlist_name, "renamed");
        assert_eq!(wishlist.wishlist_products.len(), 2);

        wishlist.apply(NewWishlist {
            user_id: 9,
            wishlist_name: "renamed".to_string(),
            archived: Some(false),
            products: Vec::new(),
        });
        assert!(!wishlist.archived);
    }

    #[test]
    fn test_retain_product_id() {
        let mut wishlist = sample();
        wishlist.retain_product_id(78);
        assert_eq!(wishlist.wishlist_products.len(), 1);
        assert_eq!(wishlist.wishlist_products[0].product_name, "Pen");
    }
}
