use serde::Serialize;
use serde_json::Value;

use crate::model::validation::{DataValidationError, FieldReader, MAX_NAME_LENGTH};

const ENTITY: &str = "Product";

/// A product entry stored in a wishlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i32,
    pub wishlist_id: i32,
    pub product_id: i32, // external catalog SKU
    pub product_name: String,
    pub product_price: f64,
}

/// Client-controlled product fields. The owning wishlist is never taken from here.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub product_id: i32,
    pub product_name: String,
    pub product_price: f64,
}

/// Input model for adding a product to a wishlist
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub wishlist_id: i32,
    pub details: ProductDetails,
}

impl ProductDetails {
    pub fn from_json(data: &Value) -> Result<Self, DataValidationError> {
        let reader = FieldReader::new(ENTITY, data)?;
        Self::read(&reader)
    }

    fn read(reader: &FieldReader<'_>) -> Result<Self, DataValidationError> {
        let product_id = reader.integer("product_id")?;
        let product_name = reader.bounded_string("product_name", MAX_NAME_LENGTH)?;
        let product_price = reader.non_negative(reader.number("product_price")?)?;
        Ok(Self {
            product_id,
            product_name,
            product_price,
        })
    }
}

impl NewProduct {
    /// Validate a standalone product payload; `wishlist_id` is required.
    pub fn from_json(data: &Value) -> Result<Self, DataValidationError> {
        let reader = FieldReader::new(ENTITY, data)?;
        let wishlist_id = reader.integer("wishlist_id")?;
        let details = ProductDetails::read(&reader)?;
        Ok(Self {
            wishlist_id,
            details,
        })
    }

    /// Validate a product payload posted under a known wishlist. Any
    /// `wishlist_id` in the body is ignored in favour of `wishlist_id`.
    pub fn from_json_for(wishlist_id: i32, data: &Value) -> Result<Self, DataValidationError> {
        Ok(Self {
            wishlist_id,
            details: ProductDetails::from_json(data)?,
        })
    }

    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            wishlist_id: self.wishlist_id,
            product_id: self.details.product_id,
            product_name: self.details.product_name,
            product_price: self.details.product_price,
        }
    }
}

impl Product {
    /// Overwrite the client-controlled fields, keeping `id` and `wishlist_id`.
    pub fn apply(&mut self, details: ProductDetails) {
        self.product_id = details.product_id;
        self.product_name = details.product_name;
        self.product_price = details.product_price;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standalone_product_requires_wishlist_id() {
        let data = json!({"product_id": 7, "product_name": "Book", "product_price": 9.5});
        let err = NewProduct::from_json(&data).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Product: missing wishlist_id");
    }

    #[test]
    fn test_context_overrides_body_wishlist_id() {
        let data = json!({"wishlist_id": 99, "product_id": 7, "product_name": "Book", "product_price": 9.5});
        let product = NewProduct::from_json_for(3, &data).unwrap();
        assert_eq!(product.wishlist_id, 3);
        assert_eq!(product.details.product_id, 7);
    }

    #[test]
    fn test_negative_price_is_distinct_from_type_failure() {
        let negative = json!({"product_id": 77, "product_name": "Book", "product_price": -5.0});
        assert!(matches!(
            ProductDetails::from_json(&negative),
            Err(DataValidationError::NegativePrice { .. })
        ));

        let wrong_type = json!({"product_id": 77, "product_name": "Book", "product_price": "5"});
        assert!(matches!(
            ProductDetails::from_json(&wrong_type),
            Err(DataValidationError::WrongType { field: "product_price", expected: "numeric", .. })
        ));
    }

    #[test]
    fn test_product_name_length_limit() {
        let data = json!({"product_id": 1, "product_name": "p".repeat(64), "product_price": 1.0});
        assert!(matches!(
            ProductDetails::from_json(&data),
            Err(DataValidationError::TooLong { field: "product_name", max: 63, .. })
        ));
    }

    #[test]
    fn test_zero_price_is_allowed() {
        let data = json!({"product_id": 1, "product_name": "Freebie", "product_price": 0});
        assert_eq!(ProductDetails::from_json(&data).unwrap().product_price, 0.0);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut product = Product {
            id: 10,
            wishlist_id: 2,
            product_id: 1,
            product_name: "Old".to_string(),
            product_price: 1.0,
        };
        product.apply(ProductDetails {
            product_id: 5,
            product_name: "New".to_string(),
            product_price: 2.5,
        });
        assert_eq!(product.id, 10);
        assert_eq!(product.wishlist_id, 2);
        assert_eq!(product.product_name, "New");
    }

    #[test]
    fn test_product_json_shape() {
        let product = NewProduct::from_json_for(
            4,
            &json!({"product_id": 12, "product_name": "Lamp", "product_price": 19.99}),
        )
        .unwrap()
        .into_product(1);
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({"id": 1, "wishlist_id": 4, "product_id": 12, "product_name": "Lamp", "product_price": 19.99})
        );
    }
}
