use serde_json::{Map, Value};
use thiserror::Error;

/// Raised when an untyped JSON payload cannot populate a Wishlist or Product.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataValidationError {
    #[error("Invalid {entity}: body of request contained bad or no data - expected a JSON object")]
    NotAnObject { entity: &'static str },

    #[error("Invalid {entity}: missing {field}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid {entity}: body of request contained bad or no data - Error message: {field} must be {expected}")]
    WrongType {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid {entity}: {field} must be at most {max} characters")]
    TooLong {
        entity: &'static str,
        field: &'static str,
        max: usize,
    },

    #[error("Invalid {entity}: product_price must not be negative (got {value})")]
    NegativePrice { entity: &'static str, value: f64 },
}

/// Longest name the `wishlist_name` and `product_name` columns hold
pub const MAX_NAME_LENGTH: usize = 63;

/// Typed accessor over a JSON object, naming the entity in every error it produces.
pub(crate) struct FieldReader<'a> {
    entity: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(entity: &'static str, data: &'a Value) -> Result<Self, DataValidationError> {
        match data.as_object() {
            Some(fields) => Ok(Self { entity, fields }),
            None => Err(DataValidationError::NotAnObject { entity }),
        }
    }

    fn present(&self, field: &'static str) -> Option<&'a Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    fn required(&self, field: &'static str) -> Result<&'a Value, DataValidationError> {
        self.present(field).ok_or(DataValidationError::MissingField {
            entity: self.entity,
            field,
        })
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> DataValidationError {
        DataValidationError::WrongType {
            entity: self.entity,
            field,
            expected,
        }
    }

    fn as_integer(&self, field: &'static str, value: &Value) -> Result<i32, DataValidationError> {
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.wrong_type(field, "an integer"))
    }

    pub(crate) fn integer(&self, field: &'static str) -> Result<i32, DataValidationError> {
        let value = self.required(field)?;
        self.as_integer(field, value)
    }

    pub(crate) fn string(&self, field: &'static str) -> Result<String, DataValidationError> {
        self.required(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.wrong_type(field, "a string"))
    }

    /// Length is counted in characters, as VARCHAR does.
    pub(crate) fn bounded_string(&self, field: &'static str, max: usize) -> Result<String, DataValidationError> {
        let value = self.string(field)?;
        if value.chars().count() > max {
            return Err(DataValidationError::TooLong {
                entity: self.entity,
                field,
                max,
            });
        }
        Ok(value)
    }

    /// Integers and floats are both accepted; booleans and strings are not.
    pub(crate) fn number(&self, field: &'static str) -> Result<f64, DataValidationError> {
        self.required(field)?
            .as_f64()
            .ok_or_else(|| self.wrong_type(field, "numeric"))
    }

    pub(crate) fn optional_bool(&self, field: &'static str) -> Result<Option<bool>, DataValidationError> {
        match self.present(field) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "a boolean")),
        }
    }

    pub(crate) fn optional_array(&self, field: &'static str) -> Result<Option<&'a Vec<Value>>, DataValidationError> {
        match self.present(field) {
            None => Ok(None),
            Some(value) => value
                .as_array()
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "a list")),
        }
    }

    pub(crate) fn non_negative(&self, value: f64) -> Result<f64, DataValidationError> {
        if value < 0.0 {
            return Err(DataValidationError::NegativePrice {
                entity: self.entity,
                value,
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_names_the_field() {
        let data = json!({"user_id": 1});
        let reader = FieldReader::new("Wishlist", &data).unwrap();
        let err = reader.string("wishlist_name").unwrap_err();
        assert!(matches!(
            err,
            DataValidationError::MissingField { field: "wishlist_name", .. }
        ));
        assert_eq!(err.to_string(), "Invalid Wishlist: missing wishlist_name");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let data = json!({"user_id": null});
        let reader = FieldReader::new("Wishlist", &data).unwrap();
        assert!(matches!(
            reader.integer("user_id"),
            Err(DataValidationError::MissingField { field: "user_id", .. })
        ));
    }

    #[test]
    fn test_integer_rejects_floats_bools_and_overflow() {
        let data = json!({"a": 1.5, "b": true, "c": 9_000_000_000_i64, "d": "3"});
        let reader = FieldReader::new("Product", &data).unwrap();
        for field in ["a", "b", "c", "d"] {
            let err = reader.integer(field).unwrap_err();
            assert!(err.to_string().contains("must be an integer"), "{}", err);
        }
    }

    #[test]
    fn test_number_accepts_integers() {
        let data = json!({"product_price": 12});
        let reader = FieldReader::new("Product", &data).unwrap();
        assert_eq!(reader.number("product_price").unwrap(), 12.0);
    }

    #[test]
    fn test_bounded_string_counts_characters() {
        let data = json!({"exact": "a".repeat(63), "over": "a".repeat(64), "wide": "é".repeat(63)});
        let reader = FieldReader::new("Wishlist", &data).unwrap();
        assert_eq!(reader.bounded_string("exact", MAX_NAME_LENGTH).unwrap().len(), 63);
        assert!(reader.bounded_string("wide", MAX_NAME_LENGTH).is_ok());
        assert_eq!(
            reader.bounded_string("over", MAX_NAME_LENGTH).unwrap_err(),
            DataValidationError::TooLong {
                entity: "Wishlist",
                field: "over",
                max: 63,
            }
        );
    }

    #[test]
    fn test_non_object_payload() {
        let data = json!([1, 2, 3]);
        assert!(matches!(
            FieldReader::new("Product", &data),
            Err(DataValidationError::NotAnObject { entity: "Product" })
        ));
    }
}
