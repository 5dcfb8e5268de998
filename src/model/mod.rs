pub mod product;
pub mod validation;
pub mod wishlist;

pub use product::*;
pub use validation::{DataValidationError, MAX_NAME_LENGTH};
pub use wishlist::*;
