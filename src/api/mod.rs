pub mod error;
pub mod handlers;
pub mod payload;
pub mod product_handlers;
pub mod routes;

pub use error::*;
pub use handlers::*;
pub use payload::*;
pub use product_handlers::*;
pub use routes::*;
