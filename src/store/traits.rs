use crate::model::{NewProduct, NewWishlist, Product, Wishlist};
use anyhow::Result;

#[async_trait::async_trait]
pub trait WishlistStore: Send + Sync {
    /// Persist a new wishlist together with any embedded products
    async fn create_wishlist(&self, wishlist: NewWishlist) -> Result<Wishlist>;
    /// Persist name, owner and archived flag of an existing wishlist
    async fn update_wishlist(&self, wishlist: &Wishlist) -> Result<()>;
    /// Delete a wishlist and, by cascade, its products
    async fn delete_wishlist(&self, id: i32) -> Result<bool>;
    async fn find_wishlist(&self, id: i32) -> Result<Option<Wishlist>>;
    async fn all_wishlists(&self) -> Result<Vec<Wishlist>>;
    /// Exact-match lookup on `wishlist_name`
    async fn find_wishlists_by_name(&self, name: &str) -> Result<Vec<Wishlist>>;
}

#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, product: NewProduct) -> Result<Product>;
    /// Persist the client-controlled fields; `wishlist_id` is never rewritten
    async fn update_product(&self, product: &Product) -> Result<()>;
    async fn delete_product(&self, id: i32) -> Result<bool>;
    async fn find_product(&self, id: i32) -> Result<Option<Product>>;
    async fn all_products(&self) -> Result<Vec<Product>>;
    /// Exact-match lookup on the external SKU, across all wishlists
    async fn find_products_by_product_id(&self, product_id: i32) -> Result<Vec<Product>>;
}

#[async_trait::async_trait]
pub trait Store: WishlistStore + ProductStore + Send + Sync {
    /// Remove every wishlist and product
    async fn clear(&self) -> Result<()>;
}
