use anyhow::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::model::{NewProduct, NewWishlist, Product, Wishlist};
use crate::store::traits::{ProductStore, Store, WishlistStore};

#[derive(Debug, Default)]
struct Tables {
    wishlists: BTreeMap<i32, Wishlist>, // products kept out of this copy
    products: BTreeMap<i32, Product>,
    next_wishlist_id: i32,
    next_product_id: i32,
}

impl Tables {
    fn allocate_wishlist_id(&mut self) -> i32 {
        self.next_wishlist_id += 1;
        self.next_wishlist_id
    }

    fn allocate_product_id(&mut self) -> i32 {
        self.next_product_id += 1;
        self.next_product_id
    }

    fn with_products(&self, wishlist: &Wishlist) -> Wishlist {
        let products = self
            .products
            .values()
            .filter(|product| product.wishlist_id == wishlist.id)
            .cloned()
            .collect();
        Wishlist {
            wishlist_products: products,
            ..wishlist.clone()
        }
    }
}

/// In-process store with the same semantics as the PostgreSQL one:
/// serial ids starting at 1, cascade on wishlist delete, id ordering.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl WishlistStore for MemoryStore {
    async fn create_wishlist(&self, wishlist: NewWishlist) -> Result<Wishlist> {
        log::info!("Creating wishlist {}", wishlist.wishlist_name);
        let mut tables = self.tables.write();
        let id = tables.allocate_wishlist_id();

        let mut products = Vec::with_capacity(wishlist.products.len());
        for details in wishlist.products {
            let product = NewProduct {
                wishlist_id: id,
                details,
            }
            .into_product(tables.allocate_product_id());
            tables.products.insert(product.id, product.clone());
            products.push(product);
        }

        let stored = Wishlist {
            id,
            user_id: wishlist.user_id,
            wishlist_name: wishlist.wishlist_name,
            archived: wishlist.archived.unwrap_or(false),
            wishlist_products: Vec::new(),
        };
        tables.wishlists.insert(id, stored.clone());

        Ok(Wishlist {
            wishlist_products: products,
            ..stored
        })
    }

    async fn update_wishlist(&self, wishlist: &Wishlist) -> Result<()> {
        log::info!("Saving wishlist {}", wishlist.wishlist_name);
        let mut tables = self.tables.write();
        if let Some(stored) = tables.wishlists.get_mut(&wishlist.id) {
            stored.user_id = wishlist.user_id;
            stored.wishlist_name = wishlist.wishlist_name.clone();
            stored.archived = wishlist.archived;
        }
        Ok(())
    }

    async fn delete_wishlist(&self, id: i32) -> Result<bool> {
        log::info!("Deleting wishlist with id {}", id);
        let mut tables = self.tables.write();
        let removed = tables.wishlists.remove(&id).is_some();
        tables.products.retain(|_, product| product.wishlist_id != id);
        Ok(removed)
    }

    async fn find_wishlist(&self, id: i32) -> Result<Option<Wishlist>> {
        log::info!("Processing lookup for Wishlist with id {} ...", id);
        let tables = self.tables.read();
        Ok(tables.wishlists.get(&id).map(|w| tables.with_products(w)))
    }

    async fn all_wishlists(&self) -> Result<Vec<Wishlist>> {
        log::info!("Processing all Wishlists");
        let tables = self.tables.read();
        Ok(tables
            .wishlists
            .values()
            .map(|w| tables.with_products(w))
            .collect())
    }

    async fn find_wishlists_by_name(&self, name: &str) -> Result<Vec<Wishlist>> {
        log::info!("Processing name query for Wishlist with name {} ...", name);
        let tables = self.tables.read();
        Ok(tables
            .wishlists
            .values()
            .filter(|w| w.wishlist_name == name)
            .map(|w| tables.with_products(w))
            .collect())
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        log::info!(
            "Adding product {} to wishlist {}",
            product.details.product_name,
            product.wishlist_id
        );
        let mut tables = self.tables.write();
        if !tables.wishlists.contains_key(&product.wishlist_id) {
            anyhow::bail!(
                "product references missing wishlist {}",
                product.wishlist_id
            );
        }
        let product = product.into_product(tables.allocate_product_id());
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        log::info!(
            "Saving product {} in wishlist {}",
            product.product_name,
            product.wishlist_id
        );
        let mut tables = self.tables.write();
        if let Some(stored) = tables.products.get_mut(&product.id) {
            stored.product_id = product.product_id;
            stored.product_name = product.product_name.clone();
            stored.product_price = product.product_price;
        }
        Ok(())
    }

    async fn delete_product(&self, id: i32) -> Result<bool> {
        log::info!("Deleting product with id {}", id);
        Ok(self.tables.write().products.remove(&id).is_some())
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        log::info!("Processing lookup for Product with id {} ...", id);
        Ok(self.tables.read().products.get(&id).cloned())
    }

    async fn all_products(&self) -> Result<Vec<Product>> {
        log::info!("Processing all Products");
        Ok(self.tables.read().products.values().cloned().collect())
    }

    async fn find_products_by_product_id(&self, product_id: i32) -> Result<Vec<Product>> {
        log::info!("Processing lookup for Product with product_id {} ...", product_id);
        Ok(self
            .tables
            .read()
            .products
            .values()
            .filter(|product| product.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn clear(&self) -> Result<()> {
        let mut tables = self.tables.write();
        tables.wishlists.clear();
        tables.products.clear();
        Ok(())
    }
}
