use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgExecutor, PgPoolOptions, PgRow},
    PgPool, Row,
};
use std::collections::HashMap;

use crate::model::{NewProduct, NewWishlist, Product, Wishlist};
use crate::store::traits::{ProductStore, Store, WishlistStore};

const CREATE_WISHLIST_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS wishlist (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL,
        wishlist_name VARCHAR(63) NOT NULL,
        archived BOOLEAN NOT NULL DEFAULT FALSE
    )
"#;

const CREATE_PRODUCT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS product (
        id SERIAL PRIMARY KEY,
        wishlist_id INTEGER NOT NULL REFERENCES wishlist(id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL,
        product_name VARCHAR(63) NOT NULL,
        product_price DOUBLE PRECISION NOT NULL
    )
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the wishlist and product tables if they do not exist yet
    pub async fn migrate(&self) -> Result<()> {
        log::info!("Initializing Wishlists database");
        for statement in [CREATE_WISHLIST_TABLE, CREATE_PRODUCT_TABLE] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to create wishlist tables")?;
        }
        Ok(())
    }

    async fn products_for(&self, wishlist_id: i32) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, wishlist_id, product_id, product_name, product_price FROM product WHERE wishlist_id = $1 ORDER BY id",
        )
        .bind(wishlist_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch wishlist products")?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Load the products for every given wishlist row in a single query
    async fn wishlists_with_products(&self, rows: Vec<PgRow>) -> Result<Vec<Wishlist>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.get("id")).collect();
        let product_rows = sqlx::query(
            "SELECT id, wishlist_id, product_id, product_name, product_price FROM product WHERE wishlist_id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch wishlist products")?;

        let mut by_wishlist: HashMap<i32, Vec<Product>> = HashMap::new();
        for row in &product_rows {
            let product = product_from_row(row);
            by_wishlist
                .entry(product.wishlist_id)
                .or_default()
                .push(product);
        }

        Ok(rows
            .iter()
            .map(|row| {
                let mut wishlist = wishlist_from_row(row);
                wishlist.wishlist_products = by_wishlist.remove(&wishlist.id).unwrap_or_default();
                wishlist
            })
            .collect())
    }
}

fn wishlist_from_row(row: &PgRow) -> Wishlist {
    Wishlist {
        id: row.get("id"),
        user_id: row.get("user_id"),
        wishlist_name: row.get("wishlist_name"),
        archived: row.get("archived"),
        wishlist_products: Vec::new(),
    }
}

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        wishlist_id: row.get("wishlist_id"),
        product_id: row.get("product_id"),
        product_name: row.get("product_name"),
        product_price: row.get("product_price"),
    }
}

async fn insert_product<'e, E: PgExecutor<'e>>(executor: E, product: NewProduct) -> Result<Product> {
    let row = sqlx::query(
        "INSERT INTO product (wishlist_id, product_id, product_name, product_price) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(product.wishlist_id)
    .bind(product.details.product_id)
    .bind(&product.details.product_name)
    .bind(product.details.product_price)
    .fetch_one(executor)
    .await
    .context("Failed to insert product")?;

    Ok(product.into_product(row.get("id")))
}

#[async_trait::async_trait]
impl WishlistStore for PostgresStore {
    async fn create_wishlist(&self, wishlist: NewWishlist) -> Result<Wishlist> {
        log::info!("Creating wishlist {}", wishlist.wishlist_name);
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let archived = wishlist.archived.unwrap_or(false);
        let row = sqlx::query(
            "INSERT INTO wishlist (user_id, wishlist_name, archived) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(wishlist.user_id)
        .bind(&wishlist.wishlist_name)
        .bind(archived)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert wishlist")?;
        let id: i32 = row.get("id");

        let mut products = Vec::with_capacity(wishlist.products.len());
        for details in wishlist.products {
            let product = NewProduct {
                wishlist_id: id,
                details,
            };
            products.push(insert_product(&mut *tx, product).await?);
        }

        tx.commit().await.context("Failed to commit wishlist")?;

        Ok(Wishlist {
            id,
            user_id: wishlist.user_id,
            wishlist_name: wishlist.wishlist_name,
            archived,
            wishlist_products: products,
        })
    }

    async fn update_wishlist(&self, wishlist: &Wishlist) -> Result<()> {
        log::info!("Saving wishlist {}", wishlist.wishlist_name);
        sqlx::query("UPDATE wishlist SET user_id = $2, wishlist_name = $3, archived = $4 WHERE id = $1")
            .bind(wishlist.id)
            .bind(wishlist.user_id)
            .bind(&wishlist.wishlist_name)
            .bind(wishlist.archived)
            .execute(&self.pool)
            .await
            .context("Failed to update wishlist")?;

        Ok(())
    }

    async fn delete_wishlist(&self, id: i32) -> Result<bool> {
        log::info!("Deleting wishlist with id {}", id);
        let result = sqlx::query("DELETE FROM wishlist WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete wishlist")?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_wishlist(&self, id: i32) -> Result<Option<Wishlist>> {
        log::info!("Processing lookup for Wishlist with id {} ...", id);
        let row = sqlx::query("SELECT id, user_id, wishlist_name, archived FROM wishlist WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch wishlist")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut wishlist = wishlist_from_row(&row);
        wishlist.wishlist_products = self.products_for(wishlist.id).await?;
        Ok(Some(wishlist))
    }

    async fn all_wishlists(&self) -> Result<Vec<Wishlist>> {
        log::info!("Processing all Wishlists");
        let rows = sqlx::query("SELECT id, user_id, wishlist_name, archived FROM wishlist ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list wishlists")?;

        self.wishlists_with_products(rows).await
    }

    async fn find_wishlists_by_name(&self, name: &str) -> Result<Vec<Wishlist>> {
        log::info!("Processing name query for Wishlist with name {} ...", name);
        let rows = sqlx::query(
            "SELECT id, user_id, wishlist_name, archived FROM wishlist WHERE wishlist_name = $1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query wishlists by name")?;

        self.wishlists_with_products(rows).await
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresStore {
    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        log::info!(
            "Adding product {} to wishlist {}",
            product.details.product_name,
            product.wishlist_id
        );
        insert_product(&self.pool, product).await
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        log::info!(
            "Saving product {} in wishlist {}",
            product.product_name,
            product.wishlist_id
        );
        sqlx::query("UPDATE product SET product_id = $2, product_name = $3, product_price = $4 WHERE id = $1")
            .bind(product.id)
            .bind(product.product_id)
            .bind(&product.product_name)
            .bind(product.product_price)
            .execute(&self.pool)
            .await
            .context("Failed to update product")?;

        Ok(())
    }

    async fn delete_product(&self, id: i32) -> Result<bool> {
        log::info!("Deleting product with id {}", id);
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete product")?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        log::info!("Processing lookup for Product with id {} ...", id);
        let row = sqlx::query(
            "SELECT id, wishlist_id, product_id, product_name, product_price FROM product WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch product")?;

        Ok(row.as_ref().map(product_from_row))
    }

    async fn all_products(&self) -> Result<Vec<Product>> {
        log::info!("Processing all Products");
        let rows = sqlx::query(
            "SELECT id, wishlist_id, product_id, product_name, product_price FROM product ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list products")?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    async fn find_products_by_product_id(&self, product_id: i32) -> Result<Vec<Product>> {
        log::info!("Processing lookup for Product with product_id {} ...", product_id);
        let rows = sqlx::query(
            "SELECT id, wishlist_id, product_id, product_name, product_price FROM product WHERE product_id = $1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query products by product_id")?;

        Ok(rows.iter().map(product_from_row).collect())
    }
}

#[async_trait::async_trait]
impl Store for PostgresStore {
    async fn clear(&self) -> Result<()> {
        // products go with their wishlists
        sqlx::query("DELETE FROM wishlist")
            .execute(&self.pool)
            .await
            .context("Failed to clear wishlists")?;
        Ok(())
    }
}
