//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::product::{
    DEFAULT_BRAND, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_IMAGE_URL, DEFAULT_UNIT,
};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    /// (name, brand) is the canonical product identity
    pub async fn find_by_name_brand(&self, name: &str, brand: &str) -> RepoResult<Option<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE name = $name AND brand = $brand LIMIT 1")
            .bind(("name", name.to_string()))
            .bind(("brand", brand.to_string()))
            .await?
            .take(0)?;
        Ok(products.into_iter().next())
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("product name cannot be empty".into()));
        }
        let product = Product {
            id: None,
            name: data.name,
            description: data
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            unit: data.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            category: data
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image_url: data
                .image_url
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            brand: data.brand.unwrap_or_else(|| DEFAULT_BRAND.to_string()),
            created_at: time::now_rfc3339(),
        };
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.unit.is_some() {
            set_parts.push("unit = $unit");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.image_url.is_some() {
            set_parts.push("image_url = $image_url");
        }
        if data.brand.is_some() {
            set_parts.push("brand = $brand");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }

        let query_str = format!("UPDATE $product SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("product", rid));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.unit {
            query = query.bind(("unit", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.image_url {
            query = query.bind(("image_url", v));
        }
        if let Some(v) = data.brand {
            query = query.bind(("brand", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        // Offerings of a deleted product go with it
        self.base
            .db()
            .query("DELETE store_product WHERE product = $product")
            .bind(("product", rid.clone()))
            .await?;
        let deleted: Option<Product> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}
