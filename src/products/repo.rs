use crate::products::dto::UpdateProductRequest;
use crate::products::repo_types::{NewProduct, Product};
use sqlx::PgPool;

const PRODUCT_COLUMNS: &str = "id, name, description, price, discount_price, image_url, \
                               composition, brand_id, category_id, sport_id, gender_id, country_id";

impl Product {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    /// Insert a product. Every reference link is a NOT NULL foreign key, so
    /// a broken link aborts the write and nothing partial is observable.
    pub async fn create(db: &PgPool, data: &NewProduct) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products
                 (name, description, price, discount_price, image_url, composition,
                  brand_id, category_id, sport_id, gender_id, country_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.discount_price)
        .bind(&data.image_url)
        .bind(&data.composition)
        .bind(data.brand_id)
        .bind(data.category_id)
        .bind(data.sport_id)
        .bind(data.gender_id)
        .bind(data.country_id)
        .fetch_one(db)
        .await?;
        Ok(product)
    }

    /// Apply only the fields present in the payload; absent fields keep
    /// their stored value. Returns None when the product does not exist.
    pub async fn update(
        db: &PgPool,
        id: i32,
        changes: &UpdateProductRequest,
    ) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 discount_price = COALESCE($5, discount_price),
                 image_url = COALESCE($6, image_url),
                 composition = COALESCE($7, composition),
                 brand_id = COALESCE($8, brand_id),
                 category_id = COALESCE($9, category_id),
                 sport_id = COALESCE($10, sport_id),
                 gender_id = COALESCE($11, gender_id),
                 country_id = COALESCE($12, country_id)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.discount_price)
        .bind(&changes.image_url)
        .bind(&changes.composition)
        .bind(changes.brand_id)
        .bind(changes.category_id)
        .bind(changes.sport_id)
        .bind(changes.gender_id)
        .bind(changes.country_id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    /// Delete by id; false when no row matched.
    pub async fn delete(db: &PgPool, id: i32) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
