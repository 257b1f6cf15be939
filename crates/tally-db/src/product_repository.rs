use rust_decimal::Decimal;
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use tally_core::error::AppError;
use tally_core::models::{Category, NewProduct, ProductDetail};

use crate::map_sqlx_err;

/// Repository for products in PostgreSQL. Reads return the product joined
/// with its category, the shape the API serves.
#[derive(Clone)]
pub struct ProductRepository {
    pool: Pool<Postgres>,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_product: &NewProduct) -> Result<ProductDetail, AppError> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO products (name, category_id, quantity, cost_value, profit_value)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&new_product.name)
        .bind(new_product.category_id)
        .bind(new_product.quantity)
        .bind(new_product.cost_value)
        .bind(new_product.profit_value)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.find_by_id(row.0).await?.ok_or_else(|| {
            AppError::DatabaseError(format!("Inserted product {} not found on re-read", row.0))
        })
    }

    pub async fn list(&self) -> Result<Vec<ProductDetail>, AppError> {
        let rows = sqlx::query_as::<_, ProductDetailRow>(
            r#"
            SELECT p.id, p.name, p.category_id, c.name AS category_name,
                   p.quantity, p.cost_value, p.profit_value
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductDetail>, AppError> {
        let row = sqlx::query_as::<_, ProductDetailRow>(
            r#"
            SELECT p.id, p.name, p.category_id, c.name AS category_name,
                   p.quantity, p.cost_value, p.profit_value
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Into::into))
    }

    /// Replace all mutable fields. Returns `None` when no such product.
    pub async fn update(
        &self,
        id: Uuid,
        update: &NewProduct,
    ) -> Result<Option<ProductDetail>, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, category_id = $3, quantity = $4,
                cost_value = $5, profit_value = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.category_id)
        .bind(update.quantity)
        .bind(update.cost_value)
        .bind(update.profit_value)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() == 1)
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct ProductDetailRow {
    id: Uuid,
    name: String,
    category_id: Uuid,
    category_name: String,
    quantity: i32,
    cost_value: Decimal,
    profit_value: Decimal,
}

impl From<ProductDetailRow> for ProductDetail {
    fn from(row: ProductDetailRow) -> Self {
        ProductDetail {
            id: row.id,
            name: row.name,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            quantity: row.quantity,
            cost_value: row.cost_value,
            profit_value: row.profit_value,
        }
    }
}
