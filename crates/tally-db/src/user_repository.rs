use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use tally_core::error::AppError;
use tally_core::models::{NewUser, User, UserUpdate};

use crate::map_sqlx_err;

/// Repository for employee accounts in PostgreSQL.
#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. `hiring_date` is set by the database.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (fullname, email, salary, admin, active, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, fullname, email, salary, hiring_date, resignation_date, admin, active, password_hash
            "#,
        )
        .bind(&new_user.fullname)
        .bind(&new_user.email)
        .bind(new_user.salary)
        .bind(new_user.admin)
        .bind(new_user.active)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.into())
    }

    /// All users, stable order by name.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, fullname, email, salary, hiring_date, resignation_date, admin, active, password_hash
            FROM users
            ORDER BY fullname ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, fullname, email, salary, hiring_date, resignation_date, admin, active, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Into::into))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, fullname, email, salary, hiring_date, resignation_date, admin, active, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Into::into))
    }

    /// Update the mutable fields of the user addressed by `email`.
    /// The password hash is only replaced when the update carries one;
    /// `hiring_date` is immutable after creation. Returns `None` when no
    /// such user exists.
    pub async fn update(&self, email: &str, update: &UserUpdate) -> Result<Option<User>, AppError> {
        let row = match &update.password_hash {
            Some(hash) => {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    UPDATE users
                    SET fullname = $2, email = $3, salary = $4, admin = $5,
                        password_hash = $6, updated_at = NOW()
                    WHERE email = $1
                    RETURNING id, fullname, email, salary, hiring_date, resignation_date, admin, active, password_hash
                    "#,
                )
                .bind(email)
                .bind(&update.fullname)
                .bind(&update.email)
                .bind(update.salary)
                .bind(update.admin)
                .bind(hash)
                .fetch_optional(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    UPDATE users
                    SET fullname = $2, email = $3, salary = $4, admin = $5,
                        updated_at = NOW()
                    WHERE email = $1
                    RETURNING id, fullname, email, salary, hiring_date, resignation_date, admin, active, password_hash
                    "#,
                )
                .bind(email)
                .bind(&update.fullname)
                .bind(&update.email)
                .bind(update.salary)
                .bind(update.admin)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_err)?;

        Ok(row.map(Into::into))
    }

    /// Flip the active flag, recording or clearing the resignation date.
    pub async fn set_active(
        &self,
        email: &str,
        active: bool,
        resignation_date: Option<DateTime<Utc>>,
    ) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET active = $2, resignation_date = $3, updated_at = NOW()
            WHERE email = $1
            RETURNING id, fullname, email, salary, hiring_date, resignation_date, admin, active, password_hash
            "#,
        )
        .bind(email)
        .bind(active)
        .bind(resignation_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Into::into))
    }

    /// Replace the stored password hash. Returns false when no such user.
    pub async fn update_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE email = $1")
                .bind(email)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() == 1)
    }

    /// Idempotent seed of the initial admin account: inserts only when the
    /// email is not taken. Returns true if a row was created.
    pub async fn ensure_admin(
        &self,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (fullname, email, salary, admin, active, password_hash)
            VALUES ($1, $2, 0, TRUE, TRUE, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(fullname)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() == 1)
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    fullname: String,
    email: String,
    salary: Decimal,
    hiring_date: DateTime<Utc>,
    resignation_date: Option<DateTime<Utc>>,
    admin: bool,
    active: bool,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            fullname: row.fullname,
            email: row.email,
            salary: row.salary,
            hiring_date: row.hiring_date,
            resignation_date: row.resignation_date,
            admin: row.admin,
            active: row.active,
            password_hash: row.password_hash,
        }
    }
}
