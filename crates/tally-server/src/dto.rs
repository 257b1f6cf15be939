use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_core::error::AppError;
use tally_core::models::{Category, NewProduct, ProductDetail, User};

const MAX_NAME_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 8;

fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed || email.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!("'{email}' is not a valid email")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer",
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Payload for creating or replacing a user. On create the password is
/// mandatory; on update it is only applied when present.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserRequest {
    pub fullname: String,
    pub email: String,
    pub salary: Decimal,
    #[serde(default)]
    pub admin: bool,
    pub password: Option<String>,
    pub active: Option<bool>,
}

impl UserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name("fullname", &self.fullname)?;
        validate_email(&self.email)?;
        if self.salary <= Decimal::ZERO {
            return Err(AppError::Validation("salary must be positive".into()));
        }
        if let Some(password) = &self.password {
            if password.chars().count() < MIN_PASSWORD_LEN {
                return Err(AppError::Validation(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub salary: Decimal,
    pub hiring_date: DateTime<Utc>,
    pub resignation_date: Option<DateTime<Utc>>,
    pub admin: bool,
    pub active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            salary: user.salary,
            hiring_date: user.hiring_date,
            resignation_date: user.resignation_date,
            admin: user.admin,
            active: user.active,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CategoryRequest {
    pub name: String,
}

impl CategoryRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name("name", &self.name)
    }

    /// Category names are stored trimmed.
    pub fn normalized_name(&self) -> &str {
        self.name.trim()
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub quantity: i32,
    pub cost_value: Decimal,
    pub profit_value: Decimal,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name("name", &self.name)?;
        if self.quantity < 0 {
            return Err(AppError::Validation("quantity must not be negative".into()));
        }
        if self.cost_value <= Decimal::ZERO {
            return Err(AppError::Validation("cost_value must be positive".into()));
        }
        if self.profit_value < Decimal::ZERO {
            return Err(AppError::Validation(
                "profit_value must not be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn to_new_product(&self) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            category_id: self.category_id,
            quantity: self.quantity,
            cost_value: self.cost_value,
            profit_value: self.profit_value,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub category: CategoryResponse,
    pub quantity: i32,
    pub cost_value: Decimal,
    pub profit_value: Decimal,
}

impl From<ProductDetail> for ProductResponse {
    fn from(detail: ProductDetail) -> Self {
        Self {
            id: detail.id,
            name: detail.name,
            category: detail.category.into(),
            quantity: detail.quantity,
            cost_value: detail.cost_value,
            profit_value: detail.profit_value,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
