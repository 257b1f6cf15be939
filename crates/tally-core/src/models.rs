use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// An employee account. `password_hash` is the argon2 PHC string and must
/// never be serialized into a response.
#[derive(Debug, Clone, serde::Serialize)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub salary: Decimal,
    pub hiring_date: DateTime<Utc>,
    pub resignation_date: Option<DateTime<Utc>>,
    pub admin: bool,
    pub active: bool,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Only active users may authenticate or hold a usable token.
    pub fn can_authenticate(&self) -> bool {
        self.active
    }
}

/// DTO for inserting a new user. `hiring_date` is set by the database and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub salary: Decimal,
    pub admin: bool,
    pub active: bool,
    pub password_hash: String,
}

/// Field set for updating a user. `password_hash` is only touched when
/// a new password was supplied.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub fullname: String,
    pub email: String,
    pub salary: Decimal,
    pub admin: bool,
    pub password_hash: Option<String>,
}

/// A product category. Names are unique.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// A product joined with its category, the shape the API returns.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub quantity: i32,
    pub cost_value: Decimal,
    pub profit_value: Decimal,
}

impl ProductDetail {
    /// Selling price implied by cost and margin.
    pub fn sale_value(&self) -> Decimal {
        self.cost_value + self.profit_value
    }
}

/// DTO for inserting or replacing a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category_id: Uuid,
    pub quantity: i32,
    pub cost_value: Decimal,
    pub profit_value: Decimal,
}
