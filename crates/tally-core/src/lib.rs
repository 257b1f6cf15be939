pub mod error;
pub mod models;
pub mod password;
pub mod token;

pub use error::AppError;
pub use models::{Category, NewProduct, NewUser, ProductDetail, User, UserUpdate};
pub use token::{Claims, TokenConfig, TokenScope};
