pub mod lifecycle;
pub mod metadata;
pub mod routes;

pub use crate::domain::model::{Notice, Order, Package, User};
pub use crate::domain::ports::{ApiClient, ApiRequest, ApiResponse, HttpMethod};
pub use crate::utils::error::Result;
