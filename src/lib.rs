pub mod app;
pub mod error;
pub mod handlers;
pub mod product;
pub mod resource;
pub mod store;
pub mod templates;

pub use app::{AppState, SharedAppState, create_app};
pub use error::{AppError, AppResult};
pub use product::{Product, ProductId, ProductParams};
pub use resource::{Outcome, Page, ProductResource};
