pub mod data;
pub mod error;
mod logging;
pub mod models;
pub mod services;

pub use error::AppError;
pub use logging::init_logging;
