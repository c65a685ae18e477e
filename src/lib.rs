pub mod app;
pub mod auth;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod workshops;

pub use error::{AppError, AppResult};
pub use state::AppState;
