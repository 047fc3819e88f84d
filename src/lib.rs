// Translation pass-through and reference/target image labeling service

pub mod config;
pub mod errors;
pub mod handlers;
pub mod imaging;
pub mod labeling;
pub mod routes;
pub mod session;
pub mod state;
pub mod translate;
pub mod vision;

pub use config::Config;
pub use errors::{ApiError, ProviderError, TranslateError};
pub use routes::create_app;
pub use state::AppState;
