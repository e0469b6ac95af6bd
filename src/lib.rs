pub mod app;
pub mod assistant;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod roster;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use assistant::Assistant;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
