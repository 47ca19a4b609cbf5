pub mod app;
pub mod badges;
pub mod breathing;
pub mod config;
pub mod cravings;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod profiles;
pub mod progress;
pub mod recovery;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod store;
pub mod tracker;

pub use app::router;
pub use config::Config;
pub use notify::ChangeNotifier;
pub use state::AppState;
pub use storage::load_data;
