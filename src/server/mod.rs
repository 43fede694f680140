mod api_error;
pub mod config;
mod http_layers;
mod indented_json;
pub mod server;
pub mod state;

pub use api_error::ApiError;
pub use config::ServerConfig;
pub use http_layers::*;
pub use indented_json::IndentedJson;
pub use server::{make_app, run_server};
pub use state::GuardedAlbumStore;
