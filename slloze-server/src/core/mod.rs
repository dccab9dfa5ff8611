//! Core: configuration, state and server startup

mod config;
mod server;
mod state;

pub use config::Config;
pub use server::{Server, build_app, build_router};
pub use state::ServerState;
