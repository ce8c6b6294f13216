pub mod chat;
pub mod classes;
pub mod config;
pub mod extraction;

pub use chat::*;
pub use classes::*;
pub use config::{Config, GatewayConfig, PollingConfig, SearchConfig};
pub use extraction::*;
