pub mod client;
pub mod config;

pub use client::RoastHttpClient;
pub use config::RoastConfig;
