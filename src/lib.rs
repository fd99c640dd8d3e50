pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod server;
pub mod tools;

pub use client::Session;
pub use server::EchoServer;
pub use tools::ToolRegistry;
