//! MCP server

mod server;

pub use server::NutriLogService;
