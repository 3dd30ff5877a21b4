//! NutriLog Library
//!
//! Nutrition diary core: energy targets, food similarity, daily aggregation
//! and copy-on-write log mutations, served over MCP.

pub mod app;
pub mod build_info;
pub mod config;
pub mod db;
pub mod diary;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod reference;
pub mod tools;
pub mod vision;
