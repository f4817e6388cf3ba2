// src/wiki/mod.rs
pub mod client;
pub mod models;
