// src/core/mod.rs

pub mod config;
pub mod format;
pub mod highlight;
pub mod lint;
pub mod paths;
pub mod store;
