// src/cli/handlers/mod.rs

// One module per command. Each exposes `handle(args, session)`.

pub mod backup;
pub mod check;
pub mod clear;
pub mod commons;
pub mod delete;
pub mod deps;
pub mod edit;
pub mod execute;
pub mod exit;
pub mod help;
pub mod info;
pub mod list;
pub mod load;
pub mod new;
pub mod run;
pub mod save;
pub mod show;
