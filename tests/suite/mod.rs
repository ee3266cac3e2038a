//! Integration test modules

mod args;
mod commands;
