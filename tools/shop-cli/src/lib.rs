//! Configuration for the `shop` back-office tool.
//!
//! The binary lives in `main.rs`; configuration is a library module so it
//! can be tested from `tests/`.

pub mod config;
