//! Cartkeeper - Shopping trips with a remembered item vault
//!
//! This crate keeps a catalog of items with per-store prices (the vault) and
//! runs shopping trips against it: plan a cart, shop it line by line while
//! recording what was really paid, and fold new finds back into the vault.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
