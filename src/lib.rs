//! Storefront - catalog, pricing and back-office API for a streaming device shop
//!
//! This library provides the core functionality of the storefront service:
//! the pricing rules, the persistent catalog and marketing data, and the
//! HTTP services consumed by the public site and the admin panel.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `pricing`: Quantity discounts, IPTV plan table, coupons and cart quotes
//! - `storage`: SeaORM storage backend and domain models
//! - `services`: Validation and business rules per entity
//! - `api`: HTTP services and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and other process-level utilities

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod pricing;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
