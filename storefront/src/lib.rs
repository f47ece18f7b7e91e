// storefront/src/lib.rs

//! Storefront service: the customer-facing order-success flow of the shop.

pub mod checkout;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;
