//! Bongdaha - football scores and news site server
//!
//! This library provides the core functionality for the Bongdaha site:
//! the API-Football/RSS proxy, the slug classifier, the visitor tracker
//! and the admin API client.

pub mod admin;
pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod services;
pub mod tracker;
pub mod upstream;
