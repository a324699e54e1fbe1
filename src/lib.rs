//! Movie Scraper API Library
//!
//! This library provides functionality for scraping movie data from huale.tv
//! and exposing it through REST API endpoints.

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod routes;
pub mod scraper;
