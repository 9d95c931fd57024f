//! # Agenda CAD
//!
//! Backend and dashboard core for the pallet agenda (CAD).
//!
//! Scheduled pallet counts are kept in several spreadsheet tabs. This crate
//! consolidates them into one record per schedule date, serves the result over
//! a REST API, and provides the dashboard core that turns consolidated records
//! into chart rows, filters them by date and aggregates summary stats.
//!
//! ## Architecture
//!
//! - [`models`]: domain records and `DD/MM/YYYY` date handling
//! - [`services`]: normalization, range filtering, stats, consolidation and sync
//! - [`sheets`]: spreadsheet access (Google Sheets values API)
//! - [`db`]: repository trait and the in-memory repository
//! - [`api`]: wire DTOs shared by the server and the dashboard client
//! - [`dashboard`]: the dashboard session controller
//! - [`config`]: TOML + environment configuration
//! - `http`: axum server (feature `http-server`)

// RepositoryError carries structured context
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod services;
pub mod sheets;

#[cfg(feature = "http-server")]
pub mod http;
