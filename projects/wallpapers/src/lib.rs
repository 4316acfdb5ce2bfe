//! Bing wallpaper-of-the-day archive
//!
//! - Crawler for the upstream image archive in `crawler/`
//! - Read-only REST API in `endpoints/`
//! - PostgreSQL models, queries and the storage seam in `db/`
//! - Settings from an env file, see `config`

pub mod config;
pub mod crawler;
pub mod dates;
pub mod db;
pub mod endpoints;
pub mod pagination;
pub mod regions;
