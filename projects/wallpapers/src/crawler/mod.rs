//! Fetch-and-upsert of the current wallpaper for each market.

pub mod fetch;
pub mod sync;
