//! Client for Bing's `HPImageArchive.aspx` wallpaper-of-the-day endpoint.

pub mod index;
