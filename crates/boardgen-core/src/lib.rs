//! Core types shared by the boardgen crates.
//!
//! This crate is intentionally small: an owned grayscale raster that the
//! renderers draw into, and the logger used by the command line.

mod image;
mod logger;

pub use image::{GrayImage, GrayImageView, BLACK, WHITE};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity, LogFormat};
