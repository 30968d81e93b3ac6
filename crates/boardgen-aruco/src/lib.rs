//! ArUco marker dictionaries for calibration board generation.
//!
//! This crate focuses on:
//! - embedded built-in dictionaries (compiled into the binary),
//! - name-based lookup of those dictionaries,
//! - the black/white cell layout of a single marker, border included.
//!
//! Rasterization lives in `boardgen-print`.

pub mod builtins;
mod dictionary;

pub use dictionary::{Dictionary, UnknownDictionary};
