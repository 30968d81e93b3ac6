//! Printable ChArUco board generation.
//!
//! - [`render_charuco`] rasterizes a validated [`CharucoBoard`](boardgen_charuco::CharucoBoard)
//!   into a [`GrayImage`](boardgen_core::GrayImage) of exactly the requested size,
//! - [`render_marker`] rasterizes a single dictionary marker,
//! - [`write_png`]/[`encode_png`] persist the raster as 8-bit grayscale PNG,
//! - [`PrintConfig`] ties everything together and round-trips through JSON.
//!
//! ```no_run
//! use boardgen_print::PrintConfig;
//!
//! # fn main() -> Result<(), boardgen_print::PrintError> {
//! let generated = PrintConfig::default().generate()?;
//! println!("{} ({}x{})", generated.path.display(), generated.width, generated.height);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod png_io;
mod render;

pub use config::{GeneratedBoard, PrintConfig, DEFAULT_OUTPUT_PATH};
pub use error::PrintError;
pub use png_io::{encode_png, write_png};
pub use render::{board_zone, render_charuco, render_marker, BoardZone, RenderOptions};
