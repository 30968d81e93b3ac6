//! High-level facade crate for the `boardgen-*` workspace.
//!
//! This crate provides stable, convenient re-exports of the underlying crates
//! and (feature `cli`) the `charuco-board` command line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use boardgen::aruco::builtins;
//! use boardgen::charuco::{CharucoBoard, CharucoBoardSpec, MarkerLayout};
//! use boardgen::print::{render_charuco, write_png, RenderOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let board = CharucoBoard::new(CharucoBoardSpec {
//!     rows: 9,
//!     cols: 7,
//!     square_length: 28.0,
//!     marker_length: 22.0,
//!     dictionary: builtins::DICT_4X4_50,
//!     marker_layout: MarkerLayout::OpenCvCharuco,
//! })?;
//! let img = render_charuco(&board, &RenderOptions::new(1960, 2520))?;
//! write_png("charuco_board.png", &img, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `boardgen::core`: grayscale raster and logger.
//! - `boardgen::aruco`: embedded ArUco dictionaries.
//! - `boardgen::charuco`: ChArUco board description and geometry.
//! - `boardgen::print`: rasterization, PNG output and JSON print configs.

pub use boardgen_aruco as aruco;
pub use boardgen_charuco as charuco;
pub use boardgen_core as core;
pub use boardgen_print as print;

pub use boardgen_charuco::{CharucoBoard, CharucoBoardSpec, MarkerLayout};
pub use boardgen_print::{GeneratedBoard, PrintConfig, PrintError};

/// Install the process-wide logger.
///
/// With the `tracing` feature, a `tracing-subscriber` is installed instead;
/// `RUST_LOG`, when set, overrides `level`.
pub fn init_logging(level: log::LevelFilter, format: boardgen_core::LogFormat) {
    #[cfg(feature = "tracing")]
    boardgen_core::init_tracing(level, format);
    #[cfg(not(feature = "tracing"))]
    {
        if let Err(err) = boardgen_core::init_with_level(level, format) {
            eprintln!("logger already installed: {err}");
        }
    }
}
