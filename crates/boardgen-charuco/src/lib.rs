//! ChArUco board description.
//!
//! - validation of a board specification (grid, square and marker lengths, dictionary),
//! - marker placement following OpenCV's layouts,
//! - board geometry: physical extent, marker corners and the default raster size.
//!
//! Marker dictionaries live in `boardgen-aruco`, rasterization in `boardgen-print`.

mod board;

pub use board::{CharucoBoard, CharucoBoardError, CharucoBoardSpec, MarkerLayout};
