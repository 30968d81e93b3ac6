//! Board specification and layout helpers for ChArUco.

use boardgen_aruco::{builtins, Dictionary};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Marker placement scheme for the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerLayout {
    /// OpenCV-style ChArUco layout:
    /// - markers are placed on white squares only (top-left square is black),
    /// - marker IDs are assigned sequentially in row-major order over those squares.
    #[serde(rename = "opencv_charuco", alias = "open_cv_charuco")]
    #[default]
    OpenCvCharuco,
    /// Pre-4.6 OpenCV boards: with an even number of rows the colouring is
    /// inverted, so the top-left square is white and carries marker 0.
    #[serde(rename = "opencv_charuco_legacy", alias = "open_cv_charuco_legacy")]
    OpenCvCharucoLegacy,
}

impl MarkerLayout {
    /// True if square `(sx, sy)` is black on a board with `rows` squares vertically.
    #[inline]
    pub fn is_black_square(self, rows: u32, sx: u32, sy: u32) -> bool {
        let even_sum = (sx + sy) % 2 == 0;
        match self {
            MarkerLayout::OpenCvCharucoLegacy if rows % 2 == 0 => !even_sum,
            _ => even_sum,
        }
    }
}

/// Static ChArUco board specification.
///
/// `rows`/`cols` are **square counts** (not inner corner counts). Lengths are
/// in arbitrary physical units (millimetres in practice); only their ratio and
/// the pixel scale chosen at render time matter for the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharucoBoardSpec {
    pub rows: u32,
    pub cols: u32,
    pub square_length: f32,
    pub marker_length: f32,
    pub dictionary: Dictionary,
    #[serde(default)]
    pub marker_layout: MarkerLayout,
}

impl CharucoBoardSpec {
    /// Physical board extent `(width, height)`.
    pub fn board_size(&self) -> Vector2<f32> {
        Vector2::new(
            self.cols as f32 * self.square_length,
            self.rows as f32 * self.square_length,
        )
    }

    /// Image size at `px_per_unit` pixels per physical unit, rounded.
    ///
    /// With a scale of 10 this is the conventional `squares × square_length × 10`
    /// resolution. Negative or NaN extents collapse to 0.
    pub fn default_image_size(&self, px_per_unit: f32) -> (u32, u32) {
        let size = self.board_size() * px_per_unit;
        (size.x.round() as u32, size.y.round() as u32)
    }
}

impl Default for CharucoBoardSpec {
    /// 7 × 9 squares of 28 units with 22-unit `DICT_4X4_50` markers.
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 7,
            square_length: 28.0,
            marker_length: 22.0,
            dictionary: builtins::DICT_4X4_50,
            marker_layout: MarkerLayout::OpenCvCharuco,
        }
    }
}

/// Board specification validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CharucoBoardError {
    #[error("rows and cols must be >= 2")]
    InvalidSize,
    #[error("square_length must be > 0")]
    InvalidSquareLength,
    #[error("marker_length must be in (0, square_length), got {marker_length} for square_length {square_length}")]
    InvalidMarkerLength {
        marker_length: f32,
        square_length: f32,
    },
    #[error("dictionary has no codes")]
    EmptyDictionary,
    #[error("board needs {needed} markers, dictionary {dictionary} has {available}")]
    NotEnoughDictionaryCodes {
        dictionary: &'static str,
        needed: usize,
        available: usize,
    },
}

/// Validated board with precomputed marker placement.
#[derive(Clone, Debug)]
pub struct CharucoBoard {
    spec: CharucoBoardSpec,
    marker_positions: Vec<[u32; 2]>,
}

impl CharucoBoard {
    /// Validate and create a board from a spec.
    pub fn new(spec: CharucoBoardSpec) -> Result<Self, CharucoBoardError> {
        if spec.rows < 2 || spec.cols < 2 {
            return Err(CharucoBoardError::InvalidSize);
        }
        if !spec.square_length.is_finite() || spec.square_length <= 0.0 {
            return Err(CharucoBoardError::InvalidSquareLength);
        }
        if !spec.marker_length.is_finite()
            || spec.marker_length <= 0.0
            || spec.marker_length >= spec.square_length
        {
            return Err(CharucoBoardError::InvalidMarkerLength {
                marker_length: spec.marker_length,
                square_length: spec.square_length,
            });
        }
        if spec.dictionary.is_empty() {
            return Err(CharucoBoardError::EmptyDictionary);
        }

        let marker_positions = white_square_positions(spec.marker_layout, spec.rows, spec.cols);

        let needed = marker_positions.len();
        let available = spec.dictionary.len();
        if available < needed {
            return Err(CharucoBoardError::NotEnoughDictionaryCodes {
                dictionary: spec.dictionary.name,
                needed,
                available,
            });
        }

        Ok(Self {
            spec,
            marker_positions,
        })
    }

    /// Return the underlying board specification.
    #[inline]
    pub fn spec(&self) -> CharucoBoardSpec {
        self.spec
    }

    #[inline]
    pub fn dictionary(&self) -> Dictionary {
        self.spec.dictionary
    }

    /// True if board square `(sx, sy)` is black.
    #[inline]
    pub fn is_black_square(&self, sx: u32, sy: u32) -> bool {
        self.spec
            .marker_layout
            .is_black_square(self.spec.rows, sx, sy)
    }

    /// Mapping from marker id -> board cell (square) coordinates `[sx, sy]`.
    #[inline]
    pub fn marker_position(&self, id: u32) -> Option<[u32; 2]> {
        self.marker_positions.get(id as usize).copied()
    }

    /// All marker cells, indexed by marker id.
    #[inline]
    pub fn marker_positions(&self) -> &[[u32; 2]] {
        &self.marker_positions
    }

    /// Number of markers on the board.
    #[inline]
    pub fn marker_count(&self) -> usize {
        self.marker_positions.len()
    }

    /// Physical board extent `(width, height)`.
    #[inline]
    pub fn board_size(&self) -> Vector2<f32> {
        self.spec.board_size()
    }

    /// Physical corners of a marker (TL, TR, BR, BL), origin at the top-left board corner.
    pub fn marker_object_corners(&self, id: u32) -> Option<[Point2<f32>; 4]> {
        let [sx, sy] = self.marker_position(id)?;
        let s = self.spec.square_length;
        let m = self.spec.marker_length;
        let inset = (s - m) * 0.5;
        let x0 = sx as f32 * s + inset;
        let y0 = sy as f32 * s + inset;
        Some([
            Point2::new(x0, y0),
            Point2::new(x0 + m, y0),
            Point2::new(x0 + m, y0 + m),
            Point2::new(x0, y0 + m),
        ])
    }
}

fn white_square_positions(layout: MarkerLayout, rows: u32, cols: u32) -> Vec<[u32; 2]> {
    let mut out = Vec::new();
    for sy in 0..rows {
        for sx in 0..cols {
            if !layout.is_black_square(rows, sx, sy) {
                out.push([sx, sy]);
            }
        }
    }
    out
}
