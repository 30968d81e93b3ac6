//! Rasterization of ChArUco boards and single markers.
//!
//! Geometry follows OpenCV's `CharucoBoard::generateImage`: the board is
//! fitted into the image minus a margin, keeping its aspect ratio and
//! centering it along the slack axis. Squares are sized in whole pixel spans,
//! markers are sampled nearest-neighbour from their cell grid, so the output
//! is deterministic and contains only pure black and white pixels.

use boardgen_aruco::Dictionary;
use boardgen_charuco::CharucoBoard;
use boardgen_core::{GrayImage, BLACK, WHITE};
use serde::{Deserialize, Serialize};

use crate::PrintError;

/// Raster parameters for [`render_charuco`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// White margin kept free on every side, in pixels.
    pub margin_px: u32,
    /// Width of the black marker frame, in marker cells.
    pub border_bits: u32,
}

impl RenderOptions {
    /// Options for a `width × height` image without margin and a one-cell marker border.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            margin_px: 0,
            border_bits: 1,
        }
    }

    pub fn validate(&self) -> Result<(), PrintError> {
        if self.width == 0 || self.height == 0 {
            return Err(PrintError::InvalidOutputSize {
                width: self.width,
                height: self.height,
            });
        }
        let margins = self.margin_px.saturating_mul(2);
        if margins >= self.width || margins >= self.height {
            return Err(PrintError::MarginTooLarge {
                margin_px: self.margin_px,
                width: self.width,
                height: self.height,
            });
        }
        if self.border_bits == 0 {
            return Err(PrintError::InvalidBorderBits);
        }
        Ok(())
    }
}

/// Pixel rectangle the board squares are drawn into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardZone {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Fit the board into the drawable area, preserving its aspect ratio.
///
/// Fails with the same errors as [`RenderOptions::validate`].
pub fn board_zone(board: &CharucoBoard, opts: &RenderOptions) -> Result<BoardZone, PrintError> {
    opts.validate()?;
    let margin = opts.margin_px as usize;
    let inner_w = opts.width as usize - 2 * margin;
    let inner_h = opts.height as usize - 2 * margin;

    let size = board.board_size();
    let (board_w, board_h) = (size.x as f64, size.y as f64);

    // Compare physical-per-pixel ratios without dividing by the pixel sizes.
    let zone = if board_w * inner_h as f64 > board_h * inner_w as f64 {
        let rows = ((board_h * inner_w as f64 / board_w) as usize).min(inner_h);
        let pad = (inner_h - rows) / 2;
        BoardZone {
            x: margin,
            y: margin + pad,
            width: inner_w,
            height: inner_h - 2 * pad,
        }
    } else {
        let cols = ((board_w * inner_h as f64 / board_h) as usize).min(inner_w);
        let pad = (inner_w - cols) / 2;
        BoardZone {
            x: margin + pad,
            y: margin,
            width: inner_w - 2 * pad,
            height: inner_h,
        }
    };
    Ok(zone)
}

/// Cells per marker side, or `MarkerTooSmall` if they cannot get a pixel each.
fn checked_cells_per_side(
    dict: &Dictionary,
    border_bits: usize,
    side_px: f64,
) -> Result<usize, PrintError> {
    match dict.cells_per_side(border_bits) {
        Some(cells) if side_px >= cells as f64 => Ok(cells),
        cells => Err(PrintError::MarkerTooSmall {
            side_px: side_px as u32,
            cells: cells.unwrap_or(usize::MAX),
        }),
    }
}

/// Render a ChArUco board into a grayscale image of exactly the requested size.
///
/// Markers must get at least one pixel per cell; otherwise the board is
/// rejected with [`PrintError::MarkerTooSmall`] before anything is allocated.
pub fn render_charuco(board: &CharucoBoard, opts: &RenderOptions) -> Result<GrayImage, PrintError> {
    let zone = board_zone(board, opts)?;

    let spec = board.spec();
    let dict = board.dictionary();
    let border_bits = opts.border_bits as usize;
    let square_px =
        (zone.width as f64 / spec.cols as f64).min(zone.height as f64 / spec.rows as f64);
    let px_per_unit = square_px / spec.square_length as f64;
    let marker_px = spec.marker_length as f64 * px_per_unit;

    log::debug!(
        "rendering {}x{} board into {}x{} px: zone {:?}, square {:.2} px, marker {:.2} px",
        spec.cols,
        spec.rows,
        opts.width,
        opts.height,
        zone,
        square_px,
        marker_px
    );
    let cells_per_side = checked_cells_per_side(&dict, border_bits, marker_px)?;

    let mut img = GrayImage::filled(opts.width as usize, opts.height as usize, WHITE);
    let zone_x1 = zone.x + zone.width;
    let zone_y1 = zone.y + zone.height;

    for sy in 0..spec.rows {
        for sx in 0..spec.cols {
            if !board.is_black_square(sx, sy) {
                continue;
            }
            let (x0, x1) = square_span(sx, square_px);
            let (y0, y1) = square_span(sy, square_px);
            img.fill_rect(
                zone.x + x0,
                zone.y + y0,
                (zone.x + x1).min(zone_x1),
                (zone.y + y1).min(zone_y1),
                BLACK,
            );
        }
    }

    for id in 0..board.marker_count() as u32 {
        let unknown = || PrintError::UnknownMarkerId {
            id,
            dictionary: dict.name,
        };
        let cells = dict.marker_cells(id, border_bits).ok_or_else(unknown)?;
        let [tl, ..] = board.marker_object_corners(id).ok_or_else(unknown)?;
        let origin = (
            zone.x as f64 + tl.x as f64 * px_per_unit,
            zone.y as f64 + tl.y as f64 * px_per_unit,
        );
        draw_cells(&mut img, &cells, cells_per_side, origin, marker_px);
    }

    Ok(img)
}

/// Render a single marker as a `side_px × side_px` image.
pub fn render_marker(
    dict: &Dictionary,
    id: u32,
    side_px: u32,
    border_bits: u32,
) -> Result<GrayImage, PrintError> {
    if border_bits == 0 {
        return Err(PrintError::InvalidBorderBits);
    }
    let border_bits = border_bits as usize;
    let cells_per_side = checked_cells_per_side(dict, border_bits, side_px as f64)?;
    let cells = dict
        .marker_cells(id, border_bits)
        .ok_or(PrintError::UnknownMarkerId {
            id,
            dictionary: dict.name,
        })?;

    let side = side_px as usize;
    let mut img = GrayImage::filled(side, side, WHITE);
    draw_cells(&mut img, &cells, cells_per_side, (0.0, 0.0), side_px as f64);
    Ok(img)
}

/// Integer pixel span `[start, end)` of square `index`.
#[inline]
fn square_span(index: u32, square_px: f64) -> (usize, usize) {
    let start = index as f64 * square_px;
    (start as usize, (start + square_px) as usize)
}

/// Draw a square cell grid whose top-left corner sits at `origin` and whose side is `size` px.
fn draw_cells(
    img: &mut GrayImage,
    cells: &[bool],
    cells_per_side: usize,
    origin: (f64, f64),
    size: f64,
) {
    let x_range = pixel_range(origin.0, size, img.width);
    let y_range = pixel_range(origin.1, size, img.height);
    let scale = cells_per_side as f64 / size;

    for py in y_range {
        let cy = cell_index(py, origin.1, scale, cells_per_side);
        for px in x_range.clone() {
            let cx = cell_index(px, origin.0, scale, cells_per_side);
            let value = if cells[cy * cells_per_side + cx] {
                BLACK
            } else {
                WHITE
            };
            img.set(px, py, value);
        }
    }
}

#[inline]
fn pixel_range(start: f64, size: f64, limit: usize) -> std::ops::Range<usize> {
    let lo = start.round().max(0.0) as usize;
    let hi = ((start + size).round().max(0.0) as usize).min(limit);
    lo..hi.max(lo)
}

#[inline]
fn cell_index(p: usize, origin: f64, scale: f64, cells_per_side: usize) -> usize {
    let c = ((p as f64 + 0.5 - origin) * scale).floor();
    (c.max(0.0) as usize).min(cells_per_side - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardgen_aruco::builtins::DICT_4X4_50;
    use boardgen_charuco::CharucoBoardSpec;

    fn default_board() -> CharucoBoard {
        CharucoBoard::new(CharucoBoardSpec::default()).expect("board")
    }

    #[test]
    fn zone_fills_image_when_aspect_matches() {
        let board = default_board();
        let zone = board_zone(&board, &RenderOptions::new(1960, 2520)).expect("zone");
        assert_eq!(
            zone,
            BoardZone {
                x: 0,
                y: 0,
                width: 1960,
                height: 2520
            }
        );
    }

    #[test]
    fn zone_is_centered_along_slack_axis() {
        let board = default_board();
        // Square canvas, board is taller than wide: 7:9 fits as 700 x 900.
        let zone = board_zone(&board, &RenderOptions::new(1000, 900)).expect("zone");
        assert_eq!(zone.y, 0);
        assert_eq!(zone.height, 900);
        assert_eq!(zone.x, 150);
        assert_eq!(zone.width, 700);

        let mut opts = RenderOptions::new(740, 2000);
        opts.margin_px = 20;
        let zone = board_zone(&board, &opts).expect("zone");
        assert_eq!((zone.x, zone.width), (20, 700));
        assert_eq!((zone.y, zone.height), (20 + 530, 900));
    }

    #[test]
    fn squares_and_markers_land_on_expected_pixels() {
        let board = default_board();
        let img = render_charuco(&board, &RenderOptions::new(1960, 2520)).expect("render");
        assert_eq!((img.width, img.height), (1960, 2520));

        // Square (0, 0) is black, square (1, 0) is white and carries marker 0.
        assert_eq!(img.get(140, 140), Some(BLACK));
        assert_eq!(img.get(280 + 10, 10), Some(WHITE));
        assert_eq!(img.get(280 + 269, 269), Some(WHITE));
        // The marker occupies 220 px centered in the square, starting at 30 px.
        assert_eq!(img.get(280 + 30, 30), Some(BLACK));
        assert_eq!(img.get(280 + 29, 30), Some(WHITE));
        assert_eq!(img.get(280 + 249, 249), Some(BLACK));
        assert_eq!(img.get(280 + 250, 249), Some(WHITE));

        // Inner cell (0, 1) of marker 0 is black, (0, 0) white. Cells are 220 / 6 px.
        let cell = 220.0 / 6.0;
        let sample = |col: f64, row: f64| {
            let x = (280.0 + 30.0 + (col + 1.5) * cell) as usize;
            let y = (30.0 + (row + 1.5) * cell) as usize;
            img.get(x, y)
        };
        assert_eq!(sample(0.0, 0.0), Some(WHITE));
        assert_eq!(sample(1.0, 0.0), Some(BLACK));
        assert_eq!(sample(3.0, 3.0), Some(BLACK));
        assert_eq!(sample(2.0, 3.0), Some(WHITE));
    }

    #[test]
    fn only_pure_black_and_white_pixels() {
        let board = default_board();
        let img = render_charuco(&board, &RenderOptions::new(523, 611)).expect("render");
        assert_eq!(
            img.count_value(BLACK) + img.count_value(WHITE),
            img.data.len()
        );
    }

    #[test]
    fn margin_stays_white() {
        let board = default_board();
        let mut opts = RenderOptions::new(800, 1000);
        opts.margin_px = 40;
        let img = render_charuco(&board, &opts).expect("render");
        for x in 0..800 {
            for y in (0..40).chain(960..1000) {
                assert_eq!(img.get(x, y), Some(WHITE), "({x}, {y})");
            }
        }
        for y in 0..1000 {
            for x in 0..40 {
                assert_eq!(img.get(x, y), Some(WHITE), "({x}, {y})");
            }
        }
    }

    #[test]
    fn wider_border_grows_black_frame() {
        let board = default_board();
        let mut opts = RenderOptions::new(1960, 2520);
        opts.border_bits = 2;
        let img = render_charuco(&board, &opts).expect("render");
        // Second frame ring of marker 0 (cells are 220 / 8 px).
        let y = (30.0 + 1.5 * 220.0 / 8.0) as usize;
        for x in [280 + 30 + 45, 280 + 30 + 100, 280 + 30 + 170] {
            assert_eq!(img.get(x, y), Some(BLACK));
        }
    }

    #[test]
    fn rejects_invalid_options() {
        let board = default_board();
        assert!(matches!(
            render_charuco(&board, &RenderOptions::new(0, 100)),
            Err(PrintError::InvalidOutputSize { .. })
        ));
        let mut opts = RenderOptions::new(100, 100);
        opts.margin_px = 50;
        assert!(matches!(
            render_charuco(&board, &opts),
            Err(PrintError::MarginTooLarge { .. })
        ));
        opts.margin_px = 0;
        opts.border_bits = 0;
        assert!(matches!(
            render_charuco(&board, &opts),
            Err(PrintError::InvalidBorderBits)
        ));
    }

    #[test]
    fn zone_rejects_margin_wider_than_image() {
        let board = default_board();
        let mut opts = RenderOptions::new(100, 300);
        opts.margin_px = 60;
        assert!(matches!(
            board_zone(&board, &opts),
            Err(PrintError::MarginTooLarge { margin_px: 60, .. })
        ));
        assert!(matches!(
            board_zone(&board, &RenderOptions::new(100, 0)),
            Err(PrintError::InvalidOutputSize { .. })
        ));
    }

    #[test]
    fn border_wider_than_marker_is_rejected() {
        let board = default_board();
        // Default markers are 220 px: 4 + 2 * 108 cells is the last that fits.
        let mut opts = RenderOptions::new(1960, 2520);
        opts.border_bits = 108;
        assert!(render_charuco(&board, &opts).is_ok());

        opts.border_bits = 109;
        assert!(matches!(
            render_charuco(&board, &opts),
            Err(PrintError::MarkerTooSmall { side_px: 220, cells: 222 })
        ));
        opts.border_bits = 100_000;
        assert!(matches!(
            render_charuco(&board, &opts),
            Err(PrintError::MarkerTooSmall { cells: 200_004, .. })
        ));
        opts.border_bits = u32::MAX;
        assert!(matches!(
            render_charuco(&board, &opts),
            Err(PrintError::MarkerTooSmall { .. })
        ));
    }

    #[test]
    fn tiny_canvas_is_rejected_instead_of_drawing_blurred_markers() {
        let board = default_board();
        assert!(matches!(
            render_charuco(&board, &RenderOptions::new(40, 40)),
            Err(PrintError::MarkerTooSmall { cells: 6, .. })
        ));
    }

    #[test]
    fn single_marker_matches_cell_grid() {
        let img = render_marker(&DICT_4X4_50, 0, 60, 1).expect("marker");
        assert_eq!((img.width, img.height), (60, 60));
        let cells = DICT_4X4_50.marker_cells(0, 1).expect("cells");
        for cy in 0..6 {
            for cx in 0..6 {
                let expected = if cells[cy * 6 + cx] { BLACK } else { WHITE };
                assert_eq!(img.get(cx * 10 + 5, cy * 10 + 5), Some(expected));
            }
        }
    }

    #[test]
    fn single_marker_errors() {
        assert!(matches!(
            render_marker(&DICT_4X4_50, 50, 60, 1),
            Err(PrintError::UnknownMarkerId { id: 50, .. })
        ));
        assert!(matches!(
            render_marker(&DICT_4X4_50, 0, 5, 1),
            Err(PrintError::MarkerTooSmall { cells: 6, .. })
        ));
        assert!(matches!(
            render_marker(&DICT_4X4_50, 0, 60, 0),
            Err(PrintError::InvalidBorderBits)
        ));
        assert!(matches!(
            render_marker(&DICT_4X4_50, 0, 60, 1 << 31),
            Err(PrintError::MarkerTooSmall { side_px: 60, .. })
        ));
    }
}
