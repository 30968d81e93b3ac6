//! JSON print configuration.

use std::fs;
use std::path::{Path, PathBuf};

use boardgen_charuco::{CharucoBoard, CharucoBoardSpec};
use boardgen_core::GrayImage;
use serde::{Deserialize, Serialize};

use crate::{render_charuco, write_png, PrintError, RenderOptions};

/// Output file name used when none is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "charuco_board.png";

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_px_per_unit() -> f32 {
    10.0
}

fn default_border_bits() -> u32 {
    1
}

/// Everything needed to produce one board image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    #[serde(default)]
    pub board: CharucoBoardSpec,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Explicit output width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Explicit output height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Pixels per physical board unit, used when width/height are not given.
    #[serde(default = "default_px_per_unit")]
    pub px_per_unit: f32,
    #[serde(default)]
    pub margin_px: u32,
    #[serde(default = "default_border_bits")]
    pub border_bits: u32,
    /// Print resolution stored in the PNG metadata.
    #[serde(default)]
    pub dpi: Option<f32>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            board: CharucoBoardSpec::default(),
            output_path: default_output_path(),
            width: None,
            height: None,
            px_per_unit: default_px_per_unit(),
            margin_px: 0,
            border_bits: default_border_bits(),
            dpi: None,
        }
    }
}

/// Summary of a generated board file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedBoard {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub marker_count: usize,
}

impl PrintConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PrintError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PrintError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output resolution.
    ///
    /// Explicit `width`/`height` win. If only one is given the other follows
    /// the board aspect ratio; with neither, the board's physical size is
    /// scaled by `px_per_unit`.
    pub fn image_size(&self) -> (u32, u32) {
        let size = self.board.board_size();
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, scaled(w, size.y / size.x)),
            (None, Some(h)) => (scaled(h, size.x / size.y), h),
            (None, None) => self.board.default_image_size(self.px_per_unit),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let (width, height) = self.image_size();
        RenderOptions {
            width,
            height,
            margin_px: self.margin_px,
            border_bits: self.border_bits,
        }
    }

    /// Build a validated ChArUco board from the config.
    pub fn build_board(&self) -> Result<CharucoBoard, PrintError> {
        Ok(CharucoBoard::new(self.board)?)
    }

    /// Render the board without touching the filesystem.
    pub fn render(&self) -> Result<GrayImage, PrintError> {
        let board = self.build_board()?;
        render_charuco(&board, &self.render_options())
    }

    /// Render the board and write it to `output_path`.
    pub fn generate(&self) -> Result<GeneratedBoard, PrintError> {
        let board = self.build_board()?;
        let opts = self.render_options();
        let img = render_charuco(&board, &opts)?;
        write_png(&self.output_path, &img, self.dpi)?;
        Ok(GeneratedBoard {
            path: self.output_path.clone(),
            width: opts.width,
            height: opts.height,
            marker_count: board.marker_count(),
        })
    }
}

/// Round to whole pixels; negative and NaN lengths collapse to 0.
fn scaled(len: u32, ratio: f32) -> u32 {
    (len as f32 * ratio).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardgen_aruco::builtins;

    #[test]
    fn default_matches_reference_board() {
        let cfg = PrintConfig::default();
        assert_eq!(cfg.board.cols, 7);
        assert_eq!(cfg.board.rows, 9);
        assert_eq!(cfg.board.dictionary, builtins::DICT_4X4_50);
        assert_eq!(cfg.image_size(), (1960, 2520));
        assert_eq!(cfg.output_path, PathBuf::from("charuco_board.png"));
    }

    #[test]
    fn single_dimension_keeps_aspect_ratio() {
        let cfg = PrintConfig {
            width: Some(700),
            ..PrintConfig::default()
        };
        assert_eq!(cfg.image_size(), (700, 900));

        let cfg = PrintConfig {
            height: Some(450),
            ..PrintConfig::default()
        };
        assert_eq!(cfg.image_size(), (350, 450));

        let mut degenerate = PrintConfig {
            width: Some(700),
            ..PrintConfig::default()
        };
        degenerate.board.square_length = 0.0;
        assert_eq!(degenerate.image_size(), (700, 0));
    }

    #[test]
    fn non_positive_scale_yields_invalid_size() {
        let cfg = PrintConfig {
            px_per_unit: 0.0,
            ..PrintConfig::default()
        };
        assert_eq!(cfg.image_size(), (0, 0));
        assert!(matches!(
            cfg.render(),
            Err(PrintError::InvalidOutputSize { .. })
        ));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: PrintConfig = serde_json::from_str(
            r#"{"board": {"rows": 5, "cols": 4, "square_length": 40, "marker_length": 30,
                          "dictionary": "DICT_4X4_100"},
                "margin_px": 12}"#,
        )
        .expect("parse");
        assert_eq!(cfg.margin_px, 12);
        assert_eq!(cfg.border_bits, 1);
        assert_eq!(cfg.image_size(), (1600, 2000));
        assert_eq!(cfg.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn unknown_dictionary_in_json_is_an_error() {
        let err = serde_json::from_str::<PrintConfig>(
            r#"{"board": {"rows": 5, "cols": 4, "square_length": 40, "marker_length": 30,
                          "dictionary": "DICT_7X7_1000"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown dictionary"));
    }

    #[test]
    fn json_round_trip_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        let cfg = PrintConfig {
            margin_px: 8,
            dpi: Some(300.0),
            ..PrintConfig::default()
        };
        cfg.write_json(&path).expect("write");
        let back = PrintConfig::load_json(&path).expect("load");
        assert_eq!(back, cfg);
    }
}
