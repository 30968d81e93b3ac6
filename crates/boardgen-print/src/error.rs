use boardgen_charuco::CharucoBoardError;

/// Errors produced while rendering or writing a board.
#[derive(thiserror::Error, Debug)]
pub enum PrintError {
    #[error("output size must be positive, got {width}x{height}")]
    InvalidOutputSize { width: u32, height: u32 },
    #[error("margin of {margin_px}px leaves no drawable area in a {width}x{height} image")]
    MarginTooLarge {
        margin_px: u32,
        width: u32,
        height: u32,
    },
    #[error("border_bits must be >= 1")]
    InvalidBorderBits,
    #[error("marker image of {side_px}px cannot hold {cells} cells per side")]
    MarkerTooSmall { side_px: u32, cells: usize },
    #[error("marker id {id} is not in dictionary {dictionary}")]
    UnknownMarkerId { id: u32, dictionary: &'static str },
    #[error("dpi must be finite and > 0, got {0}")]
    InvalidDpi(f32),
    #[error(transparent)]
    Board(#[from] CharucoBoardError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Png(#[from] png::EncodingError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
