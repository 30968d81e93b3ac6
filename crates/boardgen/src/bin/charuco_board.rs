//! charuco-board CLI — generate printable ChArUco calibration boards.
//!
//! Without arguments it writes the reference 7x9 `DICT_4X4_50` board to
//! `charuco_board.png` in the current directory.

use std::path::{Path, PathBuf};

use boardgen::aruco::{builtins, Dictionary};
use boardgen::charuco::MarkerLayout;
use boardgen::core::{level_from_verbosity, LogFormat};
use boardgen::print::{render_marker, write_png};
use boardgen::PrintConfig;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "charuco-board")]
#[command(about = "Generate printable ChArUco calibration boards as PNG images")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Write log lines to stderr as JSON objects.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a ChArUco board to PNG (the default command).
    Board(BoardArgs),

    /// Render a single dictionary marker to PNG.
    Marker(MarkerArgs),

    /// List the built-in marker dictionaries.
    Dictionaries,

    /// Write the default board configuration as JSON.
    InitConfig {
        /// Destination of the JSON file.
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct BoardArgs {
    /// JSON print configuration; other flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of squares horizontally.
    #[arg(long)]
    cols: Option<u32>,

    /// Number of squares vertically.
    #[arg(long)]
    rows: Option<u32>,

    /// Square side length in board units.
    #[arg(long)]
    square_length: Option<f32>,

    /// Marker side length in board units (must be smaller than the square).
    #[arg(long)]
    marker_length: Option<f32>,

    /// Dictionary name, e.g. DICT_4X4_50.
    #[arg(long)]
    dictionary: Option<String>,

    /// Marker placement scheme.
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Pixels per board unit when width/height are not given.
    #[arg(long)]
    px_per_unit: Option<f32>,

    /// White margin around the board, in pixels.
    #[arg(long)]
    margin: Option<u32>,

    /// Marker border width, in marker cells.
    #[arg(long)]
    border_bits: Option<u32>,

    /// Print resolution recorded in the PNG metadata.
    #[arg(long)]
    dpi: Option<f32>,

    /// Output PNG path.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct MarkerArgs {
    /// Dictionary name, e.g. DICT_4X4_50.
    #[arg(long, default_value = "DICT_4X4_50")]
    dictionary: String,

    /// Marker id within the dictionary.
    #[arg(long, default_value = "0")]
    id: u32,

    /// Image side length in pixels.
    #[arg(long, default_value = "200")]
    size: u32,

    /// Marker border width, in marker cells.
    #[arg(long, default_value = "1")]
    border_bits: u32,

    /// Output PNG path.
    #[arg(short, long, default_value = "marker.png")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Top-left square black (OpenCV >= 4.6).
    Opencv,
    /// Inverted colouring for even row counts (OpenCV < 4.6).
    Legacy,
}

impl From<LayoutArg> for MarkerLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Opencv => MarkerLayout::OpenCvCharuco,
            LayoutArg::Legacy => MarkerLayout::OpenCvCharucoLegacy,
        }
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    boardgen::init_logging(level_from_verbosity(cli.verbose, cli.quiet), format);

    match cli.command {
        None => run_board(&BoardArgs::default()),
        Some(Commands::Board(args)) => run_board(&args),
        Some(Commands::Marker(args)) => run_marker(&args),
        Some(Commands::Dictionaries) => run_dictionaries(),
        Some(Commands::InitConfig { path }) => run_init_config(&path),
    }
}

// ── board ──────────────────────────────────────────────────────────────

fn build_config(args: &BoardArgs) -> CliResult<PrintConfig> {
    let mut cfg = match &args.config {
        Some(path) => PrintConfig::load_json(path)?,
        None => PrintConfig::default(),
    };

    if let Some(cols) = args.cols {
        cfg.board.cols = cols;
    }
    if let Some(rows) = args.rows {
        cfg.board.rows = rows;
    }
    if let Some(square_length) = args.square_length {
        cfg.board.square_length = square_length;
    }
    if let Some(marker_length) = args.marker_length {
        cfg.board.marker_length = marker_length;
    }
    if let Some(name) = &args.dictionary {
        cfg.board.dictionary = name.parse::<Dictionary>()?;
    }
    if let Some(layout) = args.layout {
        cfg.board.marker_layout = layout.into();
    }
    if args.width.is_some() {
        cfg.width = args.width;
    }
    if args.height.is_some() {
        cfg.height = args.height;
    }
    if let Some(px_per_unit) = args.px_per_unit {
        cfg.px_per_unit = px_per_unit;
    }
    if let Some(margin) = args.margin {
        cfg.margin_px = margin;
    }
    if let Some(border_bits) = args.border_bits {
        cfg.border_bits = border_bits;
    }
    if args.dpi.is_some() {
        cfg.dpi = args.dpi;
    }
    if let Some(output) = &args.output {
        cfg.output_path = output.clone();
    }
    Ok(cfg)
}

fn run_board(args: &BoardArgs) -> CliResult<()> {
    let cfg = build_config(args)?;
    log::debug!("board config: {:?}", cfg);

    let generated = cfg.generate()?;
    log::info!(
        "{} markers, {}x{} px -> {}",
        generated.marker_count,
        generated.width,
        generated.height,
        generated.path.display()
    );
    println!("Charuco board generated successfully!");
    Ok(())
}

// ── marker ─────────────────────────────────────────────────────────────

fn run_marker(args: &MarkerArgs) -> CliResult<()> {
    let dict: Dictionary = args.dictionary.parse()?;
    let img = render_marker(&dict, args.id, args.size, args.border_bits)?;
    write_png(&args.output, &img, None)?;
    println!(
        "Marker {} of {} written to {}",
        args.id,
        dict.name,
        args.output.display()
    );
    Ok(())
}

// ── dictionaries ───────────────────────────────────────────────────────

fn run_dictionaries() -> CliResult<()> {
    for dict in builtins::BUILTIN_DICTIONARIES {
        println!(
            "{:<14} {}x{} bits, {:>4} markers, corrects {} bit(s)",
            dict.name,
            dict.marker_size,
            dict.marker_size,
            dict.len(),
            dict.max_correction_bits
        );
    }
    Ok(())
}

// ── init-config ────────────────────────────────────────────────────────

fn run_init_config(path: &Path) -> CliResult<()> {
    PrintConfig::default().write_json(path)?;
    println!("Default configuration written to {}", path.display());
    Ok(())
}
