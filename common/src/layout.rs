//! Screen layout constants.
//!
//! ```text
//! ┌──────────────────────────────────────┐  0
//! │ GHOST DETECTOR              MODE     │  header
//! ├──────────────────┬───────────────────┤ 24
//! │ EMF              │ VIB               │
//! │   12.34          │   0.52            │  cells
//! │ ~~chart~~        │ ~~chart~~         │
//! ├──────────────────┴───────────────────┤ 144
//! │ ▂▅▇▃▁ spectrum bars                  │
//! ├──────────────────────────────────────┤ 216
//! │ status line                          │
//! └──────────────────────────────────────┘ 240
//! ```

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 320;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

// =============================================================================
// Regions
// =============================================================================

pub const HEADER_HEIGHT: u32 = 24;

/// Two quantity cells side by side.
pub const CELL_WIDTH: u32 = SCREEN_WIDTH / 2;
pub const CELL_HEIGHT: u32 = 120;
pub const CELL_Y: u32 = HEADER_HEIGHT;

/// Chart strip inside a cell.
pub const CHART_HEIGHT: u32 = 48;
pub const CHART_MARGIN: u32 = 6;

pub const SPECTRUM_Y: u32 = CELL_Y + CELL_HEIGHT;
pub const SPECTRUM_HEIGHT: u32 = 72;

pub const STATUS_Y: u32 = SPECTRUM_Y + SPECTRUM_HEIGHT;
pub const STATUS_HEIGHT: u32 = SCREEN_HEIGHT - STATUS_Y;

const _: () = assert!(STATUS_Y < SCREEN_HEIGHT, "status line must fit on screen");
const _: () = assert!(CHART_HEIGHT + 2 * CHART_MARGIN < CELL_HEIGHT, "chart must fit inside a cell");
