//! Widgets for the detector screen.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>`.

mod cells;
mod header;
mod popups;
mod primitives;
mod spectrum;

pub use cells::{CellView, cell_x, draw_quantity_cell, trace_color};
pub use header::{draw_dividers, draw_header, draw_status, draw_status_line};
pub use popups::{ALERT_FRAME, draw_alert_overlay, draw_message_popup};
pub use primitives::{draw_cell_background, draw_chart, draw_value_with_outline};
pub use spectrum::{bar_height, draw_spectrum};
