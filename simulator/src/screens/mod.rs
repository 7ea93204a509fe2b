//! Full-screen pages besides the detector view.

#[cfg(feature = "window")]
mod boot;
mod log;

#[cfg(feature = "window")]
pub use boot::run_boot_screen;
pub use log::draw_log_page;
