//! Full-screen pages other than the overlay.

mod debug;

pub use debug::draw_debug_page;
