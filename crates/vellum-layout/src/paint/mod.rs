//! Painting.
//!
//! This module implements the painting phase, which walks the laid-out box
//! tree and emits drawing commands through the [`Painter`] abstraction.
//!
//! # Architecture
//!
//! The draw walk is backend-agnostic: it never branches on which painter
//! is active. Concrete backends are:
//!
//! ```text
//! Layout → Draw walk → Painter
//!                        ├── DisplayListPainter (screen: record, then rasterize)
//!                        └── PrintPainter       (paged, point units)
//! ```
//!
//! The display-list recorder doubles as the test observer: every test that
//! asserts on draw behavior inspects the recorded command stream.

mod display_list;
mod display_painter;
mod draw;
mod painter;
pub mod print;

pub use display_list::{DisplayCommand, DisplayList};
pub use display_painter::DisplayListPainter;
pub use draw::draw;
pub use painter::{BorderStyle, Painter};
