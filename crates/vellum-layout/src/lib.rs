//! Box tree, layout engine, painter abstraction, and pagination for the
//! Vellum engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style Values** - font style flags, the legacy seven-step size
//!   scale, color attribute parsing, alignment, flow styles, and the
//!   ordered display classes behind the element stack's pop rule
//! - **Box Tree** - an arena of tagged layout-object variants (vertical
//!   and horizontal clues, flows, text runs, images, rules, tables and
//!   cells, form controls, anchors) with shared geometry embedded by value
//! - **Layout Engine** - top-down max-width propagation (percent boxes
//!   reflow here), bottom-up size calculation, intrinsic minimum widths,
//!   line breaking, float margin bands, and the two-pass table width
//!   algorithm
//! - **Painter Abstraction** - a backend trait with a display-list
//!   recorder (screen path) and a paged point-unit recorder (print path);
//!   the draw walk never branches on the backend
//! - **Pagination** - recursive clean-split queries with a minimum-fill
//!   fraction and forced hard splits
//!
//! Parsing and tag semantics live upstream in `vellum-html` and
//! `vellum-engine`; this crate never sees markup, only the tree the
//! engine builds.

pub mod layout;
pub mod metrics;
pub mod paint;
pub mod pagination;
pub mod style;
pub mod tree;

pub use layout::{INDENT_UNIT, calc_min_width, calc_pref_width, calc_size, layout, set_max_width};
pub use metrics::{ApproximateFontMetrics, FontMetrics};
pub use paint::{BorderStyle, DisplayCommand, DisplayList, DisplayListPainter, Painter, draw};
pub use pagination::{DEFAULT_MIN_FILL, PageSlice, find_page_split, paginate};
pub use style::{
    Clear, ColorValue, DisplayClass, FloatSide, FlowStyle, FontStyle, HAlign, Length, VAlign,
};
pub use tree::{
    AnchorBox, BoxId, BoxKind, BoxNode, BoxTree, BreakBox, CellBox, ClueHBox, ClueVBox, FloatRef,
    FlowBox, FormControlBox, FormControlKind, Geometry, ImageBox, ListMarker, Rect, RuleBox,
    SelectOption, TableBox, TextBox, TextSegment,
};
