//! Document engine for Vellum.
//!
//! # Scope
//!
//! This crate wires the tokenizer and the box tree together into a
//! working document engine:
//! - **Element Stack** - the open-tag stack with the asymmetric pop rule
//!   and the cascading style queries
//! - **Dispatch Table** - a compile-time tag-name match driving one
//!   handler per tag family
//! - **Stream Contract** - `begin`/`write`/`end` byte feeding from the
//!   host, plus per-resource answer streams for embedded images
//! - **Incremental Scheduler** - bounded token consumption per `poll`
//!   with coalesced layout requests, resumable and cancellable
//! - **Events** - title/base/redirect/form/resource events drained by
//!   the host
//! - **Software Rendering** - a fontdue-backed rasterizer executing the
//!   recorded display lists, and font-backed layout metrics
//! - **Print Driver** - page counting and per-page rendering with host
//!   header/footer callbacks
//!
//! The engine owns no window, handles no input events, and performs no
//! network I/O; those belong to the embedding host.

mod dispatch;
mod engine;
mod events;
mod font_metrics;
mod forms;
mod images;
mod print;
mod renderer;
mod stack;

pub use engine::{
    DEFAULT_TOKENS_PER_TICK, Engine, EngineProgress, ListContext, ListKind, NumberStyle,
    StreamStatus, TableContext,
};
pub use events::{EngineEvent, ResourceId};
pub use font_metrics::FontdueFontMetrics;
pub use forms::{FormInfo, FormState, PendingOption, url_encode};
pub use images::LoadedImage;
pub use print::PageChrome;
pub use renderer::Renderer;
pub use stack::{ElementFrame, ElementStack, ExitAction};

pub use vellum_common::EngineError;
