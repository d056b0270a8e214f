//! The open-element stack and its style resolver.
//!
//! As tags are entered and exited, frames accumulate here; each new text
//! run queries "current" style by walking the stack from the top. Style
//! queries stop at the nearest frame whose display class is at or above
//! table-cell (style never crosses a cell boundary); alignment queries
//! stop at table frames (alignment never crosses a table boundary, a
//! legacy-compat quirk rather than a correct cascade).
//!
//! # The asymmetric pop rule
//!
//! Closing a named tag searches down the stack for the matching frame,
//! removing every frame above it whose display class is less than or
//! equal to the target's (closing inline spans implicitly), but the
//! search aborts, removing nothing, if it would have to cross a frame of
//! a strictly greater class it does not own. A `</p>` can therefore never
//! escape a table cell, while a block close sweeps any dangling inline
//! frames above it. Legacy markup omits many closing tags and depends on
//! this exact policy.

use vellum_layout::style::{ColorValue, DisplayClass, FlowStyle, FontStyle, HAlign, VAlign};

/// What to finalize when a frame is popped. Runs exactly once per frame,
/// whether the frame is closed explicitly, implicitly, or by end-of-
/// document forced closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    /// Nothing beyond the pop itself (inline spans).
    None,
    /// Finalize the current flow (block elements).
    CloseFlow,
    /// Pop the list stack and finalize the flow (`ul`, `ol`, `dir`, `menu`).
    EndList,
    /// Close a glossary (`dl`).
    EndGlossary,
    /// Close the open cell: finalize its flow and pop the container.
    EndCell,
    /// Close the caption container.
    EndCaption,
    /// Close the open table context.
    EndTable,
    /// Close the open `<select>` control.
    EndSelect,
    /// Close the open `<textarea>` control.
    EndTextArea,
    /// Close the current form.
    EndForm,
}

/// One open element.
///
/// Style fields are the *resolved* values captured when the frame was
/// pushed (`None` = no contribution), so a query is satisfied by the
/// topmost frame that set the property. The two misc slots are scratch
/// integers individual tag handlers use (caption alignment, list vspace).
#[derive(Debug, Clone)]
pub struct ElementFrame {
    /// Lowercase tag name.
    pub tag: String,
    /// Structural class driving the pop rule.
    pub class: DisplayClass,
    /// Resolved font style, if this element changes it.
    pub font: Option<FontStyle>,
    /// Resolved foreground color, if changed.
    pub color: Option<ColorValue>,
    /// Horizontal alignment, if changed.
    pub halign: Option<HAlign>,
    /// Vertical (cell/row) alignment, if changed.
    pub valign: Option<VAlign>,
    /// Paragraph style for flows opened inside this element.
    pub flow_style: Option<FlowStyle>,
    /// Link target contributed by `<a href>`.
    pub link: Option<String>,
    /// Indentation contributed by this element (blockquote, lists).
    pub indent_delta: u8,
    /// What to finalize when the frame pops.
    pub exit: ExitAction,
    /// Handler scratch slot one.
    pub misc1: i32,
    /// Handler scratch slot two.
    pub misc2: i32,
}

impl ElementFrame {
    /// A bare frame with no style contribution.
    #[must_use]
    pub fn new(tag: &str, class: DisplayClass) -> Self {
        Self {
            tag: tag.to_string(),
            class,
            font: None,
            color: None,
            halign: None,
            valign: None,
            flow_style: None,
            link: None,
            indent_delta: 0,
            exit: ExitAction::None,
            misc1: 0,
            misc2: 0,
        }
    }
}

/// The open-element stack.
#[derive(Debug, Default)]
pub struct ElementStack {
    frames: Vec<ElementFrame>,
}

impl ElementStack {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Number of open frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The open tag names, bottom to top (debug/introspection).
    #[must_use]
    pub fn open_tags(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.tag.as_str()).collect()
    }

    /// Push a frame.
    pub fn push(&mut self, frame: ElementFrame) {
        self.frames.push(frame);
    }

    /// Pop the named tag per the asymmetric rule. Returns the removed
    /// frames top-first (so exit actions run innermost-out), or an empty
    /// vector when the close tag matched nothing it may legally reach.
    pub fn pop_named(&mut self, tag: &str) -> Vec<ElementFrame> {
        let Some(target_class) = self.find_class(tag) else {
            return Vec::new();
        };
        let mut match_index = None;
        for (index, frame) in self.frames.iter().enumerate().rev() {
            if frame.tag.eq_ignore_ascii_case(tag) {
                match_index = Some(index);
                break;
            }
            // Crossing a structurally higher frame we do not own: abort.
            if frame.class > target_class {
                return Vec::new();
            }
        }
        match match_index {
            Some(index) => {
                let mut removed: Vec<ElementFrame> = self.frames.drain(index..).collect();
                removed.reverse();
                removed
            }
            None => Vec::new(),
        }
    }

    /// Pop everything at or above the topmost frame with the given exit
    /// action (used to force-close table scaffolding). Returns the removed
    /// frames top-first.
    pub fn pop_through_exit(&mut self, exit: ExitAction) -> Vec<ElementFrame> {
        let index = self
            .frames
            .iter()
            .rposition(|f| f.exit == exit);
        match index {
            Some(index) => {
                let mut removed: Vec<ElementFrame> = self.frames.drain(index..).collect();
                removed.reverse();
                removed
            }
            None => Vec::new(),
        }
    }

    /// The topmost frame whose tag is one of `tags` and which is
    /// reachable without crossing a higher structural frame. Used by the
    /// heading close normalizer (`</h2>` closes whatever heading is
    /// actually open).
    #[must_use]
    pub fn nearest_of(&self, tags: &[&str]) -> Option<&str> {
        for frame in self.frames.iter().rev() {
            if tags.iter().any(|t| frame.tag.eq_ignore_ascii_case(t)) {
                return Some(frame.tag.as_str());
            }
            if frame.class > DisplayClass::Block {
                return None;
            }
        }
        None
    }

    /// Pop every remaining frame (end-of-document or cancellation),
    /// top-first.
    pub fn close_all(&mut self) -> Vec<ElementFrame> {
        let mut removed = std::mem::take(&mut self.frames);
        removed.reverse();
        removed
    }

    /// Mutable access to the topmost frame.
    pub fn top_mut(&mut self) -> Option<&mut ElementFrame> {
        self.frames.last_mut()
    }

    fn find_class(&self, tag: &str) -> Option<DisplayClass> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.tag.eq_ignore_ascii_case(tag))
            .map(|f| f.class)
    }

    // ------------------------------------------------------------------
    // Style queries
    // ------------------------------------------------------------------

    /// The current font style: the topmost contribution at or inside the
    /// nearest cell boundary.
    #[must_use]
    pub fn current_font(&self, default: FontStyle) -> FontStyle {
        for frame in self.frames.iter().rev() {
            if let Some(font) = frame.font {
                return font;
            }
            if !frame.class.passes_style() {
                break;
            }
        }
        default
    }

    /// The current foreground color.
    #[must_use]
    pub fn current_color(&self, default: ColorValue) -> ColorValue {
        for frame in self.frames.iter().rev() {
            if let Some(color) = frame.color {
                return color;
            }
            if !frame.class.passes_style() {
                break;
            }
        }
        default
    }

    /// The current horizontal alignment. Never crosses a table boundary.
    #[must_use]
    pub fn current_halign(&self) -> HAlign {
        for frame in self.frames.iter().rev() {
            if let Some(halign) = frame.halign {
                return halign;
            }
            if !frame.class.passes_alignment() {
                break;
            }
        }
        HAlign::None
    }

    /// The current cell/row vertical alignment. Never crosses a table
    /// boundary.
    #[must_use]
    pub fn current_valign(&self) -> VAlign {
        for frame in self.frames.iter().rev() {
            if let Some(valign) = frame.valign {
                return valign;
            }
            if !frame.class.passes_alignment() {
                break;
            }
        }
        VAlign::default()
    }

    /// The current paragraph style for newly opened flows.
    #[must_use]
    pub fn current_flow_style(&self) -> FlowStyle {
        for frame in self.frames.iter().rev() {
            if let Some(style) = frame.flow_style {
                return style;
            }
            if !frame.class.passes_style() {
                break;
            }
        }
        FlowStyle::Normal
    }

    /// The current link target (`<a href>`), if inside one.
    #[must_use]
    pub fn current_link(&self) -> Option<&str> {
        for frame in self.frames.iter().rev() {
            if let Some(link) = &frame.link {
                return Some(link.as_str());
            }
            if !frame.class.passes_style() {
                break;
            }
        }
        None
    }

    /// The accumulated indentation level down to the nearest cell
    /// boundary.
    #[must_use]
    pub fn current_indent(&self) -> u8 {
        let mut indent = 0u8;
        for frame in self.frames.iter().rev() {
            indent = indent.saturating_add(frame.indent_delta);
            if !frame.class.passes_style() {
                break;
            }
        }
        indent
    }
}
