//! The box tree: a polymorphic tree of layout objects.
//!
//! # Design
//!
//! The tree uses arena allocation with [`BoxId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. Node kinds are a closed set of tagged variants
//! ([`BoxKind`]) dispatched by `match`; the geometry every node shares is
//! a plain struct embedded by value in every node.
//!
//! Parents own their children structurally (detaching a parent detaches
//! the subtree); the parent link is a non-owning index used for upward
//! queries only.

pub mod table;

use serde::Serialize;

use crate::style::{Clear, ColorValue, FloatSide, FlowStyle, FontStyle, HAlign, VAlign};
use table::TableGrid;

/// A type-safe index into the box tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoxId(pub usize);

/// A rectangle in engine pixel units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Construct a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the two rectangles overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Geometry fields shared by every box-tree node.
///
/// `x`/`y` are relative to the parent box. Vertical extent is split into
/// ascent (above the baseline) and descent (below it); for containers the
/// whole height lives in the ascent. A node with `percent` set recomputes
/// its pixel width from the most recently propagated `max_width` on every
/// reflow; this is what makes the tree reflow-capable without reparsing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Geometry {
    /// Horizontal offset within the parent.
    pub x: f32,
    /// Vertical offset within the parent (top edge).
    pub y: f32,
    /// Current pixel width.
    pub width: f32,
    /// Extent above the baseline.
    pub ascent: f32,
    /// Extent below the baseline.
    pub descent: f32,
    /// The max width most recently propagated by the container.
    pub max_width: f32,
    /// Percentage sizing: `width = percent * max_width / 100`.
    pub percent: Option<u8>,
}

impl Geometry {
    /// Total vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// An aligned (floating) box registered on a vertical clue, with the
/// child position it anchors to: the float's band starts where the
/// following child begins.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FloatRef {
    /// The floated node (outside the ordinary child list).
    pub id: BoxId,
    /// Number of ordinary children present when the float was registered.
    pub anchor: usize,
}

/// A vertical container stacking children top-to-bottom.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClueVBox {
    /// Background fill, if any (`<body bgcolor>` lands on the root clue).
    pub background: Option<ColorValue>,
    /// Aligned (floating) boxes. These are arena nodes *outside* the
    /// ordinary child list; they reserve horizontal margin bands that
    /// subsequent flow content lays out around.
    pub floats: Vec<FloatRef>,
}

/// A horizontal container laying children left-to-right; used for
/// fixed-width sidebars such as list-item marker gutters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ClueHBox {
    /// Vertical alignment policy selecting each child's placement.
    pub valign: VAlign,
}

/// One laid-out line inside a flow, recorded for pagination: a split is
/// legal between lines, never inside one.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LineInfo {
    /// Top of the line, relative to the flow.
    pub y: f32,
    /// Line ascent (baseline is at `y + ascent`).
    pub ascent: f32,
    /// Line descent.
    pub descent: f32,
}

/// The marker text of a list item, baked at creation time: the item
/// number/type is resolved when the `<li>` is parsed, never recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct ListMarker {
    /// Rendered marker text (`"•"`, `"3."`, `"ix."`).
    pub text: String,
}

/// A paragraph-level container holding one run of inline content.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowBox {
    /// The paragraph kind (normal, heading, preformatted, ...).
    pub style: FlowStyle,
    /// Horizontal alignment of the flow's lines.
    pub halign: HAlign,
    /// Indentation depth (blockquotes, nested lists).
    pub indent: u8,
    /// List-item marker, if this flow is an item.
    pub marker: Option<ListMarker>,
    /// Lines produced by the last layout pass.
    pub lines: Vec<LineInfo>,
}

/// One segment of a text run placed on a line. An unwrapped run has
/// exactly one segment; the draw walk issues one glyph-run call per
/// segment.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TextSegment {
    /// Byte offset of the segment start within the run.
    pub start: usize,
    /// Byte offset one past the segment end.
    pub end: usize,
    /// Horizontal position relative to the flow.
    pub x: f32,
    /// Baseline position relative to the flow.
    pub baseline: f32,
    /// Measured advance width.
    pub width: f32,
}

/// A run of document text in a single resolved style.
#[derive(Debug, Clone, Serialize)]
pub struct TextBox {
    /// The decoded text.
    pub text: String,
    /// Resolved font style at creation time.
    pub style: FontStyle,
    /// Resolved foreground color at creation time.
    pub color: ColorValue,
    /// Link target, if this run sits inside `<a href>`.
    pub link: Option<String>,
    /// Per-line segments from the last layout pass.
    pub segments: Vec<TextSegment>,
}

/// An embedded image (or its placeholder while unresolved).
#[derive(Debug, Clone, Serialize)]
pub struct ImageBox {
    /// The `src` attribute, also the key for resource resolution.
    pub src: String,
    /// Alternate text, drawn inside the placeholder.
    pub alt: String,
    /// Explicit width: pixels or percent of the container max width.
    pub width_attr: Option<crate::style::Length>,
    /// Explicit height in pixels.
    pub height_attr: Option<f32>,
    /// Intrinsic size from the decoded resource, once resolved.
    pub intrinsic: Option<(u32, u32)>,
    /// Border thickness from the `border` attribute.
    pub border: f32,
    /// Horizontal gutter from `hspace`.
    pub hspace: f32,
    /// Vertical gutter from `vspace`.
    pub vspace: f32,
    /// Legacy float alignment (`align=left|right`).
    pub float: Option<FloatSide>,
}

/// Default edge length of the placeholder drawn for an unresolved image.
pub const IMAGE_PLACEHOLDER_SIZE: f32 = 32.0;

/// A horizontal rule.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleBox {
    /// Rule thickness from the `size` attribute.
    pub size: f32,
    /// Explicit length (pixels or percent); full width when absent.
    pub length: Option<crate::style::Length>,
    /// Horizontal placement of a shorter-than-full rule.
    pub halign: HAlign,
    /// `noshade`: flat fill instead of the default groove.
    pub noshade: bool,
}

/// A table. Cells are arena children; the grid maps (row, column) slots to
/// them, with rowspan/colspan occupancy markers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableBox {
    /// The cell grid.
    pub grid: TableGrid,
    /// Border thickness (beveled when non-zero).
    pub border: f32,
    /// Gap between cells.
    pub spacing: f32,
    /// Padding inside each cell.
    pub padding: f32,
    /// Explicit table width.
    pub width_attr: Option<crate::style::Length>,
    /// Table background.
    pub bgcolor: Option<ColorValue>,
    /// Caption clue, laid out above the grid (or below it).
    pub caption: Option<BoxId>,
    /// `<caption align=bottom>`: place the caption under the grid.
    pub caption_at_bottom: bool,
    /// Column widths from the last layout pass.
    pub column_widths: Vec<f32>,
    /// Row heights from the last layout pass.
    pub row_heights: Vec<f32>,
}

/// A table cell (`<td>`/`<th>`), behaving as a vertical container.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CellBox {
    /// Rows this cell spans.
    pub rowspan: u32,
    /// Columns this cell spans.
    pub colspan: u32,
    /// Explicit cell width.
    pub width_attr: Option<crate::style::Length>,
    /// `nowrap`: suppress line breaking inside the cell.
    pub nowrap: bool,
    /// Cell background.
    pub bgcolor: Option<ColorValue>,
    /// True for `<th>`.
    pub heading: bool,
    /// Vertical placement of the cell content.
    pub valign: VAlign,
    /// Bevel thickness around the cell, set during table layout when the
    /// table carries a visible border.
    pub bevel: f32,
}

/// One `<option>` inside a select control.
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    /// Submitted value (the `value` attribute, or the label).
    pub value: String,
    /// Display label accumulated from the option body.
    pub label: String,
    /// Initially selected.
    pub selected: bool,
}

/// The concrete kind of a form control box.
#[derive(Debug, Clone, Serialize)]
pub enum FormControlKind {
    /// Single-line text entry; `password` masks echo.
    TextInput {
        /// Visible width in characters.
        size: u32,
        /// Masked entry.
        password: bool,
    },
    /// A checkbox.
    Checkbox {
        /// Initially checked.
        checked: bool,
    },
    /// A radio button.
    Radio {
        /// Initially selected.
        checked: bool,
    },
    /// A submit button.
    Submit {
        /// Button label.
        label: String,
    },
    /// A reset button.
    Reset {
        /// Button label.
        label: String,
    },
    /// A push button.
    Button {
        /// Button label.
        label: String,
    },
    /// A hidden field: zero-size, submit-only.
    Hidden,
    /// A selection list.
    Select {
        /// The options, accumulated while parsing.
        options: Vec<SelectOption>,
        /// Visible rows.
        size: u32,
        /// Multi-selection allowed.
        multiple: bool,
    },
    /// A multi-line text area.
    TextArea {
        /// Visible rows.
        rows: u32,
        /// Visible columns.
        cols: u32,
        /// Initial content accumulated from the element body.
        text: String,
    },
}

/// A form control at the box-model boundary: geometry plus the data needed
/// for form submission, never a native widget.
#[derive(Debug, Clone, Serialize)]
pub struct FormControlBox {
    /// The control kind and its kind-specific data.
    pub kind: FormControlKind,
    /// Submission name; unnamed controls never submit.
    pub name: Option<String>,
    /// Current value (for text inputs, the `value` attribute).
    pub value: String,
    /// Disabled controls render grayed and never submit.
    pub disabled: bool,
}

/// A named anchor target (`<a name=...>`): zero-size, recorded for
/// fragment navigation.
#[derive(Debug, Clone, Serialize)]
pub struct AnchorBox {
    /// The anchor name.
    pub name: String,
}

/// An explicit line break (`<br>`).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BreakBox {
    /// Float margins the break must clear.
    pub clear: Clear,
}

/// The closed set of box-tree node kinds.
#[derive(Debug, Clone, Serialize)]
pub enum BoxKind {
    /// Vertical container.
    ClueV(ClueVBox),
    /// Horizontal container.
    ClueH(ClueHBox),
    /// Paragraph flow.
    Flow(FlowBox),
    /// Text run.
    Text(TextBox),
    /// Image (or placeholder).
    Image(ImageBox),
    /// Horizontal rule.
    Rule(RuleBox),
    /// Table.
    Table(TableBox),
    /// Table cell.
    TableCell(CellBox),
    /// Form control.
    FormControl(FormControlBox),
    /// Named anchor.
    Anchor(AnchorBox),
    /// Explicit line break.
    Break(BreakBox),
}

/// One node in the box tree.
#[derive(Debug, Clone, Serialize)]
pub struct BoxNode {
    /// Shared geometry, mutated by layout.
    pub geometry: Geometry,
    /// Non-owning parent link.
    pub parent: Option<BoxId>,
    /// Structural children, in document order.
    pub children: Vec<BoxId>,
    /// The node kind and its payload.
    pub kind: BoxKind,
}

/// Arena-backed box tree with O(1) node access.
///
/// All nodes live in one vector; detached nodes stay allocated until the
/// tree itself is dropped, which keeps ids stable for the whole document
/// lifetime.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BoxTree {
    nodes: Vec<BoxNode>,
}

impl BoxTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a new, unattached node and return its id.
    pub fn alloc(&mut self, kind: BoxKind) -> BoxId {
        let id = BoxId(self.nodes.len());
        self.nodes.push(BoxNode {
            geometry: Geometry::default(),
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Number of nodes ever allocated (including detached ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    ///
    /// # Panics
    /// Panics on a dangling id, which indicates an engine bug.
    #[must_use]
    pub fn node(&self, id: BoxId) -> &BoxNode {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node.
    ///
    /// # Panics
    /// Panics on a dangling id, which indicates an engine bug.
    pub fn node_mut(&mut self, id: BoxId) -> &mut BoxNode {
        &mut self.nodes[id.0]
    }

    /// Borrow a node's kind.
    #[must_use]
    pub fn kind(&self, id: BoxId) -> &BoxKind {
        &self.node(id).kind
    }

    /// Mutably borrow a node's kind.
    pub fn kind_mut(&mut self, id: BoxId) -> &mut BoxKind {
        &mut self.node_mut(id).kind
    }

    /// Borrow a node's geometry.
    #[must_use]
    pub fn geometry(&self, id: BoxId) -> &Geometry {
        &self.node(id).geometry
    }

    /// Mutably borrow a node's geometry.
    pub fn geometry_mut(&mut self, id: BoxId) -> &mut Geometry {
        &mut self.node_mut(id).geometry
    }

    /// The node's children, in document order.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        &self.node(id).children
    }

    /// The node's parent, if attached.
    #[must_use]
    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.node(id).parent
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: BoxId, child: BoxId) {
        debug_assert_ne!(parent, child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach `child` from its parent, leaving the subtree allocated but
    /// unreachable. Used to drop an empty trailing flow.
    pub fn detach(&mut self, child: BoxId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != child);
        }
    }

    /// Register an aligned (floating) box on a vertical clue.
    ///
    /// The float is owned by the clue but kept out of the ordinary child
    /// list; vertical stacking skips it and flow content reserves margin
    /// around it.
    pub fn add_float(&mut self, clue: BoxId, float: BoxId) {
        self.nodes[float.0].parent = Some(clue);
        let anchor = self.nodes[clue.0].children.len();
        if let BoxKind::ClueV(v) = &mut self.nodes[clue.0].kind {
            v.floats.push(FloatRef { id: float, anchor });
        } else {
            debug_assert!(false, "floats attach to vertical clues only");
        }
    }

    /// Enforce the non-empty-flow invariant at a call site that might
    /// otherwise leave an empty flow behind: fills the flow with an empty
    /// text placeholder so it still contributes a line height.
    ///
    /// Returns true if a placeholder was inserted.
    pub fn ensure_flow_not_empty(&mut self, flow: BoxId, style: FontStyle, color: ColorValue) -> bool {
        debug_assert!(matches!(self.kind(flow), BoxKind::Flow(_)));
        if !self.children(flow).is_empty() {
            return false;
        }
        let placeholder = self.alloc(BoxKind::Text(TextBox {
            text: String::new(),
            style,
            color,
            link: None,
            segments: Vec::new(),
        }));
        self.append_child(flow, placeholder);
        true
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: BoxId) -> impl Iterator<Item = BoxId> + '_ {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let id = current?;
            current = self.parent(id);
            Some(id)
        })
    }
}
