//! The document engine: lifecycle, streaming input, incremental parsing,
//! and the rendering entry points.
//!
//! One engine instance serves one displayed document. `begin` resets
//! parsing state and opens the token stream; the host feeds bytes with
//! `write` and finishes with `end`; `poll` consumes a bounded number of
//! tokens per call so a large document streams in without blocking the
//! host's loop. Multiple logical frames each get their own independent
//! engine instance; this type holds no global state beyond the
//! deduplicated warning channel.

use std::collections::{HashMap, VecDeque};

use vellum_common::EngineError;
use vellum_common::warning::{clear_warnings, warn_once};
use vellum_html::{HtmlTokenizer, Token};
use vellum_layout::metrics::{ApproximateFontMetrics, FontMetrics};
use vellum_layout::paint::Painter;
use vellum_layout::style::{ColorValue, FlowStyle, FontStyle, HAlign};
use vellum_layout::tree::{
    BoxId, BoxKind, BoxTree, ClueVBox, FlowBox, ListMarker, Rect, TextBox,
};

use crate::dispatch;
use crate::events::{EngineEvent, ResourceId};
use crate::forms::FormState;
use crate::images::LoadedImage;
use crate::stack::{ElementStack, ExitAction};

/// Default number of tokens consumed per [`Engine::poll`] call.
pub const DEFAULT_TOKENS_PER_TICK: usize = 250;

/// Default viewport width before the host reports one.
const DEFAULT_VIEWPORT_WIDTH: f32 = 640.0;

/// How the host finished a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// The stream completed normally.
    Ok,
    /// The stream was aborted; whatever arrived still renders.
    Error,
}

/// Result of one [`Engine::poll`] tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineProgress {
    /// Tokens consumed by this tick.
    pub tokens_consumed: usize,
    /// A layout pass is pending (coalesced across any number of changes).
    pub needs_layout: bool,
    /// Parsing has finished (stream ended and all tokens consumed).
    pub done: bool,
}

/// Ordered-list numbering style, from the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// `1.` `2.` `3.`
    Decimal,
    /// `a.` `b.` `c.`
    LowerAlpha,
    /// `A.` `B.` `C.`
    UpperAlpha,
    /// `i.` `ii.` `iii.`
    LowerRoman,
    /// `I.` `II.` `III.`
    UpperRoman,
}

/// What kind of list the top of the list stack is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `ul`, `dir`, `menu`: bulleted.
    Unordered,
    /// `ol`: numbered.
    Ordered(NumberStyle),
    /// `dl`: definition list, no markers.
    Glossary,
}

/// One open list scope. The item counter lives here so each `<li>` bakes
/// its number at creation time; it is never recomputed later.
#[derive(Debug, Clone, Copy)]
pub struct ListContext {
    /// List kind and numbering.
    pub kind: ListKind,
    /// Next item number (ordered lists).
    pub counter: i32,
}

/// One open table scope (tables nest through this stack).
#[derive(Debug, Clone, Copy)]
pub struct TableContext {
    /// The table node.
    pub table: BoxId,
    /// A `<tr>` is open.
    pub row_open: bool,
    /// A `<td>`/`<th>` is open (its clue is the current container).
    pub cell_open: bool,
}

/// A host-fed resource stream bound to the image boxes that wait on it.
struct ResourceBinding {
    url: String,
    data: Vec<u8>,
    targets: Vec<BoxId>,
    closed: bool,
}

/// The document engine.
pub struct Engine {
    pub(crate) tokenizer: HtmlTokenizer,
    pub(crate) tree: BoxTree,
    pub(crate) root: BoxId,
    /// Insertion-point stack: the root clue, then cell/caption clues as
    /// they open.
    pub(crate) containers: Vec<BoxId>,
    /// The open flow, if any.
    pub(crate) flow: Option<BoxId>,
    pub(crate) stack: ElementStack,
    pub(crate) lists: Vec<ListContext>,
    pub(crate) tables: Vec<TableContext>,
    pub(crate) forms: FormState,
    /// Accumulating `<title>` text while inside one.
    pub(crate) title_capture: Option<String>,
    pub(crate) title: Option<String>,

    pub(crate) events: VecDeque<EngineEvent>,
    bindings: HashMap<u64, ResourceBinding>,
    next_resource: u64,
    pub(crate) images: HashMap<String, LoadedImage>,

    /// Document default text color (`<body text>`).
    pub(crate) text_color: ColorValue,
    /// Document link color (`<body link>`).
    pub(crate) link_color: ColorValue,

    viewport_width: f32,
    tokens_per_tick: usize,
    layout_pending: bool,
    stream_open: bool,
    finished: bool,
    pub(crate) metrics: Box<dyn FontMetrics>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with an empty document.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = BoxTree::new();
        let root = tree.alloc(BoxKind::ClueV(ClueVBox::default()));
        Self {
            tokenizer: HtmlTokenizer::new(),
            tree,
            root,
            containers: Vec::new(),
            flow: None,
            stack: ElementStack::new(),
            lists: Vec::new(),
            tables: Vec::new(),
            forms: FormState::default(),
            title_capture: None,
            title: None,
            events: VecDeque::new(),
            bindings: HashMap::new(),
            next_resource: 0,
            images: HashMap::new(),
            text_color: ColorValue::BLACK,
            link_color: ColorValue::LINK_BLUE,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            tokens_per_tick: DEFAULT_TOKENS_PER_TICK,
            layout_pending: false,
            stream_open: false,
            finished: false,
            metrics: Box::new(ApproximateFontMetrics),
        }
    }

    // ------------------------------------------------------------------
    // Stream contract
    // ------------------------------------------------------------------

    /// Open a document stream, resetting all parsing state. The engine
    /// only understands HTML; other content types still parse, with a
    /// warning.
    pub fn begin(&mut self, content_type: &str) {
        clear_warnings();
        if !content_type.is_empty()
            && !content_type.eq_ignore_ascii_case("text/html")
            && !content_type.starts_with("text/html;")
        {
            warn_once("Engine", &format!("unsupported content type '{content_type}', parsing as HTML"));
        }
        self.tokenizer = HtmlTokenizer::new();
        self.tree = BoxTree::new();
        self.root = self.tree.alloc(BoxKind::ClueV(ClueVBox::default()));
        self.containers.clear();
        self.flow = None;
        self.stack = ElementStack::new();
        self.lists.clear();
        self.tables.clear();
        self.forms = FormState::default();
        self.title_capture = None;
        self.title = None;
        self.events.clear();
        self.bindings.clear();
        self.images.clear();
        self.text_color = ColorValue::BLACK;
        self.link_color = ColorValue::LINK_BLUE;
        self.layout_pending = false;
        self.stream_open = true;
        self.finished = false;
    }

    /// Feed a chunk of document bytes (UTF-8 text).
    ///
    /// # Errors
    /// [`EngineError::StreamClosed`] if the stream was already ended.
    pub fn write(&mut self, chunk: &str) -> Result<(), EngineError> {
        if !self.stream_open {
            return Err(EngineError::StreamClosed);
        }
        self.tokenizer.write(chunk);
        Ok(())
    }

    /// Finish the document stream. Idempotent; an error status still
    /// finalizes whatever arrived.
    pub fn end(&mut self, status: StreamStatus) {
        if !self.stream_open {
            return;
        }
        if status == StreamStatus::Error {
            warn_once("Engine", "stream ended with an error; rendering partial document");
        }
        self.tokenizer.end();
        self.stream_open = false;
    }

    // ------------------------------------------------------------------
    // Incremental parsing
    // ------------------------------------------------------------------

    /// Consume at most the per-tick token budget, then return. Layout
    /// requests made along the way are coalesced into one pending flag;
    /// run [`Self::relayout`] when `needs_layout` reports true.
    pub fn poll(&mut self) -> EngineProgress {
        let mut consumed = 0usize;
        if !self.finished {
            while consumed < self.tokens_per_tick {
                let Some(token) = self.tokenizer.next_token() else {
                    break;
                };
                self.process_token(&token);
                consumed += 1;
            }
            if !self.tokenizer.has_token() && !self.stream_open {
                self.finish_document();
            }
            if consumed > 0 {
                self.layout_pending = true;
            }
        }
        EngineProgress {
            tokens_consumed: consumed,
            needs_layout: self.layout_pending,
            done: self.finished,
        }
    }

    /// Parse until nothing further can be consumed (convenience for
    /// hosts that do not need incremental behavior).
    pub fn parse_all(&mut self) {
        loop {
            let progress = self.poll();
            if progress.done || progress.tokens_consumed == 0 {
                break;
            }
        }
    }

    /// Cancel an in-progress parse (navigation away, teardown). Safe to
    /// call at any time, any number of times; every open stack frame is
    /// closed through its exit action so the tree stays structurally
    /// valid and drawable.
    pub fn stop(&mut self) {
        if self.finished {
            return;
        }
        self.tokenizer.end();
        self.stream_open = false;
        self.force_close_document();
        self.finished = true;
        self.layout_pending = true;
    }

    /// Number of tokens consumed per poll tick.
    pub fn set_tokens_per_tick(&mut self, budget: usize) {
        self.tokens_per_tick = budget.max(1);
    }

    /// True once the document has fully parsed (or was stopped).
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    fn process_token(&mut self, token: &Token) {
        match token {
            Token::Text(text) => {
                if let Some(capture) = &mut self.title_capture {
                    capture.push_str(text);
                } else if self.forms.capturing() {
                    self.forms.push_text(text);
                } else {
                    self.insert_text(text);
                }
            }
            Token::Tag(_) => dispatch::dispatch_tag(self, token),
        }
    }

    fn finish_document(&mut self) {
        if self.finished {
            return;
        }
        self.force_close_document();
        self.events.push_back(EngineEvent::LoadDone);
        self.finished = true;
        self.layout_pending = true;
    }

    /// Close every open construct, leaving a structurally valid tree.
    fn force_close_document(&mut self) {
        if self.title_capture.is_some() {
            self.finish_title();
        }
        self.forms.finish_option(&mut self.tree);
        self.forms.finish_textarea(&mut self.tree);
        self.forms.select = None;

        let removed = self.stack.close_all();
        for frame in removed {
            self.run_exit(frame.exit);
        }
        // A trailing auto-opened flow with no content is dropped rather
        // than padded; mid-document empties got their placeholder when
        // they were closed.
        if let Some(flow) = self.flow.take() {
            if self.tree.children(flow).is_empty() {
                self.tree.detach(flow);
            }
        }
        self.containers.clear();
        self.lists.clear();
        self.tables.clear();
    }

    // ------------------------------------------------------------------
    // Flow management
    // ------------------------------------------------------------------

    /// The clue new blocks append into (the root, or the innermost open
    /// cell/caption).
    pub(crate) fn current_container(&self) -> BoxId {
        self.containers.last().copied().unwrap_or(self.root)
    }

    /// Push a new insertion container (cell, caption).
    pub(crate) fn push_container(&mut self, clue: BoxId) {
        self.containers.push(clue);
        self.flow = None;
    }

    /// Pop the innermost insertion container.
    pub(crate) fn pop_container(&mut self) {
        let _ = self.containers.pop();
        self.flow = None;
    }

    /// Close the open flow. An otherwise-empty flow is filled with an
    /// empty text placeholder so it still contributes a line height; no
    /// flow ever remains empty.
    pub(crate) fn close_flow(&mut self) {
        if let Some(flow) = self.flow.take() {
            let style = self.current_font();
            let color = self.current_color();
            let _ = self.tree.ensure_flow_not_empty(flow, style, color);
        }
    }

    /// Open a fresh flow in the current container with the given
    /// paragraph setup, closing any previous one.
    pub(crate) fn new_flow(
        &mut self,
        style: FlowStyle,
        halign: HAlign,
        marker: Option<ListMarker>,
    ) -> BoxId {
        self.close_flow();
        let indent = self.stack.current_indent();
        let flow = self.tree.alloc(BoxKind::Flow(FlowBox {
            style,
            halign,
            indent,
            marker,
            lines: Vec::new(),
        }));
        let container = self.current_container();
        self.tree.append_child(container, flow);
        self.flow = Some(flow);
        flow
    }

    /// The open flow, opening an anonymous one if necessary.
    pub(crate) fn ensure_flow(&mut self) -> BoxId {
        if let Some(flow) = self.flow {
            flow
        } else {
            let style = self.stack.current_flow_style();
            let halign = self.stack.current_halign();
            self.new_flow(style, halign, None)
        }
    }

    /// The resolved font style for new text, including the link styling.
    pub(crate) fn current_font(&self) -> FontStyle {
        let base = self.stack.current_flow_style().base_font();
        let mut font = self.stack.current_font(base);
        if self.stack.current_link().is_some() {
            font.underline = true;
        }
        font
    }

    /// The resolved color for new text.
    pub(crate) fn current_color(&self) -> ColorValue {
        if self.stack.current_link().is_some() {
            self.stack.current_color(self.link_color)
        } else {
            self.stack.current_color(self.text_color)
        }
    }

    /// Insert a run of document text into the open flow, cutting a new
    /// text box with the currently resolved style.
    pub(crate) fn insert_text(&mut self, text: &str) {
        let flow = self.ensure_flow();
        // A flow never begins with a collapsible space.
        let text = if self.tree.children(flow).is_empty() {
            text.trim_start_matches(' ')
        } else {
            text
        };
        if text.is_empty() {
            return;
        }
        let style = self.current_font();
        let color = self.current_color();
        let link = self.stack.current_link().map(str::to_string);
        let node = self.tree.alloc(BoxKind::Text(TextBox {
            text: text.to_string(),
            style,
            color,
            link,
            segments: Vec::new(),
        }));
        self.tree.append_child(flow, node);
    }

    /// Insert an inline box (image, form control, anchor, break) into the
    /// open flow.
    pub(crate) fn insert_inline(&mut self, node: BoxId) {
        let flow = self.ensure_flow();
        self.tree.append_child(flow, node);
    }

    /// Append a block-level box (rule, table) to the current container,
    /// closing the open flow first.
    pub(crate) fn append_block(&mut self, node: BoxId) {
        self.close_flow();
        let container = self.current_container();
        self.tree.append_child(container, node);
    }

    /// Run one frame's exit action. Each action is idempotent per frame
    /// because frames run it exactly once, on pop.
    pub(crate) fn run_exit(&mut self, exit: ExitAction) {
        match exit {
            ExitAction::None => {}
            ExitAction::CloseFlow => self.close_flow(),
            ExitAction::EndList | ExitAction::EndGlossary => {
                let _ = self.lists.pop();
                self.close_flow();
            }
            ExitAction::EndCell => {
                self.close_flow();
                self.pop_container();
                if let Some(context) = self.tables.last_mut() {
                    context.cell_open = false;
                }
            }
            ExitAction::EndCaption => {
                self.close_flow();
                self.pop_container();
            }
            ExitAction::EndTable => {
                let _ = self.tables.pop();
                self.flow = None;
            }
            ExitAction::EndSelect => {
                self.forms.finish_option(&mut self.tree);
                self.forms.select = None;
                self.forms.form_text.clear();
            }
            ExitAction::EndTextArea => {
                self.forms.finish_textarea(&mut self.tree);
            }
            ExitAction::EndForm => {
                self.forms.current = None;
            }
        }
    }

    /// Finalize `<title>` capture and emit the event.
    pub(crate) fn finish_title(&mut self) {
        if let Some(raw) = self.title_capture.take() {
            let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            self.title = Some(title.clone());
            self.events.push_back(EngineEvent::TitleChanged(title));
        }
    }

    // ------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------

    /// Ask the host for an embedded resource, binding the answer to a
    /// waiting image box.
    pub(crate) fn request_resource(&mut self, url: &str, target: BoxId) -> ResourceId {
        self.next_resource += 1;
        let id = self.next_resource;
        let _ = self.bindings.insert(
            id,
            ResourceBinding {
                url: url.to_string(),
                data: Vec::new(),
                targets: vec![target],
                closed: false,
            },
        );
        self.events.push_back(EngineEvent::ResourceRequested {
            url: url.to_string(),
            id: ResourceId(id),
        });
        ResourceId(id)
    }

    /// Host: append bytes to a requested resource stream.
    ///
    /// # Errors
    /// [`EngineError::UnknownResource`] for an id the engine never
    /// issued; [`EngineError::StreamClosed`] after `resource_end`.
    pub fn resource_write(&mut self, id: ResourceId, bytes: &[u8]) -> Result<(), EngineError> {
        let binding = self
            .bindings
            .get_mut(&id.0)
            .ok_or(EngineError::UnknownResource(id.0))?;
        if binding.closed {
            return Err(EngineError::StreamClosed);
        }
        binding.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Host: finish a resource stream. On success the bytes are decoded
    /// and the waiting image boxes pick up their intrinsic size; on
    /// error (or undecodable data) the placeholder stays.
    ///
    /// # Errors
    /// [`EngineError::UnknownResource`] for an id the engine never issued.
    pub fn resource_end(&mut self, id: ResourceId, status: StreamStatus) -> Result<(), EngineError> {
        let binding = self
            .bindings
            .get_mut(&id.0)
            .ok_or(EngineError::UnknownResource(id.0))?;
        binding.closed = true;
        if status == StreamStatus::Error {
            warn_once("Engine", &format!("resource '{}' failed; keeping placeholder", binding.url));
            return Ok(());
        }
        let Some(loaded) = LoadedImage::decode(&binding.data) else {
            warn_once("Engine", &format!("could not decode resource '{}'", binding.url));
            return Ok(());
        };
        let dimensions = (loaded.width(), loaded.height());
        let targets = binding.targets.clone();
        let url = binding.url.clone();
        let _ = self.images.insert(url, loaded);
        for target in targets {
            if let BoxKind::Image(image) = self.tree.kind_mut(target) {
                image.intrinsic = Some(dimensions);
            }
        }
        self.layout_pending = true;
        Ok(())
    }

    /// Decoded images keyed by `src`, for the rasterizer.
    #[must_use]
    pub const fn images(&self) -> &HashMap<String, LoadedImage> {
        &self.images
    }

    // ------------------------------------------------------------------
    // Events, layout, drawing
    // ------------------------------------------------------------------

    /// Drain the queued navigation/semantic events.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Report a viewport width change; schedules a reflow.
    pub fn set_viewport_width(&mut self, width: f32) {
        if (width - self.viewport_width).abs() > 0.01 {
            self.viewport_width = width.max(1.0);
            self.layout_pending = true;
        }
    }

    /// Replace the font metrics used for layout (the rasterizer installs
    /// its font-backed metrics here so layout agrees with rendering).
    pub fn set_metrics(&mut self, metrics: Box<dyn FontMetrics>) {
        self.metrics = metrics;
        self.layout_pending = true;
    }

    /// Run the pending layout pass at the current viewport width.
    pub fn relayout(&mut self) {
        vellum_layout::layout(&mut self.tree, self.root, self.viewport_width, self.metrics.as_ref());
        self.layout_pending = false;
    }

    /// True if a layout pass has been requested and not yet run.
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        self.layout_pending
    }

    /// Draw the document region `clip` (viewport coordinates) at the
    /// given scroll offsets. The host invokes this from its paint path.
    pub fn draw(&self, painter: &mut dyn Painter, clip: Rect, scroll_x: f32, scroll_y: f32) {
        painter.begin(clip);
        vellum_layout::draw(&self.tree, self.root, painter, &clip, -scroll_x, -scroll_y);
        painter.end();
    }

    /// Total laid-out document height.
    #[must_use]
    pub fn document_height(&self) -> f32 {
        self.tree.geometry(self.root).height()
    }

    /// The link target under a document-space point, if any. Hit testing
    /// walks laid-out text segments, so run layout first.
    #[must_use]
    pub fn link_at(&self, x: f32, y: f32) -> Option<&str> {
        self.link_at_node(self.root, x, y)
    }

    fn link_at_node(&self, id: BoxId, x: f32, y: f32) -> Option<&str> {
        let geometry = self.tree.geometry(id);
        let local_x = x - geometry.x;
        let local_y = y - geometry.y;
        if let BoxKind::Text(t) = self.tree.kind(id) {
            let link = t.link.as_deref()?;
            let ascent = t.style.size_px();
            for segment in &t.segments {
                let hit = local_x >= segment.x
                    && local_x <= segment.x + segment.width
                    && local_y >= segment.baseline - ascent
                    && local_y <= segment.baseline + 4.0;
                if hit {
                    return Some(link);
                }
            }
            return None;
        }
        for &child in self.tree.children(id) {
            if let Some(link) = self.link_at_node(child, local_x, local_y) {
                return Some(link);
            }
        }
        None
    }

    /// Activate whatever link sits under a document-space point, queueing
    /// the navigation event for the host. Returns true if a link was hit.
    pub fn activate_link_at(&mut self, x: f32, y: f32) -> bool {
        let Some(url) = self.link_at(x, y).map(str::to_string) else {
            return false;
        };
        self.events.push_back(EngineEvent::LinkActivated { url });
        true
    }

    /// Submit a form by index: encodes the body and queues the event.
    pub fn submit_form(&mut self, form_index: usize) {
        let Some(form) = self.forms.forms.get(form_index) else {
            return;
        };
        let body = self.forms.encode_body(&self.tree, form_index);
        self.events.push_back(EngineEvent::FormSubmitted {
            method: form.method.clone(),
            action: form.action.clone(),
            body,
        });
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// The box tree (read-only).
    #[must_use]
    pub const fn tree(&self) -> &BoxTree {
        &self.tree
    }

    /// The document root clue.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        self.root
    }

    /// Open element tags, bottom to top (debugging, tests).
    #[must_use]
    pub fn open_elements(&self) -> Vec<&str> {
        self.stack.open_tags()
    }

    /// The document title, once seen.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The parsed form list.
    #[must_use]
    pub const fn forms(&self) -> &FormState {
        &self.forms
    }

    /// The current viewport width.
    #[must_use]
    pub const fn viewport_width(&self) -> f32 {
        self.viewport_width
    }
}
