//! The tag dispatch table and per-tag handlers.
//!
//! One compile-time `match` maps each lowercase tag name to its handler;
//! there is no runtime-built table. Unknown open tags are ignored
//! silently (forward compatibility with unsupported markup); unknown
//! close tags fall through to the generic pop-by-name handler. A handler
//! that cannot find its expected context (`<option>` outside a select,
//! `<td>` outside a table) simply returns without creating nodes, so
//! malformed documents degrade to partial rendering instead of failing.

use vellum_common::warning::warn_once;
use vellum_html::{LengthAttr, ParsedTag, Token};
use vellum_layout::style::{
    Clear, ColorValue, DisplayClass, FloatSide, FlowStyle, HAlign, Length, VAlign,
};
use vellum_layout::tree::{
    AnchorBox, BoxKind, BreakBox, CellBox, FormControlBox, FormControlKind, ImageBox, ListMarker,
    RuleBox, TableBox,
};

use crate::engine::{Engine, ListContext, ListKind, NumberStyle, TableContext};
use crate::events::EngineEvent;
use crate::forms::PendingOption;
use crate::stack::{ElementFrame, ExitAction};

/// Dispatch one tag token.
pub(crate) fn dispatch_tag(engine: &mut Engine, token: &Token) {
    let Token::Tag(raw) = token else { return };
    let Some(tag) = ParsedTag::parse(raw) else {
        warn_once("HTML", "ignoring tag with no name");
        return;
    };

    // A bounded <title> scan consumes everything up to one of its
    // terminators; other markup inside the title is ignored outright.
    if engine.title_capture.is_some() {
        match (tag.name.as_str(), tag.is_close) {
            ("title", true) => {
                engine.finish_title();
                return;
            }
            ("head", true) | ("body", false) => engine.finish_title(),
            _ => return,
        }
    }

    // While a <textarea> or <select> body is being captured, only its own
    // scaffolding tags mean anything.
    if engine.forms.textarea.is_some() && !(tag.is_close && tag.name == "textarea") {
        return;
    }
    if engine.forms.select.is_some()
        && !matches!(tag.name.as_str(), "option" | "select" | "optgroup")
    {
        return;
    }

    if tag.is_close {
        dispatch_close(engine, &tag);
    } else {
        dispatch_open(engine, &tag);
    }
}

fn dispatch_open(engine: &mut Engine, tag: &ParsedTag) {
    match tag.name.as_str() {
        // Inline formatting spans.
        "b" | "strong" => push_font(engine, tag, |f| f.bold = true),
        "i" | "em" | "cite" | "var" | "dfn" => push_font(engine, tag, |f| f.italic = true),
        "u" => push_font(engine, tag, |f| f.underline = true),
        "tt" | "code" | "kbd" | "samp" => push_font(engine, tag, |f| f.fixed = true),
        "s" | "strike" => push_font(engine, tag, |f| f.strikeout = true),
        "big" => push_sized(engine, tag, 1),
        "small" => push_sized(engine, tag, -1),
        "sub" => push_font(engine, tag, |f| f.subscript = true),
        "sup" => push_font(engine, tag, |f| f.superscript = true),
        "span" => engine.stack.push(ElementFrame::new("span", DisplayClass::Inline)),
        "font" => open_font(engine, tag),
        "a" => open_anchor(engine, tag),

        // Line structure.
        "br" => open_break(engine, tag),
        "p" => open_paragraph(engine, tag, "p", FlowStyle::Normal),
        "div" => open_paragraph(engine, tag, "div", FlowStyle::Normal),
        "center" => open_center(engine),
        "address" => open_paragraph(engine, tag, "address", FlowStyle::Address),
        "pre" => open_pre(engine),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => open_heading(engine, tag),
        "blockquote" => open_blockquote(engine),
        "hr" => open_rule(engine, tag),

        // Lists.
        "ul" | "dir" | "menu" => open_list(engine, tag, ListKind::Unordered),
        "ol" => open_ordered_list(engine, tag),
        "dl" => open_glossary(engine),
        "li" => open_list_item(engine, tag),
        "dt" => open_definition_term(engine),
        "dd" => open_definition_body(engine),

        // Tables.
        "table" => open_table(engine, tag),
        "tr" => open_table_row(engine, tag),
        "td" => open_table_cell(engine, tag, false),
        "th" => open_table_cell(engine, tag, true),
        "caption" => open_caption(engine, tag),

        // Forms.
        "form" => open_form(engine, tag),
        "input" => open_input(engine, tag),
        "select" => open_select(engine, tag),
        "option" => open_option(engine, tag),
        "textarea" => open_textarea(engine, tag),
        "button" => open_button(engine, tag),

        // Document metadata and structure.
        "title" => engine.title_capture = Some(String::new()),
        "base" => open_base(engine, tag),
        "meta" => open_meta(engine, tag),
        "body" => open_body(engine, tag),
        "img" => open_image(engine, tag),
        "object" | "applet" | "embed" | "iframe" | "frame" => open_object(engine, tag),

        // Tokenizer already suppressed their content; nothing to build.
        "html" | "head" | "script" | "style" | "noscript" | "noframes" | "map" | "area"
        | "link" | "basefont" | "frameset" => {}

        // Unknown open tags are silently ignored.
        _ => {}
    }
}

fn dispatch_close(engine: &mut Engine, tag: &ParsedTag) {
    match tag.name.as_str() {
        // Closing any heading closes whichever heading level is actually
        // open; authors frequently mismatch levels.
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let open = engine
                .stack
                .nearest_of(&["h1", "h2", "h3", "h4", "h5", "h6"])
                .map(str::to_string);
            if let Some(open) = open {
                pop_and_run(engine, &open);
            }
        }
        "tr" => close_table_row(engine),
        "li" | "dt" | "dd" => engine.close_flow(),
        "option" => engine.forms.finish_option(&mut engine.tree),
        "body" | "html" => engine.close_flow(),
        // Everything else, known or not, is the generic pop-by-name.
        name => pop_and_run(engine, name),
    }
}

/// Pop a named element per the asymmetric stack rule and run the exit
/// actions of everything that came off.
fn pop_and_run(engine: &mut Engine, name: &str) {
    let removed = engine.stack.pop_named(name);
    for frame in removed {
        engine.run_exit(frame.exit);
    }
}

// ----------------------------------------------------------------------
// Inline spans
// ----------------------------------------------------------------------

/// Push an inline frame whose font is the current style plus one change.
fn push_font(engine: &mut Engine, tag: &ParsedTag, change: impl FnOnce(&mut vellum_layout::style::FontStyle)) {
    let mut font = engine.current_font();
    change(&mut font);
    let mut frame = ElementFrame::new(&tag.name, DisplayClass::Inline);
    frame.font = Some(font);
    engine.stack.push(frame);
}

fn push_sized(engine: &mut Engine, tag: &ParsedTag, delta: i32) {
    let font = engine.current_font().with_size_delta(delta);
    let mut frame = ElementFrame::new(&tag.name, DisplayClass::Inline);
    frame.font = Some(font);
    engine.stack.push(frame);
}

fn open_font(engine: &mut Engine, tag: &ParsedTag) {
    let mut font = engine.current_font();
    if let Some((value, relative)) = tag.get_i32("size") {
        font = if relative {
            font.with_size_delta(value)
        } else {
            font.with_size(value)
        };
    }
    let mut frame = ElementFrame::new("font", DisplayClass::Inline);
    frame.font = Some(font);
    frame.color = tag.get("color").and_then(ColorValue::from_attribute);
    engine.stack.push(frame);
}

fn open_anchor(engine: &mut Engine, tag: &ParsedTag) {
    if let Some(name) = tag.get("name") {
        if !name.is_empty() {
            let anchor = engine.tree.alloc(BoxKind::Anchor(AnchorBox {
                name: name.to_string(),
            }));
            engine.insert_inline(anchor);
        }
    }
    let mut frame = ElementFrame::new("a", DisplayClass::Inline);
    if let Some(href) = tag.get("href") {
        if !href.is_empty() {
            frame.link = Some(href.to_string());
        }
    }
    engine.stack.push(frame);
}

// ----------------------------------------------------------------------
// Blocks
// ----------------------------------------------------------------------

fn open_break(engine: &mut Engine, tag: &ParsedTag) {
    let clear = tag.get("clear").map_or(Clear::None, Clear::from_attribute);
    let node = engine.tree.alloc(BoxKind::Break(BreakBox { clear }));
    engine.insert_inline(node);
}

fn open_paragraph(engine: &mut Engine, tag: &ParsedTag, name: &str, style: FlowStyle) {
    engine.close_flow();
    let mut frame = ElementFrame::new(name, DisplayClass::Block);
    frame.halign = tag.get("align").map(HAlign::from_attribute);
    frame.flow_style = Some(style);
    frame.exit = ExitAction::CloseFlow;
    engine.stack.push(frame);
    let halign = engine.stack.current_halign();
    let _ = engine.new_flow(style, halign, None);
}

fn open_center(engine: &mut Engine) {
    engine.close_flow();
    let mut frame = ElementFrame::new("center", DisplayClass::Block);
    frame.halign = Some(HAlign::Center);
    frame.exit = ExitAction::CloseFlow;
    engine.stack.push(frame);
}

fn open_pre(engine: &mut Engine) {
    engine.close_flow();
    let mut frame = ElementFrame::new("pre", DisplayClass::Block);
    frame.flow_style = Some(FlowStyle::Pre);
    frame.font = Some(FlowStyle::Pre.base_font());
    frame.exit = ExitAction::CloseFlow;
    engine.stack.push(frame);
    let _ = engine.new_flow(FlowStyle::Pre, HAlign::None, None);
}

fn open_heading(engine: &mut Engine, tag: &ParsedTag) {
    let level = tag.name.as_bytes()[1] - b'0';
    let style = FlowStyle::Heading(level);
    engine.close_flow();
    let mut frame = ElementFrame::new(&tag.name, DisplayClass::Block);
    frame.halign = tag.get("align").map(HAlign::from_attribute);
    frame.flow_style = Some(style);
    frame.font = Some(style.base_font());
    frame.exit = ExitAction::CloseFlow;
    engine.stack.push(frame);
    let halign = engine.stack.current_halign();
    let _ = engine.new_flow(style, halign, None);
}

fn open_blockquote(engine: &mut Engine) {
    engine.close_flow();
    let mut frame = ElementFrame::new("blockquote", DisplayClass::Block);
    frame.indent_delta = 1;
    frame.exit = ExitAction::CloseFlow;
    engine.stack.push(frame);
}

fn open_rule(engine: &mut Engine, tag: &ParsedTag) {
    let size = tag.get_u32("size", 100).unwrap_or(2) as f32;
    let length = tag.get_length("width").map(to_length);
    let halign = tag.get("align").map_or(HAlign::None, HAlign::from_attribute);
    let noshade = tag.has("noshade");
    let node = engine.tree.alloc(BoxKind::Rule(RuleBox {
        size,
        length,
        halign,
        noshade,
    }));
    engine.append_block(node);
}

// ----------------------------------------------------------------------
// Lists
// ----------------------------------------------------------------------

fn open_list(engine: &mut Engine, tag: &ParsedTag, kind: ListKind) {
    engine.close_flow();
    engine.lists.push(ListContext { kind, counter: 1 });
    let mut frame = ElementFrame::new(&tag.name, DisplayClass::Block);
    frame.indent_delta = 1;
    frame.exit = ExitAction::EndList;
    engine.stack.push(frame);
}

fn open_ordered_list(engine: &mut Engine, tag: &ParsedTag) {
    engine.close_flow();
    let style = match tag.get("type") {
        Some("a") => NumberStyle::LowerAlpha,
        Some("A") => NumberStyle::UpperAlpha,
        Some("i") => NumberStyle::LowerRoman,
        Some("I") => NumberStyle::UpperRoman,
        _ => NumberStyle::Decimal,
    };
    let start = tag.get_u32("start", i32::MAX as u32).map_or(1, |v| v as i32);
    engine.lists.push(ListContext {
        kind: ListKind::Ordered(style),
        counter: start,
    });
    let mut frame = ElementFrame::new("ol", DisplayClass::Block);
    frame.indent_delta = 1;
    frame.exit = ExitAction::EndList;
    engine.stack.push(frame);
}

fn open_glossary(engine: &mut Engine) {
    engine.close_flow();
    engine.lists.push(ListContext {
        kind: ListKind::Glossary,
        counter: 1,
    });
    let mut frame = ElementFrame::new("dl", DisplayClass::Block);
    frame.exit = ExitAction::EndGlossary;
    engine.stack.push(frame);
}

fn open_list_item(engine: &mut Engine, tag: &ParsedTag) {
    // An <li> outside any list still renders, as a top-level bullet.
    let depth = engine.lists.len().max(1);
    if let Some(value) = tag.get_u32("value", i32::MAX as u32) {
        if let Some(context) = engine.lists.last_mut() {
            context.counter = value as i32;
        }
    }
    let marker = match engine.lists.last().copied() {
        Some(ListContext {
            kind: ListKind::Ordered(style),
            counter,
        }) => {
            if let Some(context) = engine.lists.last_mut() {
                context.counter += 1;
            }
            format_item_number(counter, style)
        }
        _ => bullet_for_depth(depth).to_string(),
    };
    engine.close_flow();
    // An item flow outside any list frame still needs its gutter.
    let flow = engine.new_flow(FlowStyle::ListItem, HAlign::None, Some(ListMarker { text: marker }));
    if engine.lists.is_empty() {
        if let BoxKind::Flow(f) = engine.tree.kind_mut(flow) {
            f.indent = f.indent.max(1);
        }
    }
}

fn open_definition_term(engine: &mut Engine) {
    engine.close_flow();
    let _ = engine.new_flow(FlowStyle::Normal, HAlign::None, None);
}

fn open_definition_body(engine: &mut Engine) {
    engine.close_flow();
    let flow = engine.new_flow(FlowStyle::Normal, HAlign::None, None);
    if let BoxKind::Flow(f) = engine.tree.kind_mut(flow) {
        f.indent = f.indent.saturating_add(1);
    }
}

/// Bullet glyphs by nesting depth, cycling like the legacy defaults
/// (disc, circle, square).
fn bullet_for_depth(depth: usize) -> &'static str {
    match (depth - 1) % 3 {
        0 => "\u{2022}",
        1 => "\u{25E6}",
        _ => "\u{25AA}",
    }
}

fn format_item_number(value: i32, style: NumberStyle) -> String {
    if value < 1 {
        return format!("{value}.");
    }
    match style {
        NumberStyle::Decimal => format!("{value}."),
        NumberStyle::LowerAlpha => format!("{}.", to_alpha(value, b'a')),
        NumberStyle::UpperAlpha => format!("{}.", to_alpha(value, b'A')),
        NumberStyle::LowerRoman => format!("{}.", to_roman(value).to_lowercase()),
        NumberStyle::UpperRoman => format!("{}.", to_roman(value)),
    }
}

fn to_alpha(mut value: i32, base: u8) -> String {
    let mut out = Vec::new();
    while value > 0 {
        value -= 1;
        out.push(base + (value % 26) as u8);
        value /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn to_roman(mut value: i32) -> String {
    const TABLE: [(i32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (amount, digits) in TABLE {
        while value >= amount {
            out.push_str(digits);
            value -= amount;
        }
    }
    out
}

// ----------------------------------------------------------------------
// Tables
// ----------------------------------------------------------------------

fn open_table(engine: &mut Engine, tag: &ParsedTag) {
    // A new <table> while a row dangles without a cell implicitly closes
    // that row first.
    if let Some(context) = engine.tables.last_mut() {
        if context.row_open && !context.cell_open {
            context.row_open = false;
        }
    }

    // A bare `border` attribute means 1; an explicit `border=0` stays 0.
    let border = if tag.has("border") {
        tag.get_u32("border", 50).unwrap_or(1) as f32
    } else {
        0.0
    };
    let spacing = tag.get_u32("cellspacing", 100).unwrap_or(2) as f32;
    let padding = tag.get_u32("cellpadding", 100).unwrap_or(1) as f32;
    let width = tag.get_length("width");
    let bgcolor = tag.get("bgcolor").and_then(ColorValue::from_attribute);

    let node = engine.tree.alloc(BoxKind::Table(TableBox {
        border,
        spacing,
        padding,
        width_attr: width.map(to_length),
        bgcolor,
        ..Default::default()
    }));
    if let Some(LengthAttr::Percent(pct)) = width {
        engine.tree.geometry_mut(node).percent = Some(pct);
    }
    engine.append_block(node);
    engine.tables.push(TableContext {
        table: node,
        row_open: false,
        cell_open: false,
    });

    let mut frame = ElementFrame::new("table", DisplayClass::Table);
    frame.exit = ExitAction::EndTable;
    engine.stack.push(frame);
}

fn open_table_row(engine: &mut Engine, tag: &ParsedTag) {
    let Some(context) = engine.tables.last().copied() else {
        return;
    };
    if context.cell_open {
        let removed = engine.stack.pop_through_exit(ExitAction::EndCell);
        for frame in removed {
            engine.run_exit(frame.exit);
        }
    }
    if let BoxKind::Table(t) = engine.tree.kind_mut(context.table) {
        t.grid.start_row();
    }
    if let Some(context) = engine.tables.last_mut() {
        context.row_open = true;
    }
    let mut frame = ElementFrame::new("tr", DisplayClass::TableRow);
    frame.halign = tag.get("align").map(HAlign::from_attribute);
    frame.valign = tag.get("valign").map(VAlign::from_attribute);
    engine.stack.push(frame);
}

fn close_table_row(engine: &mut Engine) {
    let Some(context) = engine.tables.last().copied() else {
        return;
    };
    if context.cell_open {
        let removed = engine.stack.pop_through_exit(ExitAction::EndCell);
        for frame in removed {
            engine.run_exit(frame.exit);
        }
    }
    pop_and_run(engine, "tr");
    if let Some(context) = engine.tables.last_mut() {
        context.row_open = false;
    }
}

fn open_table_cell(engine: &mut Engine, tag: &ParsedTag, heading: bool) {
    let Some(context) = engine.tables.last().copied() else {
        // A cell outside any table creates nothing.
        return;
    };
    if context.cell_open {
        let removed = engine.stack.pop_through_exit(ExitAction::EndCell);
        for frame in removed {
            engine.run_exit(frame.exit);
        }
    }
    // A missing <tr> before the first cell is tolerated by synthesizing
    // one.
    if !engine.tables.last().is_some_and(|c| c.row_open) {
        if let BoxKind::Table(t) = engine.tree.kind_mut(context.table) {
            t.grid.start_row();
        }
        if let Some(context) = engine.tables.last_mut() {
            context.row_open = true;
        }
    }

    let rowspan = tag.get_u32("rowspan", 1000).unwrap_or(1);
    let colspan = tag.get_u32("colspan", 1000).unwrap_or(1);
    let valign = tag
        .get("valign")
        .map_or_else(|| engine.stack.current_valign(), VAlign::from_attribute);
    let cell = engine.tree.alloc(BoxKind::TableCell(CellBox {
        rowspan,
        colspan,
        width_attr: tag.get_length("width").map(to_length),
        nowrap: tag.has("nowrap"),
        bgcolor: tag.get("bgcolor").and_then(ColorValue::from_attribute),
        heading,
        valign,
        bevel: 0.0,
    }));
    engine.tree.append_child(context.table, cell);
    if let BoxKind::Table(t) = engine.tree.kind_mut(context.table) {
        let _ = t.grid.add_cell(cell, rowspan, colspan);
    }
    if let Some(context) = engine.tables.last_mut() {
        context.cell_open = true;
    }
    engine.push_container(cell);

    let mut frame = ElementFrame::new(&tag.name, DisplayClass::TableCell);
    if heading {
        let mut font = vellum_layout::style::FontStyle::DEFAULT;
        font.bold = true;
        frame.font = Some(font);
        frame.halign = Some(HAlign::Center);
    }
    if let Some(align) = tag.get("align") {
        frame.halign = Some(HAlign::from_attribute(align));
    }
    frame.valign = Some(valign);
    frame.exit = ExitAction::EndCell;
    engine.stack.push(frame);
}

fn open_caption(engine: &mut Engine, tag: &ParsedTag) {
    let Some(context) = engine.tables.last().copied() else {
        return;
    };
    let clue = engine
        .tree
        .alloc(BoxKind::ClueV(vellum_layout::tree::ClueVBox::default()));
    engine.tree.node_mut(clue).parent = Some(context.table);
    let at_bottom = tag
        .get("align")
        .is_some_and(|a| a.eq_ignore_ascii_case("bottom"));
    if let BoxKind::Table(t) = engine.tree.kind_mut(context.table) {
        t.caption = Some(clue);
        t.caption_at_bottom = at_bottom;
    }
    engine.push_container(clue);

    let mut frame = ElementFrame::new("caption", DisplayClass::TableCaption);
    frame.halign = Some(HAlign::Center);
    frame.exit = ExitAction::EndCaption;
    frame.misc1 = i32::from(at_bottom);
    engine.stack.push(frame);
}

// ----------------------------------------------------------------------
// Forms
// ----------------------------------------------------------------------

fn open_form(engine: &mut Engine, tag: &ParsedTag) {
    engine.close_flow();
    engine.forms.forms.push(crate::forms::FormInfo {
        action: tag.get("action").unwrap_or("").to_string(),
        method: tag
            .get("method")
            .unwrap_or("get")
            .to_ascii_lowercase(),
        controls: Vec::new(),
    });
    engine.forms.current = Some(engine.forms.forms.len() - 1);
    let mut frame = ElementFrame::new("form", DisplayClass::Block);
    frame.exit = ExitAction::EndForm;
    engine.stack.push(frame);
}

fn open_input(engine: &mut Engine, tag: &ParsedTag) {
    let kind = match tag.get("type").unwrap_or("text").to_ascii_lowercase().as_str() {
        "checkbox" => FormControlKind::Checkbox {
            checked: tag.has("checked"),
        },
        "radio" => FormControlKind::Radio {
            checked: tag.has("checked"),
        },
        "submit" | "image" => FormControlKind::Submit {
            label: tag.get("value").unwrap_or("Submit").to_string(),
        },
        "reset" => FormControlKind::Reset {
            label: tag.get("value").unwrap_or("Reset").to_string(),
        },
        "button" => FormControlKind::Button {
            label: tag.get("value").unwrap_or("").to_string(),
        },
        "hidden" => FormControlKind::Hidden,
        "password" => FormControlKind::TextInput {
            size: tag.get_u32("size", 1000).unwrap_or(20),
            password: true,
        },
        // Unknown input types degrade to plain text entry.
        _ => FormControlKind::TextInput {
            size: tag.get_u32("size", 1000).unwrap_or(20),
            password: false,
        },
    };
    let node = engine.tree.alloc(BoxKind::FormControl(FormControlBox {
        kind,
        name: tag.get("name").map(str::to_string),
        value: tag.get("value").unwrap_or("").to_string(),
        disabled: tag.has("disabled"),
    }));
    engine.forms.attach(node);
    engine.insert_inline(node);
}

fn open_select(engine: &mut Engine, tag: &ParsedTag) {
    let node = engine.tree.alloc(BoxKind::FormControl(FormControlBox {
        kind: FormControlKind::Select {
            options: Vec::new(),
            size: tag.get_u32("size", 100).unwrap_or(1),
            multiple: tag.has("multiple"),
        },
        name: tag.get("name").map(str::to_string),
        value: String::new(),
        disabled: tag.has("disabled"),
    }));
    engine.forms.attach(node);
    engine.insert_inline(node);
    engine.forms.select = Some(node);
    engine.forms.form_text.clear();

    let mut frame = ElementFrame::new("select", DisplayClass::Inline);
    frame.exit = ExitAction::EndSelect;
    engine.stack.push(frame);
}

fn open_option(engine: &mut Engine, tag: &ParsedTag) {
    // <option> outside a <select> creates nothing.
    if engine.forms.select.is_none() {
        return;
    }
    engine.forms.finish_option(&mut engine.tree);
    engine.forms.form_text.clear();
    engine.forms.option = Some(PendingOption {
        value: tag.get("value").map(str::to_string),
        selected: tag.has("selected"),
    });
}

fn open_textarea(engine: &mut Engine, tag: &ParsedTag) {
    let node = engine.tree.alloc(BoxKind::FormControl(FormControlBox {
        kind: FormControlKind::TextArea {
            rows: tag.get_u32("rows", 1000).unwrap_or(4),
            cols: tag.get_u32("cols", 1000).unwrap_or(40),
            text: String::new(),
        },
        name: tag.get("name").map(str::to_string),
        value: String::new(),
        disabled: tag.has("disabled"),
    }));
    engine.forms.attach(node);
    engine.insert_inline(node);
    engine.forms.textarea = Some(node);
    engine.forms.form_text.clear();

    let mut frame = ElementFrame::new("textarea", DisplayClass::Inline);
    frame.exit = ExitAction::EndTextArea;
    engine.stack.push(frame);
}

fn open_button(engine: &mut Engine, tag: &ParsedTag) {
    let node = engine.tree.alloc(BoxKind::FormControl(FormControlBox {
        kind: FormControlKind::Button {
            label: tag.get("value").unwrap_or("Button").to_string(),
        },
        name: tag.get("name").map(str::to_string),
        value: tag.get("value").unwrap_or("").to_string(),
        disabled: tag.has("disabled"),
    }));
    engine.forms.attach(node);
    engine.insert_inline(node);
}

// ----------------------------------------------------------------------
// Metadata, body, embedded content
// ----------------------------------------------------------------------

fn open_base(engine: &mut Engine, tag: &ParsedTag) {
    if let Some(href) = tag.get("href") {
        engine
            .events
            .push_back(EngineEvent::BaseUrlChanged(href.to_string()));
    }
    if let Some(target) = tag.get("target") {
        engine
            .events
            .push_back(EngineEvent::BaseTargetChanged(target.to_string()));
    }
}

/// `<meta http-equiv=refresh content="N; url=...">`.
fn open_meta(engine: &mut Engine, tag: &ParsedTag) {
    let Some(equiv) = tag.get("http-equiv") else {
        return;
    };
    if !equiv.eq_ignore_ascii_case("refresh") {
        return;
    }
    let content = tag.get("content").unwrap_or("");
    let mut parts = content.splitn(2, ';');
    let delay = parts
        .next()
        .and_then(|d| d.trim().parse::<u32>().ok())
        .unwrap_or(0);
    let url = parts
        .next()
        .and_then(|rest| {
            let rest = rest.trim();
            rest.to_ascii_lowercase()
                .find("url=")
                .map(|at| rest[at + 4..].trim().to_string())
        })
        .unwrap_or_default();
    engine.events.push_back(EngineEvent::RedirectRequested {
        url,
        delay_seconds: delay,
    });
}

fn open_body(engine: &mut Engine, tag: &ParsedTag) {
    if let Some(color) = tag.get("bgcolor").and_then(ColorValue::from_attribute) {
        let root = engine.root;
        if let BoxKind::ClueV(v) = engine.tree.kind_mut(root) {
            v.background = Some(color);
        }
    }
    if let Some(color) = tag.get("text").and_then(ColorValue::from_attribute) {
        engine.text_color = color;
    }
    if let Some(color) = tag.get("link").and_then(ColorValue::from_attribute) {
        engine.link_color = color;
    }
}

fn open_image(engine: &mut Engine, tag: &ParsedTag) {
    let Some(src) = tag.get("src").map(str::to_string) else {
        warn_once("HTML", "ignoring <img> without src");
        return;
    };
    let width = tag.get_length("width");
    let height = match tag.get_length("height") {
        Some(LengthAttr::Pixels(px)) => Some(px),
        // Percent heights never worked in this model; treat as auto.
        _ => None,
    };
    let float = tag.get("align").and_then(|a| match a.to_ascii_lowercase().as_str() {
        "left" => Some(FloatSide::Left),
        "right" => Some(FloatSide::Right),
        _ => None,
    });
    let node = engine.tree.alloc(BoxKind::Image(ImageBox {
        src: src.clone(),
        alt: tag.get("alt").unwrap_or("").to_string(),
        width_attr: width.map(to_length),
        height_attr: height,
        intrinsic: None,
        border: tag.get_u32("border", 50).unwrap_or(0) as f32,
        hspace: tag.get_u32("hspace", 200).unwrap_or(0) as f32,
        vspace: tag.get_u32("vspace", 200).unwrap_or(0) as f32,
        float,
    }));
    if let Some(LengthAttr::Percent(pct)) = width {
        engine.tree.geometry_mut(node).percent = Some(pct);
    }

    // Aligned images float only inside a vertical clue; cells and other
    // containers take them inline.
    let container = engine.current_container();
    if float.is_some() && matches!(engine.tree.kind(container), BoxKind::ClueV(_)) {
        engine.tree.add_float(container, node);
    } else {
        engine.insert_inline(node);
    }
    let _ = engine.request_resource(&src, node);
}

/// Embeddable objects: a placeholder box plus an object-requested event;
/// actual embedding is the host's concern.
fn open_object(engine: &mut Engine, tag: &ParsedTag) {
    let classid = tag
        .get("classid")
        .or_else(|| tag.get("src"))
        .or_else(|| tag.get("code"))
        .or_else(|| tag.get("data"))
        .unwrap_or("")
        .to_string();
    engine
        .events
        .push_back(EngineEvent::ObjectRequested { classid });

    let width = tag.get_length("width");
    let node = engine.tree.alloc(BoxKind::Image(ImageBox {
        src: String::new(),
        alt: tag.get("alt").unwrap_or("").to_string(),
        width_attr: width.map(to_length),
        height_attr: match tag.get_length("height") {
            Some(LengthAttr::Pixels(px)) => Some(px),
            _ => None,
        },
        intrinsic: None,
        border: 0.0,
        hspace: 0.0,
        vspace: 0.0,
        float: None,
    }));
    if let Some(LengthAttr::Percent(pct)) = width {
        engine.tree.geometry_mut(node).percent = Some(pct);
    }
    engine.insert_inline(node);
}

const fn to_length(attr: LengthAttr) -> Length {
    match attr {
        LengthAttr::Pixels(px) => Length::Pixels(px),
        LengthAttr::Percent(pct) => Length::Percent(pct),
    }
}
