//! Form state: the per-document form list, the option/textarea side
//! buffer, and submit-body encoding.
//!
//! `<option>` and `<textarea>` bodies accumulate in `form_text` rather
//! than through normal text insertion because their content is not laid
//! out as box-tree text; the dispatch layer routes text tokens here while
//! a capture is open.

use vellum_layout::tree::{BoxId, BoxKind, BoxTree, FormControlKind};

/// One `<form>` and the controls attached to it.
#[derive(Debug, Clone)]
pub struct FormInfo {
    /// The action URL.
    pub action: String,
    /// Lowercased method (`get` or `post`).
    pub method: String,
    /// Controls in document order.
    pub controls: Vec<BoxId>,
}

/// Pending `<option>` attributes while its body accumulates.
#[derive(Debug, Clone, Default)]
pub struct PendingOption {
    /// Explicit `value` attribute, if any.
    pub value: Option<String>,
    /// `selected` was present.
    pub selected: bool,
}

/// Per-document form state.
#[derive(Debug, Default)]
pub struct FormState {
    /// All forms seen, in document order.
    pub forms: Vec<FormInfo>,
    /// Index of the open form.
    pub current: Option<usize>,
    /// The open `<select>` control, if any.
    pub select: Option<BoxId>,
    /// The open `<textarea>` control, if any.
    pub textarea: Option<BoxId>,
    /// Side buffer for option/textarea body text.
    pub form_text: String,
    /// The option being accumulated, if any.
    pub option: Option<PendingOption>,
}

impl FormState {
    /// True while text tokens must route to the side buffer instead of
    /// the box tree.
    #[must_use]
    pub const fn capturing(&self) -> bool {
        self.select.is_some() || self.textarea.is_some()
    }

    /// Append captured text.
    pub fn push_text(&mut self, text: &str) {
        self.form_text.push_str(text);
    }

    /// Attach a control to the open form (controls outside any form still
    /// render, they just never submit).
    pub fn attach(&mut self, control: BoxId) {
        if let Some(index) = self.current {
            self.forms[index].controls.push(control);
        }
    }

    /// Finalize the pending option, if one is open, into the open select.
    pub fn finish_option(&mut self, tree: &mut BoxTree) {
        let Some(pending) = self.option.take() else {
            return;
        };
        let Some(select) = self.select else { return };
        let label = std::mem::take(&mut self.form_text).trim().to_string();
        let value = pending.value.unwrap_or_else(|| label.clone());
        if let BoxKind::FormControl(control) = tree.kind_mut(select) {
            if let FormControlKind::Select { options, .. } = &mut control.kind {
                options.push(vellum_layout::tree::SelectOption {
                    value,
                    label,
                    selected: pending.selected,
                });
            }
        }
    }

    /// Finalize the open textarea, if any, storing the captured body.
    pub fn finish_textarea(&mut self, tree: &mut BoxTree) {
        let Some(textarea) = self.textarea.take() else {
            return;
        };
        let body = std::mem::take(&mut self.form_text);
        // A leading newline directly after <textarea> is presentation,
        // not content.
        let body = body.strip_prefix('\n').unwrap_or(&body).to_string();
        if let BoxKind::FormControl(control) = tree.kind_mut(textarea) {
            if let FormControlKind::TextArea { text, .. } = &mut control.kind {
                *text = body;
            }
        }
    }

    /// Encode the submit body of one form as
    /// `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn encode_body(&self, tree: &BoxTree, form_index: usize) -> String {
        let Some(form) = self.forms.get(form_index) else {
            return String::new();
        };
        let mut pairs: Vec<(String, String)> = Vec::new();
        for &id in &form.controls {
            let BoxKind::FormControl(control) = tree.kind(id) else {
                continue;
            };
            let Some(name) = &control.name else { continue };
            if control.disabled {
                continue;
            }
            match &control.kind {
                FormControlKind::TextInput { .. } | FormControlKind::Hidden => {
                    pairs.push((name.clone(), control.value.clone()));
                }
                FormControlKind::Checkbox { checked } | FormControlKind::Radio { checked } => {
                    if *checked {
                        let value = if control.value.is_empty() {
                            "on".to_string()
                        } else {
                            control.value.clone()
                        };
                        pairs.push((name.clone(), value));
                    }
                }
                FormControlKind::Select { options, .. } => {
                    for option in options.iter().filter(|o| o.selected) {
                        pairs.push((name.clone(), option.value.clone()));
                    }
                }
                FormControlKind::TextArea { text, .. } => {
                    pairs.push((name.clone(), text.clone()));
                }
                // Buttons only submit when activated; a bulk submit
                // carries none of them.
                FormControlKind::Submit { .. }
                | FormControlKind::Reset { .. }
                | FormControlKind::Button { .. } => {}
            }
        }
        pairs
            .iter()
            .map(|(name, value)| format!("{}={}", url_encode(name), url_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode one form field component: space becomes `+`, and
/// everything outside the unreserved set becomes `%XX`.
#[must_use]
pub fn url_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}
