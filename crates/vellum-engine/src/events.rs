//! Navigation and semantic events the engine emits toward the host.
//!
//! The engine never performs navigation, network I/O, or form submission
//! itself; it queues these events and the host drains them with
//! [`crate::Engine::take_events`].

/// Identifier of a resource stream the engine asked the host to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u64);

/// One event queued for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `<title>` content became known.
    TitleChanged(String),
    /// `<base href>` was seen.
    BaseUrlChanged(String),
    /// `<base target>` was seen.
    BaseTargetChanged(String),
    /// The stream ended and parsing finished.
    LoadDone,
    /// A link was activated (via [`crate::Engine::activate_link_at`]).
    LinkActivated {
        /// The link target as written in the document.
        url: String,
    },
    /// A form was submitted (via [`crate::Engine::submit_form`]).
    FormSubmitted {
        /// HTTP method, lowercased (`get`/`post`).
        method: String,
        /// The form action URL.
        action: String,
        /// `application/x-www-form-urlencoded` body.
        body: String,
    },
    /// `<meta http-equiv=refresh>` asked for a timed redirect.
    RedirectRequested {
        /// Target URL (empty = reload).
        url: String,
        /// Seconds to wait.
        delay_seconds: u32,
    },
    /// An `<object>`/`<applet>`/`<embed>`/`<iframe>` wants an external
    /// renderer; a placeholder box stands in until the host supplies one.
    ObjectRequested {
        /// The class id / source the object named.
        classid: String,
    },
    /// An embedded resource (image) is needed. The host answers through
    /// [`crate::Engine::resource_write`] / [`crate::Engine::resource_end`],
    /// or ignores it and the placeholder remains.
    ResourceRequested {
        /// The resource URL as written in the document.
        url: String,
        /// Stream id for the answer.
        id: ResourceId,
    },
}
