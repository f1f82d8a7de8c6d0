//! Capabilities the core asks the shell to perform on its behalf.
//!
//! HTTP goes through `crux_http`, rendering through Crux's built-in `Render`;
//! `Timer` is our own.

mod fetch;
mod timer;

pub use self::fetch::{classify, get_json, FetchError, FetchOutcome, HttpOutcome, REQUEST_ID_HEADER};
pub use self::timer::{Timer, TimerOperation, TimerOutput};
pub use crux_core::render::Render;
pub use crux_http::Http;

// The Effect derive resolves the event type through `App`.
#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

// Field types must stay spelled out as `Capability<Event>`: the derive names
// each `Effect` variant after the capability type.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub timer: Timer<Event>,
    pub render: Render<Event>,
}
