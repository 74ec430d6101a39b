//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never touches the browser or a clock
//! itself. It returns `Action`s and the host executes them: writing the URL
//! through its history API and arranging for an [`Event::Tick`](super::Event::Tick)
//! to arrive after the requested delay.

use crate::query::QueryString;
use std::time::Duration;

/// Commands for the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the current URL's query without adding a history entry.
    ///
    /// The host will usually report the change back as
    /// [`Event::UrlChanged`](super::Event::UrlChanged); that echo is
    /// recognized and dropped.
    ReplaceUrl(QueryString),

    /// Deliver an [`Event::Tick`](super::Event::Tick) after this delay.
    ///
    /// Used to flush a debounced URL write. Extra ticks are harmless.
    ScheduleTick(Duration),
}
