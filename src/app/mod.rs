//! Application layer coordinating state, events, and actions.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! Gesture / URL change → Event → handle_event → FilterStore → evaluate
//!                                      │                          │
//!                                      ▼                          ▼
//!                              Action::ReplaceUrl          compute_viewmodel
//! ```
//!
//! The URL is a projection of the store. It is read back only on cold load
//! ([`AppState::from_url`]) and on navigation ([`Event::UrlChanged`]).
//!
//! # Modules
//!
//! - [`actions`]: side effects for the host
//! - [`debounce`]: deferred URL writes for range sliders
//! - [`handler`]: event processing
//! - [`state`]: the state container and view model computation
//! - [`store`]: filter state mutations and change notification
//! - [`sync`]: store/URL loop prevention

pub mod actions;
pub mod debounce;
pub mod handler;
pub mod state;
pub mod store;
pub mod sync;

pub use actions::Action;
pub use debounce::{DebounceState, Debouncer};
pub use handler::{handle_event, Event};
pub use state::AppState;
pub use store::{ChangeOrigin, FilterStore, Subscriber, SubscriptionId};
pub use sync::{Inbound, SyncPhase, UrlSync};
