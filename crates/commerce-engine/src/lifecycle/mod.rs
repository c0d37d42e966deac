//! # Session Lifecycle
//!
//! Starting, wiring and stopping the store actors for one shopping session.
//!
//! [`ShopSession::start`] creates every actor, injects its context at `run`
//! time (storage for the cart, loyalty and favorites actors; nothing for the
//! rest), loads the catalog and rebuilds the cart from storage.
//! [`ShopSession::shutdown`] drops every client, which closes the actor
//! channels, and then awaits each actor task.
//!
//! The store dependency graph is acyclic: only clients hold other clients,
//! actors never do, so channel closure is enough to stop everything.

pub mod session;

pub use session::*;
