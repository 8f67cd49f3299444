//! Session-backed models for the storefront.

pub mod session;

pub use session::keys as session_keys;
pub use session::{load_mirror, load_signal, reset_mirror, save_mirror, save_signal};
