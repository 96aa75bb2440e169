//! The game rules: classification, transition application, and the
//! flip protocol.
//!
//! Everything here is a pure function over a `Game` snapshot, which is
//! what lets the transaction runner replay a transition after a write
//! conflict.

pub mod apply;
pub mod classify;
pub mod flip;

pub use apply::{apply_submission, Applied};
pub use classify::{classify, Classification};
pub use flip::{flip_tile, FlipOutcome};
