//! Page rendering
//!
//! `view` is plain data and testable natively; `dom` writes it into the page.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod view;

pub use view::{ItemView, RankingView};
