//! Error reporting
//!
//! Every stage has its own `thiserror` enum; [`MinifyError`] joins them and
//! [`ErrorPresenter`] turns one into a report with surrounding source lines.

pub mod error;
pub mod presenter;

#[cfg(test)]
mod tests;

pub use error::MinifyError;
pub use presenter::{ErrorPresenter, PresenterConfig, UNSUPPORTED_HINT};
