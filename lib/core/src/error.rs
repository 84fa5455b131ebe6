//! Error handling foundation for vetdesk.
//!
//! Only the `Result` alias lives here. Each crate defines its own typed
//! error enums and wraps them in a rootcause `Report` where errors are
//! propagated rather than classified.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
