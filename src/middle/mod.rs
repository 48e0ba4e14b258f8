//! Program transformations
//!
//! Scope analysis feeds both the compressor and the mangler; each of them
//! re-resolves scopes before it starts, so they can run in any order.

pub mod compress;
pub mod enclose;
pub mod mangle;
pub mod scope;

pub use compress::compress;
pub use enclose::wrap_enclose;
pub use mangle::mangle;
pub use scope::{resolve_scopes, ScopeError, ScopeTree};
