// Shared domain types, used by both the engine layer and the UI layer.
// Neither layer depends on the other; both import from this module.

pub mod error;
pub mod firmware;

pub use error::*;
pub use firmware::*;
