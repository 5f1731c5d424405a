//! Authentication material: the redacted API token and the header derived from it.

pub mod identity;
pub mod token;

pub use identity::*;
pub use token::*;
