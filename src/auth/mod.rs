//! Capability tokens for admin actions.

mod claims;
mod token;

pub use claims::ActionClaims;
pub use token::ActionTokenSigner;
