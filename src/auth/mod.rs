pub mod claims;
pub mod extract;
pub mod verifier;

pub use claims::Claims;
pub use extract::RequireAuth;
pub use verifier::{IdentityVerifier, VerifiedIdentity};
