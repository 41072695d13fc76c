pub mod extractor;
pub mod handlers;
pub mod password;
pub mod token;
pub mod validation;

pub use extractor::RequireAuth;
