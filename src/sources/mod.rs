pub mod issuer;
pub mod token_manager;

pub use issuer::{IssueToken, IssuedToken, OAuth2Issuer};
pub use token_manager::TokenManager;
