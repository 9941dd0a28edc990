//! Credential pair storage and the refresh-token wire types.

pub mod error;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreConfig};
pub use token::{Credentials, TokenResponse};
