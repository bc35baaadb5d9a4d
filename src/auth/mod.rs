pub mod session;
pub mod store;

pub use session::{AuthContext, DEFAULT_TOKEN_KEY};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
