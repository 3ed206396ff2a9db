pub mod credentials;
pub mod identity;
pub mod password;
pub mod policy;
pub mod rate_limit;
pub mod session;
pub mod session_store;
pub mod validate;
