//! Client credentials and the token snapshot held by sessions.

pub mod credentials;
pub mod token;

pub use credentials::*;
pub use token::{record::*, secret::*};
