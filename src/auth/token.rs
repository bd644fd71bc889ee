//! Access token snapshot and the redacting secret wrapper it stores.

pub mod record;
pub mod secret;
