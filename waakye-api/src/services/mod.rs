//! Service Layer
//!
//! Business logic behind the HTTP handlers. Services work in domain types
//! and domain errors; the routes translate both for the wire.

mod directory;

pub use directory::*;
