//! API Request and Response Types

// Vendor request and query types
mod vendor;
pub use vendor::*;

// Rating request types
mod rating;
pub use rating::*;

// Response envelopes
mod response;
pub use response::*;
