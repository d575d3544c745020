//! Plain data types shared by the stores, the services and the HTTP surface.
//!
//! Every type here serializes to camelCase JSON, which is also the format the product
//! responder puts on the wire.

pub mod details;
pub mod order;
pub mod product;

pub use details::*;
pub use order::*;
pub use product::*;
