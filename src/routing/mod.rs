//! Route registry module
//!
//! Stores (verb, exact path) -> handler mappings. Pure data structure with
//! no I/O; matching is exact string equality on both levels, so every lookup
//! is a deterministic function of table state and the key.

mod table;

pub use table::{Handler, RouteEntry, RouteTable};
