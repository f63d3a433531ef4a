pub mod client;
pub mod query;

pub use client::DocumentClient;
pub use query::{operators, Direction, FieldFilter, ListOptions, Order, QuerySpec};
