#![doc = include_str!("RUSTDOC.md")]

pub mod logger;
pub mod store;

#[cfg(test)]
pub mod test_support;
