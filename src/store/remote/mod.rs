pub mod connection;
pub mod rpc_error;
pub mod serializer;
pub(crate) mod structured_query;

pub use connection::{Connection, ConnectionBuilder, StoreRequest};
pub use rpc_error::map_http_error;
