mod codec;
mod value;

pub use codec::{decode, decode_map, encode, encode_map, encode_timestamp};
pub use value::FieldValue;
