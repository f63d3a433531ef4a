mod document;
mod field_path;

pub use document::Document;
pub use field_path::canonical_field_name;
