/// A single typed field as stored in a document.
///
/// The set of kinds is closed: anything a caller hands to the codec ends up as
/// one of these variants, and anything the store sends back must parse into one.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Double(f64),
    /// ISO-8601 text exactly as the store reported it.
    Timestamp(String),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    pub fn from_string(value: impl Into<String>) -> Self {
        FieldValue::String(value.into())
    }

    pub fn from_bool(value: bool) -> Self {
        FieldValue::Boolean(value)
    }

    pub fn from_integer(value: i64) -> Self {
        FieldValue::Integer(value)
    }

    pub fn from_double(value: f64) -> Self {
        FieldValue::Double(value)
    }

    pub fn from_timestamp(value: impl Into<String>) -> Self {
        FieldValue::Timestamp(value.into())
    }

    pub fn from_array(values: Vec<FieldValue>) -> Self {
        FieldValue::Array(values)
    }

    /// Name of the wire tag carrying this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "stringValue",
            FieldValue::Boolean(_) => "booleanValue",
            FieldValue::Integer(_) => "integerValue",
            FieldValue::Double(_) => "doubleValue",
            FieldValue::Timestamp(_) => "timestampValue",
            FieldValue::Array(_) => "arrayValue",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) | FieldValue::Timestamp(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(values) => Some(values),
            _ => None,
        }
    }
}
