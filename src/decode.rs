//! Binding of raw JSON mappings to typed records.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;

/// Decode a JSON mapping into `T`, recursing into nested records.
///
/// Absent optional fields become `None` and unknown keys are ignored.
pub fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError {
        target: short_type_name::<T>(),
        source,
    })
}

/// Same as [`decode_record`], starting from raw JSON text or bytes.
pub fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError {
        target: short_type_name::<T>(),
        source,
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Keep generic arguments intact, only trim the leading module path.
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
