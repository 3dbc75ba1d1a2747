use std::collections::BTreeMap;
use std::iter::FromIterator;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use varspace_core::VarspaceError;

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with sorted object keys.
///
/// Arrays keep their order, which is what makes the grafting order of a
/// composed space part of its identity.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, VarspaceError> {
    let value = serde_json::to_value(value)
        .map_err(|err| VarspaceError::serde("varspace_space.json_serialize", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonicalize(value))
        .map_err(|err| VarspaceError::serde("varspace_space.json_write", err))?;
    Ok(bytes)
}

/// Lowercase hex SHA-256 of the canonical JSON form of `value`.
pub fn canonical_sha256<T: Serialize>(value: &T) -> Result<String, VarspaceError> {
    let digest = Sha256::digest(to_canonical_json_bytes(value)?);
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, VarspaceError> {
    serde_json::from_slice(data)
        .map_err(|err| VarspaceError::serde("varspace_space.json_deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, VarspaceError> {
    serde_yaml::to_string(value)
        .map_err(|err| VarspaceError::serde("varspace_space.yaml_serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, VarspaceError> {
    serde_yaml::from_slice(data)
        .map_err(|err| VarspaceError::serde("varspace_space.yaml_deserialize", err))
}
