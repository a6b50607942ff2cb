// Bincode 2.x serde integration: the persisted/wire structs carry
// #[serde(skip)] cache fields, so encoding goes through serde rather than
// bincode's own derive.
use crate::error::{BlockchainError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize data using bincode 2.0 with standard configuration
pub fn serialize<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    let config = bincode::config::standard();
    bincode::serde::encode_to_vec(data, config)
        .map_err(|e| BlockchainError::Serialization(format!("Serialization failed: {e}")))
}

/// Deserialize data using bincode 2.0 with standard configuration
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let config = bincode::config::standard();
    let (data, _) = bincode::serde::decode_from_slice(bytes, config)
        .map_err(|e| BlockchainError::Serialization(format!("Deserialization failed: {e}")))?;
    Ok(data)
}
