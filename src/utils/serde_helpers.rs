use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a 32-byte hash as a lowercase hex string
pub fn as_hex<S>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&hex::encode(bytes))
}

/// Deserialize a hex string into a 32-byte hash
pub fn from_hex<'de, D>(d: D) -> Result<[u8; 32], D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    let raw = hex::decode(&s).map_err(D::Error::custom)?;
    raw.try_into()
        .map_err(|v: Vec<u8>| D::Error::custom(format!("expected 32 bytes, got {}", v.len())))
}
