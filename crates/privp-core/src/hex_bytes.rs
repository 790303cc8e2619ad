//! Serde helpers rendering byte fields as lowercase hex strings.
//!
//! Use with `#[serde(with = "privp_core::hex_bytes")]` on `Vec<u8>` fields
//! and `#[serde(with = "privp_core::hex_bytes::array32")]` on `[u8; 32]`.
//!
//! Decoding accepts lowercase hex only, so every byte string has exactly
//! one encoding.

use serde::{Deserialize, Deserializer, Serializer};

/// Decode `s`, rejecting uppercase digits.
pub fn decode_lower(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    if let Some((index, c)) = s.char_indices().find(|(_, c)| c.is_ascii_uppercase()) {
        return Err(hex::FromHexError::InvalidHexCharacter { c, index });
    }
    hex::decode(s)
}

pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    decode_lower(&s).map_err(serde::de::Error::custom)
}

pub mod array32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = super::decode_lower(&s).map_err(serde::de::Error::custom)?;
        <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| serde::de::Error::invalid_length(bytes.len(), &"32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_only() {
        assert_eq!(decode_lower("0aff").unwrap(), vec![0x0a, 0xff]);
        assert!(decode_lower("0AFF").is_err());
        assert!(decode_lower("0aFf").is_err());
        assert!(decode_lower("zz").is_err());
    }

    #[derive(serde::Deserialize)]
    struct Fixed {
        #[serde(with = "super::array32")]
        digest: [u8; 32],
    }

    #[test]
    fn array32_rejects_uppercase_and_wrong_length() {
        let lower = format!(r#"{{"digest":"{}"}}"#, "ab".repeat(32));
        assert_eq!(serde_json::from_str::<Fixed>(&lower).unwrap().digest, [0xab; 32]);
        let upper = format!(r#"{{"digest":"{}"}}"#, "AB".repeat(32));
        assert!(serde_json::from_str::<Fixed>(&upper).is_err());
        let short = format!(r#"{{"digest":"{}"}}"#, "ab".repeat(31));
        assert!(serde_json::from_str::<Fixed>(&short).is_err());
    }
}
