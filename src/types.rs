//! Core value types shared by the encoder, tables and the runtime.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// 32-bit identity of a `category/key` pair under one encoding version.
///
/// Serialised as a bare integer so it can be used directly as a JSON map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedKey(pub u32);

impl EncodedKey {
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for EncodedKey {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<EncodedKey> for u32 {
    fn from(key: EncodedKey) -> Self {
        key.0
    }
}

impl fmt::Display for EncodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content a category holds.
///
/// Text categories store the displayed string itself; image and audio
/// categories store a resource path handed to the host's resource loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Text,
    Image,
    Audio,
}

impl ResourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn encoded_key_serializes_as_plain_integer() {
        let json = serde_json::to_string(&EncodedKey(42)).unwrap();

        assert_that!(json, eq("42"));
    }

    #[rstest]
    #[case::text("\"text\"", ResourceType::Text)]
    #[case::image("\"image\"", ResourceType::Image)]
    #[case::audio("\"audio\"", ResourceType::Audio)]
    fn resource_type_deserializes_lowercase(#[case] json: &str, #[case] expected: ResourceType) {
        let parsed: ResourceType = serde_json::from_str(json).unwrap();

        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn resource_type_rejects_unknown_variant() {
        let parsed: serde_json::Result<ResourceType> = serde_json::from_str("\"video\"");

        assert!(parsed.is_err());
    }
}
