//! Profiles index codec
//!
//! The index is a YAML sequence of profile records. Values files never pass
//! through here; they are stored as opaque bytes.

use crate::profile::Profile;
use serde::de;

/// Encode profiles as a YAML document, preserving order
pub fn encode_profiles(profiles: &[Profile]) -> Result<String, serde_yaml_ng::Error> {
    serde_yaml_ng::to_string(profiles)
}

/// Decode a YAML document written by [`encode_profiles`]
///
/// Anything that is not a sequence of profile records is an error, so a
/// damaged index never reads back as an empty one. An empty snapshot is
/// written as `[]`, so a blank file is rejected too.
pub fn decode_profiles(content: &[u8]) -> Result<Vec<Profile>, serde_yaml_ng::Error> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Err(de::Error::custom("profiles index is blank"));
    }
    serde_yaml_ng::from_slice(content)
}
