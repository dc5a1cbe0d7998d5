//! Snapshot manifest read by `profile-cache put`
//!
//! A YAML file holding the profiles of one repository and, optionally, the
//! values file contents per profile version:
//!
//! ```yaml
//! profiles:
//!   - name: podinfo
//!     availableVersions: ["6.0.0", "6.0.1"]
//! values:
//!   podinfo:
//!     "6.0.1": |
//!       replicaCount: 1
//! ```

use crate::error::{ProfileCacheError, ProfileCacheResult};
use crate::profile::{Data, Profile, ProfileName, ProfileVersion, ValueMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotManifest {
    pub profiles: Vec<Profile>,
    pub values: BTreeMap<ProfileName, BTreeMap<ProfileVersion, String>>,
}

impl SnapshotManifest {
    /// Load a manifest from a YAML file
    pub async fn load(path: &Path) -> ProfileCacheResult<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ProfileCacheError::io(format!("reading snapshot {}", path.display()), e))?;

        Self::parse(&content).map_err(|reason| {
            ProfileCacheError::User(format!("Invalid snapshot {}: {}", path.display(), reason))
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        serde_yaml_ng::from_str(content).map_err(|e| e.to_string())
    }

    /// Convert into the cache's snapshot type
    pub fn into_data(self) -> Data {
        let values: ValueMap = self
            .values
            .into_iter()
            .map(|(profile, versions)| {
                let versions = versions
                    .into_iter()
                    .map(|(version, content)| (version, content.into_bytes()))
                    .collect();
                (profile, versions)
            })
            .collect();

        Data::new(self.profiles, values)
    }
}
