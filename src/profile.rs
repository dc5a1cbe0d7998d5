//! Profile data model
//!
//! A profile is a Helm chart flagged as installable as a unit. The cache only
//! stores its metadata plus one values file per version.

use crate::cache::RESERVED_NAMES;
use crate::error::{ProfileCacheError, ProfileCacheResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Profile name, a directory under the repository subtree
pub type ProfileName = String;

/// Profile version, a directory under the profile directory
pub type ProfileVersion = String;

/// Values file contents keyed by profile name, then version
pub type ValueMap = BTreeMap<ProfileName, BTreeMap<ProfileVersion, Vec<u8>>>;

/// Identifies the HelmRepository a snapshot was scanned from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HelmRepoKey {
    pub namespace: String,
    pub name: String,
}

impl HelmRepoKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for HelmRepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Chart maintainer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// Reference back to the repository a profile was discovered in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmRepositoryRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Profile record as stored in `profiles.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Chart name
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub home: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<Maintainer>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kube_version: String,

    /// Upstream repository, when the scanner recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm_repository: Option<HelmRepositoryRef>,

    /// Every version published upstream, whether or not values were cached
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_versions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl Profile {
    /// Create a profile with only a name and its versions set
    pub fn new(name: impl Into<String>, available_versions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            available_versions,
            ..Default::default()
        }
    }
}

/// One snapshot of a HelmRepository: its profiles and their values files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Data {
    pub profiles: Vec<Profile>,
    pub values: ValueMap,
}

impl Data {
    pub fn new(profiles: Vec<Profile>, values: ValueMap) -> Self {
        Self { profiles, values }
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Number of values files in the snapshot
    pub fn values_count(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    /// Check that every values entry belongs to a listed profile and version
    ///
    /// Versions without values are fine; values without a version are not.
    /// Names that clash with the cache's own files are rejected up front.
    pub fn validate(&self) -> ProfileCacheResult<()> {
        for profile in &self.profiles {
            reject_reserved("profile name", &profile.name)?;
            for version in &profile.available_versions {
                reject_reserved("version", version)?;
            }
        }

        for (profile_name, versions) in &self.values {
            let profile = self.profile(profile_name).ok_or_else(|| {
                ProfileCacheError::InvalidSnapshot(format!(
                    "values given for unknown profile {}",
                    profile_name
                ))
            })?;

            if let Some(version) = versions
                .keys()
                .find(|v| !profile.available_versions.contains(v))
            {
                return Err(ProfileCacheError::InvalidSnapshot(format!(
                    "values given for version {} of profile {}, which is not an available version",
                    version, profile_name
                )));
            }
        }

        Ok(())
    }
}

fn reject_reserved(kind: &str, name: &str) -> ProfileCacheResult<()> {
    if RESERVED_NAMES.contains(&name) {
        return Err(ProfileCacheError::InvalidSnapshot(format!(
            "{} {} is reserved by the cache",
            kind, name
        )));
    }
    Ok(())
}
