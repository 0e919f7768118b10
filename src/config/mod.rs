//! Named filter presets.
//!
//! A [`Profile`] is a pure value holding the reusable filter fields of a
//! scan; the [`ProfileStore`] is a plain in-memory mapping keyed by profile
//! name. Persisting profiles across runs is the front-end's concern, not
//! this crate's.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::ScanRequest;

/// A named preset of filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    pub extensions: Vec<String>,
    pub exclusions: Vec<String>,
}

impl Profile {
    /// Builds a [`ScanRequest`] over `roots` seeded with this profile's
    /// filter fields. Flags keep their request defaults.
    pub fn to_request(&self, roots: Vec<PathBuf>) -> ScanRequest {
        let mut request = ScanRequest::new(roots);
        request.extensions = self.extensions.clone();
        request.exclusions = self.exclusions.clone();
        request
    }
}

/// Exclusion substrings most scans want out of the way.
pub fn default_exclusions() -> Vec<String> {
    ["node_modules", "vendor", ".git", ".github", ".vscode", ".idea"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// In-memory keyed store of profiles: upsert on save, remove on delete.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: HashMap<String, Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a profile, overwriting any existing profile with the same name.
    pub fn save(&mut self, profile: Profile) {
        tracing::info!(name = %profile.name, "saving profile");
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Removes a profile by name; unknown names are an error so the caller
    /// can tell the user instead of silently doing nothing.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.profiles.remove(name).is_none() {
            bail!("No profile named \"{name}\" exists");
        }
        tracing::info!(name, "deleted profile");
        Ok(())
    }

    /// Profile names in sorted order, for stable display.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}
