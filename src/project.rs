//! # Subprojects
//!
//! A `ProjectSet` is the build driver's list of subprojects. Each
//! `Subproject` has a name and a `version` that starts unset and is written
//! exactly once per resolution by the `VersionResolver`.
//!
//! Subprojects can be listed by hand or discovered from a Cargo workspace
//! manifest, whose `[workspace].members` glob patterns are expanded against
//! the filesystem (honouring `[workspace].exclude`).

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;
use serde::Serialize;
use toml::Value as TomlValue;

use crate::error::{Error, Result};

/// One buildable module of a multi-module build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subproject {
    name: String,
    version: Option<String>,
}

impl Subproject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version assigned by the last resolution, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// The set of subprojects in one build, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProjectSet {
    projects: Vec<Subproject>,
}

impl ProjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from names, rejecting duplicates.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            set.add(name)?;
        }
        Ok(set)
    }

    /// Add a subproject. Names must be unique.
    pub fn add(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(Error::DuplicateSubproject { name });
        }
        self.projects.push(Subproject::new(name));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Subproject> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subproject> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Overwrite the version of every subproject.
    pub(crate) fn assign_version(&mut self, version: &str) {
        for project in &mut self.projects {
            project.version = Some(version.to_string());
        }
    }

    /// The version shared by every subproject.
    ///
    /// Returns `None` for an empty set, if any subproject is unversioned, or
    /// if two subprojects disagree.
    pub fn common_version(&self) -> Option<&str> {
        let first = self.projects.first()?.version()?;
        self.projects
            .iter()
            .all(|p| p.version() == Some(first))
            .then_some(first)
    }

    /// Whether every subproject holds the same version.
    pub fn is_consistent(&self) -> bool {
        self.common_version().is_some()
    }
}

/// Discover subproject names from a Cargo workspace manifest.
///
/// Each member directory contributes its `[package].name`, falling back to
/// its path relative to the workspace root. A root `[package]` is included
/// first, as Cargo does.
pub fn discover_workspace_members(manifest_path: &Path) -> Result<Vec<String>> {
    let workspace_error = |message: String| Error::Workspace {
        path: manifest_path.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(manifest_path)
        .map_err(|e| workspace_error(format!("cannot read manifest: {}", e)))?;
    let manifest: TomlValue = toml::from_str(&content)?;
    let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let workspace = manifest
        .get("workspace")
        .ok_or_else(|| workspace_error("no [workspace] table".to_string()))?;

    let members = string_array(workspace, "members").map_err(workspace_error)?;
    let excluded: HashSet<PathBuf> = string_array(workspace, "exclude")
        .map_err(workspace_error)?
        .into_iter()
        .map(|path| normalize(&root.join(path)))
        .collect();

    let mut names = Vec::new();
    if let Some(name) = package_name(&manifest) {
        names.push(name.to_string());
    }

    for pattern in members {
        let full_pattern = root.join(&pattern);
        let full_pattern = full_pattern.to_string_lossy();
        let mut matched = false;

        for entry in glob::glob(&full_pattern)? {
            let dir = entry.map_err(|e| workspace_error(e.to_string()))?;
            if excluded.contains(&normalize(&dir)) {
                debug!("Skipping excluded workspace member {}", dir.display());
                continue;
            }
            let member_manifest = dir.join("Cargo.toml");
            if !member_manifest.is_file() {
                continue;
            }
            matched = true;

            let name = member_name(&member_manifest, root, &dir)?;
            if !names.contains(&name) {
                names.push(name);
            }
        }

        if !matched {
            debug!("Workspace member pattern '{}' matched nothing", pattern);
        }
    }

    Ok(names)
}

fn member_name(member_manifest: &Path, root: &Path, dir: &Path) -> Result<String> {
    let content = fs::read_to_string(member_manifest)?;
    let manifest: TomlValue = toml::from_str(&content)?;
    Ok(match package_name(&manifest) {
        Some(name) => name.to_string(),
        None => dir
            .strip_prefix(root)
            .unwrap_or(dir)
            .to_string_lossy()
            .replace('\\', "/"),
    })
}

fn package_name(manifest: &TomlValue) -> Option<&str> {
    manifest.get("package")?.get("name")?.as_str()
}

fn string_array(table: &TomlValue, key: &str) -> std::result::Result<Vec<String>, String> {
    match table.get(key) {
        None => Ok(Vec::new()),
        Some(TomlValue::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("[workspace].{} entries must be strings", key))
            })
            .collect(),
        Some(_) => Err(format!("[workspace].{} must be an array", key)),
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
