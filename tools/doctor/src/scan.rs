//! Source discovery and module naming

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names never descended into (hidden directories are skipped too)
pub const SKIP_DIRS: [&str; 4] = ["target", ".git", "node_modules", "examples"];

fn should_skip(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

/// Every `*.rs` file under `root`, sorted by path
pub fn collect_rust_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type()?.is_dir() {
                if !should_skip(&name) {
                    pending.push(path);
                }
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// A module inside one compilation target, e.g. `fixthegap_service::routes`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    /// Crate (or binary) name
    pub target: String,
    /// Module path below the target root; empty for the root itself
    pub path: Vec<String>,
}

impl ModuleId {
    pub fn root(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            path: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Self {
        let mut path = self.path.clone();
        path.push(name.to_string());
        Self {
            target: self.target.clone(),
            path,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.path.split_last()?;
        Some(Self {
            target: self.target.clone(),
            path: parent.to_vec(),
        })
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)?;
        for segment in &self.path {
            write!(f, "::{}", segment)?;
        }
        Ok(())
    }
}

/// Library crate name from a `Cargo.toml`: `[lib] name`, else `[package] name`,
/// with `-` mapped to `_`
fn lib_name(manifest: &Path) -> Option<String> {
    let content = fs::read_to_string(manifest).ok()?;
    let manifest: toml::Value = toml::from_str(&content).ok()?;
    let name_in = |section: &str| {
        manifest
            .get(section)
            .and_then(|table| table.get("name"))
            .and_then(toml::Value::as_str)
    };
    let name = name_in("lib").or_else(|| name_in("package"))?;
    Some(name.replace('-', "_"))
}

/// Module of a source file under some crate's `src/` directory.
///
/// Returns `None` for files outside `src/` (tests, benches, build scripts).
pub fn module_id(file: &Path) -> Option<ModuleId> {
    let src_dir = file
        .ancestors()
        .skip(1)
        .find(|dir| dir.file_name().is_some_and(|name| name == "src"))?;
    let crate_dir = src_dir.parent()?;
    let manifest = crate_dir.join("Cargo.toml");
    if !manifest.exists() {
        return None;
    }

    let crate_name = lib_name(&manifest).or_else(|| {
        crate_dir
            .file_name()
            .map(|name| name.to_string_lossy().replace('-', "_"))
    })?;

    let relative = file.strip_prefix(src_dir).ok()?;
    let mut parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let last = parts.pop()?;
    let stem = last.strip_suffix(".rs")?.to_string();

    if parts.first().map(String::as_str) == Some("bin") {
        parts.remove(0);
        return Some(match parts.split_first() {
            // src/bin/<name>.rs
            None => ModuleId::root(stem),
            // src/bin/<name>/...
            Some((bin, rest)) => {
                let mut path = rest.to_vec();
                if stem != "main" && stem != "mod" {
                    path.push(stem);
                }
                ModuleId {
                    target: bin.clone(),
                    path,
                }
            }
        });
    }

    if parts.is_empty() && stem == "main" {
        let target = if src_dir.join("lib.rs").exists() {
            format!("{crate_name}(bin)")
        } else {
            crate_name
        };
        return Some(ModuleId::root(target));
    }

    if !(parts.is_empty() && stem == "lib") && stem != "mod" {
        parts.push(stem);
    }

    Some(ModuleId {
        target: crate_name,
        path: parts,
    })
}
