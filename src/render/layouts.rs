//! Layout discovery and resolution.
//!
//! Layouts are the outer page templates that views are embedded into. The
//! registry is built once at startup by scanning `<templates>/layouts/`
//! non-recursively and is immutable for the life of the process;
//! resolution is a pure lookup against that snapshot.

use std::fs;
use std::path::Path;

/// Fallback layout name tried when no (or an unknown) layout is requested.
pub const DEFAULT_LAYOUT_NAME: &str = "homepage";

/// Returned when the registry is empty; degrades gracefully rather than
/// failing the render.
const HARDCODED_DEFAULT: &str = "layouts/homepage.html";

/// Immutable mapping from layout name to template path, in discovery order.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    // ---
    entries: Vec<(String, String)>,
}

impl LayoutRegistry {
    /// Scans `<templates_dir>/layouts` for `.html` files.
    ///
    /// Every file found becomes an entry keyed by its base name with the
    /// extension stripped. A missing directory yields an empty registry,
    /// not an error. Entries are sorted by name so discovery order is
    /// stable across platforms.
    pub fn discover(templates_dir: &Path) -> Self {
        // ---
        let layouts_dir = templates_dir.join("layouts");
        let mut entries = Vec::new();

        match fs::read_dir(&layouts_dir) {
            Ok(read_dir) => {
                let mut files: Vec<_> = read_dir.flatten().map(|e| e.path()).collect();
                files.sort();

                for path in files {
                    let is_template = path.is_file()
                        && path.extension().and_then(|e| e.to_str()) == Some("html");
                    if !is_template {
                        continue;
                    }

                    if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                        let template = format!("layouts/{name}.html");
                        tracing::info!("Discovered layout: {name} -> {template}");
                        entries.push((name.to_string(), template));
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    "No layouts directory at {}: {err}",
                    layouts_dir.display()
                );
            }
        }

        Self { entries }
    }

    /// Builds a registry from explicit entries. Intended for tests.
    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        // ---
        Self { entries }
    }

    /// Resolves a requested layout name to a template path.
    ///
    /// Resolution order: the requested name if it is registered, then the
    /// default layout, then the first discovered entry, and finally a
    /// hardcoded identifier when the registry is empty. Never fails.
    pub fn resolve(&self, requested: Option<&str>) -> &str {
        // ---
        if let Some(name) = requested {
            if let Some(template) = self.get(normalize(name)) {
                return template;
            }
        }

        if let Some(template) = self.get(DEFAULT_LAYOUT_NAME) {
            return template;
        }

        if let Some((_, template)) = self.entries.first() {
            return template;
        }

        HARDCODED_DEFAULT
    }

    fn get(&self, name: &str) -> Option<&str> {
        // ---
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, template)| template.as_str())
    }

    /// Layout names in discovery order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        // ---
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// (name, template path) pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        // ---
        self.entries.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        // ---
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        // ---
        self.entries.is_empty()
    }
}

/// Normalizes a requested layout name before lookup.
///
/// Strips the `layouts/` namespace, keeps only the final path component,
/// and drops an `.html` extension. Path-like input can therefore never
/// address anything outside the registry.
fn normalize(name: &str) -> &str {
    // ---
    let name = name.strip_prefix("layouts/").unwrap_or(name);
    let name = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);
    name.strip_suffix(".html").unwrap_or(name)
}
