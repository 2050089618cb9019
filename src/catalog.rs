//! Target catalog: the ordered list of selectable destinations.
//!
//! The session core only reads the catalog and is told when it changed;
//! presentation order is owned by the reorder coordinator and replayed into
//! the catalog at startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// One selectable external destination, rendered in an embedded frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub url: String,
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Default)]
pub struct Catalog {
    targets: Vec<Target>,
    changed: bool,
}

impl Catalog {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            changed: false,
        }
    }

    /// Load targets from a JSON file; a missing file yields the built-in
    /// defaults, a malformed one is reported to the caller.
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        if !path.exists() {
            return Ok(Self::new(default_targets()));
        }
        let raw = fs::read_to_string(path).map_err(|source| PersistError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let targets: Vec<Target> =
            serde_json::from_str(&raw).map_err(|source| PersistError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(targets))
    }

    pub fn enumerate(&self) -> &[Target] {
        &self.targets
    }

    pub fn get(&self, id: &str) -> Option<&Target> {
        self.targets.iter().find(|target| target.id == id)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.get(id).is_some_and(|target| target.enabled)
    }

    pub fn first_enabled(&self) -> Option<&Target> {
        self.targets.iter().find(|target| target.enabled)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) {
        if let Some(target) = self.targets.iter_mut().find(|target| target.id == id)
            && target.enabled != enabled
        {
            target.enabled = enabled;
            self.changed = true;
        }
    }

    /// Reorder targets to match `order`; ids unknown to the catalog are
    /// silently dropped, catalog entries missing from `order` keep their
    /// relative position at the end.
    pub fn apply_order(&mut self, order: &[String]) {
        let mut reordered: Vec<Target> = Vec::with_capacity(self.targets.len());
        for id in order {
            if let Some(pos) = self.targets.iter().position(|target| &target.id == id) {
                reordered.push(self.targets.remove(pos));
            }
        }
        reordered.append(&mut self.targets);
        self.targets = reordered;
        self.changed = true;
    }

    /// One-shot change notification; consumed by the composition root to
    /// re-project the toolbar.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

/// Extract the host component of a destination URL for the shortcut desync
/// fallback. Invalid URLs yield `None` and drop out of matching.
pub fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}

pub fn default_targets() -> Vec<Target> {
    let entries = [
        ("chatgpt", "https://chatgpt.com/", "ChatGPT"),
        ("claude", "https://claude.ai/", "Claude"),
        ("gemini", "https://gemini.google.com/", "Gemini"),
        ("perplexity", "https://www.perplexity.ai/", "Perplexity"),
        ("deepseek", "https://chat.deepseek.com/", "DeepSeek"),
    ];
    entries
        .iter()
        .map(|(id, url, label)| Target {
            id: (*id).to_string(),
            url: (*url).to_string(),
            label: (*label).to_string(),
            enabled: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_abc() -> Catalog {
        Catalog::new(
            ["a", "b", "c"]
                .iter()
                .map(|id| Target {
                    id: (*id).to_string(),
                    url: format!("https://{id}.example/"),
                    label: id.to_uppercase(),
                    enabled: true,
                })
                .collect(),
        )
    }

    #[test]
    fn apply_order_reorders_and_drops_unknown_ids() {
        let mut catalog = catalog_abc();
        catalog.apply_order(&[
            "c".to_string(),
            "missing".to_string(),
            "a".to_string(),
        ]);
        let ids: Vec<&str> = catalog
            .enumerate()
            .iter()
            .map(|target| target.id.as_str())
            .collect();
        // "b" was absent from the persisted order and keeps its slot at the end
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(catalog.take_changed());
        assert!(!catalog.take_changed());
    }

    #[test]
    fn set_enabled_marks_changed_only_on_transition() {
        let mut catalog = catalog_abc();
        catalog.set_enabled("a", true);
        assert!(!catalog.take_changed());
        catalog.set_enabled("a", false);
        assert!(catalog.take_changed());
        assert!(!catalog.is_enabled("a"));
        assert_eq!(catalog.first_enabled().unwrap().id, "b");
    }

    #[test]
    fn host_of_parses_and_rejects() {
        assert_eq!(host_of("https://chat.example.com/x"), Some("chat.example.com".to_string()));
        assert_eq!(host_of("not a url"), None);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(&dir.path().join("absent.json")).unwrap();
        assert!(!catalog.enumerate().is_empty());
    }

    #[test]
    fn load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.json");
        let original = catalog_abc();
        std::fs::write(&path, serde_json::to_string(original.enumerate()).unwrap()).unwrap();
        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded.enumerate().len(), 3);
        assert_eq!(loaded.enumerate()[1].id, "b");
    }
}
