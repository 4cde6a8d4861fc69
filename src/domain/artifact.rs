//! Artifacts handed over by the build step and the set of tags it produced.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// A built or resolved container image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Image name as written in the build configuration
    #[serde(default)]
    pub image_name: String,
    /// Fully qualified reference, e.g. `app:5f3a9c`
    pub tag: String,
}

impl Artifact {
    pub fn new(image_name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            tag: tag.into(),
        }
    }

    /// Artifact known only by its tag
    pub fn from_tag(tag: impl Into<String>) -> Self {
        Self::new(String::new(), tag)
    }
}

/// Build output document: `{"builds": [{"imageName": ..., "tag": ...}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutput {
    #[serde(default)]
    pub builds: Vec<Artifact>,
}

impl BuildOutput {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let output = Self::from_json(&content)?;
        log::debug!(
            "Read {} artifacts from {}",
            output.builds.len(),
            path.as_ref().display()
        );
        Ok(output)
    }
}

/// Tags produced by the current run, as opposed to pulled or cached ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltTags {
    tags: HashSet<String>,
}

impl BuiltTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every artifact in the list counts as built
    pub fn from_artifacts(artifacts: &[Artifact]) -> Self {
        artifacts.iter().map(|a| a.tag.clone()).collect()
    }

    pub fn insert(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<String> for BuiltTags {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for BuiltTags {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_build_output() {
        let json = r#"{"builds":[{"imageName":"app","tag":"app:v1"},{"imageName":"web","tag":"web:abc"}]}"#;
        let output = BuildOutput::from_json(json).unwrap();
        assert_eq!(output.builds.len(), 2);
        assert_eq!(output.builds[0], Artifact::new("app", "app:v1"));
        assert_eq!(output.builds[1].tag, "web:abc");
    }

    #[test]
    fn test_parse_build_output_missing_image_name() {
        let output = BuildOutput::from_json(r#"{"builds":[{"tag":"app:v1"}]}"#).unwrap();
        assert_eq!(output.builds[0], Artifact::from_tag("app:v1"));
    }

    #[test]
    fn test_parse_empty_document() {
        let output = BuildOutput::from_json("{}").unwrap();
        assert!(output.builds.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(BuildOutput::from_json("not json").is_err());
    }

    #[test]
    fn test_build_output_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.json");
        std::fs::write(&path, r#"{"builds":[{"imageName":"app","tag":"app:v1"}]}"#).unwrap();

        let output = BuildOutput::from_file(&path).unwrap();
        assert_eq!(output.builds, vec![Artifact::new("app", "app:v1")]);
    }

    #[test]
    fn test_build_output_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(BuildOutput::from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_built_tags_from_artifacts() {
        let artifacts = vec![Artifact::from_tag("app:v1"), Artifact::from_tag("app:v2")];
        let built = BuiltTags::from_artifacts(&artifacts);
        assert_eq!(built.len(), 2);
        assert!(built.contains("app:v1"));
        assert!(!built.contains("app:v3"));
    }

    #[test]
    fn test_built_tags_insert_and_collect() {
        let mut built: BuiltTags = ["a:1"].into_iter().collect();
        assert!(!built.is_empty());
        built.insert("b:2");
        assert!(built.contains("b:2"));
        assert!(BuiltTags::new().is_empty());
    }
}
