use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Category of a model definition file, read off its filename prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Modular,
    Modeling,
    Configuration,
    Tokenization,
    Processing,
    ImageProcessing,
    FeatureExtractor,
    Custom(String),
}

impl FileKind {
    pub fn as_str(&self) -> &str {
        match self {
            FileKind::Modular => "modular",
            FileKind::Modeling => "modeling",
            FileKind::Configuration => "configuration",
            FileKind::Tokenization => "tokenization",
            FileKind::Processing => "processing",
            FileKind::ImageProcessing => "image_processing",
            FileKind::FeatureExtractor => "feature_extractor",
            FileKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the prefix table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindPrefix {
    pub prefix: String,
    pub kind: FileKind,
    /// Variant marker removed from the entity name for this kind only
    pub variant_suffix: Option<String>,
}

impl KindPrefix {
    pub fn new(prefix: impl Into<String>, kind: FileKind) -> Self {
        Self {
            prefix: prefix.into(),
            kind,
            variant_suffix: None,
        }
    }

    pub fn with_variant_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.variant_suffix = Some(suffix.into());
        self
    }
}

/// Entity name together with the kind it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedName {
    pub entity: String,
    pub kind: FileKind,
}

/// Maps file paths and dotted module paths onto canonical entity names.
///
/// The prefix table is ordered; the first prefix the filename token starts
/// with wins.
#[derive(Debug, Clone)]
pub struct NameResolver {
    prefixes: Vec<KindPrefix>,
    extension: String,
}

impl NameResolver {
    pub fn new(prefixes: Vec<KindPrefix>) -> Self {
        Self {
            prefixes,
            extension: ".py".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn prefixes(&self) -> &[KindPrefix] {
        &self.prefixes
    }

    /// Prefix registered for `kind`, if any.
    pub fn prefix_for(&self, kind: &FileKind) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|entry| &entry.kind == kind)
            .map(|entry| entry.prefix.as_str())
    }

    pub fn resolve(&self, filename: &str) -> Result<String> {
        self.classify(filename).map(|resolved| resolved.entity)
    }

    pub fn classify(&self, filename: &str) -> Result<ResolvedName> {
        let token = self.token(filename);

        let entry = self
            .prefixes
            .iter()
            .find(|entry| token.starts_with(entry.prefix.as_str()))
            .ok_or_else(|| Error::UnrecognizedFileKind {
                name: filename.to_string(),
            })?;

        let mut entity = &token[entry.prefix.len()..];
        if let Some(marker) = &entry.variant_suffix {
            entity = entity.strip_suffix(marker.as_str()).unwrap_or(entity);
        }

        if entity.is_empty() {
            return Err(Error::UnrecognizedFileKind {
                name: filename.to_string(),
            });
        }

        Ok(ResolvedName {
            entity: entity.to_string(),
            kind: entry.kind.clone(),
        })
    }

    /// Last path component with the extension removed; for dotted module
    /// paths, the last dotted segment.
    fn token<'a>(&self, filename: &'a str) -> &'a str {
        let stem = filename
            .strip_suffix(self.extension.as_str())
            .unwrap_or(filename);
        let base = stem.rsplit(['/', '\\']).next().unwrap_or(stem);
        base.rsplit('.').next().unwrap_or(base)
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(vec![
            KindPrefix::new("modular_", FileKind::Modular),
            KindPrefix::new("modeling_", FileKind::Modeling),
            KindPrefix::new("configuration_", FileKind::Configuration),
            KindPrefix::new("tokenization_", FileKind::Tokenization),
            KindPrefix::new("processing_", FileKind::Processing),
            KindPrefix::new("image_processing_", FileKind::ImageProcessing)
                .with_variant_suffix("_fast"),
            KindPrefix::new("feature_extractor_", FileKind::FeatureExtractor),
        ])
    }
}
