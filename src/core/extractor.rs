use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::parsers::python::PythonParser;
use crate::parsers::LanguageParser;

/// Decides whether an imported module path refers to another model
/// definition of the same ecosystem.
pub trait ModuleFilter {
    fn is_internal(&self, module: &str) -> bool;
}

impl<F> ModuleFilter for F
where
    F: Fn(&str) -> bool,
{
    fn is_internal(&self, module: &str) -> bool {
        self(module)
    }
}

/// Substring match against a list of markers.
#[derive(Debug, Clone)]
pub struct EcosystemFilter {
    markers: Vec<String>,
}

impl EcosystemFilter {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for EcosystemFilter {
    fn default() -> Self {
        Self::new([".modeling_", "transformers.models"])
    }
}

impl ModuleFilter for EcosystemFilter {
    fn is_internal(&self, module: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| module.contains(marker.as_str()))
    }
}

/// Collects the ecosystem modules a file imports from.
pub struct ImportExtractor<P = PythonParser, F = EcosystemFilter> {
    parser: P,
    filter: F,
}

impl<P, F> ImportExtractor<P, F>
where
    P: LanguageParser,
    F: ModuleFilter,
{
    pub fn new(parser: P, filter: F) -> Self {
        Self { parser, filter }
    }

    pub fn extract(&self, file_path: &Path) -> Result<BTreeSet<String>> {
        let parsed = self.parser.parse_file(file_path)?;

        let modules: BTreeSet<String> = parsed
            .imports
            .iter()
            .filter_map(|import| import.from_module())
            .filter(|module| self.filter.is_internal(module))
            .map(str::to_string)
            .collect();

        debug!(
            file = %file_path.display(),
            imports = parsed.imports.len(),
            internal = modules.len(),
            "extracted imports"
        );

        Ok(modules)
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }
}

impl ImportExtractor {
    pub fn python() -> Result<Self> {
        Ok(Self::new(PythonParser::new()?, EcosystemFilter::default()))
    }
}
