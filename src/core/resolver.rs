use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::extractor::{EcosystemFilter, ImportExtractor, ModuleFilter};
use super::graph::{Entity, EntityGraph, GraphBuilder};
use super::naming::{FileKind, NameResolver};
use super::order::wave_sort;
use crate::error::Result;
use crate::parsers::python::PythonParser;
use crate::parsers::LanguageParser;

/// Imported ecosystem modules per input file, before any filtering against
/// the tracked set.
pub type RawDependencies = BTreeMap<PathBuf, BTreeSet<String>>;

#[derive(Debug, Clone)]
pub struct Resolution {
    /// Input files, every dependency ahead of its dependents
    pub order: Vec<PathBuf>,
    /// Same files grouped by wave; files within a wave are independent
    pub waves: Vec<Vec<PathBuf>>,
    pub raw_dependencies: RawDependencies,
    pub graph: EntityGraph,
}

impl Resolution {
    pub fn into_parts(self) -> (Vec<PathBuf>, RawDependencies) {
        (self.order, self.raw_dependencies)
    }
}

/// Orders modular files so that each comes after everything it imports from.
pub struct DependencyResolver<P = PythonParser, F = EcosystemFilter> {
    names: NameResolver,
    extractor: ImportExtractor<P, F>,
}

impl<P, F> DependencyResolver<P, F>
where
    P: LanguageParser + Sync,
    F: ModuleFilter + Sync,
{
    pub fn new(names: NameResolver, extractor: ImportExtractor<P, F>) -> Self {
        Self { names, extractor }
    }

    pub fn names(&self) -> &NameResolver {
        &self.names
    }

    pub fn resolve<I, T>(&self, files: I) -> Result<Resolution>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<Path>,
    {
        let mut seen = HashSet::new();
        let files: Vec<PathBuf> = files
            .into_iter()
            .map(|file| file.as_ref().to_path_buf())
            .filter(|file| seen.insert(file.clone()))
            .collect();

        let raw_dependencies = self.extract_all(&files)?;
        let graph = self.build_graph(&files, &raw_dependencies)?;
        let sorted = wave_sort(&graph)?;

        let waves: Vec<Vec<PathBuf>> = sorted
            .waves
            .iter()
            .map(|wave| {
                wave.iter()
                    .map(|&idx| graph.graph()[idx].file_path.clone())
                    .collect()
            })
            .collect();
        let order: Vec<PathBuf> = waves.iter().flatten().cloned().collect();

        info!(
            files = order.len(),
            edges = graph.edge_count(),
            waves = waves.len(),
            "resolved generation order"
        );

        Ok(Resolution {
            order,
            waves,
            raw_dependencies,
            graph,
        })
    }

    /// Per-file extraction runs in parallel; the first failure in input
    /// order is returned.
    pub fn extract_all(&self, files: &[PathBuf]) -> Result<RawDependencies> {
        let extracted: Vec<Result<BTreeSet<String>>> = files
            .par_iter()
            .map(|file| self.extractor.extract(file))
            .collect();

        let mut raw_dependencies = RawDependencies::new();
        for (file, modules) in files.iter().zip(extracted) {
            raw_dependencies.insert(file.clone(), modules?);
        }
        Ok(raw_dependencies)
    }

    /// Canonicalize files and their imports into the filtered entity graph.
    pub fn build_graph(
        &self,
        files: &[PathBuf],
        raw_dependencies: &RawDependencies,
    ) -> Result<EntityGraph> {
        let mut builder = GraphBuilder::new();
        let mut tracked = Vec::with_capacity(files.len());

        for file in files {
            let resolved = self.names.classify(&file.to_string_lossy())?;
            if resolved.kind != FileKind::Modular {
                warn!(
                    file = %file.display(),
                    kind = %resolved.kind,
                    "tracking a file that is not modular"
                );
            }
            tracked.push((file, resolved.entity.clone()));
            builder.add_entity(Entity::new(resolved.entity, file.clone(), resolved.kind))?;
        }

        for (file, entity) in tracked {
            let Some(modules) = raw_dependencies.get(file) else {
                continue;
            };
            for module in modules {
                let dependency = self.names.resolve(module)?;
                builder.add_dependency(&entity, &dependency, module);
            }
        }

        Ok(builder.build())
    }
}

impl DependencyResolver {
    /// Default prefix table, ecosystem filter and tree-sitter Python parser.
    pub fn python() -> Result<Self> {
        Ok(Self::new(NameResolver::default(), ImportExtractor::python()?))
    }
}

/// Order `files` with the default resolver, returning the ordered files and
/// the raw dependency map.
pub fn find_priority_list<I, T>(files: I) -> Result<(Vec<PathBuf>, RawDependencies)>
where
    I: IntoIterator<Item = T>,
    T: AsRef<Path>,
{
    Ok(DependencyResolver::python()?.resolve(files)?.into_parts())
}
