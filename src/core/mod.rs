pub mod extractor;
pub mod graph;
pub mod naming;
pub mod order;
pub mod resolver;
pub mod scanner;

pub use extractor::{EcosystemFilter, ImportExtractor, ModuleFilter};
pub use graph::{DependencyEdge, DependencyGraph, Entity, EntityGraph, GraphBuilder};
pub use naming::{FileKind, KindPrefix, NameResolver, ResolvedName};
pub use order::{wave_sort, SortedEntities};
pub use resolver::{find_priority_list, DependencyResolver, RawDependencies, Resolution};
pub use scanner::FileScanner;
