use modorder::core::extractor::{EcosystemFilter, ImportExtractor};
use modorder::core::naming::NameResolver;
use modorder::core::resolver::DependencyResolver;
use modorder::parsers::{ImportDecl, LanguageParser, ParseResult};
use modorder::{Error, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Serves canned imports instead of reading files.
#[derive(Default)]
struct StubParser {
    imports: HashMap<PathBuf, Vec<ImportDecl>>,
    broken: HashSet<PathBuf>,
}

impl StubParser {
    fn with(mut self, file: &str, modules: &[&str]) -> Self {
        let decls = modules
            .iter()
            .enumerate()
            .map(|(line, module)| ImportDecl::From {
                module: Some(module.to_string()),
                level: 2,
                line: line + 1,
            })
            .collect();
        self.imports.insert(PathBuf::from(file), decls);
        self
    }

    fn broken(mut self, file: &str) -> Self {
        self.broken.insert(PathBuf::from(file));
        self
    }
}

impl LanguageParser for StubParser {
    fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        if self.broken.contains(file_path) {
            return Err(Error::SourceParse {
                path: file_path.to_path_buf(),
                line: 3,
                message: "invalid syntax".to_string(),
            });
        }
        Ok(ParseResult {
            imports: self.imports.get(file_path).cloned().unwrap_or_default(),
        })
    }

    fn language_name(&self) -> &str {
        "stub"
    }
}

fn resolver(parser: StubParser) -> DependencyResolver<StubParser, EcosystemFilter> {
    DependencyResolver::new(
        NameResolver::default(),
        ImportExtractor::new(parser, EcosystemFilter::default()),
    )
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[test]
fn orders_dependencies_before_dependents() {
    let parser = StubParser::default()
        .with("models/b/modular_b.py", &["a.modeling_a"])
        .with(
            "models/c/modular_c.py",
            &["a.modeling_a", "b.modeling_b", "c.modeling_c"],
        );

    let resolution = resolver(parser)
        .resolve([
            "models/c/modular_c.py",
            "models/b/modular_b.py",
            "models/a/modular_a.py",
        ])
        .unwrap();

    assert_eq!(
        resolution.order,
        paths(&[
            "models/a/modular_a.py",
            "models/b/modular_b.py",
            "models/c/modular_c.py",
        ])
    );
    assert_eq!(resolution.waves.len(), 3);
    assert!(!resolution.graph.depends_on("c", "c"));
    assert_eq!(resolution.graph.dependencies_of("c"), vec!["a", "b"]);
}

#[test]
fn untracked_dependencies_stay_in_the_raw_map_only() {
    let parser = StubParser::default()
        .with(
            "modular_x.py",
            &["transformers.models.clip.modeling_clip", "y.modeling_y"],
        )
        .with("modular_y.py", &[]);

    let (order, raw) = resolver(parser)
        .resolve(["modular_x.py", "modular_y.py"])
        .unwrap()
        .into_parts();

    assert_eq!(order, paths(&["modular_y.py", "modular_x.py"]));

    let expected: BTreeSet<String> = ["transformers.models.clip.modeling_clip", "y.modeling_y"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(raw[Path::new("modular_x.py")], expected);
    assert!(raw[Path::new("modular_y.py")].is_empty());
    assert_eq!(raw.len(), 2);
}

#[test]
fn same_wave_files_come_out_in_entity_name_order() {
    let parser = StubParser::default().with("modular_z.py", &["x.modeling_x", "y.modeling_y"]);

    let resolution = resolver(parser)
        .resolve(["modular_z.py", "modular_y.py", "modular_x.py"])
        .unwrap();

    assert_eq!(
        resolution.waves,
        vec![paths(&["modular_x.py", "modular_y.py"]), paths(&["modular_z.py"])]
    );
}

#[test]
fn other_kinds_of_a_tracked_entity_still_order_it() {
    let parser = StubParser::default().with(
        "modular_b.py",
        &["transformers.models.a.configuration_a"],
    );

    let resolution = resolver(parser)
        .resolve(["modular_b.py", "modular_a.py"])
        .unwrap();

    assert!(resolution.graph.depends_on("b", "a"));
    assert_eq!(resolution.order, paths(&["modular_a.py", "modular_b.py"]));
}

#[test]
fn unrecognized_import_aborts_resolution() {
    let parser = StubParser::default().with("modular_b.py", &["transformers.models.llama"]);

    let err = resolver(parser).resolve(["modular_b.py"]).unwrap_err();
    match err {
        Error::UnrecognizedFileKind { name } => assert_eq!(name, "transformers.models.llama"),
        other => panic!("expected UnrecognizedFileKind, got {other:?}"),
    }
}

#[test]
fn unrecognized_input_file_aborts_resolution() {
    let err = resolver(StubParser::default())
        .resolve(["modular_a.py", "utils_helpers.py"])
        .unwrap_err();
    assert!(matches!(err, Error::UnrecognizedFileKind { .. }));
}

#[test]
fn parse_failure_is_propagated() {
    let parser = StubParser::default()
        .with("modular_a.py", &[])
        .broken("modular_b.py");

    let err = resolver(parser)
        .resolve(["modular_a.py", "modular_b.py"])
        .unwrap_err();
    match err {
        Error::SourceParse { path, line, .. } => {
            assert_eq!(path, PathBuf::from("modular_b.py"));
            assert_eq!(line, 3);
        }
        other => panic!("expected SourceParse, got {other:?}"),
    }
}

#[test]
fn cyclic_imports_fail_instead_of_hanging() {
    let parser = StubParser::default()
        .with("modular_p.py", &["q.modeling_q"])
        .with("modular_q.py", &["p.modeling_p"]);

    let err = resolver(parser)
        .resolve(["modular_p.py", "modular_q.py"])
        .unwrap_err();
    match err {
        Error::CyclicDependency { unresolved, cycles } => {
            assert_eq!(unresolved, vec!["p", "q"]);
            assert_eq!(cycles, vec![vec!["p", "q"]]);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn repeated_paths_collapse_but_clashing_entities_fail() {
    let resolution = resolver(StubParser::default())
        .resolve(["modular_a.py", "modular_a.py"])
        .unwrap();
    assert_eq!(resolution.order, paths(&["modular_a.py"]));

    let err = resolver(StubParser::default())
        .resolve(["one/modular_a.py", "two/modular_a.py"])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateEntity { entity, .. } if entity == "a"));
}

#[test]
fn empty_input_resolves_to_nothing() {
    let resolution = resolver(StubParser::default())
        .resolve(Vec::<PathBuf>::new())
        .unwrap();
    assert!(resolution.order.is_empty());
    assert!(resolution.waves.is_empty());
    assert!(resolution.raw_dependencies.is_empty());
}
