use std::path::Path;
use tree_sitter::Node as TSNode;

use super::common::{extract_text, find_child_by_kind, walk_preorder, TreeSitterParser};
use super::{ImportDecl, LanguageParser, ParseResult};
use crate::error::Result;

/// Reports every import declaration in a Python file, nested ones included.
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Fail early if the grammar does not load.
        TreeSitterParser::new(tree_sitter_python::language())?;
        Ok(Self)
    }

    /// Extract imports from in-memory source; `file_path` is only used in errors.
    pub fn parse_source(&self, file_path: &Path, source: &str) -> Result<ParseResult> {
        let mut parser = TreeSitterParser::new(tree_sitter_python::language())?;
        let tree = parser.parse_source(file_path, source)?;
        let source_bytes = source.as_bytes();

        let mut imports = Vec::new();
        walk_preorder(&tree.root_node(), |node| match node.kind() {
            "import_statement" => imports.push(self.process_import(&node, source_bytes)),
            "import_from_statement" => {
                imports.push(self.process_import_from(&node, source_bytes))
            }
            "future_import_statement" => imports.push(ImportDecl::From {
                module: Some("__future__".to_string()),
                level: 0,
                line: node.start_position().row + 1,
            }),
            _ => {}
        });

        Ok(ParseResult { imports })
    }

    fn process_import(&self, import_node: &TSNode, source: &[u8]) -> ImportDecl {
        let mut cursor = import_node.walk();
        let names = import_node
            .children_by_field_name("name", &mut cursor)
            .filter_map(|name_node| match name_node.kind() {
                "aliased_import" => name_node
                    .child_by_field_name("name")
                    .map(|inner| dotted(extract_text(&inner, source))),
                "dotted_name" => Some(dotted(extract_text(&name_node, source))),
                _ => None,
            })
            .collect();

        ImportDecl::Import {
            names,
            line: import_node.start_position().row + 1,
        }
    }

    fn process_import_from(&self, import_node: &TSNode, source: &[u8]) -> ImportDecl {
        let line = import_node.start_position().row + 1;

        let Some(module_node) = import_node.child_by_field_name("module_name") else {
            return ImportDecl::From {
                module: None,
                level: 0,
                line,
            };
        };

        let (module, level) = if module_node.kind() == "relative_import" {
            let level = find_child_by_kind(&module_node, "import_prefix")
                .map(|prefix| extract_text(&prefix, source).matches('.').count())
                .unwrap_or(0);
            let module = find_child_by_kind(&module_node, "dotted_name")
                .map(|name| dotted(extract_text(&name, source)));
            (module, level)
        } else {
            (Some(dotted(extract_text(&module_node, source))), 0)
        };

        ImportDecl::From {
            module,
            level,
            line,
        }
    }
}

impl LanguageParser for PythonParser {
    fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        let parser = TreeSitterParser::new(tree_sitter_python::language())?;
        let source = parser.read_source(file_path)?;
        self.parse_source(file_path, &source)
    }

    fn language_name(&self) -> &str {
        "python"
    }
}

/// Dotted names may legally contain whitespace around the dots.
fn dotted(text: &str) -> String {
    text.split_whitespace().collect()
}
