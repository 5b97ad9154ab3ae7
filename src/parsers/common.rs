use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::error::{Error, Result};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|err| Error::ParserSetup(err.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `source` and reject trees that contain syntax errors.
    pub fn parse_source(&mut self, file_path: &Path, source: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::SourceParse {
                path: file_path.to_path_buf(),
                line: 1,
                message: "parser produced no syntax tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, message) = match first_error(&root) {
                Some(node) if node.is_missing() => (
                    node.start_position().row + 1,
                    format!("missing `{}`", node.kind()),
                ),
                Some(node) => (node.start_position().row + 1, "invalid syntax".to_string()),
                None => (1, "invalid syntax".to_string()),
            };
            return Err(Error::SourceParse {
                path: file_path.to_path_buf(),
                line,
                message,
            });
        }

        Ok(tree)
    }

    pub fn read_source(&self, file_path: &Path) -> Result<String> {
        read_file_buffered(file_path).map_err(|source| Error::Io {
            path: file_path.to_path_buf(),
            source,
        })
    }
}

fn read_file_buffered(file_path: &Path) -> std::io::Result<String> {
    let file = File::open(file_path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader =
        BufReader::with_capacity(if file_size < 8192 { file_size.max(1) } else { 8192 }, file);

    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;
    Ok(content)
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn find_child_by_kind<'a>(node: &TSNode<'a>, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Pre-order traversal over every node below and including `root`.
pub fn walk_preorder<'a>(root: &TSNode<'a>, mut visit: impl FnMut(TSNode<'a>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn first_error<'a>(root: &TSNode<'a>) -> Option<TSNode<'a>> {
    let mut found = None;
    walk_preorder(root, |node| {
        if found.is_none() && (node.is_error() || node.is_missing()) {
            found = Some(node);
        }
    });
    found
}
