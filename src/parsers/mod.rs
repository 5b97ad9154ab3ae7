pub mod common;
pub mod python;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// One import declaration as written in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportDecl {
    /// `import a.b, c as d`
    Import { names: Vec<String>, line: usize },
    /// `from ..a.b import c`; `level` counts the leading dots
    From {
        module: Option<String>,
        level: usize,
        line: usize,
    },
}

impl ImportDecl {
    /// Source module of a `from` import, when it names one.
    pub fn from_module(&self) -> Option<&str> {
        match self {
            ImportDecl::From {
                module: Some(module),
                ..
            } if !module.is_empty() => Some(module),
            _ => None,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ImportDecl::Import { line, .. } | ImportDecl::From { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub imports: Vec<ImportDecl>,
}

pub trait LanguageParser {
    fn parse_file(&self, file_path: &Path) -> Result<ParseResult>;
    #[allow(dead_code)]
    fn language_name(&self) -> &str;
}
