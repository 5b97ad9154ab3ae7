use anyhow::Result;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

use crate::core::Resolution;

/// JSON rendering of a resolution: order, waves and raw dependencies.
pub struct JsonCompactFormatter {
    pretty: bool,
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format_to_file(&self, resolution: &Resolution, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format(resolution)?)?;
        Ok(())
    }

    pub fn format(&self, resolution: &Resolution) -> Result<String> {
        let value = self.to_value(resolution);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(rendered)
    }

    pub fn to_value(&self, resolution: &Resolution) -> Value {
        let order: Vec<String> = resolution.order.iter().map(|p| path_string(p)).collect();

        let waves: Vec<Vec<String>> = resolution
            .waves
            .iter()
            .map(|wave| wave.iter().map(|p| path_string(p)).collect())
            .collect();

        // BTreeMap/BTreeSet iteration keeps keys and modules sorted.
        let mut dependencies = Map::new();
        for (path, modules) in &resolution.raw_dependencies {
            dependencies.insert(path_string(path), json!(modules));
        }

        json!({
            "meta": {
                "files": resolution.order.len(),
                "edges": resolution.graph.edge_count(),
                "waves": resolution.waves.len()
            },
            "order": order,
            "waves": waves,
            "dependencies": dependencies
        })
    }
}

impl Default for JsonCompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
