use anyhow::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::Resolution;

/// Line-oriented output: one path per line, optionally under wave headers.
pub struct PlainFormatter {
    group_waves: bool,
}

impl PlainFormatter {
    pub fn new() -> Self {
        Self { group_waves: false }
    }

    pub fn with_waves(mut self, group_waves: bool) -> Self {
        self.group_waves = group_waves;
        self
    }

    pub fn format_to_file(&self, resolution: &Resolution, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format(resolution))?;
        Ok(())
    }

    pub fn format(&self, resolution: &Resolution) -> String {
        let mut output = String::new();

        if !self.group_waves {
            for path in &resolution.order {
                let _ = writeln!(output, "{}", path.display());
            }
            return output;
        }

        for (index, wave) in resolution.waves.iter().enumerate() {
            if index > 0 {
                output.push('\n');
            }
            let _ = writeln!(output, "# wave {index}");
            for path in wave {
                let _ = writeln!(output, "{}", path.display());
            }
        }
        output
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}
