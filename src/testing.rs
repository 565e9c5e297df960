use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::workflow::StyleChooser;

/// Writes `lines` to `directory/file_name`, one per line, and returns the path.
pub fn write_wkt_fixture(directory: &Path, file_name: &str, lines: &[&str]) -> PathBuf {
    let path = directory.join(file_name);
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).expect("Could not write fixture file");
    path
}

/// Answers color requests from a script, `None` entries cancel. Cancels once the script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedStyleChooser {
    responses: VecDeque<Option<(Color, Color)>>,
    calls: usize,
}

impl ScriptedStyleChooser {
    pub fn new(responses: impl IntoIterator<Item = Option<(Color, Color)>>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            calls: 0,
        }
    }

    pub fn confirming(stroke_color: Color, fill_color: Color) -> Self {
        Self::new([Some((stroke_color, fill_color))])
    }

    pub fn cancelling() -> Self {
        Self::new([None])
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl StyleChooser for ScriptedStyleChooser {
    fn choose_colors(&mut self) -> Option<(Color, Color)> {
        self.calls += 1;
        self.responses.pop_front().flatten()
    }
}

pub mod geometry {
    /// WKT lines for a regular grid of points, row by row.
    pub fn point_grid(columns: usize, rows: usize, spacing: f64) -> Vec<String> {
        (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| format!("POINT ({} {})", column as f64 * spacing, row as f64 * spacing))
            })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_point_grid() {
            let lines = point_grid(2, 2, 0.5);

            assert_eq!(lines, vec!["POINT (0 0)", "POINT (0.5 0)", "POINT (0 0.5)", "POINT (0.5 0.5)"]);
        }
    }
}
