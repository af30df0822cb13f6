//! Text renderings of the board.

use crate::board::Board;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardFormat {
    /// One line per row of `X`, `O` and `.` markers.
    #[default]
    Plain,
    /// Column header and row indices, cells aligned in columns.
    Standard,
}

impl Board {
    /// Renders the board in the given format.
    pub fn render(&self, format: BoardFormat) -> String {
        match format {
            BoardFormat::Plain => self.render_plain(),
            BoardFormat::Standard => self.render_standard(),
        }
    }

    fn render_plain(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.marker()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_standard(&self) -> String {
        Standard(self).to_string()
    }
}

/// Display adapter for [`BoardFormat::Standard`].
struct Standard<'a>(&'a Board);

impl fmt::Display for Standard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..self.0.size() {
            write!(f, "{col:>3}")?;
        }
        for (row, cells) in self.0.rows().enumerate() {
            write!(f, "\n{row:>2}")?;
            for cell in cells {
                write!(f, "{:>3}", cell.marker())?;
            }
        }
        Ok(())
    }
}
