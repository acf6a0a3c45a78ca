//! Text grid display surface

use pairdist_core::{
    AlignError, AlignResult, Cost, DisplaySurface, DistanceMatrix, FillObserver, Sequence,
};
use std::fmt;

/// Terminal rendering of the distance matrix. Cells not yet written print as `.`.
pub struct TextGrid {
    labels: Vec<String>,
    matrix: DistanceMatrix,
    filled: Vec<bool>,
}

impl TextGrid {
    pub fn new(sequences: &[Sequence]) -> Self {
        let n = sequences.len();
        Self {
            labels: sequences.iter().map(|s| s.id.clone()).collect(),
            matrix: DistanceMatrix::new(n),
            filled: vec![false; n * n],
        }
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    fn cell_text(&self, row: usize, column: usize) -> String {
        let n = self.matrix.size();
        match self.matrix.get(row, column) {
            Some(cost) if self.filled[row * n + column] => cost.to_string(),
            _ => ".".to_string(),
        }
    }
}

impl DisplaySurface for TextGrid {
    fn set_cell(&mut self, column: usize, row: usize, cost: Cost) -> AlignResult<()> {
        self.matrix.set_cell(column, row, cost)?;
        let n = self.matrix.size();
        self.filled
            .get_mut(row * n + column)
            .map(|slot| *slot = true)
            .ok_or_else(|| AlignError::surface("grid cell index overflow"))
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.matrix.size();
        let label_width = self.labels.iter().map(String::len).max().unwrap_or(0);
        let cell_width = (0..n)
            .flat_map(|row| (0..n).map(move |column| (row, column)))
            .map(|(row, column)| self.cell_text(row, column).len())
            .chain(std::iter::once(n.saturating_sub(1).to_string().len()))
            .max()
            .unwrap_or(1);

        write!(f, "{:>w$}  ", "", w = label_width + 4)?;
        for column in 0..n {
            write!(f, " {:>w$}", column, w = cell_width)?;
        }
        writeln!(f)?;

        for (row, label) in self.labels.iter().enumerate() {
            write!(f, "{:>3} {:<w$}  ", row, label, w = label_width)?;
            for column in 0..n {
                write!(f, " {:>w$}", self.cell_text(row, column), w = cell_width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Logs fill progress at every tenth of the matrix.
#[derive(Default)]
pub struct ProgressLogger {
    next_report: usize,
}

impl ProgressLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FillObserver for ProgressLogger {
    fn on_cell(&mut self, completed: usize, total: usize) {
        if completed >= self.next_report {
            log::debug!("Filled {}/{} cells", completed, total);
            self.next_report = completed + (total / 10).max(1);
        }
    }
}
