//! Phase-space input file reader.
//!
//! Macro-particle files are whitespace-separated text, one record per line:
//!
//! ```text
//! # w      x      y      z      px     py     pz     t
//! 1.0e4    0.0    1.2   -0.4    10.0   0.0    0.0    5.0
//! ```
//!
//! Values are in the configured I/O units. `#` lines and blank lines are
//! skipped. Weights are renormalized against the requested event count
//! before a run starts.

use crate::domain::{ParserResult, SimError, SimResult};
use std::fs;
use std::path::Path;

const RECORD_COLUMNS: usize = 8;

/// One weighted macro-particle record, still in file units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroParticle {
    pub weight: f64,
    pub position: [f64; 3],
    pub momentum: [f64; 3],
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSpaceFile {
    records: Vec<MacroParticle>,
}

impl PhaseSpaceFile {
    pub fn read(path: &Path) -> SimResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| {
            SimError::io_system(
                "IO.PHASE_SPACE_READ",
                format!(
                    "failed to read phase-space file '{}': {}",
                    path.display(),
                    source
                ),
            )
        })?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> ParserResult<Self> {
        let mut records = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut values = [0.0_f64; RECORD_COLUMNS];
            let mut tokens = trimmed.split_whitespace();
            for (column, slot) in values.iter_mut().enumerate() {
                let token = tokens.next().ok_or_else(|| {
                    SimError::input_validation(
                        "INPUT.PHASE_SPACE_COLUMNS",
                        format!(
                            "line {}: expected {} columns (w x y z px py pz t), found {}",
                            line_number, RECORD_COLUMNS, column
                        ),
                    )
                })?;
                *slot = token.parse::<f64>().map_err(|_| {
                    SimError::input_validation(
                        "INPUT.PHASE_SPACE_NUMBER",
                        format!(
                            "line {}: column {} is not a number: '{}'",
                            line_number,
                            column + 1,
                            token
                        ),
                    )
                })?;
            }

            let [w, x, y, z, px, py, pz, t] = values;
            records.push(MacroParticle {
                weight: w,
                position: [x, y, z],
                momentum: [px, py, pz],
                time: t,
            });
        }

        if records.is_empty() {
            return Err(SimError::input_validation(
                "INPUT.PHASE_SPACE_EMPTY",
                "phase-space file holds no macro-particle records",
            ));
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[MacroParticle] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.records.iter().map(|record| record.weight).sum()
    }

    /// Rescales every weight for a run of `n_events` events. With the run
    /// emitting record `i mod n` for event `i`, a full cycle of the records
    /// reproduces the file's total weight.
    pub fn normalize_weights(&mut self, n_events: usize) -> SimResult<()> {
        if n_events == 0 {
            return Err(SimError::input_validation(
                "INPUT.EVENT_COUNT",
                "cannot normalize weights for a run of 0 events",
            ));
        }

        let scale = n_events as f64 / self.records.len() as f64;
        for record in &mut self.records {
            record.weight /= scale;
        }
        Ok(())
    }
}
