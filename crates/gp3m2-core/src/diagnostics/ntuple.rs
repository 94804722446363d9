//! Columnar CSV ntuple files in the toolkit's analysis format.
//!
//! Each ntuple is one file named `<base>_nt_<name>_t<worker>.csv`, holding a
//! `#`-prefixed header block followed by comma-separated data rows. The
//! header mirrors what the toolkit's CSV analysis manager writes, so
//! downstream analysis scripts keep parsing the output unchanged.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// ASCII codes of the separators declared in the header block.
const SEPARATOR: u8 = b',';
const VECTOR_SEPARATOR: u8 = b';';

pub fn ntuple_file_name(base: &str, ntuple: &str, worker: usize) -> String {
    format!("{}_nt_{}_t{}.csv", base, ntuple, worker)
}

pub struct CsvNtuple {
    writer: BufWriter<File>,
    columns: usize,
    rows: usize,
}

impl CsvNtuple {
    pub fn create(path: &Path, title: &str, columns: &[String]) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "#class tools::wcsv::ntuple")?;
        writeln!(writer, "#title {}", title)?;
        writeln!(writer, "#separator {}", SEPARATOR)?;
        writeln!(writer, "#vector_separator {}", VECTOR_SEPARATOR)?;
        for column in columns {
            writeln!(writer, "#column double {}", column)?;
        }

        Ok(Self {
            writer,
            columns: columns.len(),
            rows: 0,
        })
    }

    pub fn fill_row(&mut self, values: &[f64]) -> io::Result<()> {
        debug_assert_eq!(values.len(), self.columns);

        let mut line = String::with_capacity(16 * values.len());
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                line.push(SEPARATOR as char);
            }
            line.push_str(&value.to_string());
        }
        writeln!(self.writer, "{}", line)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
