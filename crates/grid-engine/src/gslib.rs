//! GSLIB text persistence.
//!
//! A GSLIB grid file is line oriented:
//!
//! ```text
//! <title>{[<TypeName>][<compact structure>]}
//! 1
//! <column name>
//! <value 0>
//! ...
//! <value N-1>
//! ```
//!
//! Values are written in flat order (I fastest). Empty cells are written as a
//! caller-chosen numeric sentinel and read back as empty.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::cell::CellValue;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::structure::GridStructure;

/// Number of header lines before the first value.
pub const HEADER_LINES: usize = 3;

/// Parsed GSLIB header.
#[derive(Debug, Clone, PartialEq)]
pub struct GslibHeader {
    pub title: String,
    /// Cell type name embedded in the title line, if any.
    pub type_name: Option<String>,
    /// Grid structure embedded in the title line, if any.
    pub structure: Option<GridStructure>,
    pub column: String,
}

impl GslibHeader {
    /// Build the title line for a grid of `T` over `structure`.
    pub fn title_line<T: CellValue>(title: &str, structure: &GridStructure) -> String {
        format!("{title}{{[{}][{}]}}", T::TYPE_NAME, structure)
    }

    /// Split a title line into the plain title and the embedded type name and
    /// structure. Lines without the `{[..][..]}` suffix are plain titles.
    pub fn parse_title_line(line: &str) -> Result<(String, Option<String>, Option<GridStructure>)> {
        let line = line.trim_end();
        let Some(start) = line.rfind("{[") else {
            return Ok((line.to_string(), None, None));
        };
        let inner = line[start + 2..].strip_suffix("]}").ok_or_else(|| {
            GridError::file_format(format!("unterminated type/structure block in title '{line}'"))
        })?;
        let (type_name, structure) = inner.split_once("][").ok_or_else(|| {
            GridError::file_format(format!("expected [type][structure] in title '{line}'"))
        })?;
        let structure = GridStructure::from_compact_string(structure)?;
        Ok((
            line[..start].to_string(),
            Some(type_name.to_string()),
            Some(structure),
        ))
    }
}

impl<T: CellValue> Grid<T> {
    /// Write the grid to a GSLIB file, replacing any existing file.
    pub fn write_gslib(
        &self,
        path: impl AsRef<Path>,
        title: &str,
        column: &str,
        null_sentinel: f64,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_gslib_to(&mut writer, title, column, null_sentinel)?;
        writer.flush()?;
        debug!(
            path = %path.display(),
            cells = self.count(),
            nulls = self.null_cell_count(),
            "Wrote GSLIB grid"
        );
        Ok(())
    }

    /// Write the GSLIB representation to any writer.
    pub fn write_gslib_to<W: Write>(
        &self,
        writer: &mut W,
        title: &str,
        column: &str,
        null_sentinel: f64,
    ) -> Result<()> {
        writeln!(writer, "{}", GslibHeader::title_line::<T>(title, self.structure()))?;
        writeln!(writer, "1")?;
        writeln!(writer, "{column}")?;
        for cell in self.iter() {
            match cell {
                Some(value) => writeln!(writer, "{}", value.format_cell())?,
                None => writeln!(writer, "{null_sentinel}")?,
            }
        }
        Ok(())
    }

    /// Load values from a GSLIB file into this grid, keeping its structure.
    ///
    /// The structure embedded in the file is not checked against this grid.
    /// Extra values are ignored and missing values are loaded as empty; both
    /// cases are logged. On error the grid is left unchanged.
    pub fn read_gslib(&mut self, path: impl AsRef<Path>, null_sentinel: f64) -> Result<GslibHeader> {
        let path = path.as_ref();
        let header = self.read_gslib_from(BufReader::new(File::open(path)?), null_sentinel)?;
        debug!(
            path = %path.display(),
            cells = self.count(),
            nulls = self.null_cell_count(),
            "Read GSLIB grid"
        );
        Ok(header)
    }

    /// Load values from any buffered reader holding GSLIB text.
    pub fn read_gslib_from<R: BufRead>(&mut self, reader: R, null_sentinel: f64) -> Result<GslibHeader> {
        let mut lines = reader.lines();
        let header = read_header(&mut lines)?;
        if let Some(type_name) = &header.type_name {
            if type_name != T::TYPE_NAME {
                warn!(
                    file_type = %type_name,
                    grid_type = T::TYPE_NAME,
                    "GSLIB type name differs from grid cell type"
                );
            }
        }
        let values = read_values::<T, _>(&mut lines, self.count(), null_sentinel)?;
        for (offset, value) in values.into_iter().enumerate() {
            self.set_cell_at(offset, value);
        }
        Ok(header)
    }

    /// Create a grid from a GSLIB file, taking the structure from its title
    /// line.
    pub fn open_gslib(path: impl AsRef<Path>, null_sentinel: f64) -> Result<Self> {
        let path = path.as_ref();
        let grid = Self::open_gslib_from(BufReader::new(File::open(path)?), null_sentinel)?;
        debug!(
            path = %path.display(),
            structure = %grid.structure(),
            nulls = grid.null_cell_count(),
            "Opened GSLIB grid"
        );
        Ok(grid)
    }

    /// Same as [`open_gslib`](Self::open_gslib) over a buffered reader.
    pub fn open_gslib_from<R: BufRead>(reader: R, null_sentinel: f64) -> Result<Self> {
        let mut lines = reader.lines();
        let header = read_header(&mut lines)?;
        let structure = header.structure.clone().ok_or_else(|| {
            GridError::file_format(format!(
                "title '{}' carries no grid structure; load into an existing grid instead",
                header.title
            ))
        })?;
        let mut grid = Self::new(structure);
        let values = read_values::<T, _>(&mut lines, grid.count(), null_sentinel)?;
        for (offset, value) in values.into_iter().enumerate() {
            grid.set_cell_at(offset, value);
        }
        Ok(grid)
    }
}

fn read_header<I>(lines: &mut I) -> Result<GslibHeader>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut header = Vec::with_capacity(HEADER_LINES);
    for _ in 0..HEADER_LINES {
        match lines.next() {
            Some(line) => header.push(line?),
            None => {
                return Err(GridError::file_format(format!(
                    "expected {HEADER_LINES} header lines, found {}",
                    header.len()
                )))
            }
        }
    }
    let (title, type_name, structure) = GslibHeader::parse_title_line(&header[0])?;
    Ok(GslibHeader {
        title,
        type_name,
        structure,
        column: header[2].trim().to_string(),
    })
}

/// Parse up to `capacity` values; the result always holds exactly
/// `capacity` entries.
fn read_values<T, I>(lines: &mut I, capacity: usize, null_sentinel: f64) -> Result<Vec<Option<T>>>
where
    T: CellValue,
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut values = Vec::with_capacity(capacity);
    let mut extra = 0usize;
    for (n, line) in lines.enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if values.len() == capacity {
            extra += 1;
            continue;
        }
        let line_no = n + HEADER_LINES + 1;
        let number: f64 = text.parse().map_err(|_| {
            GridError::conversion_failure(format!("line {line_no}: '{text}' is not a number"))
        })?;
        if number == null_sentinel {
            values.push(None);
            continue;
        }
        let value = T::parse_cell(text).ok_or_else(|| {
            GridError::conversion_failure(format!(
                "line {line_no}: '{text}' is not a valid {} value",
                T::TYPE_NAME
            ))
        })?;
        values.push(Some(value));
    }

    if extra > 0 {
        warn!(expected = capacity, extra, "GSLIB file has more values than the grid; ignoring the rest");
    }
    if values.len() < capacity {
        warn!(
            expected = capacity,
            found = values.len(),
            "GSLIB file has fewer values than the grid; filling the rest with no value"
        );
        values.resize(capacity, None);
    }
    Ok(values)
}
