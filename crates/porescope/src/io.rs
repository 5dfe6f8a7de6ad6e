//! CSV input and output.
//!
//! Coordinates are read from tables with named `x`, `y`, `z` columns and
//! scaled per axis into microns. Sample records are written one row per
//! sample with empty cells for missing values.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use glam::DVec3;
use porescope_core::{
    Dataset, PointSet, PointSetLoader, PorescopeError, Result, SampleRecord, SampleRow,
};

/// Loads point sets from delimited text tables.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvPointLoader {
    columns: [String; 3],
    scale: DVec3,
    delimiter: u8,
}

impl Default for CsvPointLoader {
    fn default() -> Self {
        Self {
            columns: ["x".to_string(), "y".to_string(), "z".to_string()],
            scale: DVec3::ONE,
            delimiter: b',',
        }
    }
}

impl CsvPointLoader {
    /// Loader for comma-separated `x,y,z` tables already in microns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses other header names for the three axes.
    #[must_use]
    pub fn with_columns(mut self, x: &str, y: &str, z: &str) -> Self {
        self.columns = [x.to_string(), y.to_string(), z.to_string()];
        self
    }

    /// Multiplies each axis by its factor, e.g. the pixel size in microns.
    #[must_use]
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads a table from `reader`.
    ///
    /// # Errors
    ///
    /// Fails with [`PorescopeError::MissingColumn`] for an absent axis
    /// column and [`PorescopeError::Parse`] for a non-numeric cell (rows are
    /// 1-based, header excluded).
    pub fn read<R: Read>(&self, reader: R) -> Result<PointSet> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut indices = [0usize; 3];
        for (slot, name) in indices.iter_mut().zip(&self.columns) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| PorescopeError::MissingColumn(name.clone()))?;
        }

        let mut points = Vec::new();
        for (i, row) in rdr.records().enumerate() {
            let row = row?;
            let mut xyz = [0.0; 3];
            for (value, (&index, name)) in xyz.iter_mut().zip(indices.iter().zip(&self.columns)) {
                let cell = row.get(index).unwrap_or_default();
                *value = cell.parse::<f64>().map_err(|err| PorescopeError::Parse {
                    row: i + 1,
                    message: format!("column '{name}' value '{cell}': {err}"),
                })?;
            }
            points.push(DVec3::from_array(xyz) * self.scale);
        }
        log::debug!("read {} points", points.len());
        Ok(PointSet::new(points))
    }
}

impl PointSetLoader for CsvPointLoader {
    /// Reads the table at path `source`.
    fn load(&self, source: &str) -> Result<PointSet> {
        let file = File::open(source)?;
        self.read(file)
    }
}

/// Writes `records` as CSV with a header row.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a SampleRecord>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes every record of `dataset` to the file at `path`, group by group.
pub fn save_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    write_records(file, dataset.iter())
}

/// Reads records written by [`write_records`].
pub fn read_records<R: Read>(reader: R) -> Result<Vec<SampleRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<SampleRow>()
        .map(|row| Ok(SampleRecord::from(row?)))
        .collect()
}

/// Reads a dataset saved by [`save_dataset`].
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let file = File::open(path)?;
    Dataset::from_records(read_records(file)?)
}
