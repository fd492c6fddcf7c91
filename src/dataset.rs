//! Reading and writing labeled feature vectors as comma-separated text.
//!
//! One record per line: every token but the last is a real number, the last token is
//! the label. There is no header row and no quoting, so labels cannot contain commas.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::ops::Deref;
use std::path::Path;

use log::{debug, warn};

use crate::common_types::LabeledVector;
use crate::error::{KnnError, Result};

fn parse_number(token: &str) -> Result<f64> {
    // Surrounding whitespace is tolerated around numbers, never stripped from labels.
    token.trim().parse::<f64>().map_err(|_| KnnError::format(token))
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Parses one line of the form `x1,x2,...,xn,label`.
///
/// The label is kept verbatim. A line with a single token gives an empty feature vector.
pub fn parse_record(line: &str) -> Result<LabeledVector> {
    let line = strip_line_ending(line);
    let (features, label) = match line.rsplit_once(',') {
        Some((features, label)) => {
            let features = features.split(',').map(parse_number).collect::<Result<Vec<f64>>>()?;
            (features, label)
        }
        None => (Vec::new(), line),
    };
    Ok(LabeledVector::new(features, label.to_string()))
}

/// Parses an unlabeled line of comma-separated numbers, as typed at the console.
pub fn parse_features(line: &str) -> Result<Vec<f64>> {
    strip_line_ending(line).split(',').map(parse_number).collect()
}

/// An ordered, immutable collection of labeled vectors loaded from one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<LabeledVector>,
}

impl Dataset {
    pub fn new(points: Vec<LabeledVector>) -> Self {
        Dataset { points }
    }

    /// Loads every record of the file at `path`.
    ///
    /// Zero-length lines are skipped. Either the whole file loads or an error is returned:
    /// [`KnnError::Io`] naming the path, or [`KnnError::Format`] with the offending line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| KnnError::io(path, e))?;
        let dataset = Self::read(file, path)?;
        debug!("loaded {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Reads records from any reader; I/O errors are reported against `<input>`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::read(reader, Path::new("<input>"))
    }

    fn read<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let mut points = Vec::new();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|e| KnnError::io(source, e))?;
            if line.is_empty() {
                continue;
            }
            let point = parse_record(&line).map_err(|e| e.with_line(index + 1))?;
            points.push(point);
        }

        let dataset = Dataset { points };
        dataset.warn_on_mixed_dimensions(source);
        Ok(dataset)
    }

    fn warn_on_mixed_dimensions(&self, source: &Path) {
        let Some(expected) = self.dimensionality() else { return };
        if let Some((index, point)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, p)| p.dimensionality() != expected)
        {
            warn!(
                "{}: record {} has {} features, the first record has {}",
                source.display(),
                index + 1,
                point.dimensionality(),
                expected
            );
        }
    }

    /// Writes the dataset to `path` in the same format `load` reads.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| KnnError::io(path, e))?;
        self.write(file, path)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        self.write(writer, Path::new("<output>"))
    }

    fn write<W: Write>(&self, writer: W, target: &Path) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);

        for point in &self.points {
            if point.label.contains([',', '\n', '\r']) {
                return Err(KnnError::InvalidArgument(format!(
                    "label {:?} cannot be written without quoting",
                    point.label
                )));
            }
            // Would be an empty line, which the loader skips.
            if point.features.is_empty() && point.label.is_empty() {
                return Err(KnnError::InvalidArgument(
                    "a record with no features and an empty label cannot be written".to_string(),
                ));
            }
            let mut fields: Vec<String> = point.features.iter().map(f64::to_string).collect();
            fields.push(point.label.clone());
            csv_writer.write_record(&fields).map_err(|e| from_csv_error(e, target))?;
        }
        csv_writer.flush().map_err(|e| KnnError::io(target, e))
    }

    pub fn points(&self) -> &[LabeledVector] {
        &self.points
    }

    pub fn into_points(self) -> Vec<LabeledVector> {
        self.points
    }

    /// Feature count of the first record, if any.
    pub fn dimensionality(&self) -> Option<usize> {
        self.points.first().map(LabeledVector::dimensionality)
    }
}

fn from_csv_error(err: csv::Error, target: &Path) -> KnnError {
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => KnnError::io(target, io_err),
        other => KnnError::io(target, std::io::Error::other(format!("{other:?}"))),
    }
}

impl Deref for Dataset {
    type Target = [LabeledVector];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl From<Vec<LabeledVector>> for Dataset {
    fn from(points: Vec<LabeledVector>) -> Self {
        Dataset::new(points)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledVector;
    type IntoIter = std::slice::Iter<'a, LabeledVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
