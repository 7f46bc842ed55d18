//! USGS quadrangle index records and loading them into a table.
//!
//! A record line is a 40-character quadrangle name followed by
//! whitespace-separated state, DRG name and the two corner coordinates:
//!
//! ```text
//! Anchorage A-1                           AK o61149a1 -149.000 61.000 -148.750 61.125
//! ```

use crate::chained_hash_map::ChainedHashMap;
use crate::config::TableConfig;
use crate::error::TableError;
use crate::text::{strip_non_alnum, trim_tail, LineReader};
use log::{info, warn};
use std::fmt;
use std::io::{self, BufRead};
use std::num::ParseFloatError;
use thiserror::Error;

/// Width of the fixed quadrangle-name column, in characters.
pub const QUAD_NAME_WIDTH: usize = 40;

#[derive(Error, Debug)]
pub enum QuadError {
    #[error("record has {len} characters, expected at least 40")]
    TooShort { len: usize },

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<QuadError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuadRecord {
    pub quad_name: String,
    pub state: String,
    pub drg_name: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

fn parse_coord(field: &'static str, value: Option<&str>) -> Result<f32, QuadError> {
    let value = value.ok_or(QuadError::MissingField(field))?;
    value.parse().map_err(|source| QuadError::InvalidNumber {
        field,
        value: value.to_string(),
        source,
    })
}

impl QuadRecord {
    /// Parses one record line. The name is tail-trimmed and the DRG name
    /// reduced to alphanumerics so it can serve as a table key.
    pub fn parse(line: &str) -> Result<Self, QuadError> {
        let split = line
            .char_indices()
            .nth(QUAD_NAME_WIDTH)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        let len = line.chars().count();
        if len < QUAD_NAME_WIDTH {
            return Err(QuadError::TooShort { len });
        }
        let (name, rest) = line.split_at(split);

        let mut fields = rest.split_whitespace();
        let state = fields.next().ok_or(QuadError::MissingField("state"))?;
        let drg_name = fields.next().ok_or(QuadError::MissingField("drg_name"))?;
        let x1 = parse_coord("x1", fields.next())?;
        let y1 = parse_coord("y1", fields.next())?;
        let x2 = parse_coord("x2", fields.next())?;
        let y2 = parse_coord("y2", fields.next())?;

        Ok(Self {
            quad_name: trim_tail(name).to_string(),
            state: state.to_string(),
            drg_name: strip_non_alnum(drg_name),
            x1,
            y1,
            x2,
            y2,
        })
    }
}

impl fmt::Display for QuadRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, ({:.3},{:.3}), ({:.3},{:.3})",
            self.quad_name, self.state, self.drg_name, self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// A table built by [`load_table`].
#[derive(Debug)]
pub struct Loaded {
    pub table: ChainedHashMap<QuadRecord>,
    /// Records read, including skipped duplicates.
    pub records: usize,
    /// Records whose DRG name was already present and were not inserted.
    pub duplicates: usize,
}

/// Reads records from `reader` into a table keyed by DRG name.
///
/// Lines longer than `max_line` bytes are cut. Blank lines are skipped. A
/// malformed line aborts the load with its line number.
pub fn load_table<R: BufRead>(
    reader: R,
    config: TableConfig,
    max_line: usize,
) -> Result<Loaded, QuadError> {
    let mut table = ChainedHashMap::with_config(config)?;
    let mut records = 0;
    let mut duplicates = 0;

    for (idx, line) in LineReader::new(reader, max_line).enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = QuadRecord::parse(&line).map_err(|e| QuadError::Line {
            line: idx + 1,
            source: Box::new(e),
        })?;
        records += 1;

        let key = record.drg_name.clone();
        match table.insert(&key, record) {
            Ok(_) => {}
            Err(TableError::DuplicateKey { key }) => {
                warn!("line {}: duplicate DRG name {key:?} skipped", idx + 1);
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        "loaded {} records ({} duplicates) into {} buckets",
        records,
        duplicates,
        table.capacity()
    );
    Ok(Loaded {
        table,
        records,
        duplicates,
    })
}
