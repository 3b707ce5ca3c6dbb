//! Reading operands from disk and shaping results for output.
//!
//! Tables (`.csv` without header, `.json` nested rows or a flat list) are
//! read into `f64`, then imported through the library's array bridge at the
//! requested precision so shape and dtype rules are the library's own.

use anyhow::{bail, Context, Result};
use linalg4::{AnyMatrix4, AnyVector4, ArrayView, DType, Layout, Matrix4, Scalar, Vector4};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dense 2D table in row-major order.
#[derive(Debug, PartialEq)]
pub struct Table {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTable {
    Nested(Vec<Vec<f64>>),
    Flat(Vec<f64>),
}

pub fn read_table(path: &Path) -> Result<Table> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv(path),
        Some("json") => read_json(path),
        other => bail!(
            "unsupported input {} (extension {:?}); expected .csv or .json",
            path.display(),
            other
        ),
    }
}

fn read_csv(path: &Path) -> Result<Table> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    let (rows, cols) = df.shape();
    tracing::debug!(rows, cols, path = %path.display(), "input_csv_shape");

    let mut columns = Vec::with_capacity(cols);
    for series in df.get_columns() {
        let cast = series.cast(&DataType::Float64)?;
        let values: Vec<f64> = cast
            .f64()?
            .into_iter()
            .map(|v| v.context("empty cell"))
            .collect::<Result<_>>()
            .with_context(|| format!("column {} of {}", series.name(), path.display()))?;
        columns.push(values);
    }
    let values = (0..rows)
        .flat_map(|r| columns.iter().map(move |col| col[r]))
        .collect();
    Ok(Table { rows, cols, values })
}

fn read_json(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed: JsonTable = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {} as a numeric array", path.display()))?;
    Ok(match parsed {
        JsonTable::Flat(values) => Table {
            rows: 1,
            cols: values.len(),
            values,
        },
        JsonTable::Nested(rows) => {
            let width = rows.first().map_or(0, Vec::len);
            if rows.iter().any(|r| r.len() != width) {
                bail!("ragged rows in {}", path.display());
            }
            Table {
                rows: rows.len(),
                cols: width,
                values: rows.into_iter().flatten().collect(),
            }
        }
    })
}

/// Import a 4x4 operand. With `Layout::ColumnMajor` the file lists columns.
pub fn load_matrix(path: &Path, dtype: DType, layout: Layout) -> Result<AnyMatrix4> {
    let table = read_table(path)?;
    let view = ArrayView::from_slice(&table.values, &[table.rows, table.cols], Layout::RowMajor)?;
    let m = AnyMatrix4::from_view_as(&view, dtype)
        .with_context(|| format!("importing matrix from {}", path.display()))?;
    Ok(match layout {
        Layout::RowMajor => m,
        Layout::ColumnMajor => m.transpose(),
    })
}

/// Import a vector from a file, or parse `1,2,3,4` given inline.
pub fn load_vector(arg: &str, dtype: DType) -> Result<AnyVector4> {
    let path = Path::new(arg);
    if !path.exists() {
        let v: Vector4<f64> = arg
            .parse()
            .with_context(|| format!("{arg:?} is neither a file nor an inline vector"))?;
        return Ok(AnyVector4::from_f64(dtype, v.to_array())?);
    }
    let table = read_table(path)?;
    let shape = if table.rows == 1 {
        vec![table.cols]
    } else {
        vec![table.rows, table.cols]
    };
    let view = ArrayView::from_slice(&table.values, &shape, Layout::RowMajor)?;
    AnyVector4::from_view_as(&view, dtype)
        .with_context(|| format!("importing vector from {}", path.display()))
}

/// Result payload, already widened to `f64`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value4 {
    Scalar(f64),
    Vector([f64; 4]),
    Matrix(Vec<[f64; 4]>),
}

/// Matrix rows (or columns, for `Layout::ColumnMajor`) read from the bridge export.
pub fn matrix_value(m: &AnyMatrix4, layout: Layout) -> Value4 {
    match m {
        AnyMatrix4::F32(m) => Value4::Matrix(exported(m, layout)),
        AnyMatrix4::F64(m) => Value4::Matrix(exported(m, layout)),
    }
}

fn exported<T: Scalar>(m: &Matrix4<T>, layout: Layout) -> Vec<[f64; 4]> {
    m.export(layout)
        .data()
        .chunks_exact(4)
        .map(|chunk| std::array::from_fn(|i| chunk[i].as_f64()))
        .collect()
}

pub fn vector_value(v: &AnyVector4) -> Value4 {
    Value4::Vector(v.to_f64())
}
