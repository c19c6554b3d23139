//! The bundled Iris flower dataset (150 rows, 4 features, 3 classes).
//!
//! Rows follow the commonly distributed corrected version of the UCI data.
//! Features are sepal length, sepal width, petal length and petal width in
//! centimetres; the last column is the class index.

use crate::{
    data::dataset::Dataset,
    error::{Error, Result},
};

const IRIS_CSV: &str = include_str!("../../data/iris.csv");

pub const N_FEATURES: usize = 4;
pub const CLASS_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

pub fn load_iris() -> Result<Dataset> {
    parse_rows(IRIS_CSV)
}

/// Parses `f1,f2,f3,f4,class` rows. The first line is a header.
fn parse_rows(text: &str) -> Result<Dataset> {
    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (idx, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() != N_FEATURES + 1 {
            return Err(Error::Parse {
                line: line_no,
                reason: format!("expected {} columns, got {}", N_FEATURES + 1, cells.len()),
            });
        }

        let row = cells[..N_FEATURES].iter()
            .map(|c| c.parse::<f64>().map_err(|_| Error::Parse {
                line: line_no,
                reason: format!("'{c}' is not a number"),
            }))
            .collect::<Result<Vec<f64>>>()?;
        let label = cells[N_FEATURES].parse::<usize>().map_err(|_| Error::Parse {
            line: line_no,
            reason: format!("class '{}' is not a non-negative integer", cells[N_FEATURES]),
        })?;

        features.push(row);
        labels.push(label);
    }

    if features.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Dataset::new(features, labels, CLASS_NAMES.len())
}
