//! This module implements the data loader.
//!
//! A training table is a delimited text file whose first row names the
//! columns. The last column is the class and must be numeric; every other
//! column becomes an explanatory attribute. A column is continuous if every
//! cell in it is a number, otherwise it is discrete and its domain is the set
//! of distinct cells.
//!
//! # Example
//! ```rust
//! use regtree::input::{self, InputFormat};
//! let fmt = InputFormat::csv_format();
//! let dataset = input::load("dataset/servo/servo.csv", fmt).unwrap();
//! assert_eq!(dataset.class_name(), "class");
//! assert_eq!(dataset.attributes().len(), 4);
//! ```

use crate::data::{Attribute, Dataset, Example, Value, ValueType};
use crate::errors::{RegTreeError, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};

use regex::Regex;
use serde_derive::{Deserialize, Serialize};

const NUMBER_PATTERN: &str = r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$";

/// The input file format struct.
#[derive(Copy, Debug, Clone, Serialize, Deserialize)]
pub struct InputFormat {
    /// Delimeter of the data file.
    pub delimeter: char,
}

impl InputFormat {
    /// Return a default CSV input format.
    /// # Example
    /// ```rust
    /// use regtree::input::InputFormat;
    /// let fmt = InputFormat::csv_format();
    /// println!("{}", fmt.to_string());
    /// ```
    pub fn csv_format() -> InputFormat {
        InputFormat { delimeter: ',' }
    }

    /// Transform the input format to human readable string.
    pub fn to_string(&self) -> String {
        format!("Delemeter: [{}]", self.delimeter)
    }

    /// Set the column delimeter.
    /// # Example
    /// ```rust
    /// use regtree::input::InputFormat;
    /// let mut fmt = InputFormat::csv_format();
    /// fmt.set_delimeter('\t');
    /// ```
    pub fn set_delimeter(&mut self, delim: char) {
        self.delimeter = delim;
    }
}

impl Default for InputFormat {
    fn default() -> Self {
        InputFormat::csv_format()
    }
}

fn split_line(line: &str, delim: char) -> Vec<String> {
    line.split(delim).map(|cell| cell.trim().to_string()).collect()
}

/// Load a training table from any buffered reader.
///
/// # Error
/// Raise a training data error if the table is malformed.
pub fn load_csv<R: BufRead>(reader: R, input_format: InputFormat) -> Result<Dataset> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| RegTreeError::TrainingData(format!("cannot read table: {}", e)))?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    let mut rows = lines.iter().map(|l| split_line(l, input_format.delimeter));

    let header = rows.next().ok_or("the table is empty")?;
    if header.len() < 3 {
        return Err(RegTreeError::TrainingData(format!(
            "the table has {} columns, at least 3 are required",
            header.len()
        )));
    }
    let cells: Vec<Vec<String>> = rows.collect();
    if cells.is_empty() {
        return Err(RegTreeError::from("the table has no data rows"));
    }
    for (i, row) in cells.iter().enumerate() {
        if row.len() != header.len() {
            return Err(RegTreeError::TrainingData(format!(
                "row {} has {} columns, the header has {}",
                i + 1,
                row.len(),
                header.len()
            )));
        }
    }

    let number = Regex::new(NUMBER_PATTERN).map_err(|e| RegTreeError::TrainingData(e.to_string()))?;
    let is_numeric = |column: usize| cells.iter().all(|row| number.is_match(&row[column]));

    let class_column = header.len() - 1;
    if !is_numeric(class_column) {
        return Err(RegTreeError::TrainingData(format!(
            "the class column '{}' is not numeric",
            header[class_column]
        )));
    }

    let attributes: Vec<Attribute> = header[..class_column]
        .iter()
        .enumerate()
        .map(|(column, name)| {
            if is_numeric(column) {
                Attribute::continuous(name, column)
            } else {
                let domain: BTreeSet<&str> = cells.iter().map(|row| row[column].as_str()).collect();
                Attribute::discrete(name, column, domain)
            }
        })
        .collect();

    let mut examples = Vec::with_capacity(cells.len());
    for (i, row) in cells.iter().enumerate() {
        let mut values = Vec::with_capacity(class_column);
        for attribute in attributes.iter() {
            let cell = &row[attribute.index()];
            if attribute.is_discrete() {
                values.push(Value::Discrete(cell.clone()));
            } else {
                values.push(Value::Continuous(parse_finite(cell, i + 1)?));
            }
        }
        let class_value = parse_finite(&row[class_column], i + 1)?;
        examples.push(Example::new(values, class_value));
    }

    debug!(
        "loaded table: {} rows, attributes [{}]",
        examples.len(),
        attributes
            .iter()
            .map(|a| if a.is_discrete() {
                format!("{} (discrete)", a.name())
            } else {
                format!("{} (continuous)", a.name())
            })
            .collect::<Vec<_>>()
            .join(", ")
    );
    Dataset::new(attributes, &header[class_column], examples)
}

fn parse_finite(cell: &str, row: usize) -> Result<ValueType> {
    let v = cell.parse::<ValueType>()?;
    if !v.is_finite() {
        return Err(RegTreeError::TrainingData(format!(
            "row {} holds the non-finite number '{}'",
            row, cell
        )));
    }
    Ok(v)
}

/// Load file with certain input format.
///
/// # Error
/// Raise a training data error if the file cannot be read or is malformed.
pub fn load(file_name: &str, input_format: InputFormat) -> Result<Dataset> {
    let file = File::open(file_name)
        .map_err(|e| RegTreeError::TrainingData(format!("cannot open {}: {}", file_name, e)))?;
    let dataset = load_csv(BufReader::new(file), input_format)?;
    info!("loaded {} examples from {}", dataset.len(), file_name);
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AttributeKind;
    use crate::errors::ErrorKind;

    fn parse(text: &str) -> Result<Dataset> {
        load_csv(text.as_bytes(), InputFormat::csv_format())
    }

    #[test]
    fn infers_column_kinds() {
        let ds = parse("motor, pgain ,vgain,class\nB,4,2,0.5\nA,3,1.5,1.1\nB,-5,.5e1,2\n\n").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.class_name(), "class");
        let names: Vec<&str> = ds.attributes().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["motor", "pgain", "vgain"]);

        let domain: Vec<&String> = ds.attribute(0).domain().unwrap().iter().collect();
        assert_eq!(domain, vec!["A", "B"]);
        assert!(matches!(ds.attribute(1).kind(), AttributeKind::Continuous));
        assert_eq!(ds.value(2, 1), &Value::Continuous(-5.0));
        assert_eq!(ds.value(2, 2), &Value::Continuous(5.0));
        assert_eq!(ds.class_value(1), 1.1);
    }

    #[test]
    fn mixed_column_is_discrete() {
        let ds = parse("a,b,class\n1,x,1\nfoo,2,2\n").unwrap();
        assert!(ds.attribute(0).is_discrete());
        assert!(ds.attribute(1).is_discrete());
        assert_eq!(ds.value(0, 0), &Value::Discrete("1".to_string()));
    }

    #[test]
    fn tab_delimited() {
        let mut fmt = InputFormat::csv_format();
        fmt.set_delimeter('\t');
        let ds = load_csv("a\tb\tc\nx\t1\t2\n".as_bytes(), fmt).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(fmt.to_string(), "Delemeter: [\t]");
    }

    #[test]
    fn rejects_malformed_tables() {
        let cases = [
            "",
            "a,class\nx,1\n",
            "a,b,class\n",
            "a,b,class\nx,1,low\n",
            "a,b,class\nx,1,2\ny,2\n",
            "a,b,class\nx,1e999,2\n",
        ];
        for text in cases.iter() {
            let err = parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TrainingData, "table {:?}", text);
        }
    }

    #[test]
    fn missing_file() {
        let err = load("dataset/none/missing.csv", InputFormat::csv_format()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TrainingData);
    }

    #[test]
    fn servo_table() {
        let ds = load("dataset/servo/servo.csv", InputFormat::default()).unwrap();
        assert_eq!(ds.attributes().len(), 4);
        assert!(ds.attribute(0).is_discrete());
        assert!(ds.attribute(1).is_discrete());
        assert!(!ds.attribute(2).is_discrete());
        assert!(!ds.attribute(3).is_discrete());
        assert_eq!(ds.attribute(0).domain().unwrap().len(), 5);
    }
}
