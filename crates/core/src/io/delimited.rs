//! CSV reading/writing with header-based column lookup

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::coords::CoordinateSet;
use crate::error::{Error, Result};
use crate::points::{QueryPoints, ReferencePoints};
use crate::table::AggregationTable;

/// Header names of the columns holding each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNames {
    /// Identifier column (query tables)
    pub id: String,
    /// Longitude column
    pub lon: String,
    /// Latitude column
    pub lat: String,
    /// Population column (reference tables, population-weighted mean only)
    pub pop: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "id".into(),
            lon: "lon".into(),
            lat: "lat".into(),
            pop: "pop".into(),
        }
    }
}

/// Parsed table: header row plus all records.
struct Table {
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
}

impl Table {
    fn read<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let records = csv_reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    fn strings(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.column_index(name)?;
        Ok(self
            .records
            .iter()
            .map(|r| r.get(idx).unwrap_or_default().to_string())
            .collect())
    }

    /// Numeric column; empty cells and `NA` read as NaN.
    fn numbers(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, r)| {
                let cell = r.get(idx).unwrap_or_default();
                if cell.is_empty() || cell == "NA" {
                    return Ok(f64::NAN);
                }
                cell.parse::<f64>().map_err(|_| Error::InvalidValue {
                    column: name.to_string(),
                    row: row + 1,
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    fn coordinates(&self, columns: &ColumnNames) -> Result<CoordinateSet> {
        CoordinateSet::new(self.numbers(&columns.lon)?, self.numbers(&columns.lat)?)
    }
}

/// Read a coordinate set from the lon/lat columns of a CSV stream.
pub fn read_coordinates<R: Read>(reader: R, columns: &ColumnNames) -> Result<CoordinateSet> {
    Table::read(reader)?.coordinates(columns)
}

/// Read one numeric column from a CSV stream.
pub fn read_column<R: Read>(reader: R, name: &str) -> Result<Vec<f64>> {
    Table::read(reader)?.numbers(name)
}

/// Read query points (id, lon, lat) from a CSV stream.
pub fn read_query_points<R: Read>(reader: R, columns: &ColumnNames) -> Result<QueryPoints> {
    let table = Table::read(reader)?;
    QueryPoints::new(table.strings(&columns.id)?, table.coordinates(columns)?)
}

/// Read reference points from a CSV stream.
///
/// `measure` names the measure column, if one is needed. The population
/// column is read only when `with_population` is set.
pub fn read_reference_points<R: Read>(
    reader: R,
    columns: &ColumnNames,
    measure: Option<&str>,
    with_population: bool,
) -> Result<ReferencePoints> {
    let table = Table::read(reader)?;
    let mut points = ReferencePoints::new(table.coordinates(columns)?);
    if let Some(measure) = measure {
        points = points.with_measures(table.numbers(measure)?)?;
    }
    if with_population {
        points = points.with_population(table.numbers(&columns.pop)?)?;
    }
    Ok(points)
}

/// Read a coordinate set from a CSV file.
pub fn read_coordinates_csv<P: AsRef<Path>>(path: P, columns: &ColumnNames) -> Result<CoordinateSet> {
    let file = File::open(path.as_ref())?;
    read_coordinates(BufReader::new(file), columns)
}

/// Read one numeric column from a CSV file.
pub fn read_column_csv<P: AsRef<Path>>(path: P, name: &str) -> Result<Vec<f64>> {
    let file = File::open(path.as_ref())?;
    read_column(BufReader::new(file), name)
}

/// Read query points from a CSV file.
pub fn read_query_csv<P: AsRef<Path>>(path: P, columns: &ColumnNames) -> Result<QueryPoints> {
    let file = File::open(path.as_ref())?;
    read_query_points(BufReader::new(file), columns)
}

/// Read reference points from a CSV file.
pub fn read_reference_csv<P: AsRef<Path>>(
    path: P,
    columns: &ColumnNames,
    measure: Option<&str>,
    with_population: bool,
) -> Result<ReferencePoints> {
    let file = File::open(path.as_ref())?;
    read_reference_points(BufReader::new(file), columns, measure, with_population)
}

/// Write an aggregation table as `id,<value column>` CSV.
pub fn write_table<W: Write>(writer: W, table: &AggregationTable) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["id", table.kind().column_name()])?;
    for record in table.iter() {
        let value = record.value.to_string();
        w.write_record([record.id.as_str(), value.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Write an aggregation table to a CSV file.
pub fn write_table_csv<P: AsRef<Path>>(path: P, table: &AggregationTable) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_table(BufWriter::new(file), table)
}

/// Write a single named column of values.
pub fn write_vector<W: Write>(writer: W, header: &str, values: &[f64]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record([header])?;
    for v in values {
        w.write_record([v.to_string()])?;
    }
    w.flush()?;
    Ok(())
}

/// Write a matrix with one CSV row per matrix row and columns `y1..yk`.
pub fn write_matrix<W: Write>(writer: W, matrix: &Array2<f64>) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    let header: Vec<String> = (1..=matrix.ncols()).map(|j| format!("y{}", j)).collect();
    w.write_record(&header)?;
    for row in matrix.rows() {
        w.write_record(row.iter().map(|v| v.to_string()))?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ResultKind;

    const QUERY: &str = "\
id,lon,lat,name
a,-73.98,40.75,nyc
b,-0.12,51.50,london
";

    const REFERENCE: &str = "\
x,y,temp,people
-74.0,40.7,21.5,100
-0.1,51.5,NA,0
";

    #[test]
    fn test_read_query_points() {
        let q = read_query_points(QUERY.as_bytes(), &ColumnNames::default()).unwrap();
        assert_eq!(q.ids(), &["a", "b"]);
        assert_eq!(q.coords().lon(), &[-73.98, -0.12]);
        assert_eq!(q.coords().lat(), &[40.75, 51.50]);
    }

    #[test]
    fn test_read_reference_with_custom_columns() {
        let columns = ColumnNames {
            lon: "x".into(),
            lat: "y".into(),
            pop: "people".into(),
            ..Default::default()
        };
        let r = read_reference_points(REFERENCE.as_bytes(), &columns, Some("temp"), true).unwrap();
        let measures = r.measures().unwrap();
        assert_eq!(measures[0], 21.5);
        assert!(measures[1].is_nan());
        assert_eq!(r.population(), Some(&[100.0, 0.0][..]));
    }

    #[test]
    fn test_read_column() {
        let d = read_column("distance,note\n10.5,a\n,b\n2e3,c\n".as_bytes(), "distance").unwrap();
        assert_eq!(d[0], 10.5);
        assert!(d[1].is_nan());
        assert_eq!(d[2], 2000.0);
    }

    #[test]
    fn test_missing_column() {
        let err = read_reference_points(REFERENCE.as_bytes(), &ColumnNames::default(), None, false)
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "lon"));
    }

    #[test]
    fn test_invalid_number() {
        let data = "id,lon,lat\na,east,1.0\n";
        let err = read_query_points(data.as_bytes(), &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_write_table() {
        let q = read_query_points(QUERY.as_bytes(), &ColumnNames::default()).unwrap();
        let table = q.to_table(ResultKind::WeightedMeasure, vec![1.5, 2.0]).unwrap();

        let mut buf = Vec::new();
        write_table(&mut buf, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "id,wmeasure\na,1.5\nb,2\n");
    }

    #[test]
    fn test_write_table_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let q = read_query_points(QUERY.as_bytes(), &ColumnNames::default()).unwrap();
        let table = q.to_table(ResultKind::MinDistance, vec![0.0, 10.0]).unwrap();

        write_table_csv(&path, &table).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,mindist\n"));
    }

    #[test]
    fn test_write_matrix() {
        let m = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let mut buf = Vec::new();
        write_matrix(&mut buf, &m).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "y1,y2\n0,1\n2,3\n");
    }
}
