//! I/O for point tables and computed results
//!
//! Column lookup by header name happens here, before anything reaches the
//! distance and aggregation code, which only ever sees extracted columns.

mod delimited;

pub use delimited::{
    read_column, read_column_csv, read_coordinates, read_coordinates_csv, read_query_csv,
    read_query_points, read_reference_csv, read_reference_points, write_matrix, write_table,
    write_table_csv, write_vector, ColumnNames,
};
