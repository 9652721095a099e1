pub mod csv_file;

pub use csv_file::CsvObservationProvider;
