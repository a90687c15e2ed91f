pub mod upload_csv;

pub use upload_csv::UploadCsvError;
