pub mod csv_email_source;
pub mod csv_table_sink;
pub mod http_client;
pub mod progress_adapter;
pub mod raw_json_sink;

pub use csv_email_source::CsvEmailSource;
pub use csv_table_sink::{derive_output_path, CsvTableSink};
pub use http_client::ReqwestLookup;
pub use progress_adapter::LogProgress;
pub use raw_json_sink::RawJsonSink;
