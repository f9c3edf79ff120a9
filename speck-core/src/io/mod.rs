mod json;
mod table;

pub use json::blobs_to_json;
pub use json::write_blobs_json;

pub use table::blobs_to_dataframe;
pub use table::write_blobs;
pub use table::write_table;
pub use table::write_table_csv;
pub use table::write_table_pq;
pub use table::write_table_tsv;
