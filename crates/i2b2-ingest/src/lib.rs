pub mod config;
pub mod csv_table;
pub mod dictionary;
pub mod error;
pub mod lookup;
pub mod text;

pub use config::{load_config, parse_config};
pub use csv_table::read_data_table;
pub use dictionary::{DictionaryRecord, DictionaryTable, parse_dictionary, read_dictionary};
pub use error::{IngestError, Result};
pub use lookup::{read_demographics, read_icd_table, read_visit_dates};
pub use text::read_text;
