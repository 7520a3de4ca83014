//! Library side of the i2b2 ETL command line.

pub mod logging;
pub mod pipeline;
pub mod types;
