//! Data model for converting a clinical-study data dictionary into an i2b2
//! concept ontology and fact table.

pub mod concept;
pub mod config;
pub mod dates;
pub mod error;
pub mod fact;
pub mod lookup;
pub mod table;
pub mod variable;

pub use concept::{ConceptDefinition, ConceptType, IndexEntry, MAX_CODE_LEN, RawValueToken};
pub use config::{DEFAULT_TIME_VAR_KEY, DictFormat, EtlConfig, TimeUnit, TimeVarPattern};
pub use dates::{parse_base_date, parse_calendar_date};
pub use error::{ConfigError, Result};
pub use fact::{EventDate, Fact, FactCodeOrigin, UNRESOLVED_DATE};
pub use lookup::{DemographicRow, DemographicsTable, IcdRow, IcdTable, VisitDateTable};
pub use table::{RawDataTable, RowView};
pub use variable::{DeclaredType, Enumeration, VariableDefinition};
