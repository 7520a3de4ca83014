pub mod context;
pub mod dictionary;
pub mod error;
pub mod filter;
pub mod index;
pub mod mapper;
pub mod overrides;
pub mod synthesis;
pub mod temporal;

pub use context::{EtlContext, LookupTables};
pub use dictionary::variables_from_dictionary;
pub use error::{MappingError, Result};
pub use filter::{ConceptFilter, IcdVersion, icd_concepts};
pub use index::ConceptIndex;
pub use mapper::{FactMapper, MappedFacts, MappingReport};
pub use overrides::{DemographicOverride, IcdOverride};
pub use synthesis::{
    ConceptCode, Ontology, SynthesisOptions, SynthesisReport, VALUE_LEAF, build_code,
    canonicalize, synthesize,
};
pub use temporal::{
    AnomalyKind, DateAnomaly, DateMode, DateOutcome, DeltaUnit, TemporalResolver, TimeSource,
    TimeVarTable,
};
