//! Run context built once from the configuration, the dictionary variables
//! and the lookup tables, then shared read-only by every stage.

use i2b2_model::{
    ConceptDefinition, ConfigError, DemographicsTable, EtlConfig, FactCodeOrigin, IcdTable,
    RawDataTable, VariableDefinition, VisitDateTable,
};
use tracing::debug;

use crate::error::Result;
use crate::filter::{ConceptFilter, IcdVersion, icd_concepts};
use crate::mapper::{FactMapper, MappedFacts};
use crate::overrides::{DemographicOverride, IcdOverride};
use crate::synthesis::{Ontology, SynthesisOptions, synthesize};
use crate::temporal::TemporalResolver;

/// External tables loaded by the caller.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub visits: Option<VisitDateTable>,
    pub demographics: Option<DemographicsTable>,
    pub icd9: Option<IcdTable>,
    pub icd10: Option<IcdTable>,
}

impl LookupTables {
    #[must_use]
    pub fn with_visits(mut self, visits: VisitDateTable) -> Self {
        self.visits = Some(visits);
        self
    }

    #[must_use]
    pub fn with_demographics(mut self, demographics: DemographicsTable) -> Self {
        self.demographics = Some(demographics);
        self
    }

    #[must_use]
    pub fn with_icd_table(mut self, version: IcdVersion, table: IcdTable) -> Self {
        match version {
            IcdVersion::Icd9 => self.icd9 = Some(table),
            IcdVersion::Icd10 => self.icd10 = Some(table),
        }
        self
    }
}

#[derive(Debug)]
pub struct EtlContext {
    patient_id: String,
    code_prefix: String,
    ontology: Ontology,
    resolver: TemporalResolver,
    filter: ConceptFilter,
    icd: Option<IcdOverride>,
    demographics: Option<DemographicOverride>,
    icd_concepts: Vec<ConceptDefinition>,
}

impl EtlContext {
    /// Synthesizes the ontology and prepares the date strategy and overrides.
    ///
    /// Fails on mode-specific configuration problems and on lookup tables
    /// the configuration requires but the caller did not supply.
    pub fn new(
        config: &EtlConfig,
        variables: &[VariableDefinition],
        lookups: LookupTables,
    ) -> std::result::Result<Self, ConfigError> {
        let LookupTables {
            visits,
            demographics,
            icd9,
            icd10,
        } = lookups;

        let resolver = TemporalResolver::from_config(config, visits)?;
        let options = SynthesisOptions::from_config(config)?;
        let ontology = synthesize(variables, &options);

        if !config.demographicvars.is_empty() && demographics.is_none() {
            return Err(ConfigError::missing(
                "demographics_file",
                "demographics table was not loaded",
            ));
        }
        let demographics = DemographicOverride::from_config(config, demographics);

        let mut extra_concepts = Vec::new();
        for (version, table) in [(IcdVersion::Icd9, icd9), (IcdVersion::Icd10, icd10)] {
            let Some(table) = table else { continue };
            let system = config.icd_system().ok_or_else(|| {
                ConfigError::missing("icdsystem", "required when ICD tables are configured")
            })?;
            extra_concepts.extend(icd_concepts(&table, &config.pathroot, system, version));
        }

        debug!(
            concepts = ontology.len(),
            icd_concepts = extra_concepts.len(),
            datemode = resolver.mode().code(),
            "built run context"
        );
        Ok(Self {
            patient_id: config.patientid.clone(),
            code_prefix: config.code_prefix().to_string(),
            ontology,
            resolver,
            filter: ConceptFilter::from_config(config),
            icd: IcdOverride::from_config(config),
            demographics,
            icd_concepts: extra_concepts,
        })
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn code_prefix(&self) -> &str {
        &self.code_prefix
    }

    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    pub fn resolver(&self) -> &TemporalResolver {
        &self.resolver
    }

    pub fn filter(&self) -> &ConceptFilter {
        &self.filter
    }

    pub fn icd(&self) -> Option<&IcdOverride> {
        self.icd.as_ref()
    }

    pub fn demographics(&self) -> Option<&DemographicOverride> {
        self.demographics.as_ref()
    }

    /// Concepts for the artifact: unsuppressed synthesized concepts in
    /// index order, then the ICD ontology concepts.
    pub fn artifact_concepts(&self) -> Vec<(&ConceptDefinition, FactCodeOrigin)> {
        self.ontology
            .index
            .entries()
            .iter()
            .filter(|entry| self.filter.keeps(entry))
            .map(|entry| (&entry.concept, FactCodeOrigin::Concept))
            .chain(
                self.icd_concepts
                    .iter()
                    .map(|concept| (concept, FactCodeOrigin::Icd)),
            )
            .collect()
    }

    /// Synthesized concepts left out of the artifact by the filter.
    pub fn suppressed_concepts(&self) -> usize {
        self.ontology
            .index
            .entries()
            .iter()
            .filter(|entry| !self.filter.keeps(entry))
            .count()
    }

    pub fn map_facts(&self, table: &RawDataTable) -> Result<MappedFacts> {
        FactMapper::new(self).map(table)
    }
}
