//! ETL pipeline with explicit stages.
//!
//! 1. **load_config**: read and validate the YAML configuration
//! 2. **dictionary**: read the data dictionary into variable definitions
//! 3. **synthesize**: load lookup tables, build the concept ontology and run context
//! 4. **map_facts**: read the data table and map every observation cell
//! 5. **write**: optionally sample facts, then write both artifacts

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use i2b2_core::{EtlContext, IcdVersion, LookupTables, MappedFacts, variables_from_dictionary};
use i2b2_ingest::{
    load_config, read_data_table, read_demographics, read_dictionary, read_icd_table,
    read_visit_dates,
};
use i2b2_model::{EtlConfig, Fact, VariableDefinition};
use i2b2_output::{OutputPaths, ensure_parent_dir, sample_facts, write_concepts, write_facts};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, info_span, warn};

use crate::logging::redact_value;
use crate::types::{RunOptions, RunResult};

pub fn run(options: &RunOptions) -> Result<RunResult> {
    let config = info_span!("load_config", path = %options.config.display())
        .in_scope(|| load_etl_config(&options.config))?;

    let variables = info_span!("dictionary", path = %options.dictionary.display())
        .in_scope(|| load_variables(&config, &options.dictionary))?;

    let context = info_span!("synthesize").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let lookups = load_lookups(&config)?;
        let context = EtlContext::new(&config, &variables, lookups)
            .context("prepare concepts and date resolution")?;
        let report = &context.ontology().report;
        info!(
            concepts = context.ontology().len(),
            assertions = report.assertion_concepts,
            truncated_codes = report.truncated_codes,
            duration_ms = start.elapsed().as_millis(),
            "synthesis complete"
        );
        Ok(context)
    })?;

    let mapped = info_span!("map_facts", path = %options.input.display())
        .in_scope(|| map_input(&context, &options.input))?;

    let paths = OutputPaths::new(&options.output_dir, &config);
    let facts_mapped = mapped.facts.len();
    let facts = match options.sample {
        Some(n) => {
            let mut rng = options
                .seed
                .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
            let sampled = sample_facts(mapped.facts, n, &mut rng);
            info!(requested = n, kept = sampled.len(), "sampled facts");
            sampled
        }
        None => mapped.facts,
    };

    let (concepts_written, facts_written) = info_span!("write")
        .in_scope(|| write_artifacts(&context, &paths, &facts))?;

    Ok(RunResult {
        datemode: config.datemode,
        concepts_path: paths.concepts,
        facts_path: paths.facts,
        variables: variables.len(),
        concepts_written,
        suppressed_concepts: context.suppressed_concepts(),
        facts_mapped,
        facts_written,
        synthesis: context.ontology().report.clone(),
        mapping: mapped.report,
    })
}

pub fn load_etl_config(path: &Path) -> Result<EtlConfig> {
    let config =
        load_config(path).with_context(|| format!("load config {}", path.display()))?;
    info!(
        datemode = config.datemode,
        dictformat = ?config.dictformat,
        filebase = %config.filebase,
        "config loaded"
    );
    Ok(config)
}

pub fn load_variables(config: &EtlConfig, path: &Path) -> Result<Vec<VariableDefinition>> {
    let start = Instant::now();
    let table = read_dictionary(path, config.dictformat)
        .with_context(|| format!("read dictionary {}", path.display()))?;
    let variables = variables_from_dictionary(&table, config)
        .with_context(|| format!("map dictionary {}", path.display()))?;
    info!(
        records = table.records.len(),
        variables = variables.len(),
        duration_ms = start.elapsed().as_millis(),
        "dictionary loaded"
    );
    Ok(variables)
}

/// Reads every lookup table the configuration names.
pub fn load_lookups(config: &EtlConfig) -> Result<LookupTables> {
    let mut lookups = LookupTables::default();
    if let Some(path) = &config.visitdatefile {
        let visits = read_visit_dates(path)
            .with_context(|| format!("read visit dates {}", path.display()))?;
        debug!(visits = visits.len(), "visit-date table loaded");
        lookups = lookups.with_visits(visits);
    }
    if let Some(path) = &config.demographics_file {
        let demographics = read_demographics(path)
            .with_context(|| format!("read demographics {}", path.display()))?;
        debug!(rows = demographics.rows().len(), "demographics table loaded");
        lookups = lookups.with_demographics(demographics);
    }
    for (version, file) in [
        (IcdVersion::Icd9, &config.icd9file),
        (IcdVersion::Icd10, &config.icd10file),
    ] {
        let Some(path) = file else { continue };
        let table = read_icd_table(path)
            .with_context(|| format!("read {version} table {}", path.display()))?;
        debug!(%version, rows = table.rows().len(), "ICD table loaded");
        lookups = lookups.with_icd_table(version, table);
    }
    Ok(lookups)
}

pub fn map_input(context: &EtlContext, path: &Path) -> Result<MappedFacts> {
    let start = Instant::now();
    let table =
        read_data_table(path).with_context(|| format!("read data table {}", path.display()))?;
    let mapped = context
        .map_facts(&table)
        .with_context(|| format!("map facts from {}", path.display()))?;
    let report = &mapped.report;
    for (kind, count) in &report.anomalies {
        warn!(%kind, count, "date anomalies");
    }
    for fact in mapped.facts.iter().filter(|f| !f.event_date.is_resolved()) {
        debug!(mrn = redact_value(&fact.subject_id), code = %fact.code, "fact without a start date");
    }
    info!(
        rows = report.rows,
        facts = report.facts,
        blank_cells = report.blank_cells,
        unresolved_dates = report.unresolved_dates,
        duration_ms = start.elapsed().as_millis(),
        "mapping complete"
    );
    Ok(mapped)
}

pub fn write_artifacts(
    context: &EtlContext,
    paths: &OutputPaths,
    facts: &[Fact],
) -> Result<(usize, usize)> {
    let start = Instant::now();
    let prefix = context.code_prefix();
    let concepts = write_concepts(&paths.concepts, context.artifact_concepts(), prefix)
        .with_context(|| format!("write {}", paths.concepts.display()))?;
    let facts = write_facts(&paths.facts, facts, prefix)
        .with_context(|| format!("write {}", paths.facts.display()))?;
    info!(
        concepts,
        facts,
        duration_ms = start.elapsed().as_millis(),
        "artifacts written"
    );
    Ok((concepts, facts))
}

pub fn write_report(path: &Path, result: &RunResult) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(result).context("serialize run report")?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
