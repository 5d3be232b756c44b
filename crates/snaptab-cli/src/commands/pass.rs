//! One streaming pass over every entity a pipeline reads from

use super::CapArgs;
use snaptab_store::pipeline::extract_values;
use snaptab_store::snapshot::DEFAULT_INTERVAL;
use snaptab_store::{PipelineConfig, ProgressReporter, SnapshotReader};

/// Where an extracted value goes
#[derive(Debug, Clone, Copy)]
pub enum Target<'c> {
    Enumeration(&'c str),
    Namespace(&'c str),
}

/// Visit every source value of every document
///
/// Entities are read in name order; caps apply per entity. Returns the
/// number of documents read.
pub fn visit_sources<'c, F>(
    reader: &SnapshotReader,
    config: &'c PipelineConfig,
    caps: &CapArgs,
    mut visit: F,
) -> Result<u64, Box<dyn std::error::Error>>
where
    F: FnMut(Target<'c>, &str) -> Result<(), Box<dyn std::error::Error>>,
{
    let interval = config.progress_interval.unwrap_or(DEFAULT_INTERVAL);
    let mut total = 0;

    for entity in config.source_entities() {
        let bindings: Vec<(Target<'c>, &'c str)> = config
            .enumerations
            .iter()
            .flat_map(|e| {
                e.sources
                    .iter()
                    .map(move |s| (Target::Enumeration(e.table.as_str()), s))
            })
            .chain(config.namespaces.iter().flat_map(|n| {
                n.sources
                    .iter()
                    .map(move |s| (Target::Namespace(n.namespace.as_str()), s))
            }))
            .filter(|(_, source)| source.entity == entity)
            .map(|(target, source)| (target, source.pointer.as_str()))
            .collect();

        let reporter = ProgressReporter::with_interval(entity, interval);
        let observer = reporter.clone();
        let documents = reader.iter_entity(entity, caps.options().with_progress(reporter))?;
        for document in documents {
            let document = document?;
            for (target, pointer) in &bindings {
                for value in extract_values(&document, pointer) {
                    visit(*target, &value)?;
                }
            }
        }

        tracing::info!(entity, records = observer.count(), "{}", observer.summary());
        total += observer.count();
    }

    Ok(total)
}
