use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::{DocumentReader, DocumentWriter};
use crate::merge::errors::{MergeError, MergeWarning};
use crate::observability::metrics::get_metrics;

/// Source paths feeding one destination path.
///
/// Rules are ranked by position: a later rule outranks every earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformRule {
    #[serde(rename = "fromPathsList")]
    pub source_paths: Vec<String>,
    #[serde(rename = "toPath")]
    pub destination_path: String,
}

impl TransformRule {
    pub fn new<S: Into<String>>(
        source_paths: impl IntoIterator<Item = S>,
        destination_path: impl Into<String>,
    ) -> Self {
        Self {
            source_paths: source_paths.into_iter().map(Into::into).collect(),
            destination_path: destination_path.into(),
        }
    }
}

/// Destination path to the identifiers it ends up holding.
pub type MergeResult = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub result: MergeResult,
    pub warnings: Vec<MergeWarning>,
}

/// Identifiers read for one rule, in source-path order.
struct RuleSources<'r> {
    destination: &'r str,
    identifiers: Vec<String>,
}

fn read_sources<'r, R>(rules: &'r [TransformRule], reader: &R) -> (Vec<RuleSources<'r>>, Vec<MergeWarning>)
where
    R: DocumentReader + ?Sized,
{
    let mut warnings = Vec::new();
    let sources = rules
        .iter()
        .map(|rule| {
            let identifiers = rule
                .source_paths
                .iter()
                .filter_map(|path| match reader.get_string_list(path) {
                    Ok(list) => Some(list),
                    Err(source) => {
                        debug!(path = %path, error = %source, "skipping unreadable source path");
                        warnings.push(MergeWarning::PathRead {
                            path: path.to_owned(),
                            source,
                        });
                        None
                    }
                })
                .flatten()
                .collect();
            RuleSources {
                destination: rule.destination_path.as_str(),
                identifiers,
            }
        })
        .collect();
    (sources, warnings)
}

/// Folds rules lowest priority first into a last-write-wins owner map.
///
/// Returns identifiers in first-seen order paired with their final destination.
fn assign<'r>(sources: &[RuleSources<'r>]) -> Vec<(String, &'r str)> {
    let (order, owners) = sources.iter().fold(
        (Vec::<String>::new(), HashMap::<String, &'r str>::new()),
        |(mut order, mut owners), rule| {
            for identifier in &rule.identifiers {
                if owners.insert(identifier.clone(), rule.destination).is_none() {
                    order.push(identifier.clone());
                }
            }
            (order, owners)
        },
    );

    order
        .into_iter()
        .map(|identifier| {
            let destination = owners[&identifier];
            (identifier, destination)
        })
        .collect()
}

/// Every rule's destination is present, empty when it kept nothing.
fn invert(rules: &[TransformRule], assigned: Vec<(String, &str)>) -> MergeResult {
    let empty: MergeResult = rules
        .iter()
        .map(|rule| (rule.destination_path.clone(), Vec::new()))
        .collect();

    assigned
        .into_iter()
        .fold(empty, |mut result, (identifier, destination)| {
            result
                .entry(destination.to_owned())
                .or_default()
                .push(identifier);
            result
        })
}

/// Computes the merge without writing anything.
pub fn plan<R>(rules: &[TransformRule], reader: &R) -> Result<MergeOutcome, MergeError>
where
    R: DocumentReader + ?Sized,
{
    if rules.is_empty() {
        return Err(MergeError::NoPriorityRulesConfigured);
    }
    let (sources, warnings) = read_sources(rules, reader);
    let result = invert(rules, assign(&sources));
    Ok(MergeOutcome { result, warnings })
}

fn apply<W>(mut outcome: MergeOutcome, writer: &mut W) -> MergeOutcome
where
    W: DocumentWriter + ?Sized,
{
    for (path, identifiers) in &outcome.result {
        if let Err(source) = writer.merge_string_list(path, identifiers.clone()) {
            warn!(path = %path, error = %source, "cannot write destination path");
            outcome.warnings.push(MergeWarning::PathWrite {
                path: path.to_owned(),
                source,
            });
        }
    }
    outcome
}

/// Reads sources from `reader`, writes every destination into `writer`.
///
/// Unreadable sources and unwritable destinations are reported as warnings
/// in the outcome; only an empty rule list is an error.
pub async fn merge<R, W>(rules: &[TransformRule], reader: &R, writer: &mut W) -> Result<MergeOutcome, MergeError>
where
    R: DocumentReader + ?Sized,
    W: DocumentWriter + ?Sized,
{
    let outcome = apply(plan(rules, reader)?, writer);
    record_warnings(&outcome).await;
    Ok(outcome)
}

/// Same as [`merge`] with one document as both source and destination.
pub async fn merge_in_place<D>(rules: &[TransformRule], document: &mut D) -> Result<MergeOutcome, MergeError>
where
    D: DocumentReader + DocumentWriter + ?Sized,
{
    let planned = plan(rules, &*document)?;
    let outcome = apply(planned, document);
    record_warnings(&outcome).await;
    Ok(outcome)
}

async fn record_warnings(outcome: &MergeOutcome) {
    if outcome.warnings.is_empty() {
        return;
    }
    let metrics = get_metrics().await;
    for warning in &outcome.warnings {
        let kind = match warning {
            MergeWarning::PathRead { .. } => "read",
            MergeWarning::PathWrite { .. } => "write",
        };
        metrics.merge_warnings.with_label_values(&[kind]).inc();
    }
}
