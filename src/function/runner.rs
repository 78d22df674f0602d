use std::time::Duration;

use anyhow::anyhow;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::settings::SettingsConfig;
use crate::document::{DocumentReader, DocumentWriter, Paved};
use crate::function::input::{FunctionType, Input};
use crate::function::request::{ConditionStatus, RunFunctionRequest, RunFunctionResponse, Target};
use crate::helpers::time::get_instant;
use crate::keycloak::{IdentityProvider, KeycloakClient};
use crate::merge;
use crate::observability::metrics::get_metrics;

const API_VERSION: &str = "apiVersion";
const KIND: &str = "kind";

/// A step that stopped the run; becomes a false condition plus a fatal result.
struct Failure {
    message: &'static str,
    target: Target,
    error: anyhow::Error,
}

impl Failure {
    fn composite(message: &'static str, error: anyhow::Error) -> Self {
        Self {
            message,
            target: Target::Composite,
            error,
        }
    }
}

pub struct Function<P> {
    client: KeycloakClient<P>,
    response_ttl_seconds: u64,
    deadline: Option<Duration>,
}

impl<P: IdentityProvider> Function<P> {
    pub fn new(client: KeycloakClient<P>, settings: &SettingsConfig) -> Self {
        Self {
            client,
            response_ttl_seconds: settings.response_ttl_seconds,
            deadline: settings.deadline_ms.map(Duration::from_millis),
        }
    }

    pub fn with_options(client: KeycloakClient<P>, response_ttl_seconds: u64, deadline: Option<Duration>) -> Self {
        Self {
            client,
            response_ttl_seconds,
            deadline,
        }
    }

    pub async fn run_function(&self, req: &RunFunctionRequest) -> RunFunctionResponse {
        info!(tag = %req.meta.tag, "Running function");
        let rsp = RunFunctionResponse::to(req, self.response_ttl_seconds);

        let input: Input = match serde_json::from_value(req.input.clone()) {
            Ok(input) => input,
            Err(err) => {
                record_run("unknown", "fatal").await;
                let failure = Failure {
                    message: "Something went wrong.",
                    target: Target::CompositeAndClaim,
                    error: anyhow::Error::new(err).context("cannot get Function input"),
                };
                return fail(rsp, failure);
            }
        };

        let observed = Paved::new(req.observed.composite.resource.clone());
        let mut desired = Paved::new(rsp.desired.composite.resource.clone());

        let step = match input.function_type {
            FunctionType::FetchUser => self.fetch_users(&input, &observed, &mut desired).await,
            FunctionType::DedupeUsers => dedupe_users(&input, &observed, &mut desired).await,
        };
        let step = step.and_then(|warnings| {
            inherit_type_meta(&observed, &mut desired)?;
            Ok(warnings)
        });

        match step {
            Ok(warnings) => {
                record_run(input.function_type.as_str(), "success").await;
                succeed(rsp, desired, warnings)
            }
            Err(failure) => {
                record_run(input.function_type.as_str(), "fatal").await;
                fail(rsp, failure)
            }
        }
    }

    async fn fetch_users(&self, input: &Input, observed: &Paved, desired: &mut Paved) -> Result<Vec<String>, Failure> {
        let field = input.group_list.from_composite_field.as_str();
        if field.is_empty() {
            return Err(Failure::composite(
                "Failed to get group list from composite field",
                anyhow!("groupList.fromCompositeField is required for FetchUser"),
            ));
        }
        if input.output_field.is_empty() {
            return Err(Failure::composite(
                "Failed to get patch user to composite",
                anyhow!("outputField is required for FetchUser"),
            ));
        }

        let groups = observed.get_string_list(field).map_err(|err| {
            Failure::composite(
                "Failed to get group list from composite field",
                anyhow::Error::new(err).context(format!("cannot get group list from composite field {}", field)),
            )
        })?;

        let resolved = match self.deadline {
            Some(deadline) => {
                self.client
                    .get_group_members_until(&groups, get_instant() + deadline)
                    .await
            }
            None => self.client.get_group_members(&groups).await,
        };
        let users = resolved.map_err(|err| {
            Failure::composite(
                "Failed to get list user",
                anyhow::Error::new(err).context(format!("cannot get group user of group {:?}", groups)),
            )
        })?;

        info!(groups = groups.len(), users = users.len(), output = %input.output_field, "patching users");
        desired
            .merge_string_list(&input.output_field, users)
            .map_err(|err| {
                Failure::composite(
                    "Failed to get patch user to composite",
                    anyhow::Error::new(err).context("failed to patch user to DXR"),
                )
            })?;
        Ok(Vec::new())
    }
}

async fn dedupe_users(input: &Input, observed: &Paved, desired: &mut Paved) -> Result<Vec<String>, Failure> {
    let outcome = merge::merge(&input.groups_priority, observed, desired)
        .await
        .map_err(|err| Failure::composite("Failed to dedupe users", anyhow::Error::new(err)))?;

    for warning in &outcome.warnings {
        warn!(%warning, "priority merge skipped a path");
    }
    info!(destinations = outcome.result.len(), "deduplicated users");
    Ok(outcome.warnings.iter().map(ToString::to_string).collect())
}

/// The desired composite needs apiVersion and kind to be decodable downstream.
fn inherit_type_meta(observed: &Paved, desired: &mut Paved) -> Result<(), Failure> {
    for field in [API_VERSION, KIND] {
        if let Ok(value) = observed.get_value(field) {
            let value: Value = value.clone();
            desired.set_value(field, value).map_err(|err| {
                Failure::composite(
                    "Failed to get DXR",
                    anyhow::Error::new(err).context("cannot set type metadata on desired composite resource"),
                )
            })?;
        }
    }
    Ok(())
}

fn succeed(mut rsp: RunFunctionResponse, desired: Paved, warnings: Vec<String>) -> RunFunctionResponse {
    rsp.desired.composite.resource = desired.into_inner();
    for warning in warnings {
        rsp.warning(warning);
    }
    rsp.condition(ConditionStatus::True, "Success", None, Target::CompositeAndClaim);
    rsp
}

fn fail(mut rsp: RunFunctionResponse, failure: Failure) -> RunFunctionResponse {
    warn!(error = %format!("{:#}", failure.error), "function run failed");
    rsp.condition(
        ConditionStatus::False,
        "InternalError",
        Some(failure.message.to_owned()),
        failure.target,
    );
    rsp.fatal(format!("{:#}", failure.error));
    rsp
}

async fn record_run(function_type: &str, outcome: &str) {
    get_metrics()
        .await
        .function_runs
        .with_label_values(&[function_type, outcome])
        .inc();
}
