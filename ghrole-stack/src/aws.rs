//! CloudFormation and STS adapters for the traits in [`crate::api`].

use std::error::Error as StdError;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_config::default_provider::region::DefaultRegionChain;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::operation::describe_stacks::DescribeStacksOutput;
use aws_sdk_cloudformation::types::{Capability as CfnCapability, Parameter};

use ghrole_core::classify::VALIDATION_ERROR;
use ghrole_core::settings::DEFAULT_REGION;
use ghrole_core::{
    AwsSettings, OperationKind, RemoteError, StackDescription, StackName, StackOutputs,
    StackStatus,
};

use crate::api::{IdentityLookup, StackApi, StackRequest};

/// Load SDK configuration for `settings`.
///
/// An explicit region wins; otherwise the default provider chain (env,
/// profile) is consulted before falling back to `us-east-1`. The profile, when
/// set, is handed to both the credential and the region chain, so the region
/// comes from the same profile as the credentials.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut profile_region = DefaultRegionChain::builder();
    if let Some(profile) = settings.profile.as_deref() {
        profile_region = profile_region.profile_name(profile);
    }
    let region = RegionProviderChain::first_try(settings.region.clone().map(Region::new))
        .or_else(profile_region.build())
        .or_else(Region::new(DEFAULT_REGION));

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
    if let Some(profile) = settings.profile.as_deref() {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

/// Region the loaded configuration will talk to.
pub fn region_of(config: &SdkConfig) -> String {
    config
        .region()
        .map(ToString::to_string)
        .unwrap_or_else(|| DEFAULT_REGION.to_owned())
}

// ---------------------------------------------------------------------------
// CloudFormation
// ---------------------------------------------------------------------------

/// [`StackApi`] over the CloudFormation API.
#[derive(Debug, Clone)]
pub struct CloudFormationApi {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationApi {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudformation::Client::new(config),
        }
    }
}

#[async_trait]
impl StackApi for CloudFormationApi {
    async fn describe_stack(&self, name: &StackName) -> Result<StackDescription, RemoteError> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(name.as_str())
            .send()
            .await
            .map_err(remote_error)?;

        describe_output(name, &output)
    }

    async fn submit(
        &self,
        operation: OperationKind,
        request: &StackRequest,
    ) -> Result<(), RemoteError> {
        let parameters: Vec<Parameter> = request
            .parameters
            .iter()
            .map(|(key, value)| {
                Parameter::builder()
                    .parameter_key(key)
                    .parameter_value(value)
                    .build()
            })
            .collect();
        let capabilities: Vec<CfnCapability> = request
            .capabilities
            .iter()
            .map(|c| CfnCapability::from(c.as_str()))
            .collect();

        match operation {
            OperationKind::Create => {
                let output = self
                    .client
                    .create_stack()
                    .stack_name(request.name.as_str())
                    .template_body(&request.template_body)
                    .set_capabilities(Some(capabilities))
                    .set_parameters(Some(parameters))
                    .send()
                    .await
                    .map_err(remote_error)?;
                tracing::debug!(stack_id = ?output.stack_id(), "create accepted");
            }
            OperationKind::Update => {
                let output = self
                    .client
                    .update_stack()
                    .stack_name(request.name.as_str())
                    .template_body(&request.template_body)
                    .set_capabilities(Some(capabilities))
                    .set_parameters(Some(parameters))
                    .send()
                    .await
                    .map_err(remote_error)?;
                tracing::debug!(stack_id = ?output.stack_id(), "update accepted");
            }
        }
        Ok(())
    }
}

/// Map a `DescribeStacks` response for `name` onto a [`StackDescription`].
fn describe_output(
    name: &StackName,
    output: &DescribeStacksOutput,
) -> Result<StackDescription, RemoteError> {
    // DescribeStacks by name returns exactly one stack or an error; treat
    // an empty list the same way the API reports a missing stack.
    let stack = output.stacks().first().ok_or_else(|| {
        RemoteError::new(
            VALIDATION_ERROR,
            format!("Stack with id {name} does not exist"),
        )
    })?;

    let status = stack
        .stack_status()
        .map(|s| StackStatus::from(s.as_str()))
        .unwrap_or_else(|| StackStatus::from("UNKNOWN"));
    let outputs = stack.outputs.as_ref().map(|outputs| {
        outputs
            .iter()
            .filter_map(|o| Some((o.output_key()?, o.output_value().unwrap_or_default())))
            .collect::<StackOutputs>()
    });

    Ok(StackDescription {
        name: name.clone(),
        status,
        status_reason: stack.stack_status_reason().map(ToString::to_string),
        outputs,
    })
}

// ---------------------------------------------------------------------------
// STS
// ---------------------------------------------------------------------------

/// [`IdentityLookup`] via STS `GetCallerIdentity`.
#[derive(Debug, Clone)]
pub struct StsIdentity {
    client: aws_sdk_sts::Client,
}

impl StsIdentity {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sts::Client::new(config),
        }
    }
}

#[async_trait]
impl IdentityLookup for StsIdentity {
    async fn account_id(&self) -> Result<String, RemoteError> {
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(remote_error)?;
        output
            .account()
            .map(ToString::to_string)
            .ok_or_else(|| RemoteError::new("MissingAccount", "GetCallerIdentity returned no Account"))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Flatten an SDK error into the remote code and message.
///
/// Service errors keep their code (`ValidationError`, `AccessDenied`, …) and
/// message untouched, since the resolver and reconciler match on them.
fn remote_error<E, R>(err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: Debug,
{
    let category = match err.code() {
        Some(code) => code.to_owned(),
        None => transport_category(&err).to_owned(),
    };
    let message = match err.message() {
        Some(message) => message.to_owned(),
        None => DisplayErrorContext(&err).to_string(),
    };
    RemoteError::new(category, message)
}

fn transport_category<E, R>(err: &SdkError<E, R>) -> &'static str {
    match err {
        SdkError::ConstructionFailure(_) => "ConstructionFailure",
        SdkError::TimeoutError(_) => "TimeoutError",
        SdkError::DispatchFailure(_) => "DispatchFailure",
        SdkError::ResponseError(_) => "ResponseError",
        SdkError::ServiceError(_) => "ServiceError",
        _ => "Unknown",
    }
}
