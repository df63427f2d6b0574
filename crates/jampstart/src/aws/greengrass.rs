//! AWS IoT Greengrass (V1) resources.
//!
//! Each definition is created with a single initial version. The group binds
//! the latest version of each definition together into one deployable unit.
use snafu::prelude::*;

use crate::{
    aws::iot::CertificatePrincipal, remote::Remote, template::Export, HasDependencies, Resource,
    Result, StackResource, UnpublishedFunctionSnafu,
};

/// Greengrass definitions, which are versioned.
pub trait Definition: Resource {}

impl<T: Definition> StackResource<T> {
    /// ARN of the definition's latest version.
    pub fn latest_version_arn(&self) -> Remote<String> {
        self.attribute("LatestVersionArn")
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct Core {
    pub certificate_arn: CertificatePrincipal,
    pub id: String,
    pub thing_arn: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct CoreDefinitionVersion {
    pub cores: Vec<Core>,
}

/// The device acting as a Greengrass core.
#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct CoreDefinition {
    pub name: String,
    pub initial_version: CoreDefinitionVersion,
}

impl Resource for CoreDefinition {
    const TYPE: &'static str = "AWS::Greengrass::CoreDefinition";
}

impl Definition for CoreDefinition {}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalVolumeResourceData {
    pub source_path: String,
    pub destination_path: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceDataContainer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_volume_resource_data: Option<LocalVolumeResourceData>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceInstance {
    pub id: String,
    pub name: String,
    pub resource_data_container: ResourceDataContainer,
}

impl ResourceInstance {
    /// A directory on the core mounted into function containers.
    pub fn local_volume(
        id: impl Into<String>,
        name: impl Into<String>,
        source_path: impl Into<String>,
        destination_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_data_container: ResourceDataContainer {
                local_volume_resource_data: Some(LocalVolumeResourceData {
                    source_path: source_path.into(),
                    destination_path: destination_path.into(),
                }),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceDefinitionVersion {
    pub resources: Vec<ResourceInstance>,
}

/// Local resources available to functions on the core.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceDefinition {
    pub name: String,
    pub initial_version: ResourceDefinitionVersion,
}

impl HasDependencies for ResourceDefinition {}

impl Resource for ResourceDefinition {
    const TYPE: &'static str = "AWS::Greengrass::ResourceDefinition";
}

impl Definition for ResourceDefinition {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingType {
    #[default]
    Binary,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Permission {
    #[serde(rename = "ro")]
    ReadOnly,
    #[default]
    #[serde(rename = "rw")]
    ReadWrite,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceAccessPolicy {
    pub resource_id: String,
    pub permission: Permission,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionEnvironment {
    pub resource_access_policies: Vec<ResourceAccessPolicy>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfiguration {
    pub encoding_type: EncodingType,
    pub memory_size: u32,
    pub pinned: bool,
    pub timeout: u32,
    pub environment: FunctionEnvironment,
}

/// The Lambda function deployed to the core.
///
/// Greengrass only accepts published functions, so the reference is either
/// a version or alias qualified ARN, or an export of the stack that
/// publishes it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FunctionReference {
    Arn(String),
    Export(Export),
}

impl FunctionReference {
    /// A function ARN, validated to be published.
    pub fn arn(arn: impl Into<String>) -> Result<Self> {
        let reference = FunctionReference::Arn(arn.into());
        reference.ensure_published()?;
        Ok(reference)
    }

    /// Errs unless the reference names an immutable version or an alias.
    pub fn ensure_published(&self) -> Result<()> {
        match self {
            FunctionReference::Export(_) => Ok(()),
            FunctionReference::Arn(arn) => {
                let parts = arn.split(':').collect::<Vec<_>>();
                let published = parts.len() == 8
                    && parts[0] == "arn"
                    && parts[2] == "lambda"
                    && parts[5] == "function"
                    && !parts[7].is_empty()
                    && parts[7] != "$LATEST";
                ensure!(published, UnpublishedFunctionSnafu { arn });
                Ok(())
            }
        }
    }
}

impl HasDependencies for FunctionReference {}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    pub id: String,
    pub function_arn: FunctionReference,
    pub function_configuration: FunctionConfiguration,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionDefinitionVersion {
    pub functions: Vec<Function>,
}

/// Functions run by the core.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionDefinition {
    pub name: String,
    pub initial_version: FunctionDefinitionVersion,
}

impl HasDependencies for FunctionDefinition {
    fn dependencies(&self) -> crate::Dependencies {
        self.initial_version
            .functions
            .iter()
            .fold(crate::Dependencies::default(), |acc, function| {
                acc.merge(function.function_arn.dependencies())
            })
    }
}

impl Resource for FunctionDefinition {
    const TYPE: &'static str = "AWS::Greengrass::FunctionDefinition";
}

impl Definition for FunctionDefinition {}

#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct GroupVersion {
    pub core_definition_version_arn: Remote<String>,
    pub function_definition_version_arn: Remote<String>,
    pub resource_definition_version_arn: Remote<String>,
}

/// The deployable unit binding the definitions together.
#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub name: String,
    pub initial_version: GroupVersion,
}

impl Resource for Group {
    const TYPE: &'static str = "AWS::Greengrass::Group";
}
