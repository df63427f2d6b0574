//! The device stack.
//!
//! [`iot_stack`] declares everything a Raspberry Pi needs to act as a
//! Greengrass core: the IoT thing and policy, the certificate attachments,
//! and the core, resource, function and group definitions.
use crate::{
    aws::{
        greengrass::{
            Core, CoreDefinition, CoreDefinitionVersion, Function, FunctionConfiguration,
            FunctionDefinition, FunctionDefinitionVersion, FunctionEnvironment, FunctionReference,
            Group, GroupVersion, ResourceAccessPolicy, ResourceDefinition,
            ResourceDefinitionVersion, ResourceInstance,
        },
        iot::{
            CertificatePrincipal, Policy, PolicyDocument, PolicyPrincipalAttachment, Thing,
            ThingPrincipalAttachment,
        },
        Environment,
    },
    DeviceConfig, Result, Stack,
};

/// Logical ids of the device stack's resources.
pub mod ids {
    pub const THING: &str = "Thing";
    pub const POLICY: &str = "Policy";
    pub const POLICY_PRINCIPAL_ATTACHMENT: &str = "PolicyPrincipalAttachment";
    pub const THING_PRINCIPAL_ATTACHMENT: &str = "ThingPrincipalAttachment";
    pub const CORE_DEFINITION: &str = "CoreDefinition";
    pub const RESOURCE_DEFINITION: &str = "ResourceDefinition";
    pub const FUNCTION_DEFINITION: &str = "FunctionDefinition";
    pub const GROUP: &str = "Group";
}

/// A value the build needs but could not know.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prerequisite {
    ThingName,
    PolicyName,
}

impl core::fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Prerequisite::ThingName => "thing name",
            Prerequisite::PolicyName => "policy name",
        })
    }
}

/// Resources left out because a prerequisite was unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skip {
    pub prerequisite: Prerequisite,
    pub skipped: Vec<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildStatus {
    Complete,
    Skipped(Vec<Skip>),
}

impl BuildStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, BuildStatus::Complete)
    }

    fn skip(&mut self, prerequisite: Prerequisite, skipped: Vec<&'static str>) {
        log::warn!(
            "{prerequisite} is unresolved, skipping {}",
            skipped.join(", ")
        );
        let skip = Skip {
            prerequisite,
            skipped,
        };
        match self {
            BuildStatus::Complete => *self = BuildStatus::Skipped(vec![skip]),
            BuildStatus::Skipped(skips) => skips.push(skip),
        }
    }
}

pub struct DeviceStack {
    pub stack: Stack,
    pub status: BuildStatus,
    /// Known once the thing has a concrete name.
    pub thing_arn: Option<String>,
}

/// Builds the device stack.
///
/// `function` must refer to a published function, see
/// [`FunctionReference::ensure_published`]. An exported reference makes this
/// stack depend on the stack that exports it.
pub fn iot_stack(
    config: &DeviceConfig,
    env: &Environment,
    principal: &CertificatePrincipal,
    function: &FunctionReference,
) -> Result<DeviceStack> {
    function.ensure_published()?;
    let mut stack = Stack::new(&config.iot_stack_name);
    let mut status = BuildStatus::Complete;

    let thing = stack.resource(
        ids::THING,
        Thing {
            thing_name: config.thing_name().map(str::to_owned),
        },
    )?;
    let Some(thing_name) = thing.name().map(str::to_owned) else {
        status.skip(
            Prerequisite::ThingName,
            vec![
                ids::POLICY,
                ids::POLICY_PRINCIPAL_ATTACHMENT,
                ids::THING_PRINCIPAL_ATTACHMENT,
                ids::CORE_DEFINITION,
                ids::RESOURCE_DEFINITION,
                ids::FUNCTION_DEFINITION,
                ids::GROUP,
            ],
        );
        return Ok(DeviceStack {
            stack,
            status,
            thing_arn: None,
        });
    };
    let thing_arn = env.thing_arn(&thing_name);
    log::debug!("thing arn is '{thing_arn}'");

    let policy = stack.resource(
        ids::POLICY,
        Policy {
            policy_name: config.policy_name().map(str::to_owned),
            policy_document: PolicyDocument::allow_iot_and_greengrass(),
        },
    )?;
    policy.depends_on(&mut stack, &thing)?;

    match policy.name().map(str::to_owned) {
        Some(policy_name) => {
            let attachment = stack.resource(
                ids::POLICY_PRINCIPAL_ATTACHMENT,
                PolicyPrincipalAttachment {
                    policy_name,
                    principal: principal.clone(),
                },
            )?;
            attachment.depends_on(&mut stack, &policy)?;
        }
        None => status.skip(
            Prerequisite::PolicyName,
            vec![ids::POLICY_PRINCIPAL_ATTACHMENT],
        ),
    }

    let thing_attachment = stack.resource(
        ids::THING_PRINCIPAL_ATTACHMENT,
        ThingPrincipalAttachment {
            thing_name,
            principal: principal.clone(),
        },
    )?;
    thing_attachment.depends_on(&mut stack, &thing)?;

    let core_definition = stack.resource(
        ids::CORE_DEFINITION,
        CoreDefinition {
            name: config.core_name.clone(),
            initial_version: CoreDefinitionVersion {
                cores: vec![Core {
                    certificate_arn: principal.clone(),
                    id: "1".to_owned(),
                    thing_arn: thing_arn.clone(),
                }],
            },
        },
    )?;
    core_definition.depends_on(&mut stack, &thing)?;

    let volume = &config.log_volume;
    let resource_definition = stack.resource(
        ids::RESOURCE_DEFINITION,
        ResourceDefinition {
            name: config.resource_definition_name.clone(),
            initial_version: ResourceDefinitionVersion {
                resources: vec![ResourceInstance::local_volume(
                    &volume.id,
                    &volume.name,
                    &volume.source_path,
                    &volume.destination_path,
                )],
            },
        },
    )?;

    if let FunctionReference::Export(export) = function {
        stack.import(export)?;
    }
    let function_config = &config.function;
    let function_definition = stack.resource(
        ids::FUNCTION_DEFINITION,
        FunctionDefinition {
            name: config.function_definition_name.clone(),
            initial_version: FunctionDefinitionVersion {
                functions: vec![Function {
                    id: function_config.id.clone(),
                    function_arn: function.clone(),
                    function_configuration: FunctionConfiguration {
                        encoding_type: function_config.encoding,
                        memory_size: function_config.memory_size,
                        pinned: function_config.pinned,
                        timeout: function_config.timeout,
                        environment: FunctionEnvironment {
                            resource_access_policies: vec![ResourceAccessPolicy {
                                resource_id: volume.id.clone(),
                                permission: function_config.permission,
                            }],
                        },
                    },
                }],
            },
        },
    )?;

    let group = stack.resource(
        ids::GROUP,
        Group {
            name: config.group_name.clone(),
            initial_version: GroupVersion {
                core_definition_version_arn: core_definition.latest_version_arn(),
                function_definition_version_arn: function_definition.latest_version_arn(),
                resource_definition_version_arn: resource_definition.latest_version_arn(),
            },
        },
    )?;
    group.depends_on(&mut stack, &core_definition)?;
    group.depends_on(&mut stack, &resource_definition)?;
    group.depends_on(&mut stack, &function_definition)?;

    log::info!(
        "built '{}' with {} resources",
        stack.name(),
        stack.len()
    );
    Ok(DeviceStack {
        stack,
        status,
        thing_arn: Some(thing_arn),
    })
}
