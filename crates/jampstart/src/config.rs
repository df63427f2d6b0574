//! Device configuration.
//!
//! Every name, path and limit used to build the stacks lives here, with the
//! defaults provisioning a single Raspberry Pi. A TOML file may override any
//! subset of fields.
use std::path::{Path, PathBuf};

use snafu::prelude::*;

use crate::{
    aws::greengrass::{EncodingType, Permission},
    ConfigSnafu, ReadFileSnafu, Result,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Name of the IoT thing. Absent or empty leaves the name to the
    /// provider, in which case the device stack stops after the thing.
    pub thing_name: Option<String>,
    /// Name of the IoT policy. Absent or empty skips the policy attachment.
    pub policy_name: Option<String>,
    pub core_name: String,
    pub resource_definition_name: String,
    pub function_definition_name: String,
    pub group_name: String,
    /// Parameter holding the certificate ARN.
    pub certificate_parameter: String,
    /// Name of the device stack.
    pub iot_stack_name: String,
    pub log_volume: LogVolumeConfig,
    pub function: FunctionConfig,
    pub packaging: PackagingConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            thing_name: Some("Raspberry_Pi_Thing".to_owned()),
            policy_name: Some("Raspberry_Pi_Policy".to_owned()),
            core_name: "Raspberry_Pi_Core".to_owned(),
            resource_definition_name: "Raspberry_Pi_Resource".to_owned(),
            function_definition_name: "Raspberry_Pi_Function".to_owned(),
            group_name: "Raspberry_Pi".to_owned(),
            certificate_parameter: "jampstart-iot-crt-arn".to_owned(),
            iot_stack_name: "IoTStack".to_owned(),
            log_volume: Default::default(),
            function: Default::default(),
            packaging: Default::default(),
        }
    }
}

/// The local volume functions write their logs to.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogVolumeConfig {
    pub id: String,
    pub name: String,
    pub source_path: String,
    pub destination_path: String,
}

impl Default for LogVolumeConfig {
    fn default() -> Self {
        Self {
            id: "1".to_owned(),
            name: "log_file_resource".to_owned(),
            source_path: "/log".to_owned(),
            destination_path: "/log".to_owned(),
        }
    }
}

/// How the core runs the function.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FunctionConfig {
    pub id: String,
    pub encoding: EncodingType,
    /// In KB.
    pub memory_size: u32,
    /// Long-lived rather than on-demand.
    pub pinned: bool,
    /// In seconds.
    pub timeout: u32,
    /// Access to the log volume.
    pub permission: Permission,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            id: "1".to_owned(),
            encoding: EncodingType::Binary,
            memory_size: 65536,
            pinned: true,
            timeout: 3,
            permission: Permission::ReadWrite,
        }
    }
}

/// The function stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PackagingConfig {
    pub stack_name: String,
    pub function_id: String,
    pub version_id: String,
    pub alias_id: String,
    pub runtime: String,
    pub handler: String,
    /// Directory holding the function code.
    pub asset_path: PathBuf,
    pub alias_name: String,
    /// Bucket the asset is uploaded to by the engine.
    pub asset_bucket: String,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            stack_name: "LambdaStack".to_owned(),
            function_id: "GreengrassSampleHandler".to_owned(),
            version_id: "GreengrassSampleVersion".to_owned(),
            alias_id: "GreengrassSampleAlias".to_owned(),
            runtime: "python3.7".to_owned(),
            handler: "handler.handler".to_owned(),
            asset_path: PathBuf::from("lambda"),
            alias_name: "rasberrypi".to_owned(),
            asset_bucket: "jampstart-assets".to_owned(),
        }
    }
}

impl DeviceConfig {
    pub fn from_toml_str(path: impl AsRef<Path>, contents: &str) -> Result<Self> {
        toml::from_str(contents).context(ConfigSnafu {
            path: path.as_ref(),
        })
    }

    /// Reads the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading config from {path:?}");
        let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        Self::from_toml_str(path, &contents)
    }

    /// The thing name, if it is concretely known.
    pub fn thing_name(&self) -> Option<&str> {
        self.thing_name.as_deref().filter(|name| !name.is_empty())
    }

    /// The policy name, if it is concretely known.
    pub fn policy_name(&self) -> Option<&str> {
        self.policy_name.as_deref().filter(|name| !name.is_empty())
    }
}
