//! # Jampstart
//!
//! Jampstart declares the infrastructure that turns a Raspberry Pi into an
//! AWS IoT Greengrass core. It does so by building a graph of resource
//! descriptors (an IoT thing, its policy and certificate attachments, and
//! the Greengrass core, resource, function and group definitions), along
//! with a second stack that packages the Lambda function the core runs.
//!
//! Nothing here talks to a provisioning API. The graph is validated and
//! scheduled locally, then handed off as CloudFormation templates and an
//! application manifest for an external engine to apply.
//!
//! ## Concepts
//!
//! - **Resource**: a descriptor of a platform resource, see [`Resource`].
//!   Descriptors are plain serializable structs.
//! - **Remote**: an attribute of another resource that only exists after it
//!   is created, see [`remote::Remote`]. Using a remote in a descriptor
//!   records an implicit dependency on the resource it comes from.
//! - **Stack**: the graph container, see [`Stack`]. Resources are declared in
//!   order, and a resource may only depend on resources declared before it,
//!   which keeps the graph acyclic by construction.
//! - **App**: an ordered collection of stacks, see [`App`].
//!
//! The device topology itself is built by [`device::iot_stack`] and the
//! function it runs is packaged by [`packaging::function_stack`].
//! [`application`] wires both together.
//!
//! ## Error Handling
//!
//! Jampstart exposes a single error enum [`Error`]. A prerequisite that is
//! merely unresolved (for example a thing name left to the provider) is not
//! an error; it is reported through [`device::BuildStatus`].

extern crate self as jamp;

use snafu::prelude::*;

pub use jampstart_derive::HasDependencies;

pub mod app;
pub mod aws;
pub mod config;
pub mod device;
mod has_dependencies_impl;
pub mod packaging;
pub mod parameters;
pub mod remote;
pub mod stack;
pub mod template;
#[cfg(test)]
mod test;
pub mod utils;

pub use app::{application, App, Application};
pub use config::DeviceConfig;
pub use stack::{Plan, Stack, StackResource};

/// Marker trait for userland errors.
pub trait UserError: core::fmt::Display + core::fmt::Debug + 'static {}
impl<T: core::fmt::Display + core::fmt::Debug + 'static> UserError for T {}

/// Top-level error enum that encompasses all errors.
#[derive(snafu::Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{error}:\n{}",
                error.chain()
                    .map(|e| format!("{e}"))
                    .collect::<Vec<_>>()
                    .join("\n -> ")))]
    Tele { error: anyhow::Error },

    #[snafu(display("Could not read '{path:?}': {source}"))]
    ReadFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not create {path:?}: {source}"))]
    CreateFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not write file {path:?}: {source}"))]
    WriteFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not serialize '{name}': {source}"))]
    Serialize {
        name: String,
        source: serde_json::Error,
    },

    #[snafu(display("Could not deserialize '{name}': {source}"))]
    Deserialize {
        name: String,
        source: serde_json::Error,
    },

    #[snafu(display("Could not parse config {path:?}: {source}"))]
    Config {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },

    #[snafu(display("Could not build schedule: {msg}"))]
    Schedule { msg: String },

    #[snafu(display("Could not save the apply graph: {source}"))]
    Dot { source: dagga::dot::DotError },

    #[snafu(display(
        "Could not build apply graph because of a missing resource name for '{missing}'"
    ))]
    MissingName { missing: usize },

    #[snafu(display("Could not find a resource by the name '{name}'"))]
    MissingResource { name: String },

    #[snafu(display("Stack '{stack}' already declares a resource named '{name}'"))]
    DuplicateResource { stack: String, name: String },

    #[snafu(display(
        "'{name}' cannot depend on '{depends_on}' because '{depends_on}' is declared after it"
    ))]
    ForwardDependency { name: String, depends_on: String },

    #[snafu(display("'{id}' is not a valid logical id, only ASCII letters and digits are allowed"))]
    InvalidLogicalId { id: String },

    #[snafu(display("App already contains a stack named '{name}'"))]
    DuplicateStack { name: String },

    #[snafu(display("Stack '{stack}' depends on unknown stack '{name}'"))]
    MissingStack { stack: String, name: String },

    #[snafu(display("Stack '{stack}' cannot import its own export '{export}'"))]
    SelfImport { stack: String, export: String },

    #[snafu(display("The certificate principal is empty"))]
    MissingPrincipal,

    #[snafu(display("Missing parameter '{name}'"))]
    MissingParameter { name: String },

    #[snafu(display("Error during lookup of parameter '{name}': {error}"))]
    Parameter {
        name: String,
        error: Box<dyn UserError>,
    },

    #[snafu(display(
        "'{arn}' is not a published function, expected a version or alias qualified ARN"
    ))]
    UnpublishedFunction { arn: String },

    #[snafu(display("Missing function asset {path:?}"))]
    MissingAsset { path: std::path::PathBuf },
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Tele { error }
    }
}

impl From<dagga::dot::DotError> for Error {
    fn from(source: dagga::dot::DotError) -> Self {
        Self::Dot { source }
    }
}

type Result<T, E = Error> = core::result::Result<T, E>;

/// IaC resource descriptors.
///
/// A descriptor is the local, declarative definition of a platform resource.
/// Its serialized form becomes the resource's properties in a template, and
/// any [`remote::Remote`] values it holds become dependency edges.
pub trait Resource:
    core::fmt::Debug + Clone + PartialEq + HasDependencies + serde::Serialize + 'static
{
    /// The CloudFormation type of the resource, eg `AWS::IoT::Thing`.
    const TYPE: &'static str;
}

/// An edge to a resource, by the stack it lives in and its logical id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub stack: String,
    pub id: String,
}

impl core::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.stack, self.id)
    }
}

#[derive(Clone, Default, Debug)]
pub struct Dependencies {
    /// Specifies a dependency on a `Resource`.
    inner: Vec<Dependency>,
}

impl IntoIterator for Dependencies {
    type Item = Dependency;

    type IntoIter = <Vec<Dependency> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl core::fmt::Display for Dependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(
            &self
                .inner
                .iter()
                .map(|u| u.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl Dependencies {
    pub fn merge(self, other: Self) -> Self {
        Dependencies {
            inner: [self.inner, other.inner].concat(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Tracks dependencies between resources.
///
/// This trait can be derived, and has a default implementation that
/// reports zero dependencies.
pub trait HasDependencies {
    fn dependencies(&self) -> Dependencies {
        Dependencies::default()
    }
}
