//! AWS Lambda resources.
//!
//! A function on its own is a mutable draft. Consumers that need a stable
//! target (Greengrass among them) refer to an [`Alias`] of a published
//! [`Version`] instead.
use crate::{remote::Remote, HasDependencies, Resource};

/// Where the function's deployment package lives.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Code {
    pub s3_bucket: String,
    pub s3_key: String,
}

impl HasDependencies for Code {}

#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    pub code: Code,
    pub handler: String,
    // ARN of the role to use for this lambda.
    pub role: Remote<String>,
    pub runtime: String,
}

impl Resource for Function {
    const TYPE: &'static str = "AWS::Lambda::Function";
}

/// An immutable snapshot of a function's code and configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct Version {
    pub function_name: Remote<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Version {
    const TYPE: &'static str = "AWS::Lambda::Version";
}

/// A stable name pointing at a published version.
#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct Alias {
    pub function_name: Remote<String>,
    pub function_version: Remote<String>,
    pub name: String,
}

impl Resource for Alias {
    const TYPE: &'static str = "AWS::Lambda::Alias";
}
