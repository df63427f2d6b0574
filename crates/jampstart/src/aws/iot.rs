//! AWS IoT resources.
use snafu::prelude::*;

use crate::{HasDependencies, MissingPrincipalSnafu, Resource, Result};

/// The identity of the device certificate, usually its ARN.
///
/// Certificates are issued outside of this crate. The principal is looked up
/// from a parameter store and must be non-empty.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct CertificatePrincipal(String);

impl CertificatePrincipal {
    pub fn new(principal: impl Into<String>) -> Result<Self> {
        let principal = principal.into();
        ensure!(!principal.trim().is_empty(), MissingPrincipalSnafu);
        Ok(Self(principal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CertificatePrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl HasDependencies for CertificatePrincipal {}

/// A device registry entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Thing {
    /// When `None` the provider generates a name, which is then unknown
    /// until the thing exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_name: Option<String>,
}

impl HasDependencies for Thing {}

impl Resource for Thing {
    const TYPE: &'static str = "AWS::IoT::Thing";
}

impl Thing {
    /// The thing's name, if it is concretely known.
    pub fn name(&self) -> Option<&str> {
        self.thing_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Allows every IoT and Greengrass action on every resource.
    pub fn allow_iot_and_greengrass() -> Self {
        PolicyDocument {
            version: "2012-10-17".to_owned(),
            statement: vec![Statement {
                effect: Effect::Allow,
                action: vec!["iot:*".to_owned(), "greengrass:*".to_owned()],
                resource: vec!["*".to_owned()],
            }],
        }
    }
}

/// A permission document for device credentials.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,
    pub policy_document: PolicyDocument,
}

impl HasDependencies for Policy {}

impl Resource for Policy {
    const TYPE: &'static str = "AWS::IoT::Policy";
}

impl Policy {
    pub fn name(&self) -> Option<&str> {
        self.policy_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Attaches a policy to a certificate.
#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyPrincipalAttachment {
    pub policy_name: String,
    pub principal: CertificatePrincipal,
}

impl Resource for PolicyPrincipalAttachment {
    const TYPE: &'static str = "AWS::IoT::PolicyPrincipalAttachment";
}

/// Attaches a certificate to a thing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct ThingPrincipalAttachment {
    pub thing_name: String,
    pub principal: CertificatePrincipal,
}

impl Resource for ThingPrincipalAttachment {
    const TYPE: &'static str = "AWS::IoT::ThingPrincipalAttachment";
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_principal() {
        assert!(matches!(
            CertificatePrincipal::new("   "),
            Err(crate::Error::MissingPrincipal)
        ));
        let principal = CertificatePrincipal::new("arn:aws:iot:us-east-1:1:cert/abc").unwrap();
        assert_eq!(
            serde_json::json!("arn:aws:iot:us-east-1:1:cert/abc"),
            serde_json::to_value(&principal).unwrap()
        );
    }

    #[test]
    fn unnamed_thing() {
        let thing = Thing { thing_name: None };
        assert_eq!(None, thing.name());
        assert_eq!(serde_json::json!({}), serde_json::to_value(&thing).unwrap());

        let thing = Thing {
            thing_name: Some(String::new()),
        };
        assert_eq!(None, thing.name());
    }
}
