//! Parameter lookup.
//!
//! The certificate principal is issued outside of this crate and published
//! under a well known parameter name. A [`ParameterStore`] resolves it.
use std::{collections::HashMap, future::Future};

use crate::{aws::iot::CertificatePrincipal, Error, Result, UserError};

/// A source of named string parameters.
pub trait ParameterStore {
    /// Errors that may occur interacting with the store.
    type Error: UserError;

    /// Returns the value of the parameter, or `None` if it does not exist.
    fn get_parameter(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>>;
}

/// Parameters held in memory, eg from the command line.
#[derive(Clone, Debug, Default)]
pub struct StaticParameters {
    values: HashMap<String, String>,
}

impl StaticParameters {
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

impl ParameterStore for StaticParameters {
    type Error = std::convert::Infallible;

    async fn get_parameter(&self, name: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.get(name).cloned())
    }
}

/// Looks up a required parameter.
pub async fn require<P: ParameterStore>(store: &P, name: &str) -> Result<String> {
    log::debug!("looking up parameter '{name}'");
    let value = store
        .get_parameter(name)
        .await
        .map_err(|error| Error::Parameter {
            name: name.to_owned(),
            error: Box::new(error),
        })?;
    value.ok_or_else(|| Error::MissingParameter {
        name: name.to_owned(),
    })
}

/// Resolves the certificate principal stored under `name`.
pub async fn certificate_principal<P: ParameterStore>(
    store: &P,
    name: &str,
) -> Result<CertificatePrincipal> {
    let value = require(store, name).await?;
    let principal = CertificatePrincipal::new(value)?;
    log::info!("resolved certificate principal from '{name}'");
    Ok(principal)
}

#[cfg(test)]
mod test {
    use super::*;

    struct Unreachable;

    impl ParameterStore for Unreachable {
        type Error = String;

        async fn get_parameter(&self, name: &str) -> Result<Option<String>, Self::Error> {
            Err(format!("could not reach the store for {name}"))
        }
    }

    #[tokio::test]
    async fn resolves_principal() {
        let store = StaticParameters::default().with(
            "jampstart-iot-crt-arn",
            "arn:aws:iot:us-east-1:111111111111:cert/abc",
        );
        let principal = certificate_principal(&store, "jampstart-iot-crt-arn")
            .await
            .unwrap();
        assert_eq!("arn:aws:iot:us-east-1:111111111111:cert/abc", principal.as_str());
    }

    #[tokio::test]
    async fn missing_parameter_fails() {
        let store = StaticParameters::default();
        let err = certificate_principal(&store, "jampstart-iot-crt-arn")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingParameter { ref name } if name == "jampstart-iot-crt-arn"));
    }

    #[tokio::test]
    async fn empty_parameter_fails() {
        let store = StaticParameters::default().with("jampstart-iot-crt-arn", "");
        let err = certificate_principal(&store, "jampstart-iot-crt-arn")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingPrincipal), "{err}");
    }

    #[tokio::test]
    async fn store_errors_are_wrapped() {
        let err = require(&Unreachable, "anything").await.unwrap_err();
        assert!(matches!(err, Error::Parameter { .. }));
        assert!(err.to_string().contains("could not reach the store"), "{err}");
    }
}
