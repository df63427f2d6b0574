//! SSM Parameter Store lookup.
use aws_config::SdkConfig;

use crate::parameters::ParameterStore;

/// Reads parameters from AWS Systems Manager Parameter Store.
pub struct SsmParameters {
    client: aws_sdk_ssm::Client,
}

impl SsmParameters {
    pub fn new(cfg: &impl AsRef<SdkConfig>) -> Self {
        Self {
            client: aws_sdk_ssm::Client::new(cfg.as_ref()),
        }
    }
}

impl ParameterStore for SsmParameters {
    type Error = aws_sdk_ssm::Error;

    async fn get_parameter(&self, name: &str) -> Result<Option<String>, Self::Error> {
        match self.client.get_parameter().name(name).send().await {
            Ok(out) => Ok(out
                .parameter()
                .and_then(|parameter| parameter.value())
                .map(str::to_owned)),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found())
                {
                    log::debug!("parameter '{name}' does not exist");
                    Ok(None)
                } else {
                    Err(err.into())
                }
            }
        }
    }
}
