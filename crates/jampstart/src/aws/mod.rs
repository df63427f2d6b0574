//! Resource descriptors for AWS.

pub use aws_config::SdkConfig;
pub mod greengrass;
pub mod iam;
pub mod iot;
pub mod lambda;
pub mod ssm;

/// A wrapper around the AWS `SdkConfig` that provides `AsRef<SdkConfig>`.
pub struct Aws(pub SdkConfig);

impl AsRef<SdkConfig> for Aws {
    fn as_ref(&self) -> &SdkConfig {
        &self.0
    }
}

impl Aws {
    /// Loads the default AWS configuration from the environment.
    pub async fn from_env() -> Self {
        Aws(aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await)
    }

    /// The configured region, if any.
    pub fn region(&self) -> Option<String> {
        self.0.region().map(|region| region.to_string())
    }
}

/// The account and region a stack is deployed to.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Environment {
    pub region: String,
    pub account: String,
}

impl Environment {
    pub fn new(region: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account: account.into(),
        }
    }

    /// The ARN of the IoT thing named `thing_name` in this environment.
    pub fn thing_arn(&self, thing_name: &str) -> String {
        format!(
            "arn:aws:iot:{}:{}:thing/{thing_name}",
            self.region, self.account
        )
    }
}
