//! IAM resources.
use crate::{HasDependencies, Resource};

/// The managed policy that lets a Lambda function write its logs.
pub const LAMBDA_BASIC_EXECUTION_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// AWS role resource.
#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub assume_role_policy_document: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<String>,
}

impl Resource for Role {
    const TYPE: &'static str = "AWS::IAM::Role";
}

impl Role {
    /// A role assumable by the Lambda service, with basic execution rights.
    pub fn lambda_service_role() -> Self {
        Role {
            assume_role_policy_document: serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Action": "sts:AssumeRole",
                        "Effect": "Allow",
                        "Principal": {
                            "Service": "lambda.amazonaws.com"
                        }
                    }
                ]
            }),
            managed_policy_arns: vec![LAMBDA_BASIC_EXECUTION_POLICY_ARN.to_owned()],
        }
    }
}
