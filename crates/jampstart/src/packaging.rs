//! The function stack.
//!
//! Greengrass runs a published function, never the mutable draft, so the
//! function is declared together with a version and an alias. The alias ARN
//! is exported for the device stack to import.
use snafu::prelude::*;

use crate::{
    aws::{
        iam::Role,
        lambda::{Alias, Code, Function, Version},
    },
    config::PackagingConfig,
    template::Export,
    MissingAssetSnafu, Result, Stack,
};

pub struct FunctionPackage {
    pub stack: Stack,
    /// The published alias, importable by other stacks.
    pub alias: Export,
    /// Digest of the function code.
    pub asset_hash: String,
}

impl FunctionPackage {
    /// Where the engine uploads the code archive.
    pub fn asset_key(&self) -> String {
        asset_key(&self.asset_hash)
    }
}

fn asset_key(hash: &str) -> String {
    format!("assets/{hash}.zip")
}

/// Builds the function stack from the code at `config.asset_path`.
///
/// ## Errors
/// Errs with [`Error::MissingAsset`](crate::Error::MissingAsset) if there is
/// no code at the asset path.
pub fn function_stack(config: &PackagingConfig) -> Result<FunctionPackage> {
    let asset_hash = crate::utils::asset_digest(&config.asset_path)?.context(MissingAssetSnafu {
        path: &config.asset_path,
    })?;
    log::info!("function asset {:?} hashes to {asset_hash}", config.asset_path);

    let mut stack = Stack::new(&config.stack_name);

    let role = stack.resource(
        format!("{}ServiceRole", config.function_id),
        Role::lambda_service_role(),
    )?;
    let function = stack.resource(
        &config.function_id,
        Function {
            code: Code {
                s3_bucket: config.asset_bucket.clone(),
                s3_key: asset_key(&asset_hash),
            },
            handler: config.handler.clone(),
            role: role.attribute("Arn"),
            runtime: config.runtime.clone(),
        },
    )?;
    // The role's policies must be attached before the function can run.
    function.depends_on(&mut stack, &role)?;

    let version = stack.resource(
        &config.version_id,
        Version {
            function_name: function.reference(),
            description: Some(format!("asset {asset_hash}")),
        },
    )?;
    let alias = stack.resource(
        &config.alias_id,
        Alias {
            function_name: function.reference(),
            function_version: version.attribute("Version"),
            name: config.alias_name.clone(),
        },
    )?;

    let alias = stack.export(
        format!("{}Arn", config.alias_id),
        alias.reference(),
        Some(format!("ARN of the '{}' alias", config.alias_name)),
    )?;

    Ok(FunctionPackage {
        stack,
        alias,
        asset_hash,
    })
}
