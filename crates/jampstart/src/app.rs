//! Applications: stacks deployed together.
use std::{collections::BTreeMap, path::Path};

use snafu::prelude::*;

use crate::{
    aws::{greengrass::FunctionReference, iot::CertificatePrincipal, Environment},
    device::{iot_stack, BuildStatus},
    packaging::function_stack,
    template::write_json,
    DeviceConfig, DuplicateStackSnafu, Error, MissingStackSnafu, Result, Stack,
};

pub const MANIFEST_VERSION: &str = "1";
pub const MANIFEST_FILE: &str = "manifest.json";

/// A stack's entry in the [`Manifest`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub template_file: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Tells the provisioning engine which templates to apply and in what order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub artifacts: BTreeMap<String, Artifact>,
    /// Batches of stack names. Stacks in one batch are independent.
    pub deploy_order: Vec<Vec<String>>,
}

fn template_file(stack: &str) -> String {
    format!("{stack}.template.json")
}

#[derive(Default)]
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stack(&mut self, stack: Stack) -> Result<()> {
        ensure!(
            self.stack(stack.name()).is_none(),
            DuplicateStackSnafu { name: stack.name() }
        );
        log::debug!("adding stack '{}'", stack.name());
        self.stacks.push(stack);
        Ok(())
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|stack| stack.name() == name)
    }

    pub fn stacks(&self) -> impl Iterator<Item = &Stack> {
        self.stacks.iter()
    }

    /// Schedules the stacks by the exports they import.
    pub fn deploy_order(&self) -> Result<Vec<Vec<String>>> {
        let mut dag = dagga::Dag::<String, usize>::default();
        for (key, stack) in self.stacks.iter().enumerate() {
            let mut reads = vec![];
            for dep in stack.stack_dependencies() {
                let dep_key = self
                    .stacks
                    .iter()
                    .position(|other| other.name() == dep)
                    .context(MissingStackSnafu {
                        stack: stack.name(),
                        name: dep,
                    })?;
                reads.push(dep_key);
            }
            dag.add_node(
                dagga::Node::new(stack.name().to_owned())
                    .with_name(stack.name())
                    .with_reads(reads)
                    .with_result(key),
            );
        }
        let schedule = dag
            .build_schedule()
            .map_err(|e| Error::Schedule { msg: e.to_string() })?;
        Ok(schedule
            .batches
            .into_iter()
            .map(|batch| batch.into_iter().map(|node| node.into_inner()).collect())
            .collect())
    }

    pub fn manifest(&self) -> Result<Manifest> {
        Ok(Manifest {
            version: MANIFEST_VERSION.to_owned(),
            artifacts: self
                .stacks
                .iter()
                .map(|stack| {
                    (
                        stack.name().to_owned(),
                        Artifact {
                            template_file: template_file(stack.name()),
                            dependencies: stack.stack_dependencies().map(str::to_owned).collect(),
                        },
                    )
                })
                .collect(),
            deploy_order: self.deploy_order()?,
        })
    }

    /// Writes every stack's template and the manifest into `out_dir`.
    pub async fn synth(&self, out_dir: impl AsRef<Path>) -> Result<Manifest> {
        let out_dir = out_dir.as_ref();
        let manifest = self.manifest()?;
        for stack in self.stacks.iter() {
            // scheduling validates the graph before anything is written
            let plan = stack.plan()?;
            log::trace!("schedule for '{}':\n{plan}", stack.name());
            let written = stack
                .template()
                .save(stack.name(), out_dir.join(template_file(stack.name())))
                .await?;
            log::info!("template for '{}' {written}", stack.name());
        }
        let written = write_json(MANIFEST_FILE, &manifest, out_dir.join(MANIFEST_FILE)).await?;
        log::info!("manifest {written}");
        Ok(manifest)
    }
}

/// Both stacks, ready to synthesize.
pub struct Application {
    pub app: App,
    pub status: BuildStatus,
    pub thing_arn: Option<String>,
    pub asset_hash: String,
}

/// Builds the function stack and the device stack that runs it.
pub fn application(
    config: &DeviceConfig,
    env: &Environment,
    principal: &CertificatePrincipal,
) -> Result<Application> {
    let package = function_stack(&config.packaging)?;
    let function = FunctionReference::Export(package.alias.clone());
    let device = iot_stack(config, env, principal, &function)?;

    let mut app = App::new();
    app.add_stack(package.stack)?;
    app.add_stack(device.stack)?;
    // fail early on a bad stack graph
    let order = app.deploy_order()?;
    log::debug!("deploy order: {order:?}");

    Ok(Application {
        app,
        status: device.status,
        thing_arn: device.thing_arn,
        asset_hash: package.asset_hash,
    })
}
