//! Synthesizes the stacks that provision a Raspberry Pi as a Greengrass core.
//!
//! ```sh
//! cargo run -p jampstart-infra -- --account 111111111111 synth
//! cargo run -p jampstart-infra -- --config jampstart.toml plan
//! cargo run -p jampstart-infra -- graph --out graphs
//! ```
//!
//! The certificate ARN is read from SSM Parameter Store unless it is given
//! with `--certificate-arn`. Run with `RUST_LOG=info` to see what is declared.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jamp::{
    aws::{iot::CertificatePrincipal, ssm::SsmParameters, Aws, Environment},
    parameters::{certificate_principal, StaticParameters},
    DeviceConfig,
};

#[derive(Parser)]
#[command(name = "infra", about = "Provision a Raspberry Pi as a Greengrass core")]
struct Cli {
    /// TOML file overriding the default names and limits.
    #[arg(long, env = "JAMPSTART_CONFIG")]
    config: Option<PathBuf>,

    /// Region to deploy to. Defaults to the AWS environment's region.
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Account to deploy to.
    #[arg(long, env = "AWS_ACCOUNT_ID")]
    account: String,

    /// Device certificate ARN. Skips the Parameter Store lookup.
    #[arg(long, env = "JAMPSTART_CERTIFICATE_ARN")]
    certificate_arn: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write every template and the manifest.
    Synth {
        #[clap(long, default_value = "infra.out")]
        out: PathBuf,
    },
    /// Print the order resources and stacks would be applied in.
    Plan,
    /// Write a dot graph of each stack.
    Graph {
        #[clap(long, default_value = "infra.out")]
        out: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<DeviceConfig, jamp::Error> {
    let Some(path) = path else {
        return Ok(DeviceConfig::default());
    };
    let mut config = DeviceConfig::load(path)?;
    // the asset lives next to the config file
    if config.packaging.asset_path.is_relative() {
        if let Some(dir) = path.parent() {
            config.packaging.asset_path = dir.join(&config.packaging.asset_path);
        }
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let aws = if cli.region.is_none() || cli.certificate_arn.is_none() {
        Some(Aws::from_env().await)
    } else {
        None
    };
    let region = cli
        .region
        .clone()
        .or_else(|| aws.as_ref().and_then(Aws::region))
        .ok_or("no region, set --region or AWS_REGION")?;
    let env = Environment::new(region, &cli.account);

    let principal: CertificatePrincipal = match &cli.certificate_arn {
        Some(arn) => {
            let store =
                StaticParameters::default().with(config.certificate_parameter.clone(), arn);
            certificate_principal(&store, &config.certificate_parameter).await?
        }
        None => {
            let aws = match aws {
                Some(aws) => aws,
                None => Aws::from_env().await,
            };
            let store = SsmParameters::new(&aws);
            certificate_principal(&store, &config.certificate_parameter).await?
        }
    };

    let application = jamp::application(&config, &env, &principal)?;
    if let Some(thing_arn) = &application.thing_arn {
        log::info!("thing: {thing_arn}");
    }
    log::info!("function asset: {}", application.asset_hash);

    let app = &application.app;
    match cli.command {
        Command::Synth { out } => {
            let manifest = app.synth(&out).await?;
            println!(
                "synthesized {} stacks into {out:?}",
                manifest.artifacts.len()
            );
        }
        Command::Plan => {
            for (i, batch) in app.deploy_order()?.into_iter().enumerate() {
                println!("=== stage {}: {}", i + 1, batch.join(", "));
                for name in batch {
                    if let Some(stack) = app.stack(&name) {
                        println!("{}", stack.get_schedule_string()?);
                    }
                }
            }
        }
        Command::Graph { out } => {
            std::fs::create_dir_all(&out)?;
            for stack in app.stacks() {
                let path = out.join(format!("{}.dot", stack.name()));
                stack.save_apply_graph(&path)?;
                println!("wrote {path:?}");
            }
        }
    }

    Ok(())
}
