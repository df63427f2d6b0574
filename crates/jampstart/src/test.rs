use std::{collections::BTreeSet, path::PathBuf};

use pretty_assertions::assert_eq;

use crate::{
    aws::{greengrass::FunctionReference, iot::CertificatePrincipal, Environment},
    config::PackagingConfig,
    device::{ids, iot_stack, BuildStatus, Prerequisite},
    packaging::function_stack,
    remote::Remote,
    *,
};

const PRINCIPAL: &str = "arn:aws:iot:us-east-1:111111111111:cert/abc";
const ALIAS_ARN: &str =
    "arn:aws:lambda:us-east-1:111111111111:function:GreengrassSampleHandler:rasberrypi";

fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("jampstart-test")
        .join(format!("{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A config whose function asset is a fresh directory under `name`.
fn config_with_asset(name: &str) -> DeviceConfig {
    let dir = scratch(name);
    let asset_path = dir.join("lambda");
    std::fs::create_dir_all(&asset_path).unwrap();
    std::fs::write(
        asset_path.join("handler.py"),
        "def handler(event, context):\n    return\n",
    )
    .unwrap();
    DeviceConfig {
        packaging: PackagingConfig {
            asset_path,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn env() -> Environment {
    Environment::new("us-east-1", "111111111111")
}

fn principal() -> CertificatePrincipal {
    CertificatePrincipal::new(PRINCIPAL).unwrap()
}

fn function() -> FunctionReference {
    FunctionReference::arn(ALIAS_ARN).unwrap()
}

fn set(ids: &[&'static str]) -> BTreeSet<&'static str> {
    ids.iter().copied().collect()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
struct Bucket {
    name: String,
}

impl Resource for Bucket {
    const TYPE: &'static str = "Test::Bucket";
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, HasDependencies)]
#[serde(rename_all = "PascalCase")]
struct Service {
    bucket_arn: Remote<String>,
    #[dependencies(skip)]
    #[serde(skip)]
    ignored: Option<Remote<String>>,
}

impl Resource for Service {
    const TYPE: &'static str = "Test::Service";
}

#[derive(HasDependencies)]
struct Pair(Remote<String>, Vec<Remote<String>>);

fn dependency_ids(deps: Dependencies) -> Vec<String> {
    deps.into_iter().map(|dep| dep.to_string()).collect()
}

#[test]
fn derive_collects_remotes() {
    let pair = Pair(
        Remote::new("Test", "A", remote::Attribute::Ref),
        vec![
            Remote::new("Test", "B", remote::Attribute::GetAtt("Arn".into())),
            Remote::new("Other", "C", remote::Attribute::Ref),
        ],
    );
    assert_eq!(
        vec!["Test.A", "Test.B", "Other.C"],
        dependency_ids(pair.dependencies())
    );

    let service = Service {
        bucket_arn: Remote::new("Test", "Bucket", remote::Attribute::Ref),
        ignored: Some(Remote::new("Test", "Elsewhere", remote::Attribute::Ref)),
    };
    assert_eq!(vec!["Test.Bucket"], dependency_ids(service.dependencies()));
}

#[test]
fn scenario_thing_arn_and_group() {
    init_logging();
    let device = iot_stack(&DeviceConfig::default(), &env(), &principal(), &function()).unwrap();
    assert_eq!(BuildStatus::Complete, device.status);
    assert_eq!(
        Some("arn:aws:iot:us-east-1:111111111111:thing/Raspberry_Pi_Thing"),
        device.thing_arn.as_deref()
    );

    let stack = &device.stack;
    assert_eq!(
        vec![
            ids::THING,
            ids::POLICY,
            ids::POLICY_PRINCIPAL_ATTACHMENT,
            ids::THING_PRINCIPAL_ATTACHMENT,
            ids::CORE_DEFINITION,
            ids::RESOURCE_DEFINITION,
            ids::FUNCTION_DEFINITION,
            ids::GROUP,
        ],
        stack.ids()
    );
    assert_eq!(
        Some(set(&[
            ids::CORE_DEFINITION,
            ids::RESOURCE_DEFINITION,
            ids::FUNCTION_DEFINITION
        ])),
        stack.dependencies_of(ids::GROUP)
    );
    assert_eq!(
        serde_json::json!({
            "Name": "Raspberry_Pi",
            "InitialVersion": {
                "CoreDefinitionVersionArn": { "Fn::GetAtt": ["CoreDefinition", "LatestVersionArn"] },
                "FunctionDefinitionVersionArn": { "Fn::GetAtt": ["FunctionDefinition", "LatestVersionArn"] },
                "ResourceDefinitionVersionArn": { "Fn::GetAtt": ["ResourceDefinition", "LatestVersionArn"] },
            }
        }),
        stack.properties(ids::GROUP).unwrap().clone()
    );
    assert_eq!(
        serde_json::json!({
            "Name": "Raspberry_Pi_Core",
            "InitialVersion": {
                "Cores": [{
                    "CertificateArn": PRINCIPAL,
                    "Id": "1",
                    "ThingArn": "arn:aws:iot:us-east-1:111111111111:thing/Raspberry_Pi_Thing",
                }]
            }
        }),
        stack.properties(ids::CORE_DEFINITION).unwrap().clone()
    );
}

#[test]
fn device_edges() {
    let device = iot_stack(&DeviceConfig::default(), &env(), &principal(), &function()).unwrap();
    let stack = &device.stack;

    let expected = [
        (ids::THING, set(&[])),
        (ids::POLICY, set(&[ids::THING])),
        (ids::POLICY_PRINCIPAL_ATTACHMENT, set(&[ids::POLICY])),
        (ids::THING_PRINCIPAL_ATTACHMENT, set(&[ids::THING])),
        (ids::CORE_DEFINITION, set(&[ids::THING])),
        (ids::RESOURCE_DEFINITION, set(&[])),
        (ids::FUNCTION_DEFINITION, set(&[])),
    ];
    for (id, deps) in expected {
        assert_eq!(Some(deps), stack.dependencies_of(id), "{id}");
    }

    let greengrass = [
        ids::CORE_DEFINITION,
        ids::RESOURCE_DEFINITION,
        ids::FUNCTION_DEFINITION,
        ids::GROUP,
    ];
    let greengrass_sinks = stack
        .sinks()
        .into_iter()
        .filter(|id| greengrass.contains(id))
        .collect::<Vec<_>>();
    assert_eq!(vec![ids::GROUP], greengrass_sinks);
}

#[test]
fn device_plan_respects_edges() {
    let device = iot_stack(&DeviceConfig::default(), &env(), &principal(), &function()).unwrap();
    let stack = &device.stack;
    let plan = stack.plan().unwrap();
    assert_eq!(stack.len(), plan.order().len());
    for id in stack.ids() {
        let batch = plan.batch_of(id).unwrap();
        for dep in stack.dependencies_of(id).unwrap() {
            assert!(
                plan.batch_of(dep).unwrap() < batch,
                "{id} is scheduled before {dep}:\n{plan}"
            );
        }
    }
    let schedule = stack.get_schedule_string().unwrap();
    assert!(schedule.starts_with("--- step 1\n"), "{schedule}");
    assert!(schedule.contains("create Group [AWS::Greengrass::Group]"), "{schedule}");
}

#[test]
fn policy_document_is_stable() {
    let render = || {
        let device =
            iot_stack(&DeviceConfig::default(), &env(), &principal(), &function()).unwrap();
        serde_json::to_string(&device.stack.properties(ids::POLICY).unwrap()["PolicyDocument"])
            .unwrap()
    };
    let first = render();
    assert_eq!(
        r#"{"Statement":[{"Action":["iot:*","greengrass:*"],"Effect":"Allow","Resource":["*"]}],"Version":"2012-10-17"}"#,
        first
    );
    assert_eq!(first, render());
}

#[test]
fn function_entry() {
    let device = iot_stack(&DeviceConfig::default(), &env(), &principal(), &function()).unwrap();
    let properties = device.stack.properties(ids::FUNCTION_DEFINITION).unwrap();
    assert_eq!(
        serde_json::json!({
            "Name": "Raspberry_Pi_Function",
            "InitialVersion": {
                "Functions": [{
                    "Id": "1",
                    "FunctionArn": ALIAS_ARN,
                    "FunctionConfiguration": {
                        "EncodingType": "binary",
                        "MemorySize": 65536,
                        "Pinned": true,
                        "Timeout": 3,
                        "Environment": {
                            "ResourceAccessPolicies": [{ "ResourceId": "1", "Permission": "rw" }]
                        }
                    }
                }]
            }
        }),
        properties.clone()
    );
    let volume = device.stack.properties(ids::RESOURCE_DEFINITION).unwrap();
    assert_eq!(
        serde_json::json!({
            "Id": "1",
            "Name": "log_file_resource",
            "ResourceDataContainer": {
                "LocalVolumeResourceData": { "SourcePath": "/log", "DestinationPath": "/log" }
            }
        }),
        volume["InitialVersion"]["Resources"][0]
    );
}

#[test]
fn unresolved_thing_name_stops_after_thing() {
    init_logging();
    for thing_name in [None, Some(String::new())] {
        let config = DeviceConfig {
            thing_name,
            ..Default::default()
        };
        let device = iot_stack(&config, &env(), &principal(), &function()).unwrap();
        assert_eq!(vec![ids::THING], device.stack.ids());
        assert_eq!(None, device.thing_arn);
        let BuildStatus::Skipped(skips) = &device.status else {
            panic!("expected a skipped build, got {:?}", device.status);
        };
        assert_eq!(1, skips.len());
        assert_eq!(Prerequisite::ThingName, skips[0].prerequisite);
        assert!(skips[0].skipped.contains(&ids::GROUP));
        assert!(device.stack.plan().is_ok());
    }
}

#[test]
fn unresolved_policy_name_skips_attachment() {
    let config = DeviceConfig {
        policy_name: None,
        ..Default::default()
    };
    let device = iot_stack(&config, &env(), &principal(), &function()).unwrap();
    assert!(!device.status.is_complete());
    assert_eq!(
        BuildStatus::Skipped(vec![device::Skip {
            prerequisite: Prerequisite::PolicyName,
            skipped: vec![ids::POLICY_PRINCIPAL_ATTACHMENT],
        }]),
        device.status
    );
    assert!(device.stack.contains(ids::POLICY));
    assert!(!device.stack.contains(ids::POLICY_PRINCIPAL_ATTACHMENT));
    assert!(device.stack.contains(ids::GROUP));
}

#[test]
fn unpublished_function_is_rejected() {
    let function = FunctionReference::Arn(
        "arn:aws:lambda:us-east-1:111111111111:function:GreengrassSampleHandler".into(),
    );
    let err = iot_stack(&DeviceConfig::default(), &env(), &principal(), &function)
        .err()
        .unwrap();
    assert!(matches!(err, Error::UnpublishedFunction { .. }), "{err}");
}

#[test]
fn stack_rejects_bad_declarations() {
    let mut stack = Stack::new("Test");
    let bucket = stack
        .resource(
            "Bucket",
            Bucket {
                name: "logs".into(),
            },
        )
        .unwrap();

    let err = stack
        .resource("Bucket", Bucket { name: "again".into() })
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateResource { .. }), "{err}");

    let err = stack
        .resource("not-valid", Bucket { name: "x".into() })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLogicalId { .. }), "{err}");

    let mut other = Stack::new("Other");
    let elsewhere = other
        .resource("Elsewhere", Bucket { name: "y".into() })
        .unwrap();
    let err = stack
        .resource(
            "Service",
            Service {
                bucket_arn: elsewhere.attribute("Arn"),
                ignored: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::MissingResource { .. }), "{err}");

    let later = stack
        .resource("Later", Bucket { name: "z".into() })
        .unwrap();
    let err = bucket.depends_on(&mut stack, &later).unwrap_err();
    assert!(matches!(err, Error::ForwardDependency { .. }), "{err}");
    let err = bucket.depends_on(&mut stack, &bucket).unwrap_err();
    assert!(matches!(err, Error::ForwardDependency { .. }), "{err}");

    assert_eq!(vec!["Bucket", "Later"], stack.ids());
}

#[test]
fn template_depends_on_lists_explicit_edges() {
    let mut stack = Stack::new("Test").with_description("services");
    let bucket = stack
        .resource("Bucket", Bucket { name: "logs".into() })
        .unwrap();
    let audit = stack
        .resource("Audit", Bucket { name: "audit".into() })
        .unwrap();
    let service = stack
        .resource(
            "Service",
            Service {
                bucket_arn: bucket.attribute("Arn"),
                ignored: None,
            },
        )
        .unwrap();
    service.depends_on(&mut stack, &audit).unwrap();

    assert_eq!(
        Some(set(&["Audit", "Bucket"])),
        stack.dependencies_of("Service")
    );
    assert_eq!(
        Some(set(&["Audit"])),
        stack.explicit_dependencies_of("Service")
    );
    assert_eq!(vec!["Service"], stack.dependents_of("Bucket"));

    let template = stack.template();
    let service = &template.resources["Service"];
    assert_eq!("Test::Service", service.ty);
    assert_eq!(vec!["Audit".to_owned()], service.depends_on);
    assert_eq!(
        serde_json::json!({ "BucketArn": { "Fn::GetAtt": ["Bucket", "Arn"] } }),
        service.properties
    );

    let json = template.to_json_string().unwrap();
    assert_eq!(template, template::Template::from_json_str("test", &json).unwrap());
    assert!(json.contains(r#""AWSTemplateFormatVersion": "2010-09-09""#), "{json}");
}

#[test]
fn remotes_of_another_stack_are_rejected() {
    let mut stack = Stack::new("Test");
    stack
        .resource("Bucket", Bucket { name: "logs".into() })
        .unwrap();

    // same logical id, different stack
    let mut other = Stack::new("Other");
    let foreign = other
        .resource("Bucket", Bucket { name: "foreign".into() })
        .unwrap();

    let err = stack
        .resource(
            "Service",
            Service {
                bucket_arn: foreign.attribute("Arn"),
                ignored: None,
            },
        )
        .unwrap_err();
    assert!(
        matches!(err, Error::MissingResource { ref name } if name == "Other.Bucket"),
        "{err}"
    );
    assert!(!stack.contains("Service"));

    let err = stack.export("BucketArn", foreign.attribute("Arn"), None).unwrap_err();
    assert!(matches!(err, Error::MissingResource { .. }), "{err}");

    let local = stack
        .resource("Local", Bucket { name: "local".into() })
        .unwrap();
    let err = local.depends_on(&mut stack, &foreign).unwrap_err();
    assert!(matches!(err, Error::MissingResource { .. }), "{err}");
    assert_eq!(Some(set(&[])), stack.dependencies_of("Local"));
}

#[test]
fn empty_stack_plan() {
    let stack = Stack::new("Empty");
    let plan = stack.plan().unwrap();
    assert!(plan.batches.is_empty());
    assert!(plan.to_string().starts_with("--- No resources."));
}

#[test]
fn device_graph_dot() {
    let dir = scratch("device-dot");
    let device = iot_stack(&DeviceConfig::default(), &env(), &principal(), &function()).unwrap();
    let path = dir.join("device.dot");
    device.stack.save_apply_graph(&path).unwrap();
    let dot = std::fs::read_to_string(path).unwrap();
    assert!(dot.contains("Group"), "{dot}");
}

#[test]
fn config_overrides() {
    let config = DeviceConfig::from_toml_str(
        "jampstart.toml",
        r#"
thing_name = "Kitchen_Pi"
group_name = "Kitchen"

[function]
timeout = 10
permission = "ro"

[packaging]
alias_name = "kitchen"
"#,
    )
    .unwrap();
    assert_eq!(Some("Kitchen_Pi"), config.thing_name());
    assert_eq!(Some("Raspberry_Pi_Policy"), config.policy_name());
    assert_eq!("Kitchen", config.group_name);
    assert_eq!(10, config.function.timeout);
    assert_eq!(65536, config.function.memory_size);
    assert_eq!(aws::greengrass::Permission::ReadOnly, config.function.permission);
    assert_eq!("kitchen", config.packaging.alias_name);
    assert_eq!("LambdaStack", config.packaging.stack_name);

    let err = DeviceConfig::from_toml_str("bad.toml", "thing_name = 3").unwrap_err();
    assert!(matches!(err, Error::Config { .. }), "{err}");
}

#[tokio::test]
async fn config_load() {
    let dir = scratch("config-load");
    let path = dir.join("jampstart.toml");
    tokio::fs::write(&path, "policy_name = \"\"\n").await.unwrap();
    let config = DeviceConfig::load(&path).unwrap();
    assert_eq!(None, config.policy_name());
    assert_eq!(Some("Raspberry_Pi_Thing"), config.thing_name());

    let err = DeviceConfig::load(dir.join("missing.toml")).unwrap_err();
    assert!(matches!(err, Error::ReadFile { .. }), "{err}");
}

#[tokio::test]
async fn packaging_chain_and_export() {
    init_logging();
    let config = config_with_asset("packaging-chain");
    let package = function_stack(&config.packaging).unwrap();
    let stack = &package.stack;
    assert_eq!(
        vec![
            "GreengrassSampleHandlerServiceRole",
            "GreengrassSampleHandler",
            "GreengrassSampleVersion",
            "GreengrassSampleAlias",
        ],
        stack.ids()
    );
    assert_eq!(
        Some(set(&["GreengrassSampleHandlerServiceRole"])),
        stack.dependencies_of("GreengrassSampleHandler")
    );
    assert_eq!(
        Some(set(&["GreengrassSampleHandler"])),
        stack.dependencies_of("GreengrassSampleVersion")
    );
    assert_eq!(
        Some(set(&["GreengrassSampleHandler", "GreengrassSampleVersion"])),
        stack.dependencies_of("GreengrassSampleAlias")
    );
    assert_eq!("LambdaStack", package.alias.stack());
    assert_eq!("LambdaStack:GreengrassSampleAliasArn", package.alias.name());

    let function = stack.properties("GreengrassSampleHandler").unwrap();
    assert_eq!("python3.7", function["Runtime"]);
    assert_eq!("handler.handler", function["Handler"]);
    assert_eq!(
        serde_json::json!(package.asset_key()),
        function["Code"]["S3Key"]
    );
    let alias = stack.properties("GreengrassSampleAlias").unwrap();
    assert_eq!("rasberrypi", alias["Name"]);

    let template = stack.template();
    let output = &template.outputs["GreengrassSampleAliasArn"];
    assert_eq!(
        serde_json::json!({ "Ref": "GreengrassSampleAlias" }),
        output.value
    );
    assert_eq!(
        "LambdaStack:GreengrassSampleAliasArn",
        output.export.as_ref().unwrap().name
    );
}

#[tokio::test]
async fn packaging_hash_follows_code() {
    let config = config_with_asset("packaging-hash");
    let first = function_stack(&config.packaging).unwrap();
    let again = function_stack(&config.packaging).unwrap();
    assert_eq!(first.asset_hash, again.asset_hash);

    tokio::fs::write(
        config.packaging.asset_path.join("handler.py"),
        "def handler(event, context):\n    return 1\n",
    )
    .await
    .unwrap();
    let changed = function_stack(&config.packaging).unwrap();
    assert_ne!(first.asset_hash, changed.asset_hash);
    assert_ne!(
        first.stack.properties("GreengrassSampleVersion"),
        changed.stack.properties("GreengrassSampleVersion")
    );
}

#[tokio::test]
async fn packaging_requires_asset() {
    let dir = scratch("packaging-missing");
    let config = PackagingConfig {
        asset_path: dir.join("lambda"),
        ..Default::default()
    };
    let err = function_stack(&config).err().unwrap();
    assert!(matches!(err, Error::MissingAsset { .. }), "{err}");
}

#[tokio::test]
async fn application_deploy_order_and_synth() {
    init_logging();
    let config = config_with_asset("app-synth");
    let application = application(&config, &env(), &principal()).unwrap();
    assert!(application.status.is_complete());

    let app = &application.app;
    assert_eq!(
        vec![vec!["LambdaStack".to_owned()], vec!["IoTStack".to_owned()]],
        app.deploy_order().unwrap()
    );
    let iot = app.stack("IoTStack").unwrap();
    assert_eq!(vec!["LambdaStack"], iot.stack_dependencies().collect::<Vec<_>>());
    assert_eq!(
        serde_json::json!({ "Fn::ImportValue": "LambdaStack:GreengrassSampleAliasArn" }),
        iot.properties(ids::FUNCTION_DEFINITION).unwrap()["InitialVersion"]["Functions"][0]
            ["FunctionArn"]
    );

    let out = scratch("app-synth-out");
    let manifest = app.synth(&out).await.unwrap();
    assert_eq!(
        vec!["LambdaStack".to_owned()],
        manifest.artifacts["IoTStack"].dependencies
    );
    assert_eq!(
        "IoTStack.template.json",
        manifest.artifacts["IoTStack"].template_file
    );

    let contents = tokio::fs::read_to_string(out.join("IoTStack.template.json"))
        .await
        .unwrap();
    let template = template::Template::from_json_str("IoTStack", &contents).unwrap();
    assert_eq!(iot.template(), template);
    assert_eq!(
        vec![
            "CoreDefinition".to_owned(),
            "FunctionDefinition".to_owned(),
            "ResourceDefinition".to_owned()
        ],
        template.resources["Group"].depends_on
    );
    assert!(out.join("LambdaStack.template.json").exists());

    let contents = tokio::fs::read_to_string(out.join(app::MANIFEST_FILE))
        .await
        .unwrap();
    let read: app::Manifest = serde_json::from_str(&contents).unwrap();
    assert_eq!(manifest, read);

    // a second synth leaves everything in place
    let again = app.synth(&out).await.unwrap();
    assert_eq!(manifest, again);
    let written = iot
        .template()
        .save("IoTStack", out.join("IoTStack.template.json"))
        .await
        .unwrap();
    assert_eq!(template::Written::Unchanged, written);
}

#[test]
fn app_rejects_duplicates_and_unknown_stacks() {
    let mut app = App::new();
    app.add_stack(Stack::new("A")).unwrap();
    let err = app.add_stack(Stack::new("A")).unwrap_err();
    assert!(matches!(err, Error::DuplicateStack { .. }), "{err}");

    let mut owner = Stack::new("Owner");
    let bucket = owner
        .resource("Bucket", Bucket { name: "b".into() })
        .unwrap();
    let export = owner.export("BucketArn", bucket.attribute("Arn"), None).unwrap();

    let err = owner.import(&export).unwrap_err();
    assert!(matches!(err, Error::SelfImport { .. }), "{err}");

    let mut importer = Stack::new("Importer");
    importer.import(&export).unwrap();
    app.add_stack(importer).unwrap();
    let err = app.deploy_order().unwrap_err();
    assert!(matches!(err, Error::MissingStack { .. }), "{err}");

    app.add_stack(owner).unwrap();
    let order = app.deploy_order().unwrap();
    let position = |name: &str| order.iter().position(|batch| batch.iter().any(|s| s == name));
    assert!(position("Owner") < position("Importer"), "{order:?}");
}

#[tokio::test]
async fn import_cycle_fails_to_schedule() {
    let mut a = Stack::new("A");
    let mut b = Stack::new("B");
    let a_bucket = a.resource("Bucket", Bucket { name: "a".into() }).unwrap();
    let b_bucket = b.resource("Bucket", Bucket { name: "b".into() }).unwrap();
    let from_a = a.export("BucketArn", a_bucket.attribute("Arn"), None).unwrap();
    let from_b = b.export("BucketArn", b_bucket.attribute("Arn"), None).unwrap();
    a.import(&from_b).unwrap();
    b.import(&from_a).unwrap();

    let mut app = App::new();
    app.add_stack(a).unwrap();
    app.add_stack(b).unwrap();

    let err = app.deploy_order().unwrap_err();
    assert!(matches!(err, Error::Schedule { .. }), "{err}");

    let out = scratch("import-cycle").join("out");
    let err = app.synth(&out).await.unwrap_err();
    assert!(matches!(err, Error::Schedule { .. }), "{err}");
    assert!(!out.exists(), "nothing is written for an unschedulable app");
}

#[test]
fn jamp_alias_resolves() {
    // the derive macro names items through `jamp::`
    let deps: jamp::Dependencies = Bucket { name: "b".into() }.dependencies();
    assert!(deps.is_empty());
}
