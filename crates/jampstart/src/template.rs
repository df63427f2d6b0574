//! CloudFormation templates.
//!
//! A [`Template`] is the hand-off artifact of a [`Stack`](crate::Stack): every
//! declared resource with its properties and explicit `DependsOn` edges,
//! plus the stack's exported outputs.
use std::collections::BTreeMap;

use snafu::prelude::*;
use tokio::io::AsyncWriteExt;

use crate::{CreateFileSnafu, DeserializeSnafu, Error, ReadFileSnafu, SerializeSnafu, WriteFileSnafu};

pub const FORMAT_VERSION: &str = "2010-09-09";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resources: BTreeMap<String, TemplateResource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, TemplateOutput>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub ty: String,
    pub properties: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportName>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportName {
    pub name: String,
}

/// An exported output of one stack, importable by another.
///
/// Serializes as `{"Fn::ImportValue": <name>}`, which is how the importing
/// stack refers to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
    pub(crate) stack: String,
    pub(crate) name: String,
}

impl Export {
    /// The stack that owns the output.
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// The global export name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl serde::Serialize for Export {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(serde::Serialize)]
        struct ImportValue<'a> {
            #[serde(rename = "Fn::ImportValue")]
            name: &'a str,
        }
        ImportValue { name: &self.name }.serialize(serializer)
    }
}

impl crate::HasDependencies for Export {}

/// What happened when writing a file to the output directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Written {
    Created,
    Changed,
    Unchanged,
}

impl core::fmt::Display for Written {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Written::Created => "created",
            Written::Changed => "changed",
            Written::Unchanged => "unchanged",
        })
    }
}

/// Serializes `value` as pretty JSON to `path`.
///
/// If the file already holds a value, the two are compared and any change is
/// logged before the file is overwritten.
pub(crate) async fn write_json<T>(
    name: &str,
    value: &T,
    path: impl AsRef<std::path::Path>,
) -> Result<Written, Error>
where
    T: core::fmt::Debug + PartialEq + serde::Serialize + serde::de::DeserializeOwned,
{
    let path = path.as_ref();
    let written = if path.exists() {
        let contents = tokio::fs::read_to_string(path)
            .await
            .context(ReadFileSnafu { path })?;
        match serde_json::from_str::<T>(&contents) {
            Ok(previous) if previous == *value => Written::Unchanged,
            Ok(previous) => {
                let cmp = pretty_assertions::Comparison::new(&previous, value);
                let change_string = format!("{cmp}")
                    .lines()
                    .map(|line| format!("  {line}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                log::info!("updating '{name}':\n{change_string}");
                Written::Changed
            }
            Err(e) => {
                log::warn!("previous '{name}' at {path:?} is unreadable and will be replaced: {e}");
                Written::Changed
            }
        }
    } else {
        Written::Created
    };

    if written == Written::Unchanged {
        log::info!("'{name}' is unchanged");
        return Ok(written);
    }

    log::info!("writing '{name}' to {path:?}");
    let contents = serde_json::to_string_pretty(value).context(SerializeSnafu { name })?;

    // Ensure the parent directory exists
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(&parent)
            .await
            .context(CreateFileSnafu { path: parent })?;
    }

    let mut file = tokio::fs::File::create(&path)
        .await
        .context(CreateFileSnafu { path })?;
    file.write_all(contents.as_bytes())
        .await
        .context(WriteFileSnafu { path })?;
    Ok(written)
}

impl Template {
    pub fn to_json_string(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).context(SerializeSnafu { name: "template" })
    }

    pub fn from_json_str(name: &str, contents: &str) -> Result<Self, Error> {
        serde_json::from_str(contents).context(DeserializeSnafu { name })
    }

    /// Writes the template to `path`, logging what changed since the last write.
    pub async fn save(
        &self,
        name: &str,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Written, Error> {
        write_json(name, self, path).await
    }
}
