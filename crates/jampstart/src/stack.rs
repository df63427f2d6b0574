//! Stacks of resources.
//!
//! A [`Stack`] is where resources are declared. Declaration order matters: a
//! resource may only depend on resources declared before it. Dependencies
//! are either implicit, picked up from the [`Remote`] values inside a
//! descriptor, or explicit, added with [`StackResource::depends_on`].
//!
//! Before the stack is handed off it is scheduled with `dagga`, which checks
//! that the graph is acyclic and groups resources into batches that can be
//! applied in order.
use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Deref,
};

use dagga::dot::DagLegend;
use snafu::prelude::*;

use crate::{
    remote::{Attribute, Remote, Remotes},
    template::{Export, ExportName, Template, TemplateOutput, TemplateResource, FORMAT_VERSION},
    Error, ForwardDependencySnafu, InvalidLogicalIdSnafu, MissingNameSnafu, MissingResourceSnafu,
    Resource, Result, SelfImportSnafu, SerializeSnafu,
};

/// A resource declared in a stack.
#[derive(Clone, Debug)]
pub struct StackResource<T> {
    /// Name of the declaring stack
    stack: String,
    /// Logical id of the resource
    id: String,
    /// Local definition in _code_
    local_definition: T,
}

impl<T> Deref for StackResource<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.local_definition
    }
}

impl<T> AsRef<T> for StackResource<T> {
    fn as_ref(&self) -> &T {
        &self.local_definition
    }
}

impl<T: Resource> StackResource<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resource's primary identifier, as known after creation.
    pub fn reference(&self) -> Remote<String> {
        Remote::new(&self.stack, &self.id, Attribute::Ref)
    }

    /// A named attribute of the resource, as known after creation.
    pub fn attribute(&self, name: impl Into<String>) -> Remote<String> {
        Remote::new(&self.stack, &self.id, Attribute::GetAtt(name.into()))
    }

    /// Declares that this resource must be applied after `resource`.
    ///
    /// ## Errors
    /// Errs if either resource was declared in another stack, or if
    /// `resource` was declared after this one, as the edge could close a
    /// cycle.
    pub fn depends_on<X>(&self, stack: &mut Stack, resource: &StackResource<X>) -> Result<()> {
        for (owner, id) in [(&self.stack, &self.id), (&resource.stack, &resource.id)] {
            ensure!(
                *owner == stack.name,
                MissingResourceSnafu {
                    name: format!("{owner}.{id}")
                }
            );
        }
        stack.add_dependency(&self.id, &resource.id)
    }
}

struct Declared {
    id: String,
    key: usize,
    ty: &'static str,
    properties: serde_json::Value,
    /// Edges picked up from remote values.
    references: BTreeSet<String>,
    /// Edges added with `depends_on`.
    depends_on: BTreeSet<String>,
}

impl Declared {
    fn edges(&self) -> impl Iterator<Item = &String> {
        self.references.union(&self.depends_on)
    }
}

struct StackNode {
    id: String,
    ty: &'static str,
}

/// One resource in a [`Plan`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedResource {
    pub id: String,
    pub ty: &'static str,
}

/// Resources of a stack in application order.
///
/// Every resource in a batch depends only on resources in earlier batches.
#[derive(Clone, Debug)]
pub struct Plan {
    pub stack: String,
    pub batches: Vec<Vec<PlannedResource>>,
}

impl Plan {
    /// Returns the index of the batch containing `id`.
    pub fn batch_of(&self, id: &str) -> Option<usize> {
        self.batches
            .iter()
            .position(|batch| batch.iter().any(|r| r.id == id))
    }

    /// All resource ids, flattened in application order.
    pub fn order(&self) -> Vec<&str> {
        self.batches
            .iter()
            .flat_map(|batch| batch.iter().map(|r| r.id.as_str()))
            .collect()
    }
}

impl core::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.batches.is_empty() {
            f.write_str("--- No resources.\n")?;
            f.write_str("--- 🌈🦄\n")?;
        }
        for (i, batch) in self.batches.iter().enumerate() {
            let i = i + 1;
            f.write_str("--- step ")?;
            f.write_fmt(format_args!("{i}\n"))?;
            for resource in batch.iter() {
                f.write_fmt(format_args!("  create {} [{}]\n", resource.id, resource.ty))?;
            }
            f.write_str("---\n")?;
        }
        Ok(())
    }
}

fn is_logical_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 255 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

pub struct Stack {
    name: String,
    description: Option<String>,
    remotes: Remotes,
    resources: Vec<Declared>,
    outputs: BTreeMap<String, TemplateOutput>,
    stack_dependencies: BTreeSet<String>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            remotes: Default::default(),
            resources: vec![],
            outputs: Default::default(),
            stack_dependencies: Default::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Defines a resource.
    ///
    /// Every [`Remote`] in `local_definition` becomes an edge to the resource
    /// it came from, which must already be declared in this stack. Values of
    /// other stacks cross over through [`Stack::export`] and [`Stack::import`].
    pub fn resource<T>(
        &mut self,
        id: impl AsRef<str>,
        local_definition: T,
    ) -> Result<StackResource<T>>
    where
        T: Resource,
    {
        let id = id.as_ref();
        ensure!(is_logical_id(id), InvalidLogicalIdSnafu { id });

        let mut references = BTreeSet::new();
        for dep in local_definition.dependencies() {
            ensure!(
                dep.stack == self.name,
                MissingResourceSnafu {
                    name: dep.to_string()
                }
            );
            self.remotes
                .get(&dep.id)
                .context(MissingResourceSnafu {
                    name: dep.to_string(),
                })?;
            references.insert(dep.id);
        }
        let properties =
            serde_json::to_value(&local_definition).context(SerializeSnafu { name: id })?;
        let key = self.remotes.declare(&self.name, id, T::TYPE)?;

        log::info!("declared {} '{id}' in '{}'", T::TYPE, self.name);
        if !references.is_empty() {
            log::debug!(
                "  referencing {}",
                references.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
        self.resources.push(Declared {
            id: id.to_owned(),
            key,
            ty: T::TYPE,
            properties,
            references,
            depends_on: BTreeSet::new(),
        });

        Ok(StackResource {
            stack: self.name.clone(),
            id: id.to_owned(),
            local_definition,
        })
    }

    fn add_dependency(&mut self, id: &str, depends_on: &str) -> Result<()> {
        let this_key = self
            .remotes
            .get(id)
            .context(MissingResourceSnafu { name: id })?
            .key;
        let that_key = self
            .remotes
            .get(depends_on)
            .context(MissingResourceSnafu { name: depends_on })?
            .key;
        ensure!(
            that_key < this_key,
            ForwardDependencySnafu {
                name: id,
                depends_on
            }
        );
        log::debug!("'{id}' depends on '{depends_on}'");
        let declared = self
            .resources
            .get_mut(this_key)
            .context(MissingResourceSnafu { name: id })?;
        declared.depends_on.insert(depends_on.to_owned());
        Ok(())
    }

    /// Exports `value` as an output of this stack so other stacks can import it.
    pub fn export(
        &mut self,
        output_id: impl AsRef<str>,
        value: Remote<String>,
        description: Option<String>,
    ) -> Result<Export> {
        let output_id = output_id.as_ref();
        ensure!(
            is_logical_id(output_id),
            InvalidLogicalIdSnafu { id: output_id }
        );
        let name = format!("{}.{}", value.stack(), value.depends_on());
        ensure!(
            value.stack() == self.name,
            MissingResourceSnafu { name: &name }
        );
        self.remotes
            .get(value.depends_on())
            .context(MissingResourceSnafu { name })?;
        let name = format!("{}:{output_id}", self.name);
        log::info!("exporting '{name}' from '{}'", value.depends_on());
        self.outputs.insert(
            output_id.to_owned(),
            TemplateOutput {
                description,
                value: serde_json::to_value(&value).context(SerializeSnafu { name: output_id })?,
                export: Some(ExportName { name: name.clone() }),
            },
        );
        Ok(Export {
            stack: self.name.clone(),
            name,
        })
    }

    /// Records that this stack imports `export`, and so must be applied
    /// after the stack that owns it.
    pub fn import(&mut self, export: &Export) -> Result<Export> {
        ensure!(
            export.stack != self.name,
            SelfImportSnafu {
                stack: &self.name,
                export: &export.name
            }
        );
        log::debug!("'{}' imports '{}'", self.name, export.name);
        self.stack_dependencies.insert(export.stack.clone());
        Ok(export.clone())
    }

    /// Names of the stacks this stack imports from.
    pub fn stack_dependencies(&self) -> impl Iterator<Item = &str> {
        self.stack_dependencies.iter().map(String::as_str)
    }

    /// Logical ids in declaration order.
    pub fn ids(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.remotes.get(id).is_some()
    }

    fn declared(&self, id: &str) -> Option<&Declared> {
        let key = self.remotes.get(id)?.key;
        self.resources.get(key)
    }

    /// The CloudFormation type of a declared resource.
    pub fn resource_type(&self, id: &str) -> Option<&'static str> {
        self.declared(id).map(|d| d.ty)
    }

    /// The serialized properties of a declared resource.
    pub fn properties(&self, id: &str) -> Option<&serde_json::Value> {
        self.declared(id).map(|d| &d.properties)
    }

    /// Every resource `id` depends on, implicit and explicit.
    pub fn dependencies_of(&self, id: &str) -> Option<BTreeSet<&str>> {
        self.declared(id)
            .map(|d| d.edges().map(String::as_str).collect())
    }

    /// Only the resources `id` was told to depend on with `depends_on`.
    pub fn explicit_dependencies_of(&self, id: &str) -> Option<BTreeSet<&str>> {
        self.declared(id)
            .map(|d| d.depends_on.iter().map(String::as_str).collect())
    }

    /// Resources that depend on `id`.
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|r| r.edges().any(|dep| dep == id))
            .map(|r| r.id.as_str())
            .collect()
    }

    /// Resources nothing else depends on.
    pub fn sinks(&self) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|r| self.dependents_of(&r.id).is_empty())
            .map(|r| r.id.as_str())
            .collect()
    }

    fn dag(&self) -> Result<dagga::Dag<StackNode, usize>> {
        let mut dag = dagga::Dag::default();
        for declared in self.resources.iter() {
            let mut reads = vec![];
            for dep in declared.edges() {
                let var = self
                    .remotes
                    .get(dep)
                    .context(MissingResourceSnafu { name: dep.clone() })?;
                reads.push(var.key);
            }
            log::trace!("adding node '{}' reading {reads:?}", declared.id);
            dag.add_node(
                dagga::Node::new(StackNode {
                    id: declared.id.clone(),
                    ty: declared.ty,
                })
                .with_name(declared.id.clone())
                .with_reads(reads)
                .with_result(declared.key),
            );
        }
        Ok(dag)
    }

    /// Schedules the stack, validating that the graph is acyclic.
    pub fn plan(&self) -> Result<Plan> {
        let schedule = self
            .dag()?
            .build_schedule()
            .map_err(|e| Error::Schedule { msg: e.to_string() })?;
        let batches = schedule
            .batches
            .into_iter()
            .map(|batch| {
                batch
                    .into_iter()
                    .map(|node| {
                        let StackNode { id, ty } = node.into_inner();
                        PlannedResource { id, ty }
                    })
                    .collect()
            })
            .collect();
        Ok(Plan {
            stack: self.name.clone(),
            batches,
        })
    }

    pub fn get_schedule_string(&self) -> Result<String> {
        Ok(self.plan()?.to_string())
    }

    fn get_graph_legend(&self) -> Result<DagLegend<usize>> {
        let mut missing_resource_creation = None;
        let legend = self.dag()?.legend()?.with_resources_named(|rez| {
            let maybe_name = self.remotes.get_name_by_rez(*rez);
            if maybe_name.is_none() {
                missing_resource_creation = Some(*rez);
            }
            maybe_name
        });
        if let Some(missing) = missing_resource_creation {
            log::error!(
                "Missing resource {missing}, current resources:\n{}",
                self.remotes
            );
            return MissingNameSnafu { missing }.fail();
        }
        Ok(legend)
    }

    /// Writes the dependency graph as a dot file.
    pub fn save_apply_graph(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        if self.resources.is_empty() {
            log::warn!("Resource DAG is empty, writing an empty dot file");
        }
        let legend = self.get_graph_legend()?;
        dagga::dot::save_as_dot(&legend, path)?;

        Ok(())
    }

    /// Renders the stack as a CloudFormation template.
    ///
    /// Implicit edges are carried by the intrinsic functions in the
    /// properties, so only explicit edges are written as `DependsOn`.
    pub fn template(&self) -> Template {
        Template {
            format_version: FORMAT_VERSION.to_owned(),
            description: self.description.clone(),
            resources: self
                .resources
                .iter()
                .map(|declared| {
                    (
                        declared.id.clone(),
                        TemplateResource {
                            ty: declared.ty.to_owned(),
                            properties: declared.properties.clone(),
                            depends_on: declared.depends_on.iter().cloned().collect(),
                        },
                    )
                })
                .collect(),
            outputs: self.outputs.clone(),
        }
    }
}
