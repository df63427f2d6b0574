//! Remote values.
//!
//! Remote values are attributes of a resource that are only determined
//! after the provisioning engine creates it. In a template they are written
//! as intrinsic functions (`Ref` or `Fn::GetAtt`), and each one records the
//! resource it depends on.

use std::{collections::HashMap, marker::PhantomData};

use crate::{Dependencies, Dependency, DuplicateResourceSnafu, Error, HasDependencies};

/// Which value of a resource a [`Remote`] refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attribute {
    /// The resource's primary identifier.
    Ref,
    /// A named attribute, eg `Arn` or `LatestVersionArn`.
    GetAtt(String),
}

pub struct Remote<X> {
    stack: String,
    depends_on: String,
    attribute: Attribute,
    _value: PhantomData<fn() -> X>,
}

impl<X> Clone for Remote<X> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            depends_on: self.depends_on.clone(),
            attribute: self.attribute.clone(),
            _value: PhantomData,
        }
    }
}

impl<X> std::fmt::Debug for Remote<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remote")
            .field("stack", &self.stack)
            .field("depends_on", &self.depends_on)
            .field("attribute", &self.attribute)
            .field("ty", &core::any::type_name::<X>())
            .finish()
    }
}

impl<X> PartialEq for Remote<X> {
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack
            && self.depends_on == other.depends_on
            && self.attribute == other.attribute
    }
}

#[derive(serde::Serialize)]
enum RemoteProxy<'a> {
    #[serde(rename = "Ref")]
    Ref(&'a str),
    #[serde(rename = "Fn::GetAtt")]
    GetAtt([&'a str; 2]),
}

impl<X> serde::Serialize for Remote<X> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let proxy = match &self.attribute {
            Attribute::Ref => RemoteProxy::Ref(&self.depends_on),
            Attribute::GetAtt(name) => RemoteProxy::GetAtt([&self.depends_on, name]),
        };
        proxy.serialize(serializer)
    }
}

impl<X> Remote<X> {
    pub(crate) fn new(
        stack: impl Into<String>,
        depends_on: impl Into<String>,
        attribute: Attribute,
    ) -> Self {
        let stack = stack.into();
        let depends_on = depends_on.into();
        log::trace!("creating remote {attribute:?} of '{stack}.{depends_on}'");
        Self {
            stack,
            depends_on,
            attribute,
            _value: PhantomData,
        }
    }

    /// The stack declaring the resource this value comes from.
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// The logical id of the resource this value comes from.
    pub fn depends_on(&self) -> &str {
        &self.depends_on
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }
}

impl<X> HasDependencies for Remote<X> {
    fn dependencies(&self) -> Dependencies {
        Dependencies {
            inner: vec![Dependency {
                stack: self.stack.clone(),
                id: self.depends_on.clone(),
            }],
        }
    }
}

pub(crate) struct Var {
    pub(crate) key: usize,
    pub(crate) ty: &'static str,
}

#[derive(Default)]
pub(crate) struct Remotes {
    /// Map of resource name to key + resource type
    vars: HashMap<String, Var>,
}

impl core::fmt::Display for Remotes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, var) in self.vars.iter() {
            f.write_fmt(format_args!(
                "name:'{name}' key:{rez} ty:{ty}\n",
                rez = var.key,
                ty = var.ty,
            ))?;
        }
        Ok(())
    }
}

impl Remotes {
    /// Registers a resource and returns its key.
    ///
    /// ## Errors
    /// Errs if a resource by the given name was already declared.
    pub fn declare(&mut self, stack: &str, id: &str, ty: &'static str) -> Result<usize, Error> {
        snafu::ensure!(
            !self.vars.contains_key(id),
            DuplicateResourceSnafu {
                stack: stack.to_owned(),
                name: id.to_owned()
            }
        );
        let key = self.vars.len();
        log::trace!("declaring '{id}' of type {ty} with key {key}");
        self.vars.insert(id.to_owned(), Var { key, ty });
        Ok(key)
    }

    /// Returns the name of a resource by key
    pub fn get_name_by_rez(&self, rez: usize) -> Option<String> {
        for (name, var) in self.vars.iter() {
            if rez == var.key {
                return Some(name.clone());
            }
        }
        None
    }

    /// Returns the key of the resource with the given name.
    pub fn get(&self, id: &str) -> Option<&Var> {
        self.vars.get(id)
    }
}
