//! Implementations of HasDependencies for the field types descriptors use.

use crate::{Dependencies, HasDependencies};

macro_rules! go {
    ($type: ty) => {
        impl HasDependencies for $type {}
    };
}

go!(String);
go!(serde_json::Value);

impl<T: HasDependencies> HasDependencies for Vec<T> {
    fn dependencies(&self) -> Dependencies {
        self.iter()
            .fold(Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}

impl<V: HasDependencies> HasDependencies for Option<V> {
    fn dependencies(&self) -> Dependencies {
        self.iter()
            .fold(Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}
