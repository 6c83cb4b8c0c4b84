// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Canonical paths into the document tree.
//!
//! A [`Path`] names one element of a parsed document structurally:
//! `components[0].objects[0].bindings["width"][0].value`. Paths are used as
//! stable keys wherever something must outlive the tree it points into, such
//! as format failures and the records of script expressions whose text
//! changed during write-out. They are descriptive, not navigable; nothing in
//! this crate resolves a path back to an element.

use std::fmt;

use ecow::EcoString;

/// Field names used in canonical paths.
///
/// Kept as constants so the writer and any diagnostics agree on spelling.
pub mod fields {
    pub const PRAGMAS: &str = "pragmas";
    pub const IMPORTS: &str = "imports";
    pub const COMPONENTS: &str = "components";
    pub const OBJECTS: &str = "objects";
    pub const ID: &str = "id";
    pub const ENUMERATIONS: &str = "enumerations";
    pub const VALUES: &str = "values";
    pub const PROPERTY_DEFS: &str = "propertyDefs";
    pub const BINDINGS: &str = "bindings";
    pub const METHODS: &str = "methods";
    pub const PARAMETERS: &str = "parameters";
    pub const CHILDREN: &str = "children";
    pub const VALUE: &str = "value";
    pub const BODY: &str = "body";
    pub const DEFAULT_VALUE: &str = "defaultValue";
}

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// A named field of the parent: `.bindings`.
    Field(&'static str),
    /// A name key within a field: `["width"]`.
    Key(EcoString),
    /// A positional index: `[0]`.
    Index(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Field(name) => write!(f, ".{name}"),
            PathStep::Key(key) => write!(f, "[\"{key}\"]"),
            PathStep::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A sequence of steps from the document root to one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// The document root; displays as `$doc`.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str) -> Self {
        self.steps.push(PathStep::Field(name));
        self
    }

    pub fn key(mut self, key: impl Into<EcoString>) -> Self {
        self.steps.push(PathStep::Key(key.into()));
        self
    }

    pub fn index(mut self, i: usize) -> Self {
        self.steps.push(PathStep::Index(i));
        self
    }

    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    pub fn pop(&mut self) -> Option<PathStep> {
        self.steps.pop()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$doc")?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_fields_keys_and_indices() {
        let path = Path::root()
            .field(fields::COMPONENTS)
            .index(0)
            .field(fields::OBJECTS)
            .index(0)
            .field(fields::BINDINGS)
            .key("width")
            .index(0)
            .field(fields::VALUE);
        assert_eq!(
            path.to_string(),
            "$doc.components[0].objects[0].bindings[\"width\"][0].value"
        );
    }

    #[test]
    fn root_displays_bare() {
        assert_eq!(Path::root().to_string(), "$doc");
        assert!(Path::root().is_root());
    }

    #[test]
    fn push_and_pop_round_trip() {
        let mut path = Path::root();
        path.push(PathStep::Field(fields::IMPORTS));
        path.push(PathStep::Index(2));
        assert_eq!(path.to_string(), "$doc.imports[2]");
        assert_eq!(path.pop(), Some(PathStep::Index(2)));
        assert_eq!(path.to_string(), "$doc.imports");
    }
}
