use super::dom::Element;
use super::upload_button::DecorateError;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttachError {
    #[error("no directive registered as {0}")]
    Unknown(String),
    #[error(transparent)]
    Decorate(#[from] DecorateError),
}

/// Behavior attached to an element once, when the element is attached.
pub trait Directive: Send + Sync {
    fn link(&self, element: &mut Element) -> Result<(), DecorateError>;
}

/// Explicit registration object handed to each directive's register call.
#[derive(Default)]
pub struct DirectiveRegistry {
    directives: HashMap<String, Box<dyn Directive>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<D: Directive + 'static>(&mut self, name: &str, directive: D) {
        self.directives.insert(name.to_string(), Box::new(directive));
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.directives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn attach(&self, name: &str, element: &mut Element) -> Result<(), AttachError> {
        let directive = self
            .directives
            .get(name)
            .ok_or_else(|| AttachError::Unknown(name.to_string()))?;
        directive.link(element)?;
        Ok(())
    }

    /// Attaches every registered directive named as an attribute on `root` or its descendants.
    pub fn compile(&self, root: &mut Element) -> Result<usize, AttachError> {
        let mut applied = 0;
        let original = root.children.len();
        let mut names: Vec<String> = root
            .attributes
            .keys()
            .filter(|attr| self.directives.contains_key(attr.as_str()))
            .cloned()
            .collect();
        names.sort_unstable();
        for name in names {
            self.attach(&name, root)?;
            applied += 1;
        }
        // Children appended by a directive are not compiled.
        for child in root.children.iter_mut().take(original) {
            applied += self.compile(child)?;
        }
        Ok(applied)
    }
}
