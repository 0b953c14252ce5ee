//! Templates module for `$name` / `${name}` placeholder substitution
//!
//! Substitution is two-phase: every placeholder is validated against the
//! variable map first, and only a fully resolvable template is substituted.

use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\})",
    )
    .expect("placeholder pattern is valid")
});

/// Template substitution errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// Every referenced name missing from the variable map, in order of first use
    #[error("Missing variable(s): {}", .0.join(", "))]
    MissingVariables(Vec<String>),
}

/// A placeholder occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Variable name without `$`, `{` or `}`
    pub name: String,

    /// Byte range of the whole placeholder in the template
    pub span: std::ops::Range<usize>,
}

/// Template replacement functionality
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateProcessor;

impl TemplateProcessor {
    /// Create a new template processor
    pub fn new() -> Self {
        Self
    }

    /// List every placeholder in the template, in order of appearance.
    /// `$$` escapes are not placeholders.
    pub fn placeholders(&self, template: &str) -> Vec<Placeholder> {
        PLACEHOLDER
            .captures_iter(template)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                placeholder_name(&caps).map(|name| Placeholder {
                    name: name.to_string(),
                    span: whole.range(),
                })
            })
            .collect()
    }

    /// Names referenced by the template but absent from `variables`.
    ///
    /// Each name is reported once, in order of first use.
    pub fn missing_variables(
        &self,
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        self.placeholders(template)
            .into_iter()
            .filter(|p| !variables.contains_key(&p.name))
            .filter(|p| seen.insert(p.name.clone()))
            .map(|p| p.name)
            .collect()
    }

    /// Substitute every placeholder, or fail listing all unresolved names.
    ///
    /// Values are inserted verbatim and never expanded again.
    pub fn process(
        &self,
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, TemplateError> {
        let missing = self.missing_variables(template, variables);
        if !missing.is_empty() {
            return Err(TemplateError::MissingVariables(missing));
        }

        let resolved = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            match placeholder_name(caps) {
                Some(name) => variables.get(name).cloned().unwrap_or_default(),
                None => "$".to_string(),
            }
        });
        Ok(resolved.into_owned())
    }
}

fn placeholder_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.name("named")
        .or_else(|| caps.name("braced"))
        .map(|m| m.as_str())
}
