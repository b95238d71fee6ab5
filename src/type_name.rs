//! detection of templated class instances from their runtime type string
//!
//! The type string has the form `<class Name<Args> at 0x7f...>`.
//! Matching is purely textual: a non templated type never matches, and a change of
//! the rendering yields false negatives.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use log::{trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// compiled patterns per class name
static PATTERN_CACHE: Lazy<Mutex<HashMap<String, Arc<TemplatePattern>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Precompiled matcher for instances of one templated class
#[derive(Debug, Clone)]
pub struct TemplatePattern {
    class_name: String,
    regex: Regex,
}

impl TemplatePattern {
    /// Compiles the pattern for `class_name`, matched literally
    pub fn new(class_name: &str) -> Result<Self> {
        let pattern = format!(
            r"^<class {}<(?P<args>.*)> at 0x[a-fA-F0-9]+>",
            regex::escape(class_name)
        );
        let regex = Regex::new(&pattern)
            .with_context(|| format!("failed compiling type pattern for {class_name}"))?;
        Ok(Self {
            class_name: class_name.to_owned(),
            regex,
        })
    }
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
    /// returns true if the type string is the one of an instance of the class
    pub fn matches(&self, type_repr: &str) -> bool {
        self.regex.is_match(type_repr)
    }
    /// returns the template arguments text, None if the type string does not match
    pub fn template_arguments<'a>(&self, type_repr: &'a str) -> Option<&'a str> {
        self.regex
            .captures(type_repr)
            .and_then(|captures| captures.name("args"))
            .map(|args| args.as_str())
    }
}

/// Returns the pattern of `class_name`, compiling it on first use only
pub fn cached_pattern(class_name: &str) -> Result<Arc<TemplatePattern>> {
    // entries are immutable once inserted, a poisoned lock still holds valid ones
    let mut cache = PATTERN_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(pattern) = cache.get(class_name) {
        return Ok(Arc::clone(pattern));
    }
    trace!("compiling type pattern for {class_name}");
    let pattern = Arc::new(TemplatePattern::new(class_name)?);
    cache.insert(class_name.to_owned(), Arc::clone(&pattern));
    Ok(pattern)
}

/// Renders the runtime type string of a value: its type name and address
pub fn type_repr_of<T: ?Sized>(value: &T) -> String {
    format!(
        "<class {} at {:p}>",
        std::any::type_name::<T>(),
        (value as *const T).cast::<()>()
    )
}

/// Returns true if the type string designates an instance of the templated class
pub fn repr_is_templated_instance(type_repr: &str, class_name: &str) -> bool {
    match cached_pattern(class_name) {
        Ok(pattern) => pattern.matches(type_repr),
        Err(e) => {
            warn!("{e:#}");
            false
        }
    }
}

/// Returns true if the value is an instance of the templated class
pub fn is_templated_instance<T: ?Sized>(value: &T, class_name: &str) -> bool {
    repr_is_templated_instance(&type_repr_of(value), class_name)
}
