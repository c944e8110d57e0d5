//! `${key}` substitution
//!
//! The [Interpolator] borrows a read-only [Lookup] into a key space and replaces
//! every `${name}` marker of a text scalar with the (recursively resolved) first
//! value stored under `name`.
//!
//! - markers naming a missing key stay in the output verbatim
//! - a key that (transitively) references itself is an error
//! - nesting deeper than the configured maximum is an error as well
//!
//! The set of keys being resolved only lives for one [Interpolator::resolve] call.
use crate::error::ConfigError;
use crate::value::Scalar;
use std::borrow::Cow;

pub const MARKER_START: &str = "${";
pub const MARKER_END: &str = "}";

/// Read capability into a key space
pub trait Lookup {
    /// Raw, uninterpolated slot of `key`
    fn lookup(&self, key: &str) -> Option<Cow<'_, [Scalar]>>;
}

#[derive(derive_new::new)]
pub struct Interpolator<'s> {
    source: &'s dyn Lookup,
    max_depth: usize,
}

impl Interpolator<'_> {
    /// Resolve all markers of `scalar`
    ///
    /// Non-text scalars and text without resolvable markers come back unchanged.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn resolve(&self, scalar: &Scalar) -> Result<Scalar, ConfigError> {
        let Scalar::Text(text) = scalar else {
            return Ok(scalar.clone());
        };

        let mut context = Context::default();
        match self.substitute(text, &mut context)? {
            Cow::Borrowed(_) => Ok(scalar.clone()),
            Cow::Owned(resolved) => Ok(Scalar::Text(resolved)),
        }
    }

    pub fn resolve_text(&self, text: &str) -> Result<String, ConfigError> {
        let mut context = Context::default();
        self.substitute(text, &mut context).map(Cow::into_owned)
    }

    fn substitute<'t>(
        &self,
        text: &'t str,
        context: &mut Context,
    ) -> Result<Cow<'t, str>, ConfigError> {
        let mut output = String::new();
        let mut substituted = false;
        let mut rest = text;

        while let Some(start) = rest.find(MARKER_START) {
            let name_start = start + MARKER_START.len();
            let Some(name_len) = rest[name_start..].find(MARKER_END) else {
                break;
            };
            let name = &rest[name_start..name_start + name_len];
            let marker_end = name_start + name_len + MARKER_END.len();

            output.push_str(&rest[..start]);
            match self.resolve_name(name, context)? {
                Some(replacement) => {
                    output.push_str(&replacement);
                    substituted = true;
                }
                None => output.push_str(&rest[start..marker_end]),
            }
            rest = &rest[marker_end..];
        }

        if !substituted {
            return Ok(Cow::Borrowed(text));
        }

        output.push_str(rest);
        Ok(Cow::Owned(output))
    }

    fn resolve_name(
        &self,
        name: &str,
        context: &mut Context,
    ) -> Result<Option<String>, ConfigError> {
        if context.contains(name) {
            return Err(ConfigError::InterpolationCycle {
                key: name.to_string(),
                chain: context.chain(name),
            });
        }

        if context.depth() >= self.max_depth {
            return Err(ConfigError::InterpolationDepth {
                key: name.to_string(),
                max_depth: self.max_depth,
            });
        }

        let Some(values) = self.source.lookup(name) else {
            tracing::trace!(name, "unresolved marker");
            return Ok(None);
        };
        let Some(first) = values.first() else {
            return Ok(None);
        };

        context.push(name);
        let resolved = match first {
            Scalar::Text(text) => self
                .substitute(text, context)
                .map(|resolved| resolved.into_owned()),
            other => Ok(other.to_string()),
        };
        context.pop();

        tracing::trace!(name, ?resolved, "resolved marker");
        resolved.map(Some)
    }
}

/// Keys currently being resolved, innermost last
#[derive(Debug, Default)]
struct Context {
    stack: Vec<String>,
}

impl Context {
    fn contains(&self, name: &str) -> bool {
        self.stack.iter().any(|key| key == name)
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, name: &str) {
        self.stack.push(name.to_string());
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    /// `a -> b -> a`, starting at the first occurrence of `name`
    fn chain(&self, name: &str) -> String {
        let start = self.stack.iter().position(|key| key == name).unwrap_or(0);
        let mut chain: Vec<&str> = self.stack[start..].iter().map(String::as_str).collect();
        chain.push(name);
        chain.join(" -> ")
    }
}
