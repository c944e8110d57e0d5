//! in-memory key space
//!
//! [PropertyStore] maps a key to its slot: the ordered, never empty list of
//! [Scalar]s stored under it. Keys keep their insertion order.
//!
//! Every write goes through the [Flattener]. Reads are raw; interpolation and
//! typed access live in [crate::configuration::Configuration].
use crate::configuration::{Configuration, ConfigurationMut};
use crate::error::ConfigError;
use crate::flatten::Flattener;
use crate::interpolate::{Interpolator, Lookup};
use crate::options::Options;
use crate::value::{Scalar, Value};
use indexmap::IndexMap;
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct PropertyStore {
    slots: IndexMap<String, Vec<Scalar>>,
    flattener: Flattener,
    options: Options,
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            slots: Default::default(),
            flattener: Flattener::from(&options),
            options,
        }
    }

    /// Append the flattened `value` to the slot of `key`
    ///
    /// A value that flattens to nothing leaves the store untouched.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let scalars = self.flattener.flatten(value);
        if scalars.is_empty() {
            return;
        }

        tracing::debug!(%key, count = scalars.len(), "add");
        self.slots.entry(key).or_default().extend(scalars);
    }

    /// Replace the slot of `key` with the flattened `value`
    ///
    /// A value that flattens to nothing removes the key. Otherwise this is
    /// `clear` followed by `add`, so the key moves to the end.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let scalars = self.flattener.flatten(value);
        if scalars.is_empty() {
            self.clear(&key);
            return;
        }

        tracing::debug!(%key, count = scalars.len(), "set");
        self.slots.shift_remove(&key);
        self.slots.insert(key, scalars);
    }

    pub fn clear(&mut self, key: &str) {
        if self.slots.shift_remove(key).is_some() {
            tracing::debug!(%key, "clear");
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Scalar]> {
        self.slots.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

impl Lookup for PropertyStore {
    fn lookup(&self, key: &str) -> Option<Cow<'_, [Scalar]>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl Configuration for PropertyStore {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(PropertyStore::keys(self).map(str::to_string))
    }

    fn is_empty(&self) -> bool {
        PropertyStore::is_empty(self)
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn interpolator(&self) -> Interpolator<'_> {
        Interpolator::new(self, self.options.max_interpolation_depth)
    }
}

impl ConfigurationMut for PropertyStore {
    fn add_property(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.add(key, value);
        Ok(())
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.set(key, value);
        Ok(())
    }

    fn clear_property(&mut self, key: &str) {
        self.clear(key)
    }
}
