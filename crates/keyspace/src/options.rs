//! knobs shared by [crate::store::PropertyStore] and [crate::hierarchy::HierarchicalConfiguration]

/// Default upper bound for nested `${...}` lookups within one resolution
pub const DEFAULT_MAX_INTERPOLATION_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Splits text values into multiple scalars. `None` stores text as-is.
    pub delimiter: Option<char>,

    /// Placed right before the delimiter it keeps the delimiter literal
    pub escape: char,

    /// Trim whitespace around split segments
    pub trim: bool,

    /// Reading a missing key without a default is an error instead of `None`
    pub throw_on_missing: bool,

    pub max_interpolation_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiter: Some(','),
            escape: '\\',
            trim: true,
            throw_on_missing: false,
            max_interpolation_depth: DEFAULT_MAX_INTERPOLATION_DEPTH,
        }
    }
}

impl Options {
    pub fn strict() -> Self {
        Self {
            throw_on_missing: true,
            ..Default::default()
        }
    }
}
