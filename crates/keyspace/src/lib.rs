//! # keyspace - typed, interpolated configuration key space
//!
//! For CLI usage see `keyspace --help`.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `keyspace` works internally.
//!
//! ### Terms
//!
//! - a `key` is a dotted name such as `server.hosts`
//! - a `slot` is the ordered list of [value::Scalar]s stored under a key
//! - a `scalar` is a single value: text, boolean, integer, float or an opaque blob
//!
//! ### Storing values
//!
//! Everything that is added to a [store::PropertyStore] first passes through the
//! [flatten::Flattener]. Arrays are recursed into, text is split on the list delimiter
//! (`,` by default, `\,` keeps a literal comma) and every other scalar is kept as-is.
//!
//! ```text
//! add("hosts", "alpha, beta")   -> hosts = [alpha, beta]
//! add("hosts", ["gamma"])       -> hosts = [alpha, beta, gamma]
//! set("hosts", "delta")         -> hosts = [delta]
//! ```
//!
//! ### Reading values
//!
//! Reads go through the [configuration::Configuration] trait which both the store and the
//! [hierarchy::HierarchicalConfiguration] implement. A typed read
//!
//! - takes the first scalar of the slot
//! - expands `${other.key}` markers via [interpolate::Interpolator]
//! - converts the result via [convert::FromScalar]
//!
//! A missing key is `None`, or [error::ConfigError::MissingKey] when
//! [options::Options::throw_on_missing] is set. Values that exist but do not convert are
//! always an error.
//!
//! ### Interpolation
//!
//! Markers are resolved left to right against the same key space, recursively. We keep a
//! stack of the keys currently being resolved. Seeing a key that is already on the stack
//! means there is a loop which is reported with the full chain (`a -> b -> a`). Unknown
//! keys leave the marker untouched.
//!
//! ### Tree sources
//!
//! A [hierarchy::TreeSource] is a read-only hierarchy with its own path separator (think
//! naming or directory services). [hierarchy::HierarchicalConfiguration] translates dotted
//! keys into native paths, walks the tree to enumerate keys and hides cleared keys behind
//! local tombstones. Failures of the source are never surfaced to readers, a key that cannot
//! be read is simply absent.
//!
//! ### Loading files
//!
//! JSON and YAML files are parsed into [value::Value]s and collected in
//! [documents::Documents], which can build either a store or a [hierarchy::MemoryTree].
//!
pub mod configuration;
pub mod convert;
pub mod documents;
pub mod error;
pub mod flatten;
pub mod hierarchy;
pub mod interpolate;
pub mod options;
pub mod store;
pub mod value;
pub mod visit;
