//! keyspace cli interface

use clap::{Parser, Subcommand, ValueEnum};
use keyspace::options::{Options, DEFAULT_MAX_INTERPOLATION_DEPTH};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub options: OptionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List keys
    ///
    /// Only keys equal to PREFIX or below it when given
    Keys { prefix: Option<String> },

    /// Print the first value of a key, interpolated and converted
    Get {
        key: String,

        /// Type to convert the value to
        #[arg(long = "as", default_value_t)]
        kind: ValueKind,
    },

    /// Print all values of a key, one per line
    List { key: String },

    /// Print every key with all of its interpolated values
    Dump(OutputArgs),
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Load a json or yaml file
    ///
    /// Reads yaml from stdin unless any file or directory is given
    #[clap(short = 'f', long = "input-file", global(true))]
    pub files: Vec<PathBuf>,

    /// Load all json and yaml files from given directory
    #[clap(short = 'd', long = "input-dir", global(true))]
    pub directories: Vec<PathBuf>,

    /// Serve documents as a tree (nested objects are sub-trees)
    #[clap(long = "tree", global(true))]
    pub tree: bool,
}

#[derive(Parser, Debug)]
pub struct OptionArgs {
    /// List delimiter used to split text values
    #[arg(long, default_value_t = ',', global(true))]
    pub delimiter: char,

    /// Do not split text values at all
    #[arg(long, conflicts_with("delimiter"), global(true))]
    pub no_split: bool,

    /// Fail on missing keys
    #[arg(long, global(true))]
    pub strict: bool,

    /// Maximum nesting of ${...} lookups
    #[arg(long, default_value_t = DEFAULT_MAX_INTERPOLATION_DEPTH, global(true))]
    pub max_depth: usize,
}

impl From<&OptionArgs> for Options {
    fn from(args: &OptionArgs) -> Self {
        Options {
            delimiter: (!args.no_split).then_some(args.delimiter),
            throw_on_missing: args.strict,
            max_interpolation_depth: args.max_depth,
            ..Default::default()
        }
    }
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum ValueKind {
    #[default]
    Text,
    Boolean,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    BigInt,
    BigDecimal,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::BigInt => "big-int",
            ValueKind::BigDecimal => "big-decimal",
        };
        f.write_str(name)
    }
}
