mod cli;

use indexmap::IndexMap;
use keyspace::configuration::Configuration;
use keyspace::convert::FromScalar;
use keyspace::documents::Documents;
use keyspace::hierarchy::HierarchicalConfiguration;
use keyspace::options::Options;
use keyspace::value::Scalar;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("KEYSPACE_LOG"))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let documents = load(&cli.input)?;
    let options = Options::from(&cli.options);
    tracing::debug!(?options, "options");

    if cli.input.tree {
        let config = HierarchicalConfiguration::new(documents.to_tree()).with_options(options);
        execute(&config, cli.command)
    } else {
        let store = documents.to_store(options);
        execute(&store, cli.command)
    }
}

fn load(input: &cli::InputArgs) -> anyhow::Result<Documents> {
    if input.files.is_empty() && input.directories.is_empty() {
        let stdin = std::io::read_to_string(std::io::stdin())?;
        let document = keyspace::documents::parse_yaml(&stdin)?;
        return Ok(document.into());
    }

    let mut documents = Documents::default();

    for file_path in &input.files {
        documents.load_file(file_path)?;
    }

    for dir_path in &input.directories {
        documents.load_directory(dir_path)?;
    }

    anyhow::ensure!(documents.source_count() > 0, "No files loaded");

    Ok(documents)
}

fn execute(config: &impl Configuration, command: cli::Command) -> anyhow::Result<()> {
    use cli::Command::*;

    match command {
        Keys { prefix } => {
            let keys = match prefix {
                Some(prefix) => config.keys_with_prefix(&prefix),
                None => config.keys(),
            };
            for key in keys {
                println!("{key}");
            }
        }
        Get { key, kind } => get(config, &key, kind)?,
        List { key } => {
            for value in config.get_string_list(&key)? {
                println!("{value}");
            }
        }
        Dump(output) => dump(config, output.format)?,
    }

    Ok(())
}

fn get(config: &impl Configuration, key: &str, kind: cli::ValueKind) -> anyhow::Result<()> {
    use cli::ValueKind::*;

    match kind {
        Text => print_typed::<String>(config, key),
        Boolean => print_typed::<bool>(config, key),
        I8 => print_typed::<i8>(config, key),
        I16 => print_typed::<i16>(config, key),
        I32 => print_typed::<i32>(config, key),
        I64 => print_typed::<i64>(config, key),
        F32 => print_typed::<f32>(config, key),
        F64 => print_typed::<f64>(config, key),
        BigInt => print_typed::<num_bigint::BigInt>(config, key),
        BigDecimal => print_typed::<bigdecimal::BigDecimal>(config, key),
    }
}

fn print_typed<T>(config: &impl Configuration, key: &str) -> anyhow::Result<()>
where
    T: FromScalar + std::fmt::Display,
{
    let Some(value) = config.get_typed::<T>(key)? else {
        anyhow::bail!("No value for key '{key}'");
    };

    println!("{value}");
    Ok(())
}

fn dump(config: &impl Configuration, format: cli::OutputFormat) -> anyhow::Result<()> {
    let mut dumped: IndexMap<String, Vec<Scalar>> = IndexMap::new();

    for key in config.keys() {
        let Some(values) = config.lookup(&key) else {
            continue;
        };
        let values = values
            .iter()
            .map(|value| config.interpolate(value))
            .collect::<Result<Vec<_>, _>>()?;
        dumped.insert(key, values);
    }

    match format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &dumped)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), &dumped)?,
    };

    Ok(())
}
