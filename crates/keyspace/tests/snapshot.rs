//! Snapshot tests
//!
//! Loads each *.yaml file in /tests/ individually into a property store and
//! renders every key with its interpolated values.
use keyspace::configuration::Configuration;
use keyspace::documents::Documents;
use keyspace::options::Options;
use std::fmt::Write;

#[test]
fn snapshots() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("KEYSPACE_LOG"))
        .with_writer(std::io::stderr)
        .try_init();

    insta::glob!("*.yaml", |path| {
        let mut documents = Documents::default();
        documents.load_file(path).expect("fixture must load");
        let store = documents.to_store(Options::default());

        let mut rendered = String::new();
        for key in store.keys() {
            let values = store.get_string_list(key).expect("must interpolate");
            writeln!(rendered, "{key} = {values:?}").unwrap();
        }

        insta::assert_snapshot!(rendered);
    });
}
