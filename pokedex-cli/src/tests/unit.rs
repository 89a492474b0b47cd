//! Focused unit tests covering CLI configuration and the query commands.

use super::helpers::{DatasetFixture, names, parse_output};
use super::*;
use crate::ingest::{IngestConfig, config_from_layers_for_test, execute_ingest};
use crate::query::load_catalogue;
use camino::Utf8PathBuf;
use ortho_config::MergeComposer;
use pokedex_core::{GenerationFilter, LegendaryFilter, SortOption};
use pokedex_data::test_support::StubCatalogueSource;
use pokedex_data::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use rstest::{fixture, rstest};
use serde_json::json;
use std::time::Duration;

#[fixture]
fn dataset() -> DatasetFixture {
    DatasetFixture::new()
}

#[rstest]
fn ingest_defaults_fill_unset_options() {
    let config = IngestConfig::try_from(IngestArgs::default()).expect("defaults should resolve");

    assert_eq!(config.options.limit, 151);
    assert_eq!(config.options.concurrency, 10);
    assert_eq!(config.output, Utf8PathBuf::from("data/pokemon.json"));
    assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        config.source.timeout,
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    );
}

#[rstest]
#[case(IngestArgs { limit: Some(0), ..IngestArgs::default() }, ARG_LIMIT, ENV_LIMIT)]
#[case(IngestArgs { concurrency: Some(0), ..IngestArgs::default() }, ARG_CONCURRENCY, ENV_CONCURRENCY)]
#[case(IngestArgs { timeout_secs: Some(0), ..IngestArgs::default() }, ARG_TIMEOUT_SECS, ENV_TIMEOUT_SECS)]
fn zero_values_are_rejected(
    #[case] args: IngestArgs,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let err = IngestConfig::try_from(args).expect_err("zero should be rejected");
    match err {
        CliError::NonPositive {
            field: rejected,
            env,
        } => {
            assert_eq!(rejected, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected NonPositive, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "limit": 20,
            "concurrency": 4,
            "base_url": "http://from-file.test/api/v2",
        }),
        None,
    );
    composer.push_environment(json!({ "limit": 30, "timeout_secs": 5 }));
    composer.push_cli(json!({ "concurrency": 2 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");

    assert_eq!(config.options.limit, 30);
    assert_eq!(config.options.concurrency, 2);
    assert_eq!(config.source.base_url, "http://from-file.test/api/v2");
    assert_eq!(config.source.timeout, Duration::from_secs(5));
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "limit": "plenty" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn execute_ingest_writes_the_dataset(dataset: DatasetFixture) {
    let output = dataset.root().join("fresh/pokemon.json");
    let mut config = IngestConfig::try_from(IngestArgs {
        output: Some(output.clone()),
        ..IngestArgs::default()
    })
    .expect("config should resolve");
    config.options = config
        .options
        .with_retry_backoff(Duration::ZERO)
        .with_throttle(Duration::ZERO);
    let source = StubCatalogueSource::with_creatures(&[(25, "pikachu"), (1, "bulbasaur")]);

    let report = execute_ingest(&config, &source).expect("ingest should succeed");

    assert_eq!(report.written, 2);
    let catalogue = load_catalogue(&output).expect("written dataset should load");
    assert_eq!(catalogue.records().first().map(|r| r.id), Some(1));
}

#[rstest]
fn parses_search_selectors() {
    let cli = Cli::try_parse_from([
        "pokedex",
        "search",
        "data.json",
        "--type",
        "fire",
        "--type",
        "flying",
        "--legendary",
        "non-legendary",
        "--generation",
        "generation-i",
        "--sort",
        "total-stats-desc",
    ])
    .expect("arguments should parse");

    match cli.command {
        Command::Search(args) => {
            assert_eq!(args.types, ["fire", "flying"]);
            assert_eq!(args.legendary, LegendaryFilter::NonLegendary);
            assert_eq!(
                args.generation,
                GenerationFilter::Only("generation-i".to_owned())
            );
            assert_eq!(args.sort, SortOption::TotalStatsDesc);
        }
        other => panic!("expected search command, found {other:?}"),
    }
}

#[rstest]
fn rejects_unknown_sort_token() {
    let outcome = Cli::try_parse_from(["pokedex", "search", "data.json", "--sort", "fastest"]);

    assert!(outcome.is_err());
}

#[rstest]
fn search_prints_filtered_records(dataset: DatasetFixture) {
    let args = SearchArgs {
        dataset: dataset.dataset().to_path_buf(),
        term: String::new(),
        types: vec!["fire".to_owned(), "flying".to_owned()],
        generation: GenerationFilter::All,
        legendary: LegendaryFilter::NonLegendary,
        sort: SortOption::IdAsc,
    };
    let mut buffer = Vec::new();

    run_search(&args, &mut buffer).expect("search should succeed");

    assert_eq!(names(&parse_output(&buffer)), ["charizard"]);
}

#[rstest]
fn search_ranks_by_total_stats(dataset: DatasetFixture) {
    let args = SearchArgs {
        dataset: dataset.dataset().to_path_buf(),
        term: "ar".to_owned(),
        types: Vec::new(),
        generation: GenerationFilter::All,
        legendary: LegendaryFilter::All,
        sort: SortOption::TotalStatsDesc,
    };
    let mut buffer = Vec::new();

    run_search(&args, &mut buffer).expect("search should succeed");

    assert_eq!(names(&parse_output(&buffer)), ["charizard", "charmander"]);
}

#[rstest]
fn suggest_prints_capped_names(dataset: DatasetFixture) {
    let args = SuggestArgs {
        dataset: dataset.dataset().to_path_buf(),
        query: "CHAR".to_owned(),
        max: 1,
    };
    let mut buffer = Vec::new();

    run_suggest(&args, &mut buffer).expect("suggest should succeed");

    let output = parse_output(&buffer);
    assert_eq!(names(&output), ["charmander"]);
    assert_eq!(
        output.pointer("/0/display_name").and_then(serde_json::Value::as_str),
        Some("Charmander")
    );
}

#[rstest]
fn missing_dataset_is_reported(dataset: DatasetFixture) {
    let err = load_catalogue(&dataset.root().join("absent.json")).expect_err("should fail");

    assert!(matches!(err, CliError::MissingDataset { .. }));
}

#[rstest]
fn directory_dataset_is_rejected(dataset: DatasetFixture) {
    let err = load_catalogue(dataset.root()).expect_err("should fail");

    assert!(matches!(err, CliError::DatasetNotFile { .. }));
}

#[rstest]
fn malformed_dataset_is_reported(dataset: DatasetFixture) {
    let path = dataset.root().join("broken.json");
    std::fs::write(path.as_std_path(), b"{ not json").expect("write broken dataset");

    let err = load_catalogue(&path).expect_err("should fail");

    assert!(matches!(err, CliError::LoadDataset { .. }));
}
