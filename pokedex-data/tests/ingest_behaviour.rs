//! Behavioural tests for the ingestion worker pool.

use std::cell::RefCell;
use std::time::Duration;

use camino::Utf8PathBuf;
use pokedex_core::Catalogue;
use pokedex_data::test_support::{StubCatalogueSource, block_on_for_tests};
use pokedex_data::{IngestError, IngestOptions, IngestReport, ingest};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const CHARMANDER: u32 = 4;

type ReportCell = RefCell<Option<Result<IngestReport, IngestError>>>;

/// Scenario state shared between steps.
#[derive(Debug)]
struct IngestWorld {
    _dir: TempDir,
    output: Utf8PathBuf,
    source: RefCell<Option<StubCatalogueSource>>,
    report: ReportCell,
}

impl IngestWorld {
    fn new() -> Self {
        let dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create temporary directory: {err}"),
        };
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temporary directory {path:?} is not UTF-8"));
        Self {
            output: root.join("data/pokemon.json"),
            _dir: dir,
            source: RefCell::new(None),
            report: RefCell::new(None),
        }
    }

    fn with_source(&self, action: impl FnOnce(&StubCatalogueSource)) {
        let guard = self.source.borrow();
        let source = guard
            .as_ref()
            .unwrap_or_else(|| panic!("stub source must be initialised"));
        action(source);
    }

    fn written_ids(&self) -> Vec<u32> {
        let file = std::fs::File::open(self.output.as_std_path())
            .unwrap_or_else(|err| panic!("dataset should exist: {err}"));
        let catalogue =
            Catalogue::from_reader(file).unwrap_or_else(|err| panic!("dataset should parse: {err}"));
        catalogue.records().iter().map(|r| r.id).collect()
    }
}

#[fixture]
fn world() -> IngestWorld {
    IngestWorld::new()
}

// --- Given steps ---

#[given("a catalogue API listing bulbasaur, charmander and squirtle")]
fn listing(#[from(world)] world: &IngestWorld) {
    *world.source.borrow_mut() = Some(StubCatalogueSource::with_creatures(&[
        (1, "bulbasaur"),
        (CHARMANDER, "charmander"),
        (7, "squirtle"),
    ]));
}

#[given("charmander fails once")]
fn fails_once(#[from(world)] world: &IngestWorld) {
    world.with_source(|source| source.fail_pokemon(CHARMANDER, 1));
}

#[given("charmander fails twice")]
fn fails_twice(#[from(world)] world: &IngestWorld) {
    world.with_source(|source| source.fail_pokemon(CHARMANDER, 2));
}

#[given("the index cannot be fetched")]
fn index_down(#[from(world)] world: &IngestWorld) {
    world.with_source(StubCatalogueSource::fail_index);
}

// --- When steps ---

#[when("I ingest the catalogue")]
fn run_ingest(#[from(world)] world: &IngestWorld) {
    let options = IngestOptions::default()
        .with_concurrency(2)
        .with_retry_backoff(Duration::ZERO)
        .with_throttle(Duration::ZERO);
    let guard = world.source.borrow();
    let source = guard
        .as_ref()
        .unwrap_or_else(|| panic!("stub source must be initialised"));
    let outcome = block_on_for_tests(ingest(source, &options, &world.output));
    *world.report.borrow_mut() = Some(outcome);
}

// --- Then steps ---

#[then("the dataset holds ids 1, 4 and 7")]
fn holds_all(#[from(world)] world: &IngestWorld) {
    assert_eq!(world.written_ids(), [1, 4, 7]);
}

#[then("the dataset holds ids 1 and 7")]
fn holds_survivors(#[from(world)] world: &IngestWorld) {
    assert_eq!(world.written_ids(), [1, 7]);
}

#[then("charmander is reported as dropped")]
fn reports_dropped(#[from(world)] world: &IngestWorld) {
    let guard = world.report.borrow();
    match guard.as_ref() {
        Some(Ok(report)) => {
            assert_eq!(report.dropped, ["charmander"]);
            assert_eq!(report.written, 2);
            assert_eq!(report.requested, 3);
        }
        other => panic!("expected a successful report, found {other:?}"),
    }
}

#[then("the run fails before writing a dataset")]
fn fails_without_output(#[from(world)] world: &IngestWorld) {
    let guard = world.report.borrow();
    match guard.as_ref() {
        Some(Err(IngestError::FetchIndex { .. })) => {}
        other => panic!("expected an index failure, found {other:?}"),
    }
    assert!(!world.output.as_std_path().exists());
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/ingest_catalogue.feature", name = $title)]
        fn $fn_name(world: IngestWorld) {
            let _ = world;
        }
    };
}

register_scenario!(transient_failure_is_retried, "a transient failure is retried");
register_scenario!(
    persistent_failure_drops_only_that_creature,
    "a persistent failure drops only that creature"
);
register_scenario!(index_failure_writes_nothing, "an index failure writes nothing");
