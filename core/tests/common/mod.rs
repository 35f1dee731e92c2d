use std::path::PathBuf;
use std::sync::Arc;

use fightline_core::{Encounter, MemorySource, Report};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_report.json")
}

pub fn fixture_source() -> Arc<MemorySource> {
    Arc::new(MemorySource::load(&fixture_path()).unwrap())
}

pub fn open_dsu(source: Arc<MemorySource>) -> Report {
    Report::open(source.info().code.clone(), Encounter::Dsu, source).unwrap()
}
