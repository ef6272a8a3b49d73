#![no_main]

use libfuzzer_sys::fuzz_target;

use forest_cover_analyzer::{dataset::CoverDataset, io, InterpolationConfig};

fuzz_target!(|data: &[u8]| {
    // Parsing and deriving must return errors, never panic
    if let Ok(table) = io::read_table_from_bytes(data, "fuzz") {
        let _ = CoverDataset::build(table, None, &InterpolationConfig::default());
    }
});
