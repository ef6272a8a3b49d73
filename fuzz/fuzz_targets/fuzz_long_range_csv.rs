#![no_main]

use libfuzzer_sys::fuzz_target;

use forest_cover_analyzer::{dataset::CoverDataset, io, InterpolationConfig};

const SNAPSHOT_CSV: &[u8] = b"country,area,two_thousand_percent,two_thousand_ten_percent\n\
Brazil,851576700,50.0,40.0\n\
Chile,75610000,20.0,22.0\n";

fuzz_target!(|data: &[u8]| {
    let Ok(long_range) = io::read_table_from_bytes(data, "fuzz") else {
        return;
    };
    let Ok(snapshot) = io::read_table_from_bytes(SNAPSHOT_CSV, "snapshot") else {
        return;
    };
    let _ = CoverDataset::build(snapshot, Some(long_range), &InterpolationConfig::default());
});
