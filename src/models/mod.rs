mod series;
mod snapshot;
mod table;

pub use series::{ClassifiedYearEntry, CountryTimeSeries, DataType, SeriesTable, YearSeries};
pub(crate) use snapshot::country_key;
pub use snapshot::{
    CountrySnapshot, SnapshotTable, AREA_COLUMN, DELTA_AREA_COLUMN, DELTA_PERCENT_COLUMN,
    PERCENT_2000_COLUMN, PERCENT_2010_COLUMN,
};
pub use table::{RawRow, RawTable, COUNTRY_COLUMN};
