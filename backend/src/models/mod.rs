pub mod agenda;
pub mod date;

pub use agenda::{ChartRecord, ConsolidatedRecord, DateRange, Stats, SOURCE_COUNT};
pub use date::{epoch_sentinel, format_schedule_date, parse_schedule_date, try_parse_schedule_date};
