pub mod date;
pub mod location;
pub mod time;

pub use date::{first_date, parse_sort_date, SortDate};
pub use location::{location_allowed, AllowList, LocationFilter};
pub use time::{NormalizedTimeRange, TimeZoneNormalizer};
