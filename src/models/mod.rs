pub mod duration;
pub mod record;

pub use duration::{format_brief, format_hms, parse_hms};
pub use record::SessionRecord;
