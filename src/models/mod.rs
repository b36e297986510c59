pub mod door;
pub mod status;
pub mod message;

pub use door::*;
pub use status::*;
pub use message::*;

use chrono::{Local, NaiveDateTime};

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Formats a timestamp the way monitoring records expect it ("2024-07-04 03:05:09 PM")
pub fn format_status_time(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %I:%M:%S %p").to_string()
}
