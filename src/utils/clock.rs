//! School-local wall clock.
//!
//! Calendar columns are stored without a zone, so "now" is the server's local
//! time with the offset dropped.

use chrono::{Local, NaiveDate, NaiveDateTime};

pub fn school_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn school_today() -> NaiveDate {
    school_now().date()
}
