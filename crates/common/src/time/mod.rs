//! Wall-clock utilities
//!
//! - **[`Clock`]**: injectable source of local wall-clock time
//! - **[`next_midnight`] / [`until_next_midnight`]**: next 00:00:00 in a
//!   time zone, strictly after a given instant
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone};
//! use guardian_common::time::until_next_midnight;
//!
//! let tz = FixedOffset::east_opt(8 * 3600).unwrap();
//! let now = tz.with_ymd_and_hms(2024, 11, 14, 23, 59, 59).unwrap();
//! assert_eq!(until_next_midnight(&now).as_secs(), 1);
//! ```

pub mod clock;
pub mod midnight;

pub use clock::{Clock, SystemClock};
pub use midnight::{next_midnight, until_next_midnight};
