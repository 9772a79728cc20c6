use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Largest accepted sneaker photo (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Room a multipart body gets on top of the image limit for part headers and
/// the `userId` text part.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub const DEFAULT_USER_ID: &str = "temp-user";

pub const UPLOAD_MAX_ATTEMPTS: u32 = 3;
pub const UPLOAD_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(15);
pub const MAX_OUTFIT_SUGGESTIONS: usize = 3;

pub const TREND_TTL: Duration = Duration::from_secs(60 * 60);
pub const MAX_TREND_ITEMS: usize = 12;

/// How long shutdown waits for background trend refreshes before aborting them.
pub const REFRESH_DRAIN_GRACE: Duration = Duration::from_secs(5);

pub const GENERIC_FAILURE_DETAILS: &str = "Please try again later.";
