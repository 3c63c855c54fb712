// Polling and rotation tuning constants - adjust these to balance
// responsiveness vs endpoint load
// All timing-related constants in one place for easy tuning

use std::time::Duration;

// === Polling ===

/// Delay between playlist polls when the config carries no usable value.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;

/// Playlist endpoint used when no override is configured.
pub const DEFAULT_PLAYLIST_URL: &str =
    "https://288650-257ambermackerel.adobeio-static.net/api/v1/web/colesdemoapi/urlprovider";

// === Rotation ===

/// Fixed skew subtracted from a slot's dwell whenever the advance timer is
/// (re)armed, so time already spent on the visible slot is not counted twice
/// when an activation resynchronizes the schedule.
pub const DWELL_RESYNC_OFFSET: Duration = Duration::from_secs(1);

/// Lower bound for parsed dwell values and for any scheduled advance delay.
/// Keeps malformed durations from ever producing a zero or negative timer.
pub const MIN_DWELL: Duration = Duration::from_secs(1);
