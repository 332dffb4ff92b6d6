//! Shared configuration constants for listscrape
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Number of results the search surface returns per page.
///
/// Offsets advance by this step, so it must match the surface or pages
/// will overlap (harmless, dedup absorbs it) or leave gaps (lossy).
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Highest offset the enumerator will request.
///
/// Safety bound against an unbounded or unstable paginated surface, not a
/// promise of exhaustiveness.
pub const DEFAULT_MAX_OFFSET: u32 = 2000;

/// Secondary pagination values tried at every offset, in order.
pub const DEFAULT_VARIANTS: [u32; 7] = [0, 1, 2, 3, 4, 5, 6];

/// Maximum number of new items collected per run.
pub const DEFAULT_QUOTA: usize = 1000;

/// Query parameter carrying the pagination offset.
pub const DEFAULT_OFFSET_PARAM: &str = "items_offset";

/// Query parameter carrying the pagination variant.
pub const DEFAULT_VARIANT_PARAM: &str = "section_offset";

/// Substring identifying item detail links.
pub const DEFAULT_ITEM_PATH_PATTERN: &str = "/rooms/";

/// Substring identifying host profile links.
pub const DEFAULT_HOST_PATH_PATTERN: &str = "/users/show/";

/// Timeout for search and detail page navigation (seconds)
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 120;

/// Timeout for host profile navigation (seconds)
pub const DEFAULT_PROFILE_TIMEOUT_SECS: u64 = 90;

/// Bounded wait for the first item anchor on a search page (seconds)
pub const DEFAULT_ANCHOR_WAIT_SECS: u64 = 30;

/// Randomized delay range applied before every navigation (milliseconds)
pub const DEFAULT_PACING_MS: (u64, u64) = (800, 1600);

/// Number of synthetic scroll-to-bottom actions on a profile page.
///
/// The profile view lazy-loads its listing cards and exposes no "done"
/// signal, so a fixed count is the best available approximation.
pub const DEFAULT_PROFILE_SCROLLS: u32 = 12;

/// Randomized delay range between profile scrolls (milliseconds)
pub const DEFAULT_SCROLL_PACING_MS: (u64, u64) = (250, 500);

/// Run-scoped output file name
pub const RUN_FILE_NAME: &str = "listings_run.csv";

/// Cumulative master file name
pub const MASTER_FILE_NAME: &str = "listings_master.csv";

/// Ledger of identifiers that were discovered but never extracted
pub const LEDGER_FILE_NAME: &str = "seen_identifiers.txt";

/// Chrome user agent string
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
