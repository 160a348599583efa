/// Page used when a caller supplies none (or an invalid one).
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when a caller supplies none (or an invalid one).
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
