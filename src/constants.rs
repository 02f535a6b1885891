//! Global Constants
//!
//! Centralized limits and defaults. All magic numbers live here.

/// Header discovery
pub mod scan {
    /// Header extensions picked up by default
    pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hxx", "hh"];

    /// Directory names pruned from every walk
    pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
        ".git",
        "build",
        "cmake-build",
        "node_modules",
        "venv",
        "__pycache__",
        ".vscode",
        ".idea",
    ];

    /// Files above this size are skipped (bytes)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;
}

/// Comment mining for descriptions
pub mod description {
    /// How far back from a declaration to look for a doc comment (characters)
    pub const LOOKBACK_WINDOW: usize = 500;

    /// Maximum mined description length (characters)
    pub const MAX_MINED_CHARS: usize = 200;
}

/// Markdown report layout
pub mod report {
    pub const DEFAULT_OUTPUT: &str = "interfaces_table.md";

    /// Descriptions longer than this are cut in table rows (characters)
    pub const MAX_DESCRIPTION_CHARS: usize = 100;

    /// File paths longer than this keep only their tail (characters)
    pub const MAX_PATH_CHARS: usize = 50;

    pub const ELLIPSIS: &str = "...";

    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Description enhancement
pub mod enhance {
    /// Bytes of source shown on each side of an interface's span, widened to char boundaries
    pub const CONTEXT_MARGIN: usize = 200;

    /// Request timeout for provider calls (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Delay before the single retry of a recoverable failure (milliseconds)
    pub const RETRY_DELAY_MS: u64 = 500;
}

/// Structural front-end
pub mod frontend {
    pub const DEFAULT_STANDARD: &str = "c++14";
}
