//! Common constants used throughout the yang interpreter.

/// Directive keywords, matched as line prefixes in this order of precedence.
pub const TT_FOR: &str = "for ";
pub const TT_CMD: &str = "cmd:";
pub const TT_EXCLUDE: &str = "exclude:";
pub const TT_CHECK: &str = "check:";
pub const TT_INCLUDE: &str = "include:";
pub const TT_DOWNLOAD: &str = "download:";
pub const TT_WHEN: &str = "when:";
pub const TT_MKDIR: &str = "mkdir:";

/// Separator between the URL and the destination of a `download:` directive
pub const DOWNLOAD_SEPARATOR: &str = " in ";

/// Variables a manifest is not allowed to assign
pub const RESERVED_VARIABLES: [&str; 2] = ["root", "file"];

/// Dynamic tokens resolved by the expander on every pass
pub const ROOT_TOKEN: &str = "root";
pub const RANDOM_TOKEN: &str = "builtins.random";
pub const RANDOM_TOKEN_LEN: usize = 16;

/// Per-file tokens substituted into pattern templates
pub const FILENAME_TOKEN: &str = "$filename";
pub const FILE_TOKEN: &str = "$file";

/// Default cap on expansion passes before giving up on a fixpoint
pub const DEFAULT_MAX_PASSES: usize = 64;

/// Exit code for a manifest that is missing or fails to parse
pub const MANIFEST_ERROR_EXIT_CODE: i32 = 255;

/// Exit code for a command killed by the timeout
pub const TIMEOUT_EXIT_CODE: i32 = 124;
