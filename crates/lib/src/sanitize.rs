//! # Response Sanitizer
//!
//! Models often wrap a query in markdown fences even when told not to. This
//! module removes that markup so only the statement remains.

use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    /// A run of three or more backticks plus the language hint of an opening
    /// fence. A `sql`/`mysql` hint is taken even when the statement follows on
    /// the same line ("```sql SELECT 1;```"); any other hint only when it is
    /// the rest of its line ("```python\n").
    static ref FENCE: Regex = Regex::new(
        r"`{3,}(?:(?i:sql|mysql)\b[ \t]*(?:\r?\n)?|[A-Za-z0-9_+.-]*[ \t]*\r?\n)?"
    )
    .expect("fence pattern is valid");
}

/// Strips every fence marker and trims surrounding whitespace.
///
/// Idempotent: a removed fence is always preceded by a non-backtick character
/// (or the start of the text), so removal never joins shorter backtick runs
/// into a new fence.
pub fn sanitize(raw: &str) -> String {
    FENCE.replace_all(raw, "").trim().to_string()
}

/// Returns `true` if `sql` starts with a read statement (`SELECT` or `WITH`)
/// once leading comments and opening parentheses are skipped.
pub fn looks_like_query(sql: &str) -> bool {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(after) = rest.strip_prefix('(') {
            rest = after.trim_start();
        } else {
            break;
        }
    }
    let keyword: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();
    matches!(keyword.as_str(), "SELECT" | "WITH")
}
