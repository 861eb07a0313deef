use once_cell::sync::Lazy;
use regex::Regex;

static SQL_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"```sql\n?|```\n?").unwrap());

/// Strips markdown code-fence artifacts from a model reply and trims
/// surrounding whitespace. Applied to every generated SQL reply; idempotent.
///
/// Deliberately does nothing else: LIMIT presence is the generation prompt's
/// responsibility, and the SELECT check happens in the generation step.
pub fn strip_sql_fences(reply: &str) -> String {
    SQL_FENCE_PATTERN
        .replace_all(reply.trim(), "")
        .trim()
        .to_string()
}
