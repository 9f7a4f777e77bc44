//! Title and category normalisation

use std::sync::LazyLock;

use regex::Regex;

/// Slug used when a title has nothing left after normalisation
pub const EMPTY_SLUG: &str = "untitled";

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\[\]{}()<>!@#$%^&*=+'"?,.\\|;:~`‘’“”/]"#).expect("punctuation regex")
});

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("separator regex"));

/// Turn free text into a filesystem-safe slug
///
/// Punctuation is removed, the rest lowercased, and every run of whitespace
/// or hyphens becomes a single hyphen with none at either end. Total and
/// idempotent; text that reduces to nothing becomes [`EMPTY_SLUG`].
pub fn slugify(text: &str) -> String {
    let stripped = PUNCTUATION.replace_all(text, "");
    let lowered = stripped.to_lowercase();
    let joined = SEPARATORS.replace_all(&lowered, "-");
    let slug = joined.trim_matches('-');

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Normalise one user-entered category
///
/// Categories are joined with hyphens in filenames, so a token may not
/// contain one: separators are dropped rather than replaced. Returns `None`
/// when nothing is left.
pub fn category_token(text: &str) -> Option<String> {
    let stripped = PUNCTUATION.replace_all(text, "");
    let token: String = SEPARATORS.replace_all(&stripped.to_lowercase(), "").into_owned();
    (!token.is_empty()).then_some(token)
}
