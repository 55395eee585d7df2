use regex::Regex;
use std::sync::LazyLock;

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z._-]+").expect("static pattern compiles"));

/// Turn a repository or branch identifier into a token safe for file and branch names.
///
/// Slashes and spaces become `_`, then every run of characters outside
/// `[0-9A-Za-z._-]` collapses into a single `_`.
pub fn slugify(text: &str) -> String {
    let text = text.replace(['/', ' '], "_");
    UNSAFE_RUN.replace_all(&text, "_").into_owned()
}

/// Slugs of every repository joined with `-`.
pub fn combined_slug<S: AsRef<str>>(repos: &[S]) -> String {
    repos
        .iter()
        .map(|r| slugify(r.as_ref()))
        .collect::<Vec<_>>()
        .join("-")
}
