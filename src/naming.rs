use std::sync::OnceLock;

use regex_lite::Regex;

/// Longest project directory name accepted.
pub const MAX_PROJECT_NAME_LEN: usize = 255;

/// npm registry limit for package names.
pub const MAX_PACKAGE_NAME_LEN: usize = 214;

/// Package name used when nothing usable survives slugification.
pub const FALLBACK_PACKAGE_NAME: &str = "untitled";

fn package_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:@[a-z0-9*~-][a-z0-9*._~-]*/)?[a-z0-9~-][a-z0-9._~-]*$")
            .expect("package name pattern is valid")
    })
}

fn repo_slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+$").expect("repo slug pattern is valid")
    })
}

/// Normalize a user-supplied project name into a relative directory path.
///
/// Whitespace is trimmed and runs of `/` collapse to one. Leading and
/// trailing slashes are dropped, so the result never names an absolute
/// path. Case and punctuation are kept: this is a display name.
pub fn slugify_project_name(input: &str) -> String {
    let mut out = input
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    truncate_chars(&mut out, MAX_PROJECT_NAME_LEN);
    out
}

/// True when following the `..` segments of `name` would leave the
/// directory it is resolved against.
pub fn escapes_base(name: &str) -> bool {
    let mut depth = 0usize;
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return true,
            },
            _ => depth += 1,
        }
    }
    false
}

/// Turn arbitrary text into something [`is_valid_package_name`] accepts.
pub fn slugify_package_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let lowered = input.trim().to_lowercase();
    let body = lowered
        .strip_prefix('.')
        .or_else(|| lowered.strip_prefix('_'))
        .unwrap_or(&lowered);

    // Whitespace runs and disallowed runs both become a single hyphen.
    let mut in_run = false;
    for c in body.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '~' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }

    out.truncate(MAX_PACKAGE_NAME_LEN);
    if out.is_empty() {
        out.push_str(FALLBACK_PACKAGE_NAME);
    }
    out
}

pub fn is_valid_package_name(input: &str) -> bool {
    input.len() <= MAX_PACKAGE_NAME_LEN && package_name_re().is_match(input)
}

/// Matches `owner/name`, each side one or more of `[A-Za-z0-9_-]`.
pub fn is_valid_repo_slug(input: &str) -> bool {
    repo_slug_re().is_match(input)
}

/// The part of a package name after its `@scope/`, if any.
pub fn unscoped_name(package_name: &str) -> &str {
    match package_name.strip_prefix('@') {
        Some(scoped) => scoped.split_once('/').map_or(package_name, |(_, name)| name),
        None => package_name,
    }
}

fn truncate_chars(s: &mut String, max: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("my-lib", "my-lib")]
    #[case("  My Project  ", "My Project")]
    #[case("apps//web///", "apps/web")]
    #[case("nested/dir/", "nested/dir")]
    #[case(".", ".")]
    #[case("/", "")]
    #[case("/abs/dir", "abs/dir")]
    #[case("  //etc//  ", "etc")]
    fn test_slugify_project_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify_project_name(input), expected);
    }

    #[test]
    fn test_slugify_project_name_truncates() {
        let long = "é".repeat(300);
        assert_eq!(slugify_project_name(&long).chars().count(), MAX_PROJECT_NAME_LEN);
    }

    #[rstest]
    #[case("my-lib", false)]
    #[case(".", false)]
    #[case("a/../b", false)]
    #[case("a/b/../..", false)]
    #[case("..", true)]
    #[case("../outside", true)]
    #[case("a/../../b", true)]
    fn test_escapes_base(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(escapes_base(name), expected);
    }

    #[rstest]
    #[case("My Project", "my-project")]
    #[case("  spaced   out  ", "spaced-out")]
    #[case(".hidden", "hidden")]
    #[case("_private", "private")]
    #[case("@scope/name", "-scope-name")]
    #[case("hello!!world", "hello-world")]
    #[case("", FALLBACK_PACKAGE_NAME)]
    fn test_slugify_package_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify_package_name(input), expected);
    }

    #[rstest]
    #[case("Über Cool Lib")]
    #[case("...")]
    #[case("__init__")]
    #[case("@Scope/Some Package")]
    #[case("a/b/c d")]
    #[case("\t\n")]
    fn test_slugify_package_name_is_valid_and_idempotent(#[case] input: &str) {
        let once = slugify_package_name(input);
        assert!(is_valid_package_name(&once), "{once:?} should be valid");
        assert_eq!(slugify_package_name(&once), once);
    }

    #[test]
    fn test_slugify_package_name_truncates() {
        let slug = slugify_package_name(&"a".repeat(500));
        assert_eq!(slug.len(), MAX_PACKAGE_NAME_LEN);
        assert!(is_valid_package_name(&slug));
    }

    #[rstest]
    #[case("@scope/name", true)]
    #[case("name", true)]
    #[case("my-lib.js", true)]
    #[case("~tilde", true)]
    #[case("Invalid Name", false)]
    #[case("UPPER", false)]
    #[case(".dotfirst", false)]
    #[case("_underscore", false)]
    #[case("@scope/", false)]
    #[case("", false)]
    fn test_is_valid_package_name(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_package_name(input), expected);
    }

    #[test]
    fn test_is_valid_package_name_length_cap() {
        assert!(is_valid_package_name(&"a".repeat(214)));
        assert!(!is_valid_package_name(&"a".repeat(215)));
    }

    #[rstest]
    #[case("@scope/name", "name")]
    #[case("plain", "plain")]
    fn test_unscoped_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unscoped_name(input), expected);
    }

    #[rstest]
    #[case("octocat/hello-world", true)]
    #[case("a_b/c-d", true)]
    #[case("bad slug", false)]
    #[case("owner/", false)]
    #[case("owner/name/extra", false)]
    #[case("owner/na.me", false)]
    fn test_is_valid_repo_slug(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_repo_slug(input), expected);
    }
}
