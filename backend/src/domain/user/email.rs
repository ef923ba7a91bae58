//! Email address syntax.
//!
//! An address is `local@domain`, split at the last `@`:
//!
//! - the whole address is at most 254 UTF-16 units;
//! - the local part is at most 64 bytes and is either dot-separated atoms
//!   (UTF-8 letters allowed) or a quoted string;
//! - the domain is at most 253 bytes, has at least two labels and ends in an
//!   alphabetic or punycode (`xn--`) top-level label.
//!
//! IP literals and single-label hosts are rejected.

use std::sync::OnceLock;

use regex::Regex;

const ADDRESS_MAX_UNITS: usize = 254;
const LOCAL_MAX_BYTES: usize = 64;
const DOMAIN_MAX_BYTES: usize = 253;
const LABEL_MAX_UNITS: usize = 63;

/// Non-ASCII ranges accepted in local parts and top-level labels.
macro_rules! intl_ranges {
    () => {
        r"\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}"
    };
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email pattern {pattern:?} failed to compile: {error}"))
    })
}

fn atom() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(
        &CELL,
        concat!(r"^(?i)[a-z0-9!#$%&'*+\-/=?^_`{|}~", intl_ranges!(), r"]+$"),
    )
}

fn quoted_content() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(
        &CELL,
        concat!(
            r"^(?:[\s\x01-\x08\x0B\x0C\x0E-\x1F\x7F\x21\x23-\x5B\x5D-\x7E",
            intl_ranges!(),
            r"]|\\[\x01-\x09\x0B\x0C\x0D-\x7F",
            intl_ranges!(),
            r"])*$"
        ),
    )
}

fn top_level_label() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(
        &CELL,
        r"^(?i)(?:[a-z\x{A1}-\x{A8}\x{AA}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,}|xn[a-z0-9-]{2,})$",
    )
}

fn label() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, r"^(?i)[a-z0-9\x{A1}-\x{10FFFF}-]+$")
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn is_local_part(local: &str) -> bool {
    if let Some(quoted) = local.strip_prefix('"') {
        // The closing character is dropped unchecked.
        let mut inner = quoted.chars();
        inner.next_back();
        return quoted_content().is_match(inner.as_str());
    }
    local.split('.').all(|part| atom().is_match(part))
}

fn is_label(part: &str) -> bool {
    utf16_len(part) <= LABEL_MAX_UNITS
        && label().is_match(part)
        && !part.starts_with('-')
        && !part.ends_with('-')
        && !part.chars().any(|c| ('\u{FF01}'..='\u{FF5E}').contains(&c))
}

fn is_domain(domain: &str) -> bool {
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    top_level_label().is_match(tld) && domain.split('.').all(is_label)
}

/// Whether `value` is a syntactically valid email address.
///
/// # Examples
/// ```
/// use users_api::domain::is_valid_email;
///
/// assert!(is_valid_email("ana@x.com"));
/// assert!(is_valid_email("joão@x.com"));
/// assert!(!is_valid_email("ana@"));
/// ```
pub fn is_valid_email(value: &str) -> bool {
    if utf16_len(value) > ADDRESS_MAX_UNITS {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    local.len() <= LOCAL_MAX_BYTES
        && domain.len() <= DOMAIN_MAX_BYTES
        && is_domain(domain)
        && is_local_part(local)
}
