//! Regex-driven identifier recognition.
//!
//! Input is first cleaned of file extensions, site-name prefixes and
//! resolution/codec noise, then each identifier family is tried in a fixed
//! order. The first family that matches wins, so the more distinctive
//! formats (FC2, HEYZO, date serials) are checked before the generic
//! `PREFIX-123` pattern which would otherwise swallow them.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{IdKind, Identifier};

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:mp4|mkv|avi|wmv|mov|ts|m4v|rmvb|flv|iso|webm)$").unwrap()
});

static SITE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9-]+\.(?:com|net|org|xyz|cc|tv|me|la|info)@?").unwrap()
});

static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:\d{3,4}p|[248]k|fhd|uhd|x26[45]|h26[45]|hevc|avc|aac)\b").unwrap()
});

static FC2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fc2[^a-z\d]{0,5}(?:ppv[^a-z\d]{0,5})?(\d{5,8})").unwrap()
});

static HEYZO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)heyzo[^a-z\d]{0,5}(?:hd[^a-z\d]{0,2})?(\d{4})").unwrap()
});

static DATE_SERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{6})([-_])(\d{3})(?:\D|$)").unwrap());

static TOKYO_HOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^a-z\d])([nk])(\d{4})(?:\D|$)").unwrap());

static CENSORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])([a-z]{2,6})[-_ ]?(\d{2,5})(?:\D|$)").unwrap()
});

/// Letter runs that look like a studio prefix but are part of release noise.
const NOISE_PREFIXES: &[&str] = &["CD", "DISC", "PART", "VOL", "EP", "HD", "SEASON", "TS"];

/// Recognize a canonical identifier in `text`.
pub(crate) fn recognize(text: &str) -> Option<Identifier> {
    let cleaned = clean(text);
    if cleaned.trim().is_empty() {
        return None;
    }

    fc2(&cleaned)
        .or_else(|| heyzo(&cleaned))
        .or_else(|| date_serial(&cleaned))
        .or_else(|| tokyo_hot(&cleaned))
        .or_else(|| censored(&cleaned))
}

pub(crate) fn clean(text: &str) -> String {
    let text = EXTENSION.replace(text.trim(), "");
    let text = SITE_PREFIX.replace_all(&text, " ");
    NOISE.replace_all(&text, " ").into_owned()
}

fn fc2(text: &str) -> Option<Identifier> {
    let caps = FC2.captures(text)?;
    Some(Identifier::new(
        format!("FC2-{}", &caps[1]),
        IdKind::Fc2,
        caps.get(0)?.as_str(),
    ))
}

fn heyzo(text: &str) -> Option<Identifier> {
    let caps = HEYZO.captures(text)?;
    Some(Identifier::new(
        format!("HEYZO-{}", &caps[1]),
        IdKind::Heyzo,
        caps.get(0)?.as_str(),
    ))
}

fn date_serial(text: &str) -> Option<Identifier> {
    let caps = DATE_SERIAL.captures(text)?;
    let (kind, sep) = if &caps[2] == "_" {
        (IdKind::OnePondo, '_')
    } else {
        (IdKind::Caribbean, '-')
    };
    Some(Identifier::new(
        format!("{}{}{}", &caps[1], sep, &caps[3]),
        kind,
        caps.get(0)?.as_str().trim_matches(|c: char| !c.is_ascii_digit()),
    ))
}

fn tokyo_hot(text: &str) -> Option<Identifier> {
    let caps = TOKYO_HOT.captures(text)?;
    Some(Identifier::new(
        format!("{}{}", caps[1].to_ascii_uppercase(), &caps[2]),
        IdKind::TokyoHot,
        caps.get(0)?.as_str().trim_matches(|c: char| !c.is_ascii_alphanumeric()),
    ))
}

fn censored(text: &str) -> Option<Identifier> {
    // A match consumes the boundary character on both sides, so adjacent
    // candidates ("CD1 ABC-123") need an explicit restart.
    let mut start = 0;
    while start < text.len() {
        let caps = CENSORED.captures(&text[start..])?;
        let whole = caps.get(0)?;
        let prefix = caps[1].to_ascii_uppercase();

        if !NOISE_PREFIXES.contains(&prefix.as_str()) {
            let serial: u32 = caps[2].parse().ok()?;
            let matched = whole
                .as_str()
                .trim_matches(|c: char| !c.is_ascii_alphanumeric());
            return Some(Identifier::new(
                format!("{prefix}-{serial:03}"),
                IdKind::Censored,
                matched,
            ));
        }

        start += caps.get(1)?.end();
    }
    None
}
