//! Turns a provider's raw record into the record shown to the catalog.
//!
//! Rules run in a fixed order, each behind its own [`MetadataConfig`] toggle:
//!
//! 1. genre filtering
//! 2. stripping actor names appended to the title
//! 3. subtitle genre injection, driven by the original input name
//! 4. display name templating

use chrono::NaiveDate;
use javscraper_common::VideoRecord;

use super::template::TitleTemplate;
use super::token::ReferenceToken;
use crate::config::MetadataConfig;

/// Separators trimmed after removing a trailing actor name.
const TITLE_SEPARATORS: &[char] = &[',', '，', ' '];

/// A record after every normalization rule has run.
///
/// Fields are only readable; the record cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    record: VideoRecord,
    display_name: String,
    production_year: Option<i32>,
    premiere_date: Option<NaiveDate>,
}

impl NormalizedRecord {
    pub fn record(&self) -> &VideoRecord {
        &self.record
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn production_year(&self) -> Option<i32> {
        self.production_year
    }

    pub fn premiere_date(&self) -> Option<NaiveDate> {
        self.premiere_date
    }

    pub fn token(&self) -> ReferenceToken {
        ReferenceToken::attach(&self.record)
    }

    pub fn into_record(self) -> VideoRecord {
        self.record
    }
}

/// Apply every enabled rule to `record`.
///
/// `input_name` is the text the lookup started from; it decides whether the
/// release is subtitled.
pub fn normalize(mut record: VideoRecord, input_name: &str, config: &MetadataConfig) -> NormalizedRecord {
    filter_genres(&mut record, config);

    if config.strip_actor_from_title {
        record.title = strip_actor_names(&record.title, &record.actors);
    }

    if config.add_subtitle_genre && is_subtitled(input_name, &config.subtitle_suffixes) {
        ensure_genre(&mut record.genres, &config.subtitle_genre);
    }

    let display_name = display_name(&record, config);
    NormalizedRecord {
        production_year: record.year(),
        premiere_date: record.release_date(),
        display_name,
        record,
    }
}

/// Drop ignored genres, and genres that are really actor names when
/// `genre_ignore_actor` is set.
pub fn filter_genres(record: &mut VideoRecord, config: &MetadataConfig) {
    let actors = &record.actors;
    record.genres.retain(|genre| {
        if config.is_ignored_genre(genre) {
            return false;
        }
        !(config.genre_ignore_actor && actors.iter().any(|a| a == genre))
    });
}

/// Repeatedly strip actor names from the end of `title`, until no actor
/// name remains as a suffix.
///
/// Unlike a plain strip loop, which yields `""` for a title made only of
/// actor names, this returns the original title in that case so the
/// display name never loses its title part.
pub fn strip_actor_names(title: &str, actors: &[String]) -> String {
    let mut stripped = title.trim();
    loop {
        let before = stripped.len();
        for actor in actors.iter().map(|a| a.trim()).filter(|a| !a.is_empty()) {
            if let Some(rest) = stripped.strip_suffix(actor) {
                stripped = rest.trim_end().trim_end_matches(TITLE_SEPARATORS).trim_end();
            }
        }
        if stripped.len() == before {
            break;
        }
    }

    if stripped.is_empty() {
        title.trim().to_string()
    } else {
        stripped.to_string()
    }
}

/// Whether `input_name` ends with one of `suffixes`, ignoring ASCII case.
///
/// The check runs on the same cleaned text the recognizer sees, so
/// `ABC-123-C.mp4` counts as subtitled.
pub fn is_subtitled(input_name: &str, suffixes: &[String]) -> bool {
    let name = javscraper_parser::clean_name(input_name);
    let name = name.as_str();
    suffixes.iter().filter(|s| !s.is_empty()).any(|suffix| {
        name.len() >= suffix.len()
            && name.is_char_boundary(name.len() - suffix.len())
            && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    })
}

/// Add `genre` unless it is already present.
pub fn ensure_genre(genres: &mut Vec<String>, genre: &str) {
    if !genre.is_empty() && !genres.iter().any(|g| g == genre) {
        genres.push(genre.to_string());
    }
}

/// Display name from the configured template, or `"<num> <title>"`.
pub fn display_name(record: &VideoRecord, config: &MetadataConfig) -> String {
    if config.title_format.trim().is_empty() {
        return format!("{} {}", record.num, record.title).trim().to_string();
    }
    TitleTemplate::from_record(record).render(&config.title_format, &config.title_format_empty_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn record() -> VideoRecord {
        VideoRecord {
            title: "My Movie, Jane Doe, John Roe".to_string(),
            actors: strings(&["Jane Doe", "John Roe"]),
            genres: strings(&["Drama", "HD", "Jane Doe"]),
            date: Some("2019-07-01".to_string()),
            ..VideoRecord::new("ABC-123", "stub")
        }
    }

    #[test]
    fn test_strip_actor_names_iteratively() {
        let actors = strings(&["Jane Doe", "John Roe"]);
        assert_eq!(strip_actor_names("My Movie, Jane Doe, John Roe", &actors), "My Movie");
        assert_eq!(strip_actor_names("My Movie John Roe Jane Doe", &actors), "My Movie");
        assert_eq!(strip_actor_names("  My Movie，Jane Doe  ", &actors), "My Movie");
    }

    #[test]
    fn test_strip_actor_names_edge_cases() {
        assert_eq!(strip_actor_names("My Movie", &[]), "My Movie");
        assert_eq!(strip_actor_names("My Movie", &strings(&["", " "])), "My Movie");
        // Never strips the whole title away.
        assert_eq!(strip_actor_names("Jane Doe", &strings(&["Jane Doe"])), "Jane Doe");
        let both = strings(&["Jane Doe", "John Roe"]);
        assert_eq!(strip_actor_names("Jane Doe, John Roe", &both), "Jane Doe, John Roe");
        assert_eq!(strip_actor_names("Jane Doe in Paris", &strings(&["Jane Doe"])), "Jane Doe in Paris");
    }

    #[test]
    fn test_filter_genres() {
        let config = MetadataConfig {
            ignore_genres: strings(&["hd"]),
            ..Default::default()
        };
        let mut r = record();
        filter_genres(&mut r, &config);
        assert_eq!(r.genres, strings(&["Drama", "Jane Doe"]));

        let config = MetadataConfig {
            genre_ignore_actor: true,
            ..config
        };
        let mut r = record();
        filter_genres(&mut r, &config);
        assert_eq!(r.genres, strings(&["Drama"]));
    }

    #[test]
    fn test_is_subtitled() {
        let suffixes = MetadataConfig::default().subtitle_suffixes;
        assert!(is_subtitled("ABC-123-C", &suffixes));
        assert!(is_subtitled("abc-123-c2", &suffixes));
        assert!(!is_subtitled("ABC-123", &suffixes));
        assert!(!is_subtitled("C", &suffixes));
        assert!(!is_subtitled("字幕", &suffixes));
    }

    #[test]
    fn test_is_subtitled_on_filenames() {
        let suffixes = MetadataConfig::default().subtitle_suffixes;
        assert!(is_subtitled("ABC-123-C.mp4", &suffixes));
        assert!(is_subtitled("hhd800.com@STARS-120-C.mkv", &suffixes));
        assert!(is_subtitled("ABC-123-C.1080p.mkv", &suffixes));
        assert!(!is_subtitled("ABC-123.mp4", &suffixes));
    }

    #[test]
    fn test_subtitle_genre_added_for_filename_input() {
        let config = MetadataConfig {
            add_subtitle_genre: true,
            ..Default::default()
        };
        let n = normalize(record(), "ABC-123-C.mp4", &config);
        assert!(n.record().genres.iter().any(|g| g == "中文字幕"));
    }

    #[test]
    fn test_subtitle_genre_added_once() {
        let config = MetadataConfig {
            add_subtitle_genre: true,
            ..Default::default()
        };
        let once = normalize(record(), "ABC-123-C", &config);
        let twice = normalize(once.clone().into_record(), "ABC-123-C", &config);

        let count = |n: &NormalizedRecord| {
            n.record().genres.iter().filter(|g| *g == "中文字幕").count()
        };
        assert_eq!(count(&once), 1);
        assert_eq!(count(&twice), 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_subtitle_genre_needs_toggle_and_suffix() {
        let config = MetadataConfig::default();
        let n = normalize(record(), "ABC-123-C", &config);
        assert!(!n.record().genres.iter().any(|g| g == "中文字幕"));

        let config = MetadataConfig {
            add_subtitle_genre: true,
            ..Default::default()
        };
        let n = normalize(record(), "ABC-123", &config);
        assert!(!n.record().genres.iter().any(|g| g == "中文字幕"));
    }

    #[test]
    fn test_default_display_name() {
        let n = normalize(record(), "ABC-123", &MetadataConfig::default());
        assert_eq!(n.display_name(), "ABC-123 My Movie");
        assert_eq!(n.production_year(), Some(2019));
        assert_eq!(n.premiere_date(), NaiveDate::from_ymd_opt(2019, 7, 1));
    }

    #[test]
    fn test_templated_display_name_uses_stripped_title() {
        let config = MetadataConfig {
            title_format: "[%year%] %num% %title% (%studio%)".to_string(),
            title_format_empty_value: "?".to_string(),
            ..Default::default()
        };
        let n = normalize(record(), "ABC-123", &config);
        assert_eq!(n.display_name(), "[2019] ABC-123 My Movie (?)");
    }

    #[test]
    fn test_stripping_can_be_disabled() {
        let config = MetadataConfig {
            strip_actor_from_title: false,
            ..Default::default()
        };
        let n = normalize(record(), "ABC-123", &config);
        assert_eq!(n.record().title, "My Movie, Jane Doe, John Roe");
    }

    #[test]
    fn test_token_points_at_source() {
        let n = normalize(record(), "ABC-123", &MetadataConfig::default());
        let token = n.token();
        assert_eq!(token.provider, "stub");
        assert_eq!(token.key, "ABC-123");
    }
}
