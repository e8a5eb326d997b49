//! Display-name templating.

use std::collections::HashMap;

use javscraper_common::VideoRecord;

/// Placeholders understood by [`TitleTemplate`], without the `%` delimiters.
pub const PLACEHOLDERS: &[&str] = &[
    "num",
    "title",
    "actor",
    "actor_first",
    "set",
    "director",
    "date",
    "year",
    "month",
    "studio",
    "maker",
];

/// Variable substitution context for display-name templates.
///
/// Placeholders use the `%name%` syntax and are matched case-insensitively.
/// Every placeholder in [`PLACEHOLDERS`] is always substituted; a missing or
/// blank value is replaced with the caller's fallback. Any other `%text%` is
/// left untouched.
///
/// # Example
///
/// ```
/// use javscraper::metadata::TitleTemplate;
///
/// let ctx = TitleTemplate::new()
///     .with_var("num", "ABC-123")
///     .with_var("title", "Foo");
///
/// assert_eq!(ctx.render("%num% %title%", ""), "ABC-123 Foo");
/// assert_eq!(ctx.render("[%YEAR%] %Title%", "----"), "[----] Foo");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TitleTemplate {
    vars: HashMap<&'static str, String>,
}

impl TitleTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context populated from every field of `record`.
    pub fn from_record(record: &VideoRecord) -> Self {
        let mut ctx = Self::new()
            .with_var("num", &record.num)
            .with_var("title", &record.title)
            .with_var("actor", &record.actors.join(", "));

        let optional = [
            ("actor_first", record.actors.first()),
            ("set", record.set.as_ref()),
            ("director", record.director.as_ref()),
            ("date", record.date.as_ref()),
            ("studio", record.studio.as_ref()),
            ("maker", record.maker.as_ref()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                ctx.set(key, value);
            }
        }
        if let Some(year) = record.year() {
            ctx.set("year", &year.to_string());
        }
        if let Some(month) = record.month() {
            ctx.set("month", &format!("{month:02}"));
        }
        ctx
    }

    /// Add a variable. Keys outside [`PLACEHOLDERS`] are ignored.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(known) = placeholder(key) {
            self.vars.insert(known, value.trim().to_string());
        }
    }

    /// Substitute placeholders in `template` in a single left-to-right pass.
    ///
    /// Substituted values are never rescanned, so a title containing `%num%`
    /// is emitted verbatim.
    pub fn render(&self, template: &str, empty_value: &str) -> String {
        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template;

        while let Some(start) = rest.find('%') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let known = after
                .find('%')
                .and_then(|end| placeholder(&after[..end]).map(|key| (key, end)));

            match known {
                Some((key, end)) => {
                    match self.vars.get(key).filter(|v| !v.is_empty()) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(empty_value),
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push('%');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn placeholder(name: &str) -> Option<&'static str> {
    PLACEHOLDERS
        .iter()
        .copied()
        .find(|p| p.eq_ignore_ascii_case(name))
}
