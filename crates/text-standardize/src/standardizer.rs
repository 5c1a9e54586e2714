use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::error::{Result, StandardizeError};
use crate::report::{ColumnReport, TextReport};
use crate::table::{Table, Value};

static DEFAULT: LazyLock<TextStandardizer> = LazyLock::new(|| {
    TextStandardizer::new(StandardizeOptions::default()).expect("default rules compile")
});

/// Knobs for [`TextStandardizer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StandardizeOptions {
    /// Match `http` in any case in the URL and bare-`http` rules.
    ///
    /// Off by default: the substitution is case-sensitive, so `HTTP` survives
    /// the removal rules and is only lowercased.
    pub case_insensitive_http: bool,
}

impl StandardizeOptions {
    pub fn with_case_insensitive_http(mut self, enabled: bool) -> Self {
        self.case_insensitive_http = enabled;
        self
    }
}

/// Compiled substitution rules, applied in order:
///
/// 1. `http\S+` removed
/// 2. remaining `http` removed
/// 3. `@\S+` removed
/// 4. remaining `@` replaced with `at`
///
/// followed by a full lowercase. Each rule runs on what the previous one
/// left behind.
#[derive(Debug, Clone)]
pub struct TextStandardizer {
    url: Regex,
    bare_http: Regex,
    mention: Regex,
    at_sign: Regex,
    options: StandardizeOptions,
}

impl Default for TextStandardizer {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

impl TextStandardizer {
    pub fn new(options: StandardizeOptions) -> Result<Self> {
        let http = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(options.case_insensitive_http)
                .build()
        };

        if options != StandardizeOptions::default() {
            tracing::debug!(?options, "compiling standardizer with custom options");
        }

        Ok(Self {
            url: http(r"http\S+")?,
            bare_http: http("http")?,
            mention: Regex::new(r"@\S+")?,
            at_sign: Regex::new("@")?,
            options,
        })
    }

    pub fn options(&self) -> StandardizeOptions {
        self.options
    }

    pub fn standardize_text(&self, text: &str) -> String {
        self.standardize_text_with_report(text).output
    }

    pub fn standardize_text_with_report(&self, text: &str) -> TextReport {
        let (text, urls_removed) = replace_counted(&self.url, text, "");
        let (text, bare_http_removed) = replace_counted(&self.bare_http, &text, "");
        let (text, mentions_removed) = replace_counted(&self.mention, &text, "");
        let (text, at_replaced) = replace_counted(&self.at_sign, &text, "at");

        TextReport {
            output: text.to_lowercase(),
            urls_removed,
            bare_http_removed,
            mentions_removed,
            at_replaced,
        }
    }

    /// Standardize every text cell of `values` in place.
    ///
    /// Nulls pass through. Any other non-text cell fails the whole call
    /// before a single cell is touched.
    pub fn standardize_values(&self, field: &str, values: &mut [Value]) -> Result<ColumnReport> {
        if let Some((row, found)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !matches!(v, Value::Text(_) | Value::Null))
        {
            return Err(StandardizeError::NonTextValue {
                field: field.to_string(),
                row,
                found: found.kind(),
            });
        }

        let mut report = ColumnReport {
            rows: values.len(),
            ..ColumnReport::default()
        };

        for value in values.iter_mut() {
            let Value::Text(text) = value else {
                report.nulls += 1;
                continue;
            };

            let text_report = self.standardize_text_with_report(text);
            report.absorb(&text_report);
            if text_report.output != *text {
                report.rows_changed += 1;
                *text = text_report.output;
            }
        }

        tracing::debug!(
            field,
            rows = report.rows,
            rows_changed = report.rows_changed,
            "standardized text column"
        );

        Ok(report)
    }

    /// Rewrite column `field` of `table` and hand the table back.
    pub fn standardize(&self, mut table: Table, field: &str) -> Result<Table> {
        self.standardize_in_place(&mut table, field)?;
        Ok(table)
    }

    /// Rewrite column `field` of `table` without taking ownership.
    ///
    /// On error the table is left exactly as it was.
    pub fn standardize_in_place(&self, table: &mut Table, field: &str) -> Result<ColumnReport> {
        let column = table
            .column_mut(field)
            .ok_or_else(|| StandardizeError::missing_field(field))?;
        self.standardize_values(field, &mut column.values)
    }
}

fn replace_counted(re: &Regex, text: &str, replacement: &str) -> (String, usize) {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;

    for m in re.find_iter(text) {
        count += 1;
        output.push_str(&text[last..m.start()]);
        output.push_str(replacement);
        last = m.end();
    }

    output.push_str(&text[last..]);
    (output, count)
}

/// Standardize one string with the default rules.
pub fn standardize_text(text: &str) -> String {
    DEFAULT.standardize_text(text)
}

pub fn standardize_text_with_report(text: &str) -> TextReport {
    DEFAULT.standardize_text_with_report(text)
}

/// Standardize column `field` with the default rules, returning the table.
pub fn standardize(table: Table, field: &str) -> Result<Table> {
    DEFAULT.standardize(table, field)
}

pub fn standardize_in_place(table: &mut Table, field: &str) -> Result<ColumnReport> {
    DEFAULT.standardize_in_place(table, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweets(cells: &[Option<&str>]) -> Table {
        Table::new()
            .with_column("id", (0..cells.len() as i64).collect::<Vec<_>>())
            .unwrap()
            .with_column("text", cells.iter().copied())
            .unwrap()
    }

    fn text_at(table: &Table, row: usize) -> Option<&str> {
        table.column("text").unwrap().values[row].as_text()
    }

    #[test]
    fn test_url_removed() {
        assert_eq!(standardize_text("Check http://example.com now"), "check  now");
    }

    #[test]
    fn test_https_url_removed() {
        assert_eq!(
            standardize_text("read https://t.co/abc123?x=1 later"),
            "read  later"
        );
    }

    #[test]
    fn test_mention_removed() {
        assert_eq!(standardize_text("@alice hello World"), " hello world");
    }

    #[test]
    fn test_lone_at_becomes_word() {
        assert_eq!(standardize_text("email me @ home"), "email me at home");
        assert_eq!(standardize_text("trailing @"), "trailing at");
    }

    #[test]
    fn test_bare_http_removed() {
        assert_eq!(standardize_text("speak http now"), "speak  now");
        assert_eq!(standardize_text("ends with http"), "ends with ");
    }

    #[test]
    fn test_http_mid_word_takes_rest_of_word() {
        assert_eq!(standardize_text("xhttpy and more"), "x and more");
    }

    #[test]
    fn test_upper_http_is_case_sensitive_by_default() {
        assert_eq!(standardize_text("HTTP is a protocol"), "http is a protocol");
    }

    #[test]
    fn test_case_insensitive_http() {
        let standardizer =
            TextStandardizer::new(StandardizeOptions::default().with_case_insensitive_http(true))
                .unwrap();
        assert_eq!(
            standardizer.standardize_text("HTTP is a protocol"),
            " is a protocol"
        );
        assert_eq!(
            standardizer.standardize_text("See HTTPS://Example.COM"),
            "see "
        );
    }

    #[test]
    fn test_rule_order_matters() {
        // The URL swallows the `@`, so nothing is left for the mention rules.
        let report = standardize_text_with_report("see http://x.io/@bob ok");
        assert_eq!(report.output, "see  ok");
        assert_eq!(report.urls_removed, 1);
        assert_eq!(report.mentions_removed, 0);
        assert_eq!(report.at_replaced, 0);
    }

    #[test]
    fn test_report_counts() {
        let report = standardize_text_with_report("@a @b meet @ http://x http");
        assert_eq!(report.output, "  meet at  ");
        assert_eq!(report.urls_removed, 1);
        assert_eq!(report.bare_http_removed, 1);
        assert_eq!(report.mentions_removed, 2);
        assert_eq!(report.at_replaced, 1);
    }

    #[test]
    fn test_unicode_lowercase_and_whitespace() {
        assert_eq!(standardize_text("ÉCOLE\u{3000}@ünï"), "école\u{3000}");
    }

    #[test]
    fn test_empty() {
        assert_eq!(standardize_text(""), "");
    }

    #[test]
    fn test_standardize_table() {
        let table = tweets(&[
            Some("Check http://example.com now"),
            None,
            Some("email me @ home"),
            Some("already clean"),
        ]);

        let table = standardize(table, "text").unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_names(), vec!["id", "text"]);
        assert_eq!(text_at(&table, 0), Some("check  now"));
        assert!(table.column("text").unwrap().values[1].is_null());
        assert_eq!(text_at(&table, 2), Some("email me at home"));
        assert_eq!(text_at(&table, 3), Some("already clean"));
        assert_eq!(table.column("id").unwrap().values[3], Value::Int(3));
    }

    #[test]
    fn test_in_place_report() {
        let mut table = tweets(&[Some("@x hi"), None, Some("plain"), Some("Loud")]);
        let report = standardize_in_place(&mut table, "text").unwrap();
        assert_eq!(
            report,
            ColumnReport {
                rows: 4,
                rows_changed: 2,
                nulls: 1,
                urls_removed: 0,
                bare_http_removed: 0,
                mentions_removed: 1,
                at_replaced: 0,
            }
        );
    }

    #[test]
    fn test_missing_field_leaves_table_untouched() {
        let table = tweets(&[Some("Hello @you")]);
        let mut copy = table.clone();
        let err = standardize_in_place(&mut copy, "body").unwrap_err();
        assert_eq!(err.kind(), "missing_field");
        assert_eq!(copy, table);

        let err = standardize(table, "body").unwrap_err();
        assert!(matches!(err, StandardizeError::MissingField { ref field } if field == "body"));
    }

    #[test]
    fn test_non_text_cell_rejected_before_mutation() {
        let mut table = Table::new()
            .with_column(
                "text",
                vec![Value::from("Hello @you"), Value::Float(1.5)],
            )
            .unwrap();
        let before = table.clone();

        let err = standardize_in_place(&mut table, "text").unwrap_err();
        match err {
            StandardizeError::NonTextValue { field, row, found } => {
                assert_eq!(field, "text");
                assert_eq!(row, 1);
                assert_eq!(found, "float");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(table, before);
    }

    #[test]
    fn test_default_matches_static_rules() {
        let standardizer = TextStandardizer::default();
        assert_eq!(standardizer.options(), StandardizeOptions::default());
        assert_eq!(
            standardizer.standardize_text("Hi @there"),
            standardize_text("Hi @there")
        );
    }
}
