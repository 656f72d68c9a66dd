use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// `require("x")` or `require('x')`, with optional whitespace around the
/// literal. Computed or interpolated requests are not recognized.
static REQUIRE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*(?:"([^"\r\n]*)"|'([^'\r\n]*)')\s*\)"#)
        .expect("require pattern is a valid regex")
});

/// A single `require(...)` call found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireOccurrence {
    /// The string literal contents, without quotes
    pub request: String,
    /// Byte range of the whole call expression
    pub span: Range<usize>,
}

/// Locates require calls textually. The bundled language is never parsed;
/// calls inside comments or strings are matched like any other text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireParser;

impl RequireParser {
    pub fn new() -> Self {
        Self
    }

    /// All occurrences in source order
    pub fn parse(&self, source: &str) -> Vec<RequireOccurrence> {
        REQUIRE_PATTERN
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let request = caps.get(1).or_else(|| caps.get(2))?;
                Some(RequireOccurrence {
                    request: request.as_str().to_string(),
                    span: whole.range(),
                })
            })
            .collect()
    }

    /// Just the request strings, in source order
    pub fn requests(&self, source: &str) -> Vec<String> {
        self.parse(source)
            .into_iter()
            .map(|occurrence| occurrence.request)
            .collect()
    }

    pub fn contains_require(&self, source: &str) -> bool {
        REQUIRE_PATTERN.is_match(source)
    }
}
