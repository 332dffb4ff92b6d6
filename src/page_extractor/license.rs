//! License classifier
//!
//! Finds the permit/registration code of a listing. The lookup is an
//! ordered list of [`LicenseRule`]s: each names where to read text from and
//! which patterns to try on it. The first rule producing a code wins, so
//! a structured permit block always beats a free-text mention further down
//! the page.

use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{ExtractionMiss, FieldResult};
use crate::surface::{Locator, RenderPage, text_of_first};
use crate::utils::clean_text;

const FIELD: &str = "licenseCode";

/// `AAA-BBB-1234` style permit codes
static PRIMARY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([A-Z]{3}-[A-Z]{3}-[A-Z0-9]{4,6})\b").expect("Invalid license primary regex")
});

/// A license keyword followed, on the same line, by a code-like token.
///
/// The token must contain at least one digit so plain words after the
/// keyword ("number", "details") are not taken for a code.
static FALLBACK_PATTERN: Lazy<FancyRegex> = Lazy::new(|| {
    FancyRegex::new(
        r"(?i)(?:Registration(?:\s*No\.|\s*Number)?|Permit|License|Licence|DTCM)[^\n\r]*?((?=[A-Z0-9\-/]{0,40}[0-9])[A-Z0-9][A-Z0-9\-/]{3,40})",
    )
    .expect("Invalid license fallback regex")
});

/// Pattern applied to scope text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicensePattern {
    Primary,
    Fallback,
}

impl LicensePattern {
    /// First capture of this pattern in `text`
    #[must_use]
    pub fn find(self, text: &str) -> Option<String> {
        match self {
            Self::Primary => PRIMARY_PATTERN
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
            // Backtracking limit errors count as no match
            Self::Fallback => FALLBACK_PATTERN
                .captures(text)
                .ok()
                .flatten()
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        }
    }
}

/// Where a rule reads its text from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseScope {
    /// Labelled block: the last of at least two segments matched by the
    /// selector holds the value
    LabelledSegments(&'static str),
    /// First element matching a CSS selector
    Css(&'static str),
    /// First `div` whose text contains the phrase
    DivContaining(&'static str),
}

impl LicenseScope {
    async fn read<P: RenderPage>(self, page: &P) -> Option<String> {
        let text = match self {
            Self::LabelledSegments(selector) => {
                let segments = page.query_all(Locator::Css(selector)).await;
                if segments.len() < 2 {
                    return None;
                }
                page.text_of(segments.last()?).await?
            }
            Self::Css(selector) => text_of_first(page, Locator::Css(selector)).await?,
            Self::DivContaining(phrase) => {
                text_of_first(
                    page,
                    Locator::TagWithText {
                        tag: "div",
                        text: phrase,
                    },
                )
                .await?
            }
        };
        let text = clean_text(&text);
        (!text.is_empty()).then_some(text)
    }
}

/// One step of the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseRule {
    pub scope: LicenseScope,
    pub patterns: &'static [LicensePattern],
    /// Take the scope text as-is when no pattern matches
    pub verbatim_fallback: bool,
}

const BOTH: &[LicensePattern] = &[LicensePattern::Primary, LicensePattern::Fallback];

const fn heuristic(scope: LicenseScope) -> LicenseRule {
    LicenseRule {
        scope,
        patterns: BOTH,
        verbatim_fallback: false,
    }
}

/// The license cascade, most specific first
pub const LICENSE_RULES: &[LicenseRule] = &[
    LicenseRule {
        scope: LicenseScope::LabelledSegments(
            "div[data-testid='listing-permit-license-number'] span",
        ),
        patterns: BOTH,
        verbatim_fallback: true,
    },
    heuristic(LicenseScope::DivContaining("Permit number")),
    heuristic(LicenseScope::DivContaining("Dubai Tourism permit number")),
    heuristic(LicenseScope::DivContaining("Registration")),
    heuristic(LicenseScope::DivContaining("License")),
    heuristic(LicenseScope::DivContaining("Licence")),
    heuristic(LicenseScope::DivContaining("DTCM")),
    heuristic(LicenseScope::Css("section[aria-labelledby*='About this space']")),
    heuristic(LicenseScope::Css("div[data-section-id='DESCRIPTION_DEFAULT']")),
    heuristic(LicenseScope::Css("body")),
];

/// Apply a rule's patterns (then its verbatim fallback) to scope text
#[must_use]
pub fn apply_rule(rule: &LicenseRule, text: &str) -> Option<String> {
    rule.patterns
        .iter()
        .find_map(|pattern| pattern.find(text))
        .or_else(|| rule.verbatim_fallback.then(|| text.to_string()))
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
}

/// Primary then fallback pattern against free text, upper-cased
#[must_use]
pub fn match_license_text(text: &str) -> Option<String> {
    apply_rule(&heuristic(LicenseScope::Css("body")), text)
}

/// Run the cascade against a loaded detail page.
pub async fn classify_license<P: RenderPage>(page: &P) -> FieldResult {
    for (step, rule) in LICENSE_RULES.iter().enumerate() {
        let Some(text) = rule.scope.read(page).await else {
            continue;
        };
        if let Some(code) = apply_rule(rule, &text) {
            tracing::trace!(step, scope = ?rule.scope, %code, "license matched");
            return Ok(code);
        }
    }
    Err(ExtractionMiss::NoPatternMatch { field: FIELD })
}
