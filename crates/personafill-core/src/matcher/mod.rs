//! Attribute matcher.
//!
//! Pure: decides which profile value, if any, a candidate field should
//! receive by looking only at the field's text signals.

mod rules;

use std::fmt;

use personafill_config::MatcherConfig;
use personafill_protocols::{CandidateField, Profile, ProfileAttribute};
use tracing::debug;

pub use rules::{MatchRule, SUBSTRING_RULES, SubstringRule, pattern_rules};

/// The tier that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Pattern,
    Substring,
    Fallback,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchTier::Pattern => "pattern",
            MatchTier::Substring => "substring",
            MatchTier::Fallback => "fallback",
        })
    }
}

/// A profile value chosen for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedValue {
    pub attribute: ProfileAttribute,
    pub value: String,
    pub tier: MatchTier,
}

/// Tiered attribute matcher with compiled rules.
#[derive(Debug, Clone)]
pub struct Matcher {
    patterns: Vec<MatchRule>,
    fallback: bool,
}

impl Matcher {
    pub fn new(config: &MatcherConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: pattern_rules()?,
            fallback: config.fallback,
        })
    }

    /// Choose a value for `field`; the first tier with a match wins.
    pub fn match_value(&self, field: &CandidateField, profile: &Profile) -> Option<MatchedValue> {
        let search_text = field.search_text();
        let matched = self
            .pattern_tier(&search_text, profile)
            .or_else(|| substring_tier(field, &search_text, profile))
            .or_else(|| {
                self.fallback
                    .then(|| fallback_tier(&search_text, profile))
                    .flatten()
            });

        match &matched {
            Some(m) => debug!(
                field = %field.identifier(),
                attribute = %m.attribute,
                tier = %m.tier,
                "Matched field"
            ),
            None => debug!(field = %field.identifier(), "No profile attribute matched"),
        }
        matched
    }

    fn pattern_tier(&self, search_text: &str, profile: &Profile) -> Option<MatchedValue> {
        self.patterns.iter().find_map(|rule| {
            if !rule.is_match(search_text) {
                return None;
            }
            matched(profile, rule.attribute, MatchTier::Pattern)
        })
    }
}

fn matched(profile: &Profile, attribute: ProfileAttribute, tier: MatchTier) -> Option<MatchedValue> {
    profile.get(attribute).map(|value| MatchedValue {
        attribute,
        value: value.to_string(),
        tier,
    })
}

/// Whole search text first, then each signal on its own.
fn substring_tier(
    field: &CandidateField,
    search_text: &str,
    profile: &Profile,
) -> Option<MatchedValue> {
    let signals = field.signals.parts().map(|(_, text)| text.to_lowercase());
    std::iter::once(search_text.to_string())
        .chain(signals)
        .filter(|text| !text.trim().is_empty())
        .find_map(|text| {
            SUBSTRING_RULES
                .iter()
                .filter(|rule| rule.is_match(&text))
                .find_map(|rule| matched(profile, rule.attribute, MatchTier::Substring))
        })
}

/// Last resort when nothing names the field clearly.
fn fallback_tier(search_text: &str, profile: &Profile) -> Option<MatchedValue> {
    let has_first_name = profile.has(ProfileAttribute::FirstName);
    let has_phone = profile.has(ProfileAttribute::Phone);
    if !has_first_name && !has_phone {
        return None;
    }

    let mentions = |token: &str| search_text.contains(token);
    if has_first_name && !mentions("email") && !mentions("phone") && !mentions("number") {
        return matched(profile, ProfileAttribute::FirstName, MatchTier::Fallback);
    }
    if has_phone && (mentions("phone") || mentions("number") || mentions("contact")) {
        return matched(profile, ProfileAttribute::Phone, MatchTier::Fallback);
    }
    None
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
