use personafill_protocols::{FieldKind, FieldSignals, NodeId, Rect};

use super::*;

fn field(label: &str, name: &str) -> CandidateField {
    CandidateField {
        node: NodeId(7),
        kind: FieldKind::Input {
            input_type: "text".to_string(),
        },
        signals: FieldSignals {
            label: label.to_string(),
            name: name.to_string(),
            ..FieldSignals::default()
        },
        is_empty: true,
        position: Rect::default(),
    }
}

fn matcher() -> Matcher {
    Matcher::new(&MatcherConfig::default()).unwrap()
}

fn profile() -> Profile {
    Profile::new("Work")
        .with(ProfileAttribute::FirstName, "Ada")
        .with(ProfileAttribute::LastName, "Lovelace")
        .with(ProfileAttribute::Email, "ada@example.com")
        .with(ProfileAttribute::Phone, "+44 20 7946 0000")
}

#[test]
fn test_pattern_tier_by_label() {
    let m = matcher().match_value(&field("Email Address", ""), &profile()).unwrap();
    assert_eq!(m.attribute, ProfileAttribute::Email);
    assert_eq!(m.value, "ada@example.com");
    assert_eq!(m.tier, MatchTier::Pattern);
}

#[test]
fn test_pattern_tier_skips_absent_attributes() {
    let profile = Profile::new("p").with(ProfileAttribute::Email, "a@b.com");
    // "first name" would match, but the profile has no first name.
    let field = field("First name", "contact_email");
    let m = matcher().match_value(&field, &profile).unwrap();
    assert_eq!(m.attribute, ProfileAttribute::Email);
    assert_eq!(m.tier, MatchTier::Pattern);
}

#[test]
fn test_pattern_beats_fallback() {
    // Fallback alone would choose the first name for this field.
    let m = matcher().match_value(&field("Surname", ""), &profile()).unwrap();
    assert_eq!(m.attribute, ProfileAttribute::LastName);
    assert_eq!(m.tier, MatchTier::Pattern);
}

#[test]
fn test_substring_tier() {
    let m = matcher().match_value(&field("Username", ""), &profile()).unwrap();
    assert_eq!(m.attribute, ProfileAttribute::FirstName);
    assert_eq!(m.tier, MatchTier::Substring);

    let m = matcher().match_value(&field("", "hometel"), &profile()).unwrap();
    assert_eq!(m.attribute, ProfileAttribute::Phone);
    assert_eq!(m.tier, MatchTier::Substring);
}

#[test]
fn test_substring_tier_checks_signals_independently() {
    // The combined text mentions "last", which blocks the name family; the
    // name signal on its own does not.
    let profile = Profile::new("p").with(ProfileAttribute::FirstName, "Ada");
    let m = matcher()
        .match_value(&field("Last visited", "nickname"), &profile)
        .unwrap();
    assert_eq!(m.attribute, ProfileAttribute::FirstName);
    assert_eq!(m.tier, MatchTier::Substring);
}

#[test]
fn test_fallback_defaults_to_first_name() {
    let m = matcher().match_value(&field("Comments", ""), &profile()).unwrap();
    assert_eq!(m.attribute, ProfileAttribute::FirstName);
    assert_eq!(m.tier, MatchTier::Fallback);
}

#[test]
fn test_fallback_picks_phone_for_number_fields() {
    let m = matcher().match_value(&field("Reference number", ""), &profile()).unwrap();
    assert_eq!(m.attribute, ProfileAttribute::Phone);
    assert_eq!(m.tier, MatchTier::Fallback);
}

#[test]
fn test_fallback_requires_name_or_phone() {
    let profile = Profile::new("p").with(ProfileAttribute::Company, "Analytical Engines");
    assert!(matcher().match_value(&field("Comments", ""), &profile).is_none());
}

#[test]
fn test_fallback_can_be_disabled() {
    let matcher = Matcher::new(&MatcherConfig { fallback: false }).unwrap();
    assert!(matcher.match_value(&field("Comments", ""), &profile()).is_none());
}

#[test]
fn test_contact_number_with_phone_only_profile() {
    let profile = Profile::new("p").with(ProfileAttribute::Phone, "555-0100");
    let m = matcher().match_value(&field("Contact Number", ""), &profile).unwrap();
    assert_eq!(m.value, "555-0100");
    assert_eq!(m.tier, MatchTier::Pattern);
}

#[test]
fn test_same_attribute_may_match_several_fields() {
    let matcher = matcher();
    let profile = profile();
    let first = matcher.match_value(&field("Email", ""), &profile).unwrap();
    let confirm = matcher.match_value(&field("Confirm email", ""), &profile).unwrap();
    assert_eq!(first.value, confirm.value);
}

#[test]
fn test_empty_profile_never_matches() {
    let profile = Profile::new("empty");
    assert!(matcher().match_value(&field("First name", "fname"), &profile).is_none());
}
