use personafill_config::{DiscoveryConfig, PlatformProfile};
use personafill_protocols::{
    ComputedStyle, PageSnapshot, Rect, SnapshotBuilder, SnapshotNode,
};

use super::*;

const GOOGLE_FORM_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQL/viewform";
const ROOT: &str = "freebirdFormviewerComponentsQuestionBaseRoot";
const TITLE: &str = "freebirdFormviewerComponentsQuestionBaseTitle";

fn discovery() -> Discovery {
    Discovery::new(&DiscoveryConfig::default()).unwrap()
}

fn discover(builder: SnapshotBuilder) -> Vec<CandidateField> {
    let doc = Document::from_snapshot(builder.build()).unwrap();
    discovery().discover(&doc).unwrap()
}

fn input(name: &str) -> SnapshotNode {
    SnapshotNode::element("input").with_attr("name", name)
}

fn labels(fields: &[CandidateField]) -> Vec<&str> {
    fields.iter().map(|f| f.label()).collect()
}

#[test]
fn test_generic_strategy_selects_text_capable_elements() {
    let mut b = PageSnapshot::builder("https://example.com/apply");
    let body = b.body();
    let text = b.push(body, input("first_name").with_attr("type", "text"));
    let email = b.push(body, input("email").with_attr("type", "EMAIL"));
    b.push(body, input("agree").with_attr("type", "checkbox"));
    b.push(body, input("token").with_attr("type", "hidden"));
    b.push(body, input("secret").with_attr("type", "password"));
    let bio = b.push(body, SnapshotNode::element("textarea").with_attr("name", "bio"));
    let country = b.push(body, SnapshotNode::element("select").with_attr("name", "country"));
    let notes = b.push(
        body,
        SnapshotNode::element("div")
            .with_attr("contenteditable", "true")
            .with_attr("aria-label", "Notes"),
    );

    let fields = discover(b);
    let nodes: Vec<NodeId> = fields.iter().map(|f| f.node).collect();
    assert_eq!(nodes, vec![text, email, bio, country, notes]);
    assert_eq!(
        fields[1].kind,
        FieldKind::Input {
            input_type: "email".to_string()
        }
    );
    assert_eq!(fields[4].kind, FieldKind::Editable);
}

#[test]
fn test_missing_type_counts_as_text() {
    let mut b = PageSnapshot::builder("https://example.com");
    b.push(b.body(), input("email"));
    let fields = discover(b);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].kind.as_str(), "text");
    assert_eq!(fields[0].identifier(), "email");
}

#[test]
fn test_invisible_disabled_and_readonly_are_dropped() {
    let mut b = PageSnapshot::builder("https://example.com");
    let body = b.body();
    b.push(
        body,
        input("hidden").with_style(ComputedStyle {
            display: "none".to_string(),
            ..ComputedStyle::default()
        }),
    );
    b.push(body, input("zero").with_rect(Rect::new(10.0, 10.0, 0.0, 0.0)));
    b.push(body, input("off").disabled());
    b.push(body, input("locked").with_attr("readonly", ""));
    let kept = b.push(body, input("email").with_rect(Rect::new(10.0, 10.0, 100.0, 20.0)));

    let fields = discover(b);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].node, kept);
}

#[test]
fn test_field_without_any_signal_is_excluded() {
    let mut b = PageSnapshot::builder("https://example.com");
    b.push(b.body(), SnapshotNode::element("input"));
    assert!(discover(b).is_empty());
}

#[test]
fn test_emptiness_is_recorded_not_filtered() {
    let mut b = PageSnapshot::builder("https://example.com");
    b.push(b.body(), input("email").with_value("x@y.com"));
    b.push(b.body(), input("phone"));
    let fields = discover(b);
    assert_eq!(fields.len(), 2);
    assert!(!fields[0].is_empty);
    assert!(fields[1].is_empty);
}

#[test]
fn test_label_from_aria_labelledby() {
    let mut b = PageSnapshot::builder("https://example.com");
    let body = b.body();
    let placeholder = b.push(body, SnapshotNode::element("span").with_attr("id", "hint"));
    b.push_text(placeholder, "Your answer");
    let question = b.push(body, SnapshotNode::element("span").with_attr("id", "q1"));
    b.push_text(question, "Preferred contact address");
    b.push(
        body,
        SnapshotNode::element("input").with_attr("aria-labelledby", "missing hint q1"),
    );

    let fields = discover(b);
    assert_eq!(labels(&fields), vec!["Preferred contact address"]);
}

/// A platform that never matches a page but still supplies question containers.
fn survey_config() -> DiscoveryConfig {
    let mut config = DiscoveryConfig::default();
    config.platforms = vec![PlatformProfile {
        name: "survey".to_string(),
        url_patterns: vec!["survey.invalid".to_string()],
        fingerprint: String::new(),
        container_selector: ".never-rendered".to_string(),
        title_selectors: vec![".title".to_string()],
        input_selector: "input".to_string(),
        label_containers: vec![".question".to_string()],
        fallback_selector_groups: vec![],
    }];
    config
}

#[test]
fn test_label_from_question_container() {
    let discovery = Discovery::new(&survey_config()).unwrap();

    let mut b = PageSnapshot::builder("https://example.com");
    let question = b.push(b.body(), SnapshotNode::element("div").with_attr("class", "question"));
    let title = b.push(question, SnapshotNode::element("div").with_attr("class", "title"));
    b.push_text(title, "Years at current employer");
    let inner = b.push(question, SnapshotNode::element("div"));
    b.push(inner, SnapshotNode::element("input").with_attr("aria-label", "ignored"));
    let doc = Document::from_snapshot(b.build()).unwrap();

    let (fields, strategy) = discovery.discover_with_strategy(&doc).unwrap();
    assert_eq!(strategy, Strategy::Generic);
    assert_eq!(labels(&fields), vec!["Years at current employer"]);
}

#[test]
fn test_label_from_nearby_keyword_text() {
    let mut b = PageSnapshot::builder("https://example.com");
    let group = b.push(b.body(), SnapshotNode::element("div"));
    let required = b.push(group, SnapshotNode::element("p"));
    b.push_text(required, "Required");
    let caption = b.push(group, SnapshotNode::element("p"));
    b.push_text(caption, "FIRST NAME");
    let wrapper = b.push(group, SnapshotNode::element("div"));
    b.push(wrapper, SnapshotNode::element("input").with_attr("placeholder", "Jane"));

    assert_eq!(labels(&discover(b)), vec!["FIRST NAME"]);
}

#[test]
fn test_label_from_native_label_element() {
    let mut b = PageSnapshot::builder("https://example.com");
    let body = b.body();
    let label = b.push(body, SnapshotNode::element("label").with_attr("for", "zip"));
    b.push_text(label, "Zip code");
    b.push(body, SnapshotNode::element("input").with_attr("id", "zip"));
    let wrapping = b.push(body, SnapshotNode::element("label"));
    b.push_text(wrapping, "Postal town ");
    b.push(wrapping, SnapshotNode::element("input").with_attr("id", "town"));

    assert_eq!(labels(&discover(b)), vec!["Zip code", "Postal town"]);
}

#[test]
fn test_flat_form_native_labels_win_over_nearby_text() {
    let mut b = PageSnapshot::builder("https://example.com");
    let form = b.push(b.body(), SnapshotNode::element("form"));
    let email = b.push(form, SnapshotNode::element("label").with_attr("for", "email"));
    b.push_text(email, "Email");
    b.push(form, input("email").with_attr("id", "email"));
    let phone = b.push(form, SnapshotNode::element("label").with_attr("for", "phone"));
    b.push_text(phone, "Phone");
    b.push(form, input("phone").with_attr("type", "tel").with_attr("id", "phone"));

    assert_eq!(labels(&discover(b)), vec!["Email", "Phone"]);
}

#[test]
fn test_nearby_text_skips_labels_of_other_controls() {
    let mut b = PageSnapshot::builder("https://example.com");
    let form = b.push(b.body(), SnapshotNode::element("form"));
    let email = b.push(form, SnapshotNode::element("label").with_attr("for", "email"));
    b.push_text(email, "Email");
    b.push(form, input("email").with_attr("id", "email"));
    let wrapping = b.push(form, SnapshotNode::element("label"));
    b.push_text(wrapping, "Full name ");
    b.push(wrapping, input("full_name"));
    let caption = b.push(form, SnapshotNode::element("span"));
    b.push_text(caption, "Phone number");
    b.push(form, input("contact").with_attr("type", "tel"));

    assert_eq!(labels(&discover(b)), vec!["Email", "Full name", "Phone number"]);
}

#[test]
fn test_label_from_aria_label_then_placeholder() {
    let mut b = PageSnapshot::builder("https://example.com");
    let body = b.body();
    b.push(body, SnapshotNode::element("input").with_attr("aria-label", "Company"));
    b.push(
        body,
        SnapshotNode::element("input")
            .with_attr("aria-label", "Your answer")
            .with_attr("placeholder", "City"),
    );

    assert_eq!(labels(&discover(b)), vec!["Company", "City"]);
}

#[test]
fn test_label_from_ancestor_lines() {
    let mut b = PageSnapshot::builder("https://example.com");
    let group = b.push(b.body(), SnapshotNode::element("div"));
    let star = b.push(group, SnapshotNode::element("div"));
    b.push_text(star, "*");
    let caption = b.push(group, SnapshotNode::element("div"));
    b.push_text(caption, "Comments");
    let flag = b.push(group, SnapshotNode::element("div"));
    b.push_text(flag, "Required");
    b.push(group, SnapshotNode::element("textarea"));

    assert_eq!(labels(&discover(b)), vec!["Comments"]);
}

/// A field nested `levels` deep below an outer element that holds a caption,
/// so the caption sits in the field's `levels`-th ancestor.
fn nested_field(
    b: &mut SnapshotBuilder,
    levels: usize,
    outer: SnapshotNode,
    caption: SnapshotNode,
    text: &str,
) -> NodeId {
    let body = b.body();
    let outer = b.push(body, outer);
    let heading = b.push(outer, caption);
    b.push_text(heading, text);
    let mut parent = outer;
    for _ in 1..levels {
        parent = b.push(parent, SnapshotNode::element("div"));
    }
    b.push(parent, input("answer"))
}

fn label_at_depth(
    discovery: &Discovery,
    levels: usize,
    outer: SnapshotNode,
    caption: SnapshotNode,
    text: &str,
) -> String {
    let mut b = PageSnapshot::builder("https://example.com");
    let field = nested_field(&mut b, levels, outer, caption, text);
    let doc = Document::from_snapshot(b.build()).unwrap();
    let fields = discovery.discover(&doc).unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].node, field);
    fields[0].label().to_string()
}

#[test]
fn test_question_container_depth_bound() {
    let config = survey_config();
    let depth = config.container_depth;
    let discovery = Discovery::new(&config).unwrap();
    let container = || SnapshotNode::element("div").with_attr("class", "question");
    let title = || SnapshotNode::element("div").with_attr("class", "title");

    let question = "Years at current employer";

    let found = label_at_depth(&discovery, depth, container(), title(), question);
    assert_eq!(found, question);
    let missed = label_at_depth(&discovery, depth + 1, container(), title(), question);
    assert_eq!(missed, "");
}

#[test]
fn test_nearby_text_depth_bound() {
    let discovery = discovery();
    let depth = DiscoveryConfig::default().nearby_text_depth;
    let div = || SnapshotNode::element("div");
    let span = || SnapshotNode::element("span");

    let found = label_at_depth(&discovery, depth, div(), span(), "Email address");
    assert_eq!(found, "Email address");
    let missed = label_at_depth(&discovery, depth + 1, div(), span(), "Email address");
    assert_eq!(missed, "");
}

#[test]
fn test_ancestor_line_depth_bound() {
    let discovery = discovery();
    let depth = DiscoveryConfig::default().ancestor_line_depth;
    let div = || SnapshotNode::element("div");
    let span = || SnapshotNode::element("span");

    let found = label_at_depth(&discovery, depth, div(), span(), "Comments");
    assert_eq!(found, "Comments");
    let missed = label_at_depth(&discovery, depth + 1, div(), span(), "Comments");
    assert_eq!(missed, "");
}

fn google_question(b: &mut SnapshotBuilder, parent: NodeId, title: &str, top: f64) -> NodeId {
    let root = b.push(parent, SnapshotNode::element("div").with_attr("class", ROOT));
    let heading = b.push(root, SnapshotNode::element("div").with_attr("class", TITLE));
    b.push_text(heading, title);
    b.push(
        root,
        SnapshotNode::element("input")
            .with_attr("type", "hidden")
            .with_style(ComputedStyle {
                display: "none".to_string(),
                ..ComputedStyle::default()
            }),
    );
    b.push(
        root,
        SnapshotNode::element("input")
            .with_attr("type", "text")
            .with_attr("aria-labelledby", "unused")
            .with_rect(Rect::new(top, 40.0, 300.0, 24.0)),
    )
}

#[test]
fn test_google_forms_container_strategy() {
    let mut b = PageSnapshot::builder(GOOGLE_FORM_URL);
    let body = b.body();
    let phone = google_question(&mut b, body, "Phone number", 400.0);
    let name = google_question(&mut b, body, "FIRST NAME", 120.0);
    let doc = Document::from_snapshot(b.build()).unwrap();

    let (fields, strategy) = discovery().discover_with_strategy(&doc).unwrap();
    assert_eq!(strategy, Strategy::PlatformContainers);
    assert_eq!(fields.iter().map(|f| f.node).collect::<Vec<_>>(), vec![name, phone]);
    assert_eq!(labels(&fields), vec!["FIRST NAME", "Phone number"]);
}

#[test]
fn test_nested_containers_are_deduplicated() {
    let mut b = PageSnapshot::builder(GOOGLE_FORM_URL);
    let outer = b.push(b.body(), SnapshotNode::element("div").with_attr("class", ROOT));
    let heading = b.push(outer, SnapshotNode::element("div").with_attr("class", TITLE));
    b.push_text(heading, "Email");
    google_question(&mut b, outer, "Email", 10.0);

    let fields = discover(b);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].label(), "Email");
}

#[test]
fn test_google_forms_fallback_groups_stop_at_first_hit() {
    let mut b = PageSnapshot::builder(GOOGLE_FORM_URL);
    let body = b.body();
    b.push(
        body,
        SnapshotNode::element("div")
            .with_attr("role", "textbox")
            .with_attr("aria-label", "Email"),
    );
    let text = b.push(
        body,
        SnapshotNode::element("input")
            .with_attr("type", "text")
            .with_attr("aria-label", "Full name"),
    );
    let doc = Document::from_snapshot(b.build()).unwrap();

    let (fields, strategy) = discovery().discover_with_strategy(&doc).unwrap();
    assert_eq!(strategy, Strategy::PlatformFallback);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].node, text);
}

#[test]
fn test_platform_without_candidates_falls_back_to_generic() {
    let mut b = PageSnapshot::builder(GOOGLE_FORM_URL);
    b.push(b.body(), input("email"));
    let doc = Document::from_snapshot(b.build()).unwrap();

    let (fields, strategy) = discovery().discover_with_strategy(&doc).unwrap();
    assert_eq!(strategy, Strategy::Generic);
    assert_eq!(fields.len(), 1);
}

#[test]
fn test_results_follow_reading_order() {
    let mut b = PageSnapshot::builder("https://example.com");
    let body = b.body();
    let bottom = b.push(body, input("city").with_rect(Rect::new(200.0, 0.0, 100.0, 20.0)));
    let right = b.push(body, input("last").with_rect(Rect::new(52.0, 300.0, 100.0, 20.0)));
    let left = b.push(body, input("first").with_rect(Rect::new(50.0, 10.0, 100.0, 20.0)));

    let nodes: Vec<NodeId> = discover(b).iter().map(|f| f.node).collect();
    assert_eq!(nodes, vec![left, right, bottom]);
}

#[test]
fn test_empty_snapshot_is_an_error() {
    let doc = Document::from_snapshot(PageSnapshot::default()).unwrap();
    assert!(discovery().discover(&doc).is_err());
}

#[test]
fn test_invalid_platform_selector_is_rejected() {
    let mut config = DiscoveryConfig::default();
    config.platforms[0].container_selector = "div[".to_string();
    assert!(matches!(
        Discovery::new(&config),
        Err(DiscoveryError::Selector { .. })
    ));
}
