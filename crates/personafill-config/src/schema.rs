//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub writer: WriterConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Field discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Ancestor levels searched for an enclosing question container.
    #[serde(default = "default_container_depth")]
    pub container_depth: usize,

    /// Ancestor levels searched for nearby label text.
    #[serde(default = "default_nearby_text_depth")]
    pub nearby_text_depth: usize,

    /// Ancestor levels searched by the line scan.
    #[serde(default = "default_ancestor_line_depth")]
    pub ancestor_line_depth: usize,

    /// Vertical distance under which two fields share a row.
    #[serde(default = "default_row_tolerance_px")]
    pub row_tolerance_px: f64,

    #[serde(default = "default_min_label_len")]
    pub min_label_len: usize,

    #[serde(default = "default_max_label_len")]
    pub max_label_len: usize,

    /// Extra phrases rejected as label text, matched case-insensitively.
    #[serde(default)]
    pub extra_boilerplate: Vec<String>,

    #[serde(default = "default_platforms")]
    pub platforms: Vec<PlatformProfile>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            container_depth: default_container_depth(),
            nearby_text_depth: default_nearby_text_depth(),
            ancestor_line_depth: default_ancestor_line_depth(),
            row_tolerance_px: default_row_tolerance_px(),
            min_label_len: default_min_label_len(),
            max_label_len: default_max_label_len(),
            extra_boilerplate: Vec::new(),
            platforms: default_platforms(),
        }
    }
}

fn default_container_depth() -> usize {
    20
}

fn default_nearby_text_depth() -> usize {
    15
}

fn default_ancestor_line_depth() -> usize {
    10
}

fn default_row_tolerance_px() -> f64 {
    10.0
}

fn default_min_label_len() -> usize {
    3
}

fn default_max_label_len() -> usize {
    99
}

fn default_platforms() -> Vec<PlatformProfile> {
    vec![PlatformProfile::google_forms()]
}

/// Markup signature and selectors of a dense form framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub name: String,

    /// URL substrings identifying the platform.
    #[serde(default)]
    pub url_patterns: Vec<String>,

    /// Structural fingerprint; any match identifies the platform.
    #[serde(default)]
    pub fingerprint: String,

    /// Question container elements.
    pub container_selector: String,

    /// Title selectors tried in order inside a container.
    #[serde(default)]
    pub title_selectors: Vec<String>,

    /// Input-capable descendants of a container.
    pub input_selector: String,

    /// Ancestors consulted when resolving a field label from its question.
    #[serde(default)]
    pub label_containers: Vec<String>,

    /// Selector groups tried in order when no container is found.
    #[serde(default)]
    pub fallback_selector_groups: Vec<String>,
}

impl PlatformProfile {
    /// Built-in Google Forms profile.
    pub fn google_forms() -> Self {
        let base = "freebirdFormviewerComponentsQuestion";
        Self {
            name: "google-forms".to_string(),
            url_patterns: vec!["docs.google.com/forms".to_string()],
            fingerprint: format!(".{base}BaseRoot, [data-params]"),
            container_selector: format!(".{base}BaseRoot"),
            title_selectors: vec![
                format!(".{base}BaseTitle"),
                format!(".{base}BaseTitleText"),
                "[data-params]".to_string(),
                "div[role=\"heading\"]".to_string(),
                "label".to_string(),
            ],
            input_selector:
                "input, textarea, select, [role=\"textbox\"], [contenteditable=\"true\"]"
                    .to_string(),
            label_containers: vec![
                format!(".{base}BaseRoot"),
                "[data-params]".to_string(),
                format!(".{base}BaseTitle"),
                format!(".{base}BaseHeader"),
                format!(".{base}BaseTitleText"),
            ],
            fallback_selector_groups: vec![
                format!(".{base}BaseTitle"),
                "[data-params]".to_string(),
                "input[type=\"text\"]".to_string(),
                "input[type=\"email\"]".to_string(),
                "input[type=\"tel\"]".to_string(),
                "input[type=\"url\"]".to_string(),
                "textarea".to_string(),
                "select".to_string(),
                format!(".{base}TextInput"),
                format!(".{base}TextShortInput"),
                format!(".{base}TextLongInput"),
                format!(".{base}EmailInput"),
                format!(".{base}PhoneInput"),
                "div[role=\"textbox\"]".to_string(),
                "div[contenteditable=\"true\"]".to_string(),
                "[data-test-id]".to_string(),
                "[aria-label]".to_string(),
                "[placeholder]".to_string(),
            ],
        }
    }
}

/// Attribute matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Enable the last-resort tier that guesses a name or phone.
    #[serde(default = "default_true")]
    pub fallback: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { fallback: true }
    }
}

fn default_true() -> bool {
    true
}

/// Write configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    #[serde(default = "default_true")]
    pub highlight: bool,

    #[serde(default = "default_highlight_background")]
    pub highlight_background: String,

    #[serde(default = "default_highlight_border")]
    pub highlight_border: String,

    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            highlight_background: default_highlight_background(),
            highlight_border: default_highlight_border(),
            highlight_ms: default_highlight_ms(),
        }
    }
}

fn default_highlight_background() -> String {
    "#d1fae5".to_string()
}

fn default_highlight_border() -> String {
    "2px solid #10b981".to_string()
}

fn default_highlight_ms() -> u64 {
    2000
}

/// Browser connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// DevTools HTTP endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Target id or URL substring of the page to fill.
    #[serde(default)]
    pub target: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            command_timeout_secs: default_command_timeout_secs(),
            target: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_command_timeout_secs() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write a daily rolling log file.
    #[serde(default = "default_true")]
    pub file: bool,

    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
            dir: default_log_dir(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "~/.personafill/logs".to_string()
}
