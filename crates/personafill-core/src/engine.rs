//! Fill engine.
//!
//! Drives one invocation: snapshot, discovery, matching, and a write per
//! matched empty field. Built once per host and reused; holds only compiled
//! configuration.

use personafill_config::Config;
use personafill_protocols::{
    CandidateField, FillReport, FillRequest, FillResponse, FilledField, FormPage, Highlight,
    PageError, Profile, SkippedField,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::discovery::Discovery;
use crate::dom::Document;
use crate::error::EngineError;
use crate::matcher::{MatchedValue, Matcher};
use crate::writer::plan_write;

pub struct FillEngine {
    discovery: Discovery,
    matcher: Matcher,
    highlight: Option<Highlight>,
}

/// One candidate as seen by [`FillEngine::inspect`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectedField {
    pub identifier: String,
    pub label: String,
    pub kind: String,
    pub is_empty: bool,
    pub top: f64,
    pub left: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

/// Discovery result without any writes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub url: String,
    pub strategy: String,
    pub fields: Vec<InspectedField>,
}

impl FillEngine {
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        let writer = &config.writer;
        let highlight = writer.highlight.then(|| Highlight {
            background: writer.highlight_background.clone(),
            border: writer.highlight_border.clone(),
            revert_after_ms: writer.highlight_ms,
        });
        Ok(Self {
            discovery: Discovery::new(&config.discovery)?,
            matcher: Matcher::new(&config.matcher)?,
            highlight,
        })
    }

    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Fill every empty, matched field on `page` from `profile`.
    ///
    /// Never fails: a snapshot or discovery failure becomes a failed report,
    /// and a failed write only skips its field.
    pub async fn fill(&self, page: &dyn FormPage, profile: &Profile) -> FillReport {
        let snapshot = match page.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Snapshot failed: {}", e);
                return FillReport::failed(e);
            }
        };
        let doc = match Document::from_snapshot(snapshot) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Rejected snapshot: {}", e);
                return FillReport::failed(e);
            }
        };
        let fields = match self.discovery.discover(&doc) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Discovery failed: {}", e);
                return FillReport::failed(e);
            }
        };

        let mut filled = Vec::new();
        let mut skipped = Vec::new();
        for field in &fields {
            let Some(matched) = self.matcher.match_value(field, profile) else {
                continue;
            };
            match self.write_field(page, &doc, field, &matched).await {
                Ok(()) => filled.push(FilledField {
                    identifier: field.identifier().to_string(),
                    value: matched.value,
                }),
                Err(reason) => skipped.push(SkippedField {
                    identifier: field.identifier().to_string(),
                    reason,
                }),
            }
        }

        let report = FillReport::completed(fields.len(), filled, skipped);
        info!(
            url = %doc.url(),
            profile = %profile.name,
            detected = report.detected_count,
            filled = report.filled_count,
            skipped = report.skipped.len(),
            "Form fill finished"
        );
        report
    }

    /// Write one matched value. The error is the reason the field was skipped.
    async fn write_field(
        &self,
        page: &dyn FormPage,
        doc: &Document,
        field: &CandidateField,
        matched: &MatchedValue,
    ) -> Result<(), String> {
        if !field.is_empty {
            debug!(field = %field.identifier(), "Field already has a value");
            return Err("field already has a value".to_string());
        }

        let plan = plan_write(doc, field, &matched.value)
            .map_err(|e| {
                warn!(field = %field.identifier(), "Cannot plan write: {}", e);
                e.to_string()
            })?
            .with_highlight(self.highlight.clone());

        // The page may have changed since the snapshot.
        match page.is_empty(field.node).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(field = %field.identifier(), "Field filled since snapshot");
                return Err("field was filled after the snapshot".to_string());
            }
            Err(e) => {
                warn!(field = %field.identifier(), "Emptiness check failed: {}", e);
                return Err(e.to_string());
            }
        }

        let receipt = page.apply(&plan).await.map_err(|e: PageError| {
            warn!(field = %field.identifier(), "Write failed: {}", e);
            e.to_string()
        })?;
        if !receipt.failed_events.is_empty() {
            warn!(
                field = %field.identifier(),
                events = ?receipt.failed_events,
                "Some events could not be dispatched"
            );
        }
        if matched.attribute.is_sensitive() {
            debug!(field = %field.identifier(), attribute = %matched.attribute, "Filled field");
        } else {
            debug!(
                field = %field.identifier(),
                attribute = %matched.attribute,
                value = %matched.value,
                "Filled field"
            );
        }
        Ok(())
    }

    /// Discover fields without writing anything. With a profile, each field
    /// also carries the attribute it would receive.
    pub async fn inspect(
        &self,
        page: &dyn FormPage,
        profile: Option<&Profile>,
    ) -> Result<Inspection, EngineError> {
        let snapshot = page.snapshot().await?;
        let doc = Document::from_snapshot(snapshot)?;
        let (fields, strategy) = self.discovery.discover_with_strategy(&doc)?;

        let fields = fields
            .iter()
            .map(|field| {
                let matched = profile.and_then(|p| self.matcher.match_value(field, p));
                InspectedField {
                    identifier: field.identifier().to_string(),
                    label: field.label().to_string(),
                    kind: field.kind.as_str().to_string(),
                    is_empty: field.is_empty,
                    top: field.position.top,
                    left: field.position.left,
                    attribute: matched.as_ref().map(|m| m.attribute.to_string()),
                    tier: matched.as_ref().map(|m| m.tier.to_string()),
                }
            })
            .collect();

        Ok(Inspection {
            url: doc.url().to_string(),
            strategy: strategy.to_string(),
            fields,
        })
    }

    /// Serve one host request.
    pub async fn handle(&self, page: &dyn FormPage, request: FillRequest) -> FillResponse {
        match request {
            FillRequest::FillForm { profile } => {
                FillResponse::Report(self.fill(page, &profile).await)
            }
            FillRequest::Ping => FillResponse::ready(),
        }
    }
}
