//! Analytics events
//!
//! Payload shapes for event and page-view tracking plus the sink they are
//! handed to. Delivery to a real analytics backend is outside this crate; the
//! default sink writes events to the log.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// A tracked interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event: String,
    pub category: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_parameters: Map<String, Value>,
}

impl AnalyticsEvent {
    pub fn new(
        event: impl Into<String>,
        category: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            category: category.into(),
            action: action.into(),
            label: None,
            value: None,
            custom_parameters: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_parameters.insert(key.into(), value.into());
        self
    }
}

/// A page view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl PageView {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
            referrer: None,
        }
    }
}

pub trait AnalyticsSink: Send + Sync {
    fn track_event(&self, event: AnalyticsEvent);
    fn track_page_view(&self, page_view: PageView);
}

/// Sink that emits each event as a structured log line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalyticsSink;

impl AnalyticsSink for TracingAnalyticsSink {
    fn track_event(&self, event: AnalyticsEvent) {
        let params = Value::Object(event.custom_parameters.clone());
        tracing::info!(
            target: "contentkit::analytics",
            event = %event.event,
            category = %event.category,
            action = %event.action,
            label = event.label.as_deref().unwrap_or(""),
            value = event.value,
            params = %params,
            "analytics event"
        );
    }

    fn track_page_view(&self, page_view: PageView) {
        tracing::info!(
            target: "contentkit::analytics",
            path = %page_view.path,
            title = page_view.title.as_deref().unwrap_or(""),
            "page view"
        );
    }
}

/// Sink that keeps events in memory
#[derive(Debug, Default)]
pub struct MemoryAnalyticsSink {
    events: Mutex<Vec<AnalyticsEvent>>,
    page_views: Mutex<Vec<PageView>>,
}

impl MemoryAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn page_views(&self) -> Vec<PageView> {
        self.page_views.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl AnalyticsSink for MemoryAnalyticsSink {
    fn track_event(&self, event: AnalyticsEvent) {
        self.events.lock().map(|mut e| e.push(event)).ok();
    }

    fn track_page_view(&self, page_view: PageView) {
        self.page_views.lock().map(|mut p| p.push(page_view)).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_payload_shape() {
        let event = AnalyticsEvent::new("cta_click", "engagement", "click")
            .with_label("hero")
            .with_value(1.0)
            .with_parameter("page", "home");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "cta_click",
                "category": "engagement",
                "action": "click",
                "label": "hero",
                "value": 1.0,
                "customParameters": {"page": "home"}
            })
        );
    }

    #[test]
    fn test_memory_sink_records() {
        let sink = MemoryAnalyticsSink::new();
        sink.track_event(AnalyticsEvent::new("e", "c", "a"));
        sink.track_page_view(PageView::new("/services"));
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.page_views()[0].path, "/services");
    }
}
