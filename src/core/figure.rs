//! Figures exchanged between example callbacks and graph components.
//!
//! A handler builds a `Figure`, serializes it into the property store, and the
//! graph renderer deserializes it back when drawing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::callbacks::CallbackError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl Figure {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn axes(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn bars(mut self, bars: impl IntoIterator<Item = (String, f64)>) -> Self {
        self.bars = bars
            .into_iter()
            .map(|(label, value)| Bar { label, value })
            .collect();
        self
    }

    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }

    pub fn to_value(&self) -> Result<Value, CallbackError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Reads a figure back from a property value. `None` for anything else.
    pub fn from_value(value: &Value) -> Option<Figure> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_figure_from_value() {
        let figure = Figure::new("Histogram")
            .axes("k", "P(X = k)")
            .bars([("0".to_string(), 0.25), ("1".to_string(), 0.75)]);
        let value = figure.to_value().unwrap();
        assert_eq!(value["bars"][1]["value"], json!(0.75));
        assert_eq!(Figure::from_value(&value), Some(figure));
    }

    #[test]
    fn test_from_value_rejects_non_figures() {
        assert_eq!(Figure::from_value(&Value::Null), None);
        assert_eq!(Figure::from_value(&json!("text")), None);
    }

    #[test]
    fn test_sparse_figure_parses() {
        let figure = Figure::from_value(&json!({ "title": "Empty" })).unwrap();
        assert!(figure.bars.is_empty());
        assert_eq!(figure.max_value(), 0.0);
    }
}
