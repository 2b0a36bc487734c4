//! Bar-chart specifications handed to whatever renders them.
//!
//! A `ChartSpec` is plain data: a categorical x-axis, one numeric field on
//! the y-axis and an optional hover field.

use crate::types::Field;
use crate::view::Series;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: String,
    /// `None` renders as an empty bar.
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub y_field: Field,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_field: Option<Field>,
    pub bars: Vec<Bar>,
}

impl ChartSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, y_field: Field) -> Self {
        ChartSpec {
            id: id.into(),
            title: title.into(),
            x_title: String::new(),
            y_title: y_field.column().to_string(),
            y_field,
            hover_field: None,
            bars: Vec::new(),
        }
    }

    pub fn with_x_title(mut self, x_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self
    }

    pub fn with_y_title(mut self, y_title: impl Into<String>) -> Self {
        self.y_title = y_title.into();
        self
    }

    pub fn with_hover(mut self, field: Field) -> Self {
        self.hover_field = Some(field);
        self
    }

    /// Fill bars from `series`, one per row, in series order.
    pub fn with_series(mut self, series: &Series) -> Self {
        self.bars = series
            .rows
            .iter()
            .map(|row| Bar {
                x: row.label.clone(),
                y: row.record.get(self.y_field),
                hover: self.hover_field.and_then(|f| row.record.get(f)),
            })
            .collect();
        self
    }
}
