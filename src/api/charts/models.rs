use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::utils::errors::ChartError;

/// Declared type of a DataTable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Datetime,
    Number,
}

impl ColumnType {
    fn as_str(self) -> &'static str {
        match self {
            ColumnType::Datetime => "datetime",
            ColumnType::Number => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub label: String,
}

/// A single typed value in a DataTable row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    DateTime(DateTime<Utc>),
    Number(f64),
}

impl Cell {
    fn column_type(&self) -> ColumnType {
        match self {
            Cell::DateTime(_) => ColumnType::Datetime,
            Cell::Number(_) => ColumnType::Number,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::DateTime(t) => Some(*t),
            Cell::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::DateTime(_) => None,
        }
    }

    /// Google DataTable literal value; months are zero-based in `Date(...)`
    fn to_json(self) -> Value {
        match self {
            Cell::DateTime(t) => json!(format!(
                "Date({},{},{},{},{},{})",
                t.year(),
                t.month0(),
                t.day(),
                t.hour(),
                t.minute(),
                t.second()
            )),
            Cell::Number(v) => json!(v),
        }
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::DateTime(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Column-typed table consumed by chart renderers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a column and return its index
    pub fn add_column(&mut self, column_type: ColumnType, label: impl Into<String>) -> usize {
        self.columns.push(Column {
            column_type,
            label: label.into(),
        });
        self.columns.len() - 1
    }

    /// Append a row; it must match the declared columns in width and type
    pub fn add_row(&mut self, row: Vec<Cell>) -> Result<(), ChartError> {
        if row.len() != self.columns.len() {
            return Err(ChartError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        for (index, (cell, column)) in row.iter().zip(&self.columns).enumerate() {
            if cell.column_type() != column.column_type {
                return Err(ChartError::ColumnType {
                    index,
                    label: column.label.clone(),
                    expected: column.column_type.as_str(),
                });
            }
        }

        self.rows.push(row);
        Ok(())
    }

    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = Vec<Cell>>) -> Result<(), ChartError> {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    /// Export in the Google Charts DataTable literal format
    pub fn to_json(&self) -> Value {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| json!({ "c": row.iter().map(|c| json!({ "v": c.to_json() })).collect::<Vec<_>>() }))
            .collect();

        json!({ "cols": self.columns, "rows": rows })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// Smoothed line through every sample
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    /// Below the plot area, one entry per series
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub position: LegendPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusTarget {
    /// Highlight every series at the hovered time
    Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Google-style date pattern such as `HH:mm`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Line chart rendering options, serialised with Google Charts option names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub title: String,
    pub curve_type: CurveType,
    pub legend: Legend,
    pub h_axis: AxisOptions,
    pub v_axis: AxisOptions,
    pub focus_target: FocusTarget,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn price_table() -> DataTable {
        let mut table = DataTable::new();
        table.add_column(ColumnType::Datetime, "Time");
        table.add_column(ColumnType::Number, "Steel");
        table
    }

    #[test]
    fn test_rejects_row_of_wrong_width() {
        let mut table = price_table();
        let err = table.add_row(vec![Cell::Number(1.0)]).unwrap_err();

        assert!(matches!(err, ChartError::RowWidth { expected: 2, actual: 1 }));
        assert_eq!(table.number_of_rows(), 0);
    }

    #[test]
    fn test_rejects_cell_of_wrong_type() {
        let mut table = price_table();
        let err = table.add_row(vec![Cell::Number(1.0), Cell::Number(2.0)]).unwrap_err();

        assert!(matches!(err, ChartError::ColumnType { index: 0, .. }));
    }

    #[test]
    fn test_json_literal_format() {
        let mut table = price_table();
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 9, 5, 0).unwrap();
        table.add_row(vec![t.into(), 110.25.into()]).unwrap();

        let value = table.to_json();
        assert_eq!(value["cols"][0]["type"], "datetime");
        assert_eq!(value["cols"][1]["label"], "Steel");
        assert_eq!(value["rows"][0]["c"][0]["v"], "Date(2024,0,15,9,5,0)");
        assert_eq!(value["rows"][0]["c"][1]["v"], 110.25);
    }

    #[test]
    fn test_options_use_google_names() {
        let options = ChartOptions {
            title: "Prices".to_string(),
            curve_type: CurveType::Function,
            legend: Legend { position: LegendPosition::Bottom },
            h_axis: AxisOptions { title: Some("Timestamp".into()), format: Some("HH:mm".into()) },
            v_axis: AxisOptions { title: Some("Price (USD)".into()), format: None },
            focus_target: FocusTarget::Category,
            height: 360,
            width: None,
        };

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["curveType"], "function");
        assert_eq!(value["legend"]["position"], "bottom");
        assert_eq!(value["hAxis"]["format"], "HH:mm");
        assert_eq!(value["focusTarget"], "category");
        assert!(value["vAxis"].get("format").is_none());
        assert!(value.get("width").is_none());
    }
}
