pub mod client;
pub mod models;

pub use client::{load, ChartLibrary, CORE_CHART_PACKAGE};
pub use models::{
    AxisOptions, Cell, ChartOptions, ColumnType, CurveType, DataTable, FocusTarget, Legend,
    LegendPosition,
};
