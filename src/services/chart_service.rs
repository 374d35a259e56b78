use tracing::{debug, info, warn};

use crate::api::charts::{
    AxisOptions, Cell, ChartLibrary, ChartOptions, ColumnType, CurveType, DataTable, FocusTarget,
    Legend, LegendPosition,
};
use crate::models::PriceSeries;
use crate::utils::errors::ChartError;
use crate::utils::page::Document;

/// Id of the region the price chart is drawn into
pub const CHART_REGION_ID: &str = "chart1";

/// What a presenter call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// The target region was not on the page; nothing was built or drawn
    RegionMissing,
}

/// Fixed line chart options for the goods pricing chart
pub fn chart_options() -> ChartOptions {
    ChartOptions {
        title: "Random Goods Pricing".to_string(),
        curve_type: CurveType::Function,
        legend: Legend {
            position: LegendPosition::Bottom,
        },
        h_axis: AxisOptions {
            title: Some("Timestamp".to_string()),
            format: Some("HH:mm".to_string()),
        },
        v_axis: AxisOptions {
            title: Some("Price (USD)".to_string()),
            format: None,
        },
        focus_target: FocusTarget::Category,
        height: 360,
        width: None,
    }
}

/// Shape a series into a `Time` column plus one numeric column per good
pub fn build_data_table<C: ChartLibrary>(
    charts: &C,
    series: &PriceSeries,
) -> Result<DataTable, ChartError> {
    let mut table = charts.data_table();
    table.add_column(ColumnType::Datetime, "Time");
    for good in series.goods() {
        table.add_column(ColumnType::Number, good.as_str());
    }

    table.add_rows(series.points().iter().map(|point| {
        let mut row = Vec::with_capacity(point.prices.len() + 1);
        row.push(Cell::DateTime(point.timestamp));
        row.extend(point.prices.iter().map(|&p| Cell::Number(p)));
        row
    }))?;

    Ok(table)
}

/// Draw `series` as a line chart into the `chart1` region of `document`.
///
/// A missing region is not an error: the call logs a warning and returns
/// `RenderOutcome::RegionMissing` without touching the chart library.
/// Failures inside the chart library are returned as-is.
pub fn draw_chart<C: ChartLibrary>(
    series: &PriceSeries,
    document: &mut Document,
    charts: &C,
) -> Result<RenderOutcome, ChartError> {
    let Some(region) = document.element_mut(CHART_REGION_ID) else {
        warn!("Display region #{} not found, skipping chart", CHART_REGION_ID);
        return Ok(RenderOutcome::RegionMissing);
    };

    let table = build_data_table(charts, series)?;
    debug!("Chart data table: {}", table.to_json());

    charts.draw_line_chart(region, &table, &chart_options())?;
    info!(
        "Rendered {} points for {} goods into #{} ({} bytes)",
        table.number_of_rows(),
        series.goods().len(),
        CHART_REGION_ID,
        region.content().len()
    );

    Ok(RenderOutcome::Rendered)
}
