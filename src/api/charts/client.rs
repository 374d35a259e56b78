use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use tokio::sync::oneshot;
use tracing::debug;

use super::models::{ChartOptions, ColumnType, CurveType, DataTable, LegendPosition};
use crate::utils::errors::ChartError;
use crate::utils::page::Element;

/// Package providing line charts
pub const CORE_CHART_PACKAGE: &str = "corechart";

const SUPPORTED_PACKAGES: [&str; 1] = [CORE_CHART_PACKAGE];

/// Google Charts default series colours
const SERIES_PALETTE: [RGBColor; 7] = [
    RGBColor(0x33, 0x66, 0xcc),
    RGBColor(0xdc, 0x39, 0x12),
    RGBColor(0xff, 0x99, 0x00),
    RGBColor(0x10, 0x96, 0x18),
    RGBColor(0x99, 0x00, 0x99),
    RGBColor(0x00, 0x99, 0xc6),
    RGBColor(0xdd, 0x44, 0x77),
];

/// Interpolated samples per segment when smoothing
const SMOOTHING_STEPS: usize = 12;

/// Height of the strip under the plot that holds a bottom legend
const LEGEND_HEIGHT: u32 = 32;
const LEGEND_FONT_SIZE: u32 = 14;
const LEGEND_SWATCH: i32 = 20;
const LEGEND_GAP: i32 = 24;

/// A loaded charting capability that can build tables and draw into regions
pub trait ChartLibrary {
    /// Empty table ready for column declarations
    fn data_table(&self) -> DataTable;

    /// Draw `table` as a line chart into `region`, replacing its content
    fn draw_line_chart(
        &self,
        region: &mut Element,
        table: &DataTable,
        options: &ChartOptions,
    ) -> Result<(), ChartError>;
}

/// Load the requested packages in the background and resolve once they are ready
pub async fn load(packages: &[&str]) -> Result<PlottersCharts, ChartError> {
    let requested: Vec<String> = packages.iter().map(|p| p.to_string()).collect();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = ready_tx.send(PlottersCharts::initialize(requested));
    });

    wait_ready(ready_rx).await
}

/// Resolve with the loader's result; a dropped sender means loading never finished
async fn wait_ready(
    ready_rx: oneshot::Receiver<Result<PlottersCharts, ChartError>>,
) -> Result<PlottersCharts, ChartError> {
    ready_rx.await.map_err(|_| ChartError::LoadInterrupted)?
}

/// SVG line charts drawn with plotters
#[derive(Debug, Clone)]
pub struct PlottersCharts {
    packages: Vec<String>,
    default_width: u32,
}

impl PlottersCharts {
    const DEFAULT_WIDTH: u32 = 900;

    fn initialize(packages: Vec<String>) -> Result<Self, ChartError> {
        for package in &packages {
            if !SUPPORTED_PACKAGES.contains(&package.as_str()) {
                return Err(ChartError::UnknownPackage(package.clone()));
            }
        }
        debug!("Chart packages ready: {:?}", packages);

        Ok(Self {
            packages,
            default_width: Self::DEFAULT_WIDTH,
        })
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }
}

impl ChartLibrary for PlottersCharts {
    fn data_table(&self) -> DataTable {
        DataTable::new()
    }

    fn draw_line_chart(
        &self,
        region: &mut Element,
        table: &DataTable,
        options: &ChartOptions,
    ) -> Result<(), ChartError> {
        let plot = LinePlot::from_table(table)?;
        let paths: Vec<Vec<(DateTime<Utc>, f64)>> = plot
            .lines
            .iter()
            .map(|(_, values)| match options.curve_type {
                CurveType::Function => smooth_path(&plot.times, values, SMOOTHING_STEPS),
            })
            .collect();

        // Find price range
        let min_price = paths.iter().flatten().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_price = paths.iter().flatten().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let price_range = (max_price - min_price).max(1e-8);
        let padding = price_range * 0.1;
        let y_min = (min_price - padding).max(0.0);
        let y_max = max_price + padding;

        let (x_min, x_max) = time_bounds(&plot.times);
        let time_format = options
            .h_axis
            .format
            .as_deref()
            .map(strftime_pattern)
            .unwrap_or_else(|| "%H:%M".to_string());
        let width = options.width.unwrap_or(self.default_width);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, options.height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let (plot_area, legend_area) = match options.legend.position {
                LegendPosition::Bottom => {
                    root.split_vertically(options.height.saturating_sub(LEGEND_HEIGHT))
                }
            };

            let mut chart = ChartBuilder::on(&plot_area)
                .caption(&options.title, ("sans-serif", 20).into_font())
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(render_error)?;

            let x_formatter = |t: &DateTime<Utc>| t.format(&time_format).to_string();
            {
                let mut mesh = chart.configure_mesh();
                if let Some(title) = &options.h_axis.title {
                    mesh.x_desc(title);
                }
                if let Some(title) = &options.v_axis.title {
                    mesh.y_desc(title);
                }
                mesh.x_label_formatter(&x_formatter)
                    .draw()
                    .map_err(render_error)?;
            }

            for (i, path) in paths.into_iter().enumerate() {
                let color = SERIES_PALETTE[i % SERIES_PALETTE.len()];
                chart
                    .draw_series(LineSeries::new(path, color.stroke_width(2)))
                    .map_err(render_error)?;
            }

            let labels: Vec<&str> = plot.lines.iter().map(|(label, _)| label.as_str()).collect();
            let middle = (LEGEND_HEIGHT / 2) as i32;
            for (i, (label, x)) in labels.iter().zip(legend_layout(&labels, width)).enumerate() {
                let color = SERIES_PALETTE[i % SERIES_PALETTE.len()];
                legend_area
                    .draw(&PathElement::new(
                        vec![(x, middle), (x + LEGEND_SWATCH, middle)],
                        color.stroke_width(2),
                    ))
                    .map_err(render_error)?;
                legend_area
                    .draw(&Text::new(
                        *label,
                        (x + LEGEND_SWATCH + 6, middle - LEGEND_FONT_SIZE as i32 / 2),
                        ("sans-serif", LEGEND_FONT_SIZE).into_font(),
                    ))
                    .map_err(render_error)?;
            }

            root.present().map_err(render_error)?;
        }

        debug!("Drew {} lines into #{} ({} bytes)", plot.lines.len(), region.id(), svg.len());
        region.set_content(svg);
        Ok(())
    }
}

/// Domain column plus one labelled value list per numeric column
struct LinePlot {
    times: Vec<DateTime<Utc>>,
    lines: Vec<(String, Vec<f64>)>,
}

impl LinePlot {
    fn from_table(table: &DataTable) -> Result<Self, ChartError> {
        match table.columns().first() {
            Some(column) if column.column_type == ColumnType::Datetime => {}
            _ => return Err(ChartError::MissingDomainColumn),
        }
        if table.number_of_rows() == 0 || table.number_of_columns() < 2 {
            return Err(ChartError::EmptyTable);
        }

        let times = table
            .rows()
            .iter()
            .map(|row| row[0].as_datetime().ok_or(ChartError::MissingDomainColumn))
            .collect::<Result<Vec<_>, _>>()?;

        let mut lines = Vec::new();
        for (index, column) in table.columns().iter().enumerate().skip(1) {
            let values = table
                .rows()
                .iter()
                .map(|row| {
                    row[index].as_number().ok_or_else(|| ChartError::ColumnType {
                        index,
                        label: column.label.clone(),
                        expected: "number",
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            lines.push((column.label.clone(), values));
        }

        Ok(LinePlot { times, lines })
    }
}

fn render_error<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Earliest and latest time, widened when there is a single sample
fn time_bounds(times: &[DateTime<Utc>]) -> (DateTime<Utc>, DateTime<Utc>) {
    let x_min = times.iter().copied().min().unwrap_or_else(Utc::now);
    let x_max = times.iter().copied().max().unwrap_or(x_min);
    if x_min == x_max {
        (x_min - Duration::minutes(30), x_max + Duration::minutes(30))
    } else {
        (x_min, x_max)
    }
}

/// Left edge of each legend entry, laid out in one centred row.
/// Label widths are estimated from the character count.
fn legend_layout(labels: &[&str], width: u32) -> Vec<i32> {
    let entry_widths: Vec<i32> = labels
        .iter()
        .map(|label| LEGEND_SWATCH + 6 + label.chars().count() as i32 * (LEGEND_FONT_SIZE as i32 / 2))
        .collect();
    let total: i32 = entry_widths.iter().sum::<i32>() + LEGEND_GAP * (labels.len() as i32 - 1).max(0);

    let mut x = ((width as i32 - total) / 2).max(0);
    entry_widths
        .iter()
        .map(|entry| {
            let left = x;
            x += entry + LEGEND_GAP;
            left
        })
        .collect()
}

/// Catmull-Rom interpolation of `values` over `times`, passing through every sample.
/// Time advances linearly inside each segment so the path stays ordered.
pub(crate) fn smooth_path(
    times: &[DateTime<Utc>],
    values: &[f64],
    steps: usize,
) -> Vec<(DateTime<Utc>, f64)> {
    let n = values.len().min(times.len());
    if n < 3 || steps < 2 {
        return times.iter().copied().zip(values.iter().copied()).take(n).collect();
    }

    let mut path = Vec::with_capacity((n - 1) * steps + 1);
    for i in 0..n - 1 {
        let p0 = values[i.saturating_sub(1)];
        let p1 = values[i];
        let p2 = values[i + 1];
        let p3 = values[(i + 2).min(n - 1)];
        let span_ms = (times[i + 1] - times[i]).num_milliseconds() as f64;

        for step in 0..steps {
            let t = step as f64 / steps as f64;
            let offset = Duration::milliseconds((span_ms * t).round() as i64);
            path.push((times[i] + offset, catmull_rom(p0, p1, p2, p3, t)));
        }
    }
    path.push((times[n - 1], values[n - 1]));
    path
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Translate a Google-style date pattern (`HH:mm`, `dd MMM yyyy`) to strftime
pub(crate) fn strftime_pattern(pattern: &str) -> String {
    const TOKENS: [(&str, &str); 11] = [
        ("yyyy", "%Y"),
        ("MMM", "%b"),
        ("yy", "%y"),
        ("MM", "%m"),
        ("dd", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("a", "%p"),
        ("%", "%%"),
    ];

    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    'outer: while let Some(c) = rest.chars().next() {
        for (token, replacement) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::charts::models::{AxisOptions, Cell, FocusTarget, Legend};
    use chrono::TimeZone;

    fn hours(n: u32) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|h| Utc.with_ymd_and_hms(2024, 5, 2, h, 0, 0).unwrap())
            .collect()
    }

    fn options() -> ChartOptions {
        ChartOptions {
            title: "Prices".to_string(),
            curve_type: CurveType::Function,
            legend: Legend { position: LegendPosition::Bottom },
            h_axis: AxisOptions { title: Some("Timestamp".into()), format: Some("HH:mm".into()) },
            v_axis: AxisOptions { title: Some("Price (USD)".into()), format: None },
            focus_target: FocusTarget::Category,
            height: 360,
            width: None,
        }
    }

    #[tokio::test]
    async fn test_load_core_chart() {
        let charts = load(&[CORE_CHART_PACKAGE]).await.expect("load failed");
        assert_eq!(charts.packages(), &["corechart"]);
    }

    #[tokio::test]
    async fn test_dropped_loader_reports_interrupted() {
        let (ready_tx, ready_rx) = oneshot::channel();
        drop(ready_tx);

        let err = wait_ready(ready_rx).await.unwrap_err();
        assert!(matches!(err, ChartError::LoadInterrupted));
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_package() {
        let err = load(&["corechart", "geochart"]).await.unwrap_err();
        assert!(matches!(err, ChartError::UnknownPackage(ref p) if p == "geochart"));
    }

    #[test]
    fn test_smooth_path_passes_through_samples() {
        let times = hours(4);
        let values = [10.0, 14.0, 9.0, 12.0];
        let path = smooth_path(&times, &values, 4);

        assert_eq!(path.len(), 3 * 4 + 1);
        for (i, (t, v)) in times.iter().zip(values).enumerate() {
            assert_eq!(path[i * 4], (*t, v));
        }
        assert!(path.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_smooth_path_short_series_is_linear() {
        let times = hours(2);
        let path = smooth_path(&times, &[1.0, 2.0], 8);
        assert_eq!(path, vec![(times[0], 1.0), (times[1], 2.0)]);
    }

    #[test]
    fn test_strftime_pattern() {
        assert_eq!(strftime_pattern("HH:mm"), "%H:%M");
        assert_eq!(strftime_pattern("dd MMM yyyy"), "%d %b %Y");
        assert_eq!(strftime_pattern("hh:mm a"), "%I:%M %p");
        assert_eq!(strftime_pattern("100%"), "100%%");
    }

    #[test]
    fn test_legend_layout_is_centred_row() {
        let xs = legend_layout(&["Steel", "Copper"], 400);
        // Steel: 20 + 6 + 5 * 7 = 61, Copper: 20 + 6 + 6 * 7 = 68, gap 24
        let total = 61 + 24 + 68;
        assert_eq!(xs, vec![(400 - total) / 2, (400 - total) / 2 + 61 + 24]);
    }

    #[test]
    fn test_legend_layout_clamps_to_left_edge() {
        let xs = legend_layout(&["A very long commodity name"], 40);
        assert_eq!(xs, vec![0]);
    }

    #[test]
    fn test_time_bounds_widens_single_sample() {
        let times = hours(1);
        let (lo, hi) = time_bounds(&times);
        assert_eq!(hi - lo, Duration::hours(1));
    }

    #[test]
    fn test_draw_rejects_table_without_time_column() {
        let charts = PlottersCharts::initialize(vec![CORE_CHART_PACKAGE.to_string()]).unwrap();
        let mut table = charts.data_table();
        table.add_column(ColumnType::Number, "Steel");
        table.add_row(vec![Cell::Number(1.0)]).unwrap();
        let mut region = Element::new("p", "chart1");

        let err = charts.draw_line_chart(&mut region, &table, &options()).unwrap_err();
        assert!(matches!(err, ChartError::MissingDomainColumn));
        assert!(region.content().is_empty());
    }

    #[test]
    fn test_draw_rejects_empty_table() {
        let charts = PlottersCharts::initialize(vec![CORE_CHART_PACKAGE.to_string()]).unwrap();
        let mut table = charts.data_table();
        table.add_column(ColumnType::Datetime, "Time");
        let mut region = Element::new("p", "chart1");

        let err = charts.draw_line_chart(&mut region, &table, &options()).unwrap_err();
        assert!(matches!(err, ChartError::EmptyTable));
    }

    #[test]
    fn test_draw_writes_svg_into_region() {
        // plotters lays out text with system fonts
        if ("sans-serif", 12).into_font().box_size("Ag").is_err() {
            eprintln!("no sans-serif font available, skipping SVG render check");
            return;
        }

        let charts = PlottersCharts::initialize(vec![CORE_CHART_PACKAGE.to_string()]).unwrap();
        let mut table = charts.data_table();
        table.add_column(ColumnType::Datetime, "Time");
        table.add_column(ColumnType::Number, "Steel");
        for (t, v) in hours(4).into_iter().zip([110.0, 112.5, 108.0, 109.25]) {
            table.add_row(vec![t.into(), v.into()]).unwrap();
        }
        let mut region = Element::new("p", "chart1");

        charts.draw_line_chart(&mut region, &table, &options()).unwrap();
        assert!(region.content().starts_with("<svg"));
        assert!(region.content().contains("Prices"));
        assert!(region.content().contains("Steel"));
        assert!(region.content().contains("Timestamp"));
    }
}
