//! SVG price charts: close line, SMA overlays and a strategy's entry/exit
//! markers. Used standalone (one file per ticker) and inline in the HTML
//! report.

use std::fs;
use std::path::Path;

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::calculate_sma;
use crate::domain::position::Side;
use crate::domain::report::{BacktestReport, TickerResult};
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 48.0;
const PRICE_COLOR: &str = "#2563eb";
const OVERLAY_COLORS: [&str; 3] = ["#f59e0b", "#10b981", "#8b5cf6"];
const ENTRY_COLOR: &str = "#16a34a";
const EXIT_COLOR: &str = "#dc2626";

pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Scale {
    min: f64,
    max: f64,
    step_x: f64,
}

impl Scale {
    fn x(&self, index: usize) -> f64 {
        PADDING + index as f64 * self.step_x
    }

    fn y(&self, price: f64) -> f64 {
        let range = self.max - self.min;
        let plot_height = HEIGHT - 2.0 * PADDING;
        if range > 0.0 {
            HEIGHT - PADDING - (price - self.min) / range * plot_height
        } else {
            HEIGHT / 2.0
        }
    }
}

fn polyline(points: &[(usize, f64)], scale: &Scale, color: &str, width: f64) -> String {
    let coords: Vec<String> = points
        .iter()
        .map(|&(i, price)| format!("{:.1},{:.1}", scale.x(i), scale.y(price)))
        .collect();
    format!(
        r#"<polyline fill="none" stroke="{color}" stroke-width="{width}" points="{}"/>"#,
        coords.join(" ")
    )
}

/// Render one ticker's chart. `marker_key` selects which strategy run's fills
/// are drawn; an unknown key draws no markers.
pub fn render_price_chart(result: &TickerResult, sma_periods: &[usize], marker_key: &str) -> String {
    let bars = &result.bars;
    let title = xml_escape(&format!("{} ({})", result.ticker.symbol, result.ticker.name));
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg.push_str(&format!(
        r#"<text x="{PADDING}" y="24" font-family="sans-serif" font-size="14">{title}</text>"#
    ));

    if bars.is_empty() {
        svg.push_str(r#"<text x="50%" y="50%" text-anchor="middle" font-family="sans-serif">No data</text></svg>"#);
        return svg;
    }

    let min = bars.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
    let max = bars.iter().map(|b| b.close).fold(f64::NEG_INFINITY, f64::max);
    let scale = Scale {
        min,
        max,
        step_x: if bars.len() > 1 {
            (WIDTH - 2.0 * PADDING) / (bars.len() - 1) as f64
        } else {
            0.0
        },
    };

    // axes
    svg.push_str(&format!(
        "<line x1=\"{PADDING}\" y1=\"{top}\" x2=\"{PADDING}\" y2=\"{bottom}\" stroke=\"#9ca3af\"/>\
         <line x1=\"{PADDING}\" y1=\"{bottom}\" x2=\"{right}\" y2=\"{bottom}\" stroke=\"#9ca3af\"/>",
        top = PADDING,
        bottom = HEIGHT - PADDING,
        right = WIDTH - PADDING,
    ));
    let label = |x: f64, y: f64, anchor: &str, text: String| {
        format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="{anchor}" font-family="sans-serif" font-size="10">{text}</text>"#
        )
    };
    svg.push_str(&label(PADDING - 4.0, scale.y(max) + 4.0, "end", format!("{max:.2}")));
    svg.push_str(&label(PADDING - 4.0, scale.y(min) + 4.0, "end", format!("{min:.2}")));
    svg.push_str(&label(PADDING, HEIGHT - PADDING + 16.0, "start", bars[0].date.to_string()));
    svg.push_str(&label(
        WIDTH - PADDING,
        HEIGHT - PADDING + 16.0,
        "end",
        bars[bars.len() - 1].date.to_string(),
    ));

    let closes: Vec<(usize, f64)> = bars.iter().map(|b| b.close).enumerate().collect();
    svg.push_str(&polyline(&closes, &scale, PRICE_COLOR, 1.5));

    for (n, &period) in sma_periods.iter().enumerate() {
        let series = calculate_sma(bars, period);
        let points: Vec<(usize, f64)> = (0..series.values.len())
            .filter_map(|i| series.simple_at(i).map(|v| (i, v)))
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = OVERLAY_COLORS[n % OVERLAY_COLORS.len()];
        svg.push_str(&polyline(&points, &scale, color, 1.0));
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="24" font-family="sans-serif" font-size="11" fill="{color}">SMA({period})</text>"#,
            x = WIDTH - PADDING - 70.0 * (sma_periods.len() - n) as f64,
        ));
    }

    if let Some(run) = result.run(marker_key) {
        for fill in &run.result.fills {
            let Some(index) = bars.iter().position(|b| b.date == fill.date) else {
                continue;
            };
            let (x, y) = (scale.x(index), scale.y(fill.price));
            let (color, points) = match fill.side {
                Side::Buy => (ENTRY_COLOR, format!("{x:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", y - 6.0, x - 5.0, y + 4.0, x + 5.0, y + 4.0)),
                Side::Sell => (EXIT_COLOR, format!("{x:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", y + 6.0, x - 5.0, y - 4.0, x + 5.0, y - 4.0)),
            };
            svg.push_str(&format!(
                r#"<polygon class="{}" fill="{color}" points="{points}"/>"#,
                match fill.side {
                    Side::Buy => "entry",
                    Side::Sell => "exit",
                }
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Writes `{dir}/{TICKER}.svg` for every backtested ticker.
pub struct ChartSvgAdapter {
    sma_periods: Vec<usize>,
    marker_key: String,
}

impl ChartSvgAdapter {
    pub fn new(sma_periods: Vec<usize>, marker_key: impl Into<String>) -> Self {
        Self {
            sma_periods,
            marker_key: marker_key.into(),
        }
    }
}

impl ReportPort for ChartSvgAdapter {
    fn format_name(&self) -> &'static str {
        "svg"
    }

    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SignalbenchError> {
        fs::create_dir_all(output_path)?;
        for result in &report.tickers {
            let svg = render_price_chart(result, &self.sma_periods, &self.marker_key);
            let file = output_path.join(format!("{}.svg", result.ticker.symbol));
            fs::write(&file, svg)?;
            tracing::debug!(path = %file.display(), "chart written");
        }
        Ok(())
    }
}
