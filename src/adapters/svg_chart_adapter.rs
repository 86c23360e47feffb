//! SVG chart rendering of bid/ask series with buy/sell markers.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::error::TradeTreeError;
use crate::domain::outcome::Action;
use crate::ports::chart_port::{ChartData, ChartPort};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 40.0;

pub struct SvgChartAdapter;

impl ChartPort for SvgChartAdapter {
    fn render(&self, chart: &ChartData, output_path: &Path) -> Result<(), TradeTreeError> {
        let svg = format_chart_svg(chart)?;
        fs::write(output_path, svg)?;
        debug!(asset = %chart.series.asset, path = %output_path.display(), "chart written");
        Ok(())
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

struct Scale {
    min_price: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Scale {
    fn x(&self, tick: usize) -> f64 {
        PADDING + tick as f64 * self.scale_x
    }

    fn y(&self, price: f64) -> f64 {
        HEIGHT - PADDING - (price - self.min_price) * self.scale_y
    }
}

fn polyline(scale: &Scale, prices: &[f64], class: &str, stroke: &str) -> String {
    let points: Vec<String> = prices
        .iter()
        .enumerate()
        .map(|(t, &p)| format!("{:.1},{:.1}", scale.x(t), scale.y(p)))
        .collect();
    format!(
        r#"  <polyline class="{class}" fill="none" stroke="{stroke}" stroke-width="1" points="{}"/>
"#,
        points.join(" ")
    )
}

fn marker(scale: &Scale, tick: usize, price: f64, class: &str, fill: &str, radius: f64) -> String {
    format!(
        r#"  <circle class="{class}" cx="{:.1}" cy="{:.1}" r="{radius:.0}" fill="{fill}" stroke="black" stroke-width="1"/>
"#,
        scale.x(tick),
        scale.y(price)
    )
}

/// Standalone SVG document for one asset.
pub fn format_chart_svg(chart: &ChartData) -> Result<String, TradeTreeError> {
    let series = chart.series;
    let title = escape_xml(&series.asset);

    if series.len() < 2 {
        return Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}">
  <text x="{PADDING:.0}" y="{PADDING:.0}">{title}: not enough price data to chart.</text>
</svg>
"#
        ));
    }

    let bids = series.bid_column();
    let asks = series.ask_column();
    let min_price = bids.iter().chain(&asks).copied().fold(f64::INFINITY, f64::min);
    let max_price = bids.iter().chain(&asks).copied().fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max_price - min_price;
    let scale = Scale {
        min_price,
        scale_x: plot_width / (series.len() - 1) as f64,
        scale_y: if range > 0.0 { plot_height / range } else { 1.0 },
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">
  <rect width="100%" height="100%" fill="white"/>
  <text x="{PADDING:.0}" y="{:.0}" font-family="sans-serif" font-size="14">{title}</text>
  <line x1="{PADDING:.0}" y1="{PADDING:.0}" x2="{PADDING:.0}" y2="{:.0}" stroke="gray"/>
  <line x1="{PADDING:.0}" y1="{:.0}" x2="{:.0}" y2="{:.0}" stroke="gray"/>
"#,
        PADDING / 2.0,
        HEIGHT - PADDING,
        HEIGHT - PADDING,
        WIDTH - PADDING,
        HEIGHT - PADDING,
    );

    svg.push_str(&polyline(&scale, &bids, "bid", "steelblue"));
    svg.push_str(&polyline(&scale, &asks, "ask", "darkorange"));

    for (tick, price) in chart.signals.buy_markers(series)? {
        svg.push_str(&marker(&scale, tick, price, "buy", "green", 3.0));
    }
    for (tick, price) in chart.signals.sell_markers(series)? {
        svg.push_str(&marker(&scale, tick, price, "sell", "red", 3.0));
    }

    if let Some(best) = chart.best_path {
        for decision in &best.decisions {
            let class = match decision.action {
                Action::Buy => "decision-buy",
                Action::Sell => "decision-sell",
            };
            svg.push_str(&marker(&scale, decision.tick, decision.price, class, "none", 6.0));
        }
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}
