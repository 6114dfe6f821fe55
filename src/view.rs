//! HTML rendering of a summary report: totals, daily table, and an SVG chart.

use calculator::SummaryReport;
use common::DailyResult;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 260.0;
const CHART_PAD: f64 = 32.0;

fn fmt_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:+.4}%", p),
        None => "&mdash;".to_string(),
    }
}

fn pct_class(pct: Option<f64>) -> &'static str {
    match pct {
        Some(p) if p > 0.0 => "up",
        Some(p) if p < 0.0 => "down",
        _ => "flat",
    }
}

/// Polyline of daily rates scaled into the chart box. Empty for < 2 days.
fn chart_points(daily: &[DailyResult]) -> String {
    if daily.len() < 2 {
        return String::new();
    }

    let min = daily.iter().map(|d| d.rate).fold(f64::INFINITY, f64::min);
    let max = daily.iter().map(|d| d.rate).fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let step = (CHART_WIDTH - 2.0 * CHART_PAD) / (daily.len() - 1) as f64;

    daily
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let x = CHART_PAD + i as f64 * step;
            let y = CHART_PAD + (max - d.rate) / span * (CHART_HEIGHT - 2.0 * CHART_PAD);
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_chart(daily: &[DailyResult]) -> String {
    let points = chart_points(daily);
    if points.is_empty() {
        return "<p class=\"note\">Not enough days to chart.</p>".to_string();
    }

    let (first, last) = (&daily[0], &daily[daily.len() - 1]);
    format!(
        r##"<svg viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img" aria-label="EUR/USD rate">
  <rect x="0" y="0" width="{w}" height="{h}" fill="#fafafa" stroke="#ddd"/>
  <polyline fill="none" stroke="#2563eb" stroke-width="2" points="{points}"/>
  <text x="{pad}" y="{label_y}" font-size="11">{first}</text>
  <text x="{right}" y="{label_y}" font-size="11" text-anchor="end">{last}</text>
</svg>"##,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        pad = CHART_PAD,
        right = CHART_WIDTH - CHART_PAD,
        label_y = CHART_HEIGHT - 10.0,
        points = points,
        first = first.date,
        last = last.date,
    )
}

fn render_table(daily: &[DailyResult]) -> String {
    let mut rows = String::new();
    for day in daily {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{:.6}</td><td class=\"{}\">{}</td></tr>\n",
            day.date,
            day.rate,
            pct_class(day.pct_change),
            fmt_pct(day.pct_change)
        ));
    }

    format!(
        "<table>\n<thead><tr><th>Date</th><th>Rate</th><th>Change</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>",
        rows
    )
}

pub fn render_summary(report: &SummaryReport) -> String {
    let totals = &report.totals;
    let daily_section = match &report.daily {
        Some(daily) => format!("{}\n{}", render_chart(daily), render_table(daily)),
        None => "<p class=\"note\">Daily breakdown disabled (breakdown=none).</p>".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{base}/{symbol} {start} to {end}</title>
<style>
  body {{ font-family: system-ui, sans-serif; margin: 2rem; color: #111; }}
  .cards {{ display: flex; gap: 1rem; margin-bottom: 1.5rem; }}
  .card {{ border: 1px solid #ddd; border-radius: 6px; padding: 0.75rem 1rem; }}
  .card span {{ display: block; font-size: 0.8rem; color: #666; }}
  table {{ border-collapse: collapse; margin-top: 1.5rem; }}
  th, td {{ padding: 0.3rem 0.8rem; border-bottom: 1px solid #eee; text-align: right; }}
  .up {{ color: #15803d; }} .down {{ color: #b91c1c; }} .flat {{ color: #666; }}
  .note {{ color: #666; }}
</style>
</head>
<body>
<h1>{base} &rarr; {symbol}</h1>
<p>{start} to {end} &middot; breakdown: {breakdown}</p>
<div class="cards">
  <div class="card"><span>Start</span>{start_rate:.6}</div>
  <div class="card"><span>End</span>{end_rate:.6}</div>
  <div class="card"><span>Mean</span>{mean_rate:.6}</div>
  <div class="card"><span>Total change</span><b class="{total_class}">{total}</b></div>
</div>
{daily_section}
</body>
</html>
"#,
        base = report.base,
        symbol = report.symbol,
        start = report.start_date,
        end = report.end_date,
        breakdown = report.breakdown,
        start_rate = totals.start_rate,
        end_rate = totals.end_rate,
        mean_rate = totals.mean_rate,
        total_class = pct_class(totals.total_pct_change),
        total = fmt_pct(totals.total_pct_change),
        daily_section = daily_section,
    )
}
