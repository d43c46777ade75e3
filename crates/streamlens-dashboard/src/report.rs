//! Plain text report rendering
//!
//! Turns one `DashboardData` into the five dashboard pages: overview,
//! streams, content, audience, and revenue. Pure string building, no I/O.

use std::fmt::Write;
use streamlens_analytics::{format_growth, growth_pct, ShareEntry};
use streamlens_common::utils::format_count;

use crate::app::DashboardData;

const RULE: &str = "----------------------------------------";

/// Render the complete dashboard report
pub fn render(data: &DashboardData) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "streamlens | {}", data.window);
    let _ = writeln!(out, "{}", RULE);

    render_overview(&mut out, data);
    render_streams(&mut out, data);
    render_content(&mut out, data);
    render_audience(&mut out, data);
    render_revenue(&mut out, data);
    render_footer(&mut out, data);

    out
}

fn render_overview(out: &mut String, data: &DashboardData) {
    let _ = writeln!(out, "\nOVERVIEW");
    if let Some(reason) = data.page_failure("overview") {
        render_page_placeholder(out, reason);
        return;
    }
    for metric in &data.overview {
        let growth = metric
            .previous_value
            .and_then(|previous| growth_pct(metric.value, previous));
        let _ = writeln!(
            out,
            "  {:<24} {:>12.2}  ({})",
            metric.name,
            metric.value,
            format_growth(growth)
        );
    }
}

fn render_streams(out: &mut String, data: &DashboardData) {
    let _ = writeln!(out, "\nSTREAMS");
    if let Some(reason) = data.page_failure("streams") {
        render_page_placeholder(out, reason);
        return;
    }
    if data.daily_buckets.is_empty() {
        let _ = writeln!(out, "  no stream data for this period");
    } else {
        for bucket in &data.daily_buckets {
            let _ = writeln!(
                out,
                "  {}  {:>8}  {:>10.2}",
                bucket.start,
                format_count(bucket.streams),
                bucket.revenue
            );
        }
    }
    render_shares(out, "platform share", &data.platform_shares);
}

fn render_content(out: &mut String, data: &DashboardData) {
    let _ = writeln!(out, "\nCONTENT");
    if data.top_songs.is_empty() {
        let _ = writeln!(out, "  no songs for this period");
        return;
    }
    for (rank, entry) in data.top_songs.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<24} {:>8}  {:>10.2}",
            rank + 1,
            entry.key,
            format_count(entry.streams),
            entry.revenue
        );
    }
}

fn render_audience(out: &mut String, data: &DashboardData) {
    let _ = writeln!(out, "\nAUDIENCE");
    let _ = writeln!(
        out,
        "  total listeners: {}",
        format_count(data.audience.total_listeners)
    );
    render_shares(out, "by age", &data.audience.by_age);
    render_shares(out, "by gender", &data.audience.by_gender);
    render_shares(out, "by country", &data.audience.by_country);
}

fn render_revenue(out: &mut String, data: &DashboardData) {
    let _ = writeln!(out, "\nREVENUE");
    let revenue = match (&data.revenue, data.page_failure("revenue")) {
        (Some(revenue), _) => revenue,
        (None, reason) => {
            render_page_placeholder(out, reason.unwrap_or("no revenue data"));
            return;
        }
    };
    let _ = writeln!(out, "  total:           {:>10.2}", revenue.total_revenue);
    let _ = writeln!(
        out,
        "  daily average:   {:>10.2}",
        revenue.average_daily_revenue
    );
    let _ = writeln!(
        out,
        "  per 1K streams:  {:>10.2}",
        revenue.revenue_per_thousand
    );
    render_shares(out, "by platform", &revenue.platform_share);

    if !data.projected_revenue.is_empty() {
        let projected: f64 = data.projected_revenue.iter().sum();
        let _ = writeln!(
            out,
            "  projected next {} days: {:.2}",
            data.projected_revenue.len(),
            projected
        );
    }
}

fn render_page_placeholder(out: &mut String, reason: &str) {
    let _ = writeln!(out, "  page unavailable: {}", reason);
}

fn render_shares(out: &mut String, title: &str, shares: &[ShareEntry]) {
    if shares.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {}:", title);
    for share in shares {
        let _ = writeln!(out, "    {:<20} {:>6.1}%", share.key, share.percentage);
    }
}

fn render_footer(out: &mut String, data: &DashboardData) {
    let _ = writeln!(out, "\n{}", RULE);
    for (platform, reason) in &data.unavailable {
        let _ = writeln!(out, "  {} unavailable: {}", platform, reason);
    }
    let _ = writeln!(out, "  source: {}", data.source_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DashboardApp;
    use streamlens_common::test_utils::date;
    use streamlens_common::{Period, Platform};
    use streamlens_config::Config;

    async fn sample_data() -> DashboardData {
        let app = DashboardApp::new(&Config::default()).unwrap();
        let window = Period::Week.to_window(date(2024, 6, 30)).unwrap();
        app.run(window).await
    }

    #[tokio::test]
    async fn test_report_contains_every_page() {
        let report = render(&sample_data().await);
        for heading in ["OVERVIEW", "STREAMS", "CONTENT", "AUDIENCE", "REVENUE"] {
            assert!(report.contains(heading), "missing page {}", heading);
        }
        assert!(report.contains("source: sample"));
    }

    #[tokio::test]
    async fn test_report_lists_top_songs_with_ranks() {
        let report = render(&sample_data().await);
        assert!(report.contains(" 1. "));
        assert!(report.contains("eternal-echoes"));
    }

    #[tokio::test]
    async fn test_unavailable_platforms_render_placeholders() {
        let mut data = sample_data().await;
        data.unavailable
            .push((Platform::AmazonMusic, "no analytics API".to_string()));

        let report = render(&data);
        assert!(report.contains("Amazon Music unavailable: no analytics API"));
    }

    #[tokio::test]
    async fn test_failed_page_renders_placeholder_without_hiding_the_rest() {
        let mut data = sample_data().await;
        data.revenue = None;
        data.failed_pages
            .push(("revenue", "record dated 2024-07-03 falls outside window".to_string()));

        let report = render(&data);
        assert!(report.contains("page unavailable: record dated 2024-07-03"));
        // The other pages still carry their content
        assert!(report.contains("total_streams"));
        assert!(report.contains("eternal-echoes"));
        assert!(report.contains("total listeners"));
    }
}
