use super::format::{escape_html, format_thousands};
use super::report::Report;

const HTML_BAR_GLYPH: &str = "⬛";
const TEXT_BAR_GLYPH: &str = "█";

/// Renders one side as an HTML fragment: heading, volume line and the
/// price/ads/volume/bar table.
pub fn render_html(report: &Report, asset: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "<section class='depth depth-{}'>\n",
        report.side.label()
    ));
    output.push_str(&format!("<h2>{}</h2>\n", escape_html(&report.title)));

    if let Some(failure) = &report.failure {
        output.push_str(&format!(
            "<p class='extraction-error' style='color: red;'>⚠️ Extraction failed: {}. Showing {} price levels collected before the failure.</p>\n",
            escape_html(failure),
            report.rows.len()
        ));
    }

    output.push_str(&format!(
        "<p style='font-size: 30px;'>Volume: <strong>{} {}</strong></p>\n",
        format_thousands(report.total_volume, 0),
        escape_html(asset)
    ));

    output.push_str("<table border='1' style='width: 100%; border-collapse: collapse;'>\n");
    output.push_str("<tr style='background-color: #f2f2f2; font-weight: bold;'><td>Price</td><td>👤 Ads</td><td>💰 Volume</td><td>Distribution</td></tr>\n");

    if report.is_empty() {
        output.push_str("<tr><td colspan='4'><em>No listings</em></td></tr>\n");
    }

    for row in &report.rows {
        let bar = HTML_BAR_GLYPH.repeat(row.bar_length as usize);
        output.push_str(&format!(
            "<tr><td style='color: {color};'>{}</td><td>{}</td><td>{}</td><td><span style='color: {color};'>{}</span></td></tr>\n",
            format_thousands(row.price, 2),
            row.listing_count,
            format_thousands(row.total_volume, 0),
            bar,
            color = report.color,
        ));
    }

    output.push_str("</table>\n<hr>\n</section>\n");
    output
}

/// Console-style rendering of one side.
pub fn render_text(report: &Report, asset: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} [{}] | Volume: {} {}\n",
        report.title,
        report.color,
        format_thousands(report.total_volume, 0),
        asset
    ));
    output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if let Some(failure) = &report.failure {
        output.push_str(&format!("⚠️  Extraction failed: {}\n", failure));
    }

    if report.is_empty() {
        output.push_str("  (no listings)\n");
    } else {
        output.push_str(&format!(
            "  {:>12}  {:>5}  {:>12}  {}\n",
            "Price", "Ads", "Volume", "Distribution"
        ));
    }

    for row in &report.rows {
        output.push_str(&format!(
            "  {:>12}  {:>5}  {:>12}  {}\n",
            format_thousands(row.price, 2),
            row.listing_count,
            format_thousands(row.total_volume, 0),
            TEXT_BAR_GLYPH.repeat(row.bar_length as usize)
        ));
    }

    output
}
