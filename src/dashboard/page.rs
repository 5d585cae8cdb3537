use super::service::DepthSnapshot;
use crate::core::DisplayConfig;
use crate::depth::{escape_html, render_html, render_text};

/// Full dashboard document. The browser reloads it every
/// `display.refresh_secs`, which triggers a fresh scrape.
pub fn render_page(snapshot: &DepthSnapshot, display: &DisplayConfig) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<h1>📈 Bitget P2P Report ({}/{})</h1>\n",
        escape_html(&display.asset),
        escape_html(&display.fiat)
    ));
    body.push_str(&format!(
        "<p style='font-size: 10px; color: #666;'>Updated {} UTC in {} ms</p>\n",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.elapsed_ms
    ));

    for side in snapshot.sides() {
        body.push_str(&render_html(&side.report, &display.asset));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Bitget P2P Report</title>
    <meta http-equiv="refresh" content="{refresh}">
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        h1, h2 {{ color: #333; }}
        table {{ margin-top: 15px; border: 1px solid #ccc; }}
        td, th {{ padding: 8px 12px; text-align: left; }}
        tr:nth-child(even) {{ background-color: #f9f9f9; }}
        hr {{ border: 0; border-top: 1px solid #eee; margin: 20px 0; }}
    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        refresh = display.refresh_secs,
        body = body
    )
}

pub fn render_text_page(snapshot: &DepthSnapshot, display: &DisplayConfig) -> String {
    let mut output = format!(
        "Bitget P2P Report ({}/{}) @ {}\n\n",
        display.asset,
        display.fiat,
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for side in snapshot.sides() {
        output.push_str(&render_text(&side.report, &display.asset));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::service::SideReport;
    use crate::depth::{aggregate, DepthBook, Report};
    use crate::market::{NormalizedListing, Side};
    use chrono::Utc;

    fn snapshot() -> DepthSnapshot {
        let offer_book = aggregate(
            Side::Offer,
            vec![NormalizedListing {
                price: 6.95,
                amount: 1_500.0,
                side: Side::Offer,
            }],
        );
        let side = |book: &DepthBook, failure: Option<String>| SideReport {
            report: Report::build(book, 30, failure),
            best_price: book.best_price(),
            listings_scraped: book.listing_count(),
            listings_dropped: 0,
            pages_visited: 1,
        };

        DepthSnapshot {
            generated_at: Utc::now(),
            elapsed_ms: 4200,
            offer: side(&offer_book, None),
            demand: side(&DepthBook::empty(Side::Demand), Some("no cards".into())),
        }
    }

    #[test]
    fn test_page_has_refresh_and_both_sections_in_order() {
        let display = DisplayConfig {
            refresh_secs: 15,
            ..DisplayConfig::default()
        };
        let html = render_page(&snapshot(), &display);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="15">"#));
        assert!(html.contains("(USDT/BOB)"));
        let offer_at = html.find("depth-offer").unwrap();
        let demand_at = html.find("depth-demand").unwrap();
        assert!(offer_at < demand_at);
        assert!(html.contains("1,500 USDT"));
        assert!(html.contains("no cards"));
    }

    #[test]
    fn test_text_page() {
        let text = render_text_page(&snapshot(), &DisplayConfig::default());
        assert!(text.starts_with("Bitget P2P Report (USDT/BOB)"));
        assert!(text.contains("🟢 Offers"));
        assert!(text.contains("🔴 Demand"));
        assert!(text.contains("(no listings)"));
    }
}
