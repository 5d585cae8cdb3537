pub mod aggregator;
pub mod format;
pub mod render;
pub mod report;

pub use aggregator::{aggregate, aggregate_raw, DepthBook, PriceGroup};
pub use format::{escape_html, format_thousands};
pub use render::{render_html, render_text};
pub use report::{bar_length, Report, ReportRow};
