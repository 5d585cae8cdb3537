pub mod metrics;
pub mod page;
pub mod service;

pub use metrics::{DashboardMetrics, MetricsSnapshot};
pub use page::{render_page, render_text_page};
pub use service::{DepthService, DepthSnapshot, SideReport};
