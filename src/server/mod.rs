use std::sync::Arc;
use warp::Filter;

use crate::core::HealthChecker;
use crate::dashboard::{render_page, render_text_page, DashboardMetrics, DepthService};

pub fn routes(
    service: Arc<DepthService>,
    health: HealthChecker,
    metrics: Arc<DashboardMetrics>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_service = warp::any().map(move || service.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(with_service.clone())
        .and_then(|service: Arc<DepthService>| async move {
            let snapshot = service.snapshot().await;
            let page = render_page(&snapshot, service.display());
            Ok::<_, warp::Rejection>(warp::reply::html(page))
        });

    let depth_json = warp::path!("api" / "depth")
        .and(warp::get())
        .and(with_service.clone())
        .and_then(|service: Arc<DepthService>| async move {
            let snapshot = service.snapshot().await;
            Ok::<_, warp::Rejection>(warp::reply::json(&snapshot))
        });

    let depth_text = warp::path!("depth.txt")
        .and(warp::get())
        .and(with_service)
        .and_then(|service: Arc<DepthService>| async move {
            let snapshot = service.snapshot().await;
            let text = render_text_page(&snapshot, service.display());
            Ok::<_, warp::Rejection>(warp::reply::with_header(
                text,
                "content-type",
                "text/plain; charset=utf-8",
            ))
        });

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::any().map(move || health.clone()))
        .and_then(|checker: HealthChecker| async move {
            let status = checker.get_status().await;
            Ok::<_, warp::Rejection>(warp::reply::json(&status))
        });

    let metrics = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::any().map(move || metrics.clone()))
        .map(|metrics: Arc<DashboardMetrics>| warp::reply::json(&metrics.snapshot()));

    index
        .or(depth_json)
        .or(depth_text)
        .or(health)
        .or(metrics)
}

pub async fn serve(
    service: Arc<DepthService>,
    health: HealthChecker,
    metrics: Arc<DashboardMetrics>,
    port: u16,
) {
    warp::serve(routes(service, health, metrics))
        .run(([0, 0, 0, 0], port))
        .await;
}
