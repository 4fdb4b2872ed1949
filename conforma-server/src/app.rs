use axum::routing::{get, post};
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Assemble the full API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route(
            "/admin/users",
            post(routes::admin::create_user).get(routes::admin::list_users),
        )
        .route(
            "/admin/tenants",
            post(routes::admin::create_tenant).get(routes::admin::list_tenants),
        )
        .route(
            "/t/{slug}/members",
            get(routes::members::list).post(routes::members::add),
        )
        .route(
            "/t/{slug}/risks",
            get(routes::risks::list).post(routes::risks::create),
        )
        .route(
            "/t/{slug}/risks/{id}",
            get(routes::risks::get_one).patch(routes::risks::patch),
        )
        .route(
            "/t/{slug}/nonconformities",
            get(routes::nonconformities::list).post(routes::nonconformities::create),
        )
        .route(
            "/t/{slug}/nonconformities/{id}",
            get(routes::nonconformities::get_one).patch(routes::nonconformities::patch),
        )
        .layer(
            // Provided x-request-id values are kept; missing ones are
            // minted, and either way the id is echoed on the response.
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

pub async fn listen<A>(router: Router, addr: A) -> anyhow::Result<()>
where
    A: ToSocketAddrs,
{
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
