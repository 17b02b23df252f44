//! `/api/github/*` handlers.
//!
//! Stats, contributors, issues and activity have no fallback: any failure is
//! a 500 envelope. Discussions and events always answer 200, substituting
//! the fallback dataset when GitHub fails or has nothing to show.

use actix_web::{
    HttpResponse, HttpResponseBuilder,
    http::{Method, StatusCode},
    web,
};
use chrono::{SecondsFormat, Utc};
use optiblog_stats_models::{ApiResponse, Resource, Source};
use optiblog_stats_provider::{Fetched, ProviderError};
use serde::Serialize;

use crate::state::AppState;

pub const INTERNAL_ERROR: &str = "Internal server error";
pub const FALLBACK_ERROR: &str = "Using fallback data due to API error";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(resource(Resource::Stats, web::get().to(stats)))
        .service(resource(Resource::Contributors, web::get().to(contributors)))
        .service(resource(Resource::Issues, web::get().to(issues)))
        .service(resource(Resource::Activity, web::get().to(activity)))
        .service(resource(Resource::Discussions, web::get().to(discussions)))
        .service(resource(Resource::Events, web::get().to(events)));
}

fn resource(resource: Resource, get: actix_web::Route) -> actix_web::Resource {
    web::resource(resource.path())
        .route(get)
        .route(web::method(Method::OPTIONS).to(preflight))
}

/// `s-maxage` and `stale-while-revalidate`, in seconds.
#[must_use]
pub const fn cache_window(resource: Resource) -> (u32, u32) {
    match resource {
        Resource::Stats | Resource::Issues => (300, 600),
        Resource::Contributors | Resource::Discussions => (900, 1800),
        Resource::Activity => (600, 1200),
        Resource::Events => (1800, 3600),
    }
}

/// Methods advertised on resource responses. Only the preflight answer
/// lists `OPTIONS`.
const GET_METHODS: &str = "GET";
const PREFLIGHT_METHODS: &str = "GET, OPTIONS";

fn with_cors(mut builder: HttpResponseBuilder, methods: &'static str) -> HttpResponseBuilder {
    builder
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", methods))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"));
    builder
}

fn with_cache_control(mut builder: HttpResponseBuilder, resource: Resource) -> HttpResponseBuilder {
    let (fresh, stale) = cache_window(resource);
    builder.insert_header((
        "Cache-Control",
        format!("public, s-maxage={fresh}, stale-while-revalidate={stale}"),
    ));
    builder
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[allow(clippy::unused_async)]
pub async fn preflight() -> HttpResponse {
    with_cors(HttpResponse::Ok(), PREFLIGHT_METHODS).finish()
}

pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    stats_response(Resource::Stats, state.provider.repository_stats().await)
}

pub async fn contributors(state: web::Data<AppState>) -> HttpResponse {
    stats_response(
        Resource::Contributors,
        state.provider.contributor_stats().await,
    )
}

pub async fn issues(state: web::Data<AppState>) -> HttpResponse {
    stats_response(Resource::Issues, state.provider.issue_stats().await)
}

pub async fn activity(state: web::Data<AppState>) -> HttpResponse {
    stats_response(Resource::Activity, state.provider.activity_stats().await)
}

pub async fn discussions(state: web::Data<AppState>) -> HttpResponse {
    community_response(
        Resource::Discussions,
        state.provider.discussions().await,
        &state.fallback.discussions,
    )
}

pub async fn events(state: web::Data<AppState>) -> HttpResponse {
    community_response(
        Resource::Events,
        state.provider.events().await,
        &state.fallback.events,
    )
}

fn stats_response<T: Serialize>(
    resource: Resource,
    result: Result<Fetched<T>, ProviderError>,
) -> HttpResponse {
    let (status, envelope) = match result {
        Ok(fetched) => (
            StatusCode::OK,
            ApiResponse::ok(fetched.data)
                .with_rate_limit(fetched.rate_limit)
                .with_last_fetched(now()),
        ),
        Err(e) if e.is_internal() => {
            log::error!("GitHub {} API error: {e}", resource.noun());
            (StatusCode::INTERNAL_SERVER_ERROR, ApiResponse::failure(INTERNAL_ERROR))
        }
        Err(e) => {
            let message = e.to_string();
            log::error!("Failed to fetch {}: {message}", resource.noun());
            let message = if message.is_empty() {
                format!("Failed to fetch {}", resource.noun())
            } else {
                message
            };
            (StatusCode::INTERNAL_SERVER_ERROR, ApiResponse::failure(message))
        }
    };

    with_cache_control(with_cors(HttpResponse::build(status), GET_METHODS), resource)
        .json(envelope)
}

fn community_response<T: Serialize + Clone>(
    resource: Resource,
    result: Result<Vec<T>, ProviderError>,
    fallback: &[T],
) -> HttpResponse {
    let fallback_envelope = || ApiResponse::ok(fallback.to_vec()).with_source(Source::Fallback);

    let envelope = match result {
        Ok(items) if !items.is_empty() => ApiResponse::ok(items).with_source(Source::Github),
        Ok(_) => {
            log::info!("No {} found on GitHub, using fallback data", resource.noun());
            fallback_envelope()
        }
        Err(e) if e.is_internal() => {
            log::error!("GitHub {} API error: {e}", resource.noun());
            fallback_envelope().with_error(FALLBACK_ERROR)
        }
        Err(e) => {
            log::warn!(
                "GitHub {} API failed, using fallback data: {e}",
                resource.noun()
            );
            fallback_envelope()
        }
    };

    with_cache_control(with_cors(HttpResponse::Ok(), GET_METHODS), resource)
        .json(envelope.with_last_fetched(now()))
}
