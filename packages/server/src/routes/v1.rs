use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .nest("/predictions", prediction_routes(config))
        .nest("/farms", farm_routes())
        .nest("/admin", admin_routes())
}

fn prediction_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::prediction::create_prediction))
        .layer(handlers::prediction::upload_body_limit(config));

    OpenApiRouter::new()
        .routes(routes!(handlers::prediction::list_predictions))
        .routes(routes!(
            handlers::prediction::get_prediction,
            handlers::prediction::delete_prediction
        ))
        .routes(routes!(handlers::prediction::download_image))
        .merge(upload)
}

fn farm_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::farm::list_farms,
            handlers::farm::create_farm
        ))
        .routes(routes!(
            handlers::farm::get_farm,
            handlers::farm::update_farm,
            handlers::farm::delete_farm
        ))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::get_stats))
        .routes(routes!(handlers::admin::list_farmers))
        .routes(routes!(handlers::admin::get_farmer))
        .routes(routes!(handlers::admin::list_farmer_predictions))
        .routes(routes!(handlers::admin::get_any_prediction))
}
