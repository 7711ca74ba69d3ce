use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/districts", district_routes())
        .nest("/schools", school_routes())
        .nest("/exam-years", exam_year_routes())
        .nest("/registrations", registration_routes())
        .nest("/results", result_routes())
        .nest("/leaderboards", leaderboard_routes())
        .nest("/contacts", contact_routes())
        .nest("/public", public_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn district_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::district::list_districts,
            handlers::district::create_district
        ))
        .routes(routes!(
            handlers::district::update_district,
            handlers::district::delete_district
        ))
}

fn school_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::school::list_schools,
            handlers::school::create_school
        ))
        .routes(routes!(
            handlers::school::update_school,
            handlers::school::delete_school
        ))
}

fn exam_year_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::exam_year::list_exam_years,
            handlers::exam_year::create_exam_year
        ))
        .routes(routes!(handlers::exam_year::update_exam_year))
}

fn registration_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::registration::list_registrations))
        .routes(routes!(
            handlers::registration::get_registration,
            handlers::registration::delete_registration
        ))
}

fn result_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::result::list_results,
            handlers::result::create_result
        ))
        .routes(routes!(
            handlers::result::get_result,
            handlers::result::update_result,
            handlers::result::delete_result
        ))
}

fn leaderboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::leaderboard::global_toppers))
        .routes(routes!(handlers::leaderboard::school_toppers))
        .routes(routes!(handlers::leaderboard::full_leaderboard))
}

fn contact_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::contact::list_contact_messages))
}

fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::registration::create_registration))
        .routes(routes!(handlers::contact::create_contact_message))
        .routes(routes!(handlers::public::active_districts))
        .routes(routes!(handlers::public::active_schools))
        .routes(routes!(handlers::public::exam_years))
        .routes(routes!(handlers::public::active_exam_year))
        .routes(routes!(handlers::public::top_by_group))
        .routes(routes!(handlers::public::results_by_school))
        .routes(routes!(handlers::public::result_lookup))
        .routes(routes!(handlers::public::hall_of_fame))
}
