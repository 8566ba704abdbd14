use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::config::ACCESS_TOKEN_COOKIE;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Learning Hub API",
        description = "Share course materials, discuss in posts and organise study groups"
    ),
    paths(
        routes::health::route::health,
        routes::home::route::get_home,
        routes::search::route::search,
        routes::auth::route::register,
        routes::auth::route::login,
        routes::auth::route::logout,
        routes::profile::route::get_profile,
        routes::profile::route::update_profile,
        routes::departments::route::get_all_departments,
        routes::departments::route::get_department,
        routes::departments::route::create_department,
        routes::departments::route::update_department,
        routes::departments::route::delete_department,
        routes::subjects::route::get_subjects,
        routes::subjects::route::get_subject,
        routes::subjects::route::create_subject,
        routes::materials::route::get_materials,
        routes::materials::route::upload_material,
        routes::materials::route::get_material,
        routes::materials::route::update_material,
        routes::materials::route::delete_material,
        routes::materials::route::save_material,
        routes::materials::route::rate_material,
        routes::materials::route::add_comment,
        routes::materials::route::report_material,
        routes::materials::route::download_material,
        routes::saved::route::get_saved_materials,
        routes::saved::route::update_note,
        routes::posts::route::get_posts,
        routes::posts::route::create_post,
        routes::posts::route::get_post,
        routes::posts::route::add_post_comment,
        routes::posts::route::vote_post,
        routes::posts::route::report_post,
        routes::comments::route::vote_comment,
        routes::comments::route::report_comment,
        routes::comments::route::vote_post_comment,
        routes::comments::route::report_post_comment,
        routes::study_groups::route::get_study_groups,
        routes::study_groups::route::create_study_group,
        routes::study_groups::route::get_study_group,
        routes::study_groups::route::join_study_group,
        routes::admin::route::get_dashboard,
        routes::admin::route::approve_material,
        routes::admin::route::toggle_post_pin,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health"),
        (name = "Home", description = "Landing feed"),
        (name = "Search"),
        (name = "Authentication", description = "Register, login and logout"),
        (name = "Profile"),
        (name = "Departments"),
        (name = "Subjects"),
        (name = "Materials", description = "Uploads, ratings, comments and downloads"),
        (name = "Saved"),
        (name = "Posts", description = "Community board"),
        (name = "Comments", description = "Votes and reports on comments"),
        (name = "Study Groups"),
        (name = "Admin", description = "Moderation, superusers only")
    )
)]
pub struct ApiDoc;

/// Registers the bearer header and the token cookie as auth schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_TOKEN_COOKIE))),
        );
    }
}
