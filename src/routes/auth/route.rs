use anyhow::Context;
use axum::{Json, Router, response::Redirect, routing::post};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

use super::dto::{LoginRequest, RegisterRequest};
use crate::config::{ACCESS_TOKEN_COOKIE, APP_CONFIG, JWT_EXPRIED_TIME};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::repositories::{NewUser, UserRepository};
use crate::utils::jwt::JwtManager;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
}

fn issue_token_cookie(jar: CookieJar, user: &user::Model) -> AppResult<CookieJar> {
    let token = JwtManager::new(&APP_CONFIG.jwt_secret).create_jwt(user, JWT_EXPRIED_TIME)?;
    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    Ok(jar.add(cookie))
}

/// Register a new account and sign it in
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 303, description = "Account created, token cookie set, redirect home"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn register(
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(CookieJar, Redirect)> {
    let user_repo = UserRepository::new();
    let mut errors = payload.validate();

    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_string();

    if !errors.has("username") && user_repo.username_exists(&username).await? {
        errors.add("username", "This username is already taken.");
    }
    if !errors.has("email") && user_repo.email_exists(&email).await? {
        errors.add("email", "This email is already registered.");
    }
    errors.into_result()?;

    let password_hash = bcrypt::hash(&payload.password1, bcrypt::DEFAULT_COST)
        .context("Failed to hash password")?;

    let user = user_repo
        .create(NewUser {
            username,
            email,
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
            password_hash,
            is_superuser: false,
        })
        .await?;

    tracing::info!(user_id = %user.user_id, username = %user.username, "User registered");

    let jar = issue_token_cookie(jar, &user)?;
    Ok((jar, Redirect::to("/")))
}

/// Sign in with username and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 303, description = "Token cookie set, redirect home"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Redirect)> {
    let user = UserRepository::new()
        .find_by_username(payload.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let password_valid =
        bcrypt::verify(&payload.password, &user.password).context("Password verification error")?;
    if !password_valid {
        return Err(AppError::Unauthorized);
    }

    let jar = issue_token_cookie(jar, &user)?;
    Ok((jar, Redirect::to("/")))
}

/// Clear the token cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 303, description = "Token cookie cleared, redirect home")),
    tag = "Authentication"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"));
    (jar, Redirect::to("/"))
}
