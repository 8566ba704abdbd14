use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};

use crate::config::{ACCESS_TOKEN_COOKIE, APP_CONFIG};
use crate::error::AppError;
use crate::utils::jwt::{JwtManager, TokenClaims};

/// Claims of the signed-in user. The token is read from the
/// `Authorization: Bearer` header, falling back to the `access_token` cookie.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub TokenClaims);

/// Claims of a signed-in superuser. Anyone else is sent back home.
#[derive(Debug, Clone)]
pub struct SuperuserClaims(pub TokenClaims);

#[derive(Debug)]
pub enum SuperuserRejection {
    Unauthenticated(AppError),
    NotSuperuser,
}

impl IntoResponse for SuperuserRejection {
    fn into_response(self) -> Response {
        match self {
            SuperuserRejection::Unauthenticated(err) => err.into_response(),
            SuperuserRejection::NotSuperuser => Redirect::to("/").into_response(),
        }
    }
}

/// Like [`AuthClaims`] for pages anonymous visitors may also see.
#[derive(Debug, Clone)]
pub struct MaybeAuthClaims(pub Option<TokenClaims>);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
            Err(_) => CookieJar::from_headers(&parts.headers)
                .get(ACCESS_TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or(AppError::Unauthorized)?,
        };

        let claims = JwtManager::new(&APP_CONFIG.jwt_secret)
            .decode_jwt(&token)
            .map_err(|e| {
                tracing::debug!("Rejected access token: {e:#}");
                AppError::Unauthorized
            })?;

        Ok(AuthClaims(claims))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthClaims
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthClaims(
            AuthClaims::from_request_parts(parts, state)
                .await
                .ok()
                .map(|AuthClaims(claims)| claims),
        ))
    }
}

impl<S> FromRequestParts<S> for SuperuserClaims
where
    S: Send + Sync,
{
    type Rejection = SuperuserRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state)
            .await
            .map_err(SuperuserRejection::Unauthenticated)?;

        if !claims.is_superuser {
            tracing::info!(user_id = %claims.sub, "Non-superuser redirected from admin endpoint");
            return Err(SuperuserRejection::NotSuperuser);
        }
        Ok(SuperuserClaims(claims))
    }
}
