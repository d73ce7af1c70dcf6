//! Caller identity
//!
//! Tokens are verified by the gateway in front of this service, which
//! forwards the verified claims as `x-auth-sub`, `x-auth-email` and
//! `x-auth-name` headers. A request without `x-auth-sub` is anonymous.
//!
//! The claims are resolved to a GeneWeaver user with an idempotent upsert:
//!
//! | SSO id | email | outcome |
//! |---|---|---|
//! | known, same user | known | that user |
//! | known, other user | any | authentication error |
//! | unknown | known | SSO id linked to the email's user |
//! | unknown | unknown | new user, name defaults to the email |

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use thiserror::Error;

use crate::db::DbError;
use crate::error::ServiceError;
use crate::features::FeatureState;
use crate::store::{UserRecord, UserStore};

pub const SUBJECT_HEADER: &str = "x-auth-sub";
pub const EMAIL_HEADER: &str = "x-auth-email";
pub const NAME_HEADER: &str = "x-auth-name";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Identity headers are incomplete: {0}")]
    IncompleteIdentity(&'static str),

    #[error("SSO identity is already bound to a different account")]
    AuthenticationMismatch,

    #[error(transparent)]
    Store(#[from] DbError),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => ServiceError::Database(e),
            other => ServiceError::Authentication(other.to_string()),
        }
    }
}

/// Verified claims forwarded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub sso_id: String,
    pub email: String,
    pub name: Option<String>,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CallerIdentity {
    /// `Ok(None)` for anonymous requests.
    pub fn from_headers(headers: &HeaderMap) -> Result<Option<Self>, AuthError> {
        let sso_id = header_value(headers, SUBJECT_HEADER);
        let email = header_value(headers, EMAIL_HEADER);

        match (sso_id, email) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(AuthError::IncompleteIdentity("missing email")),
            (None, Some(_)) => Err(AuthError::IncompleteIdentity("missing subject")),
            (Some(sso_id), Some(email)) => Ok(Some(Self {
                sso_id,
                email,
                name: header_value(headers, NAME_HEADER),
            })),
        }
    }
}

#[tracing::instrument(skip(store, identity), fields(sso_id = %identity.sso_id))]
pub async fn resolve_user<S: UserStore + ?Sized>(store: &S, identity: &CallerIdentity) -> Result<UserRecord, AuthError> {
    if let Some(user) = store
        .user_by_sso_id_and_email(&identity.sso_id, &identity.email)
        .await?
    {
        return Ok(user);
    }

    if store.sso_id_exists(&identity.sso_id).await? {
        tracing::warn!("SSO id presented with an email it is not bound to");
        return Err(AuthError::AuthenticationMismatch);
    }

    if let Some(user) = store.user_by_email(&identity.email).await? {
        store.link_sso_id(user.id, &identity.sso_id).await?;
        tracing::info!(user_id = user.id, "Linked SSO id to existing user");
        return Ok(user);
    }

    let name = identity.name.as_deref().unwrap_or(&identity.email);
    let user = store
        .create_sso_user(name, &identity.email, &identity.sso_id)
        .await?;
    Ok(user)
}

/// The caller, if the request carries an identity.
#[derive(Debug, Clone)]
pub struct OptionalCaller(pub Option<UserRecord>);

/// An identified caller; anonymous requests are rejected with 403.
#[derive(Debug, Clone)]
pub struct Caller(pub UserRecord);

#[async_trait]
impl FromRequestParts<FeatureState> for OptionalCaller {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &FeatureState) -> Result<Self, Self::Rejection> {
        let Some(identity) = CallerIdentity::from_headers(&parts.headers)? else {
            return Ok(Self(None));
        };
        let user = resolve_user(state.store.as_ref(), &identity).await?;
        Ok(Self(Some(user)))
    }
}

#[async_trait]
impl FromRequestParts<FeatureState> for Caller {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &FeatureState) -> Result<Self, Self::Rejection> {
        match OptionalCaller::from_request_parts(parts, state).await? {
            OptionalCaller(Some(user)) => Ok(Self(user)),
            OptionalCaller(None) => Err(ServiceError::AccessForbidden),
        }
    }
}
