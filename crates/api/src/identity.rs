//! Request identity supplied by the upstream identity provider.
//!
//! The provider authenticates the caller and forwards the result as
//! headers: `x-user-id` carries the user's UUID and `x-user-role` is
//! `seller` for sellers. Requests without `x-user-id` are anonymous.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use common::UserId;
use domain::{Identity, Role};
use store::ShopStore;

use crate::AppState;
use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";

/// The caller's identity, if any.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Identity>);

/// The caller's identity; anonymous requests are rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Identity);

/// Reads the identity headers, rejecting malformed values.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<Option<Identity>, ApiError> {
    let Some(raw_id) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let user_id = raw_id
        .to_str()
        .ok()
        .and_then(|s| uuid::Uuid::parse_str(s.trim()).ok())
        .map(UserId::from_uuid)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {USER_ID_HEADER} header")))?;

    let role = match headers.get(ROLE_HEADER).map(|v| v.to_str()) {
        None => Role::Customer,
        Some(Ok(v)) if v.trim().eq_ignore_ascii_case("seller") => Role::Seller,
        Some(Ok(v)) if v.trim().eq_ignore_ascii_case("customer") => Role::Customer,
        Some(_) => {
            return Err(ApiError::BadRequest(format!(
                "Invalid {ROLE_HEADER} header"
            )));
        }
    };

    Ok(Some(Identity { user_id, role }))
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers).map(MaybeUser)
    }
}

impl<S> FromRequestParts<Arc<AppState<S>>> for CurrentUser
where
    S: ShopStore + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        match identity_from_headers(&parts.headers)? {
            Some(identity) => Ok(CurrentUser(identity)),
            None => Err(ApiError::Unauthenticated {
                login_url: state.login_url.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn no_header_is_anonymous() {
        assert!(identity_from_headers(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn user_defaults_to_customer() {
        let uuid = uuid::Uuid::new_v4();
        let identity = identity_from_headers(&headers(&[(USER_ID_HEADER, &uuid.to_string())]))
            .unwrap()
            .unwrap();
        assert_eq!(identity.user_id.as_uuid(), uuid);
        assert_eq!(identity.role, Role::Customer);
    }

    #[test]
    fn seller_role_is_case_insensitive() {
        let uuid = uuid::Uuid::new_v4().to_string();
        let identity =
            identity_from_headers(&headers(&[(USER_ID_HEADER, &uuid), (ROLE_HEADER, "Seller")]))
                .unwrap()
                .unwrap();
        assert!(identity.is_seller());
    }

    #[test]
    fn malformed_headers_rejected() {
        assert!(matches!(
            identity_from_headers(&headers(&[(USER_ID_HEADER, "bob")])),
            Err(ApiError::BadRequest(_))
        ));

        let uuid = uuid::Uuid::new_v4().to_string();
        assert!(matches!(
            identity_from_headers(&headers(&[(USER_ID_HEADER, &uuid), (ROLE_HEADER, "admin")])),
            Err(ApiError::BadRequest(_))
        ));
    }
}
