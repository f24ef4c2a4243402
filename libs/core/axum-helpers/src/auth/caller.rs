use super::jwt::JwtClaims;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Who is making the request.
///
/// Built from the claims an auth middleware left in request extensions;
/// without them the caller is anonymous. Never rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub claims: Option<JwtClaims>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(claims: JwtClaims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.claims.is_none()
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.sub.as_str())
    }

    pub fn roles(&self) -> &[String] {
        self.claims.as_ref().map(|c| c.roles.as_slice()).unwrap_or(&[])
    }

    /// True when any of the caller's roles matches one of `roles` (case-insensitive).
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.claims
            .as_ref()
            .is_some_and(|claims| roles.iter().any(|role| claims.has_role(role.as_ref())))
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            claims: parts.extensions.get::<JwtClaims>().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: &[&str]) -> JwtClaims {
        JwtClaims {
            sub: "acc-42".into(),
            email: "staff@shop.test".into(),
            name: "Staff".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
            iat: 0,
            jti: "t".into(),
        }
    }

    #[test]
    fn test_anonymous_has_no_roles() {
        let caller = Caller::anonymous();
        assert!(caller.is_anonymous());
        assert!(caller.roles().is_empty());
        assert!(!caller.has_any_role(&["admin"]));
    }

    #[test]
    fn test_role_match_is_case_insensitive() {
        let caller = Caller::authenticated(claims(&["Admin"]));
        assert_eq!(caller.subject(), Some("acc-42"));
        assert!(caller.has_any_role(&["moderator", "admin"]));
        assert!(!caller.has_any_role(&["superadmin"]));
    }

    #[tokio::test]
    async fn test_extracts_claims_from_extensions() {
        let mut request = axum::http::Request::new(());
        request.extensions_mut().insert(claims(&["moderator"]));
        let (mut parts, _) = request.into_parts();

        let caller = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(caller.has_any_role(&["moderator"]));
    }
}
