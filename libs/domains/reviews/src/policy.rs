//! Who may moderate reviews

use axum_helpers::Caller;

/// Roles that moderate reviews unless configured otherwise
pub const DEFAULT_MODERATOR_ROLES: &[&str] = &["admin", "superadmin", "moderator"];

#[cfg_attr(test, mockall::automock)]
pub trait ModerationPolicy: Send + Sync {
    fn is_moderator(&self, caller: &Caller) -> bool;
}

/// Moderator = verified token carrying one of the configured roles
#[derive(Debug, Clone)]
pub struct RolePolicy {
    roles: Vec<String>,
}

impl RolePolicy {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MODERATOR_ROLES.iter().copied())
    }
}

impl ModerationPolicy for RolePolicy {
    fn is_moderator(&self, caller: &Caller) -> bool {
        caller.has_any_role(&self.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_helpers::JwtClaims;

    fn caller_with(roles: &[&str]) -> Caller {
        Caller::authenticated(JwtClaims {
            sub: "u-1".into(),
            email: "mod@example.com".into(),
            name: "Mod".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
            iat: 0,
            jti: "j".into(),
        })
    }

    #[test]
    fn test_anonymous_is_never_moderator() {
        assert!(!RolePolicy::default().is_moderator(&Caller::anonymous()));
    }

    #[test]
    fn test_default_roles() {
        let policy = RolePolicy::default();
        assert!(policy.is_moderator(&caller_with(&["admin"])));
        assert!(policy.is_moderator(&caller_with(&["customer", "Moderator"])));
        assert!(!policy.is_moderator(&caller_with(&["customer"])));
        assert!(!policy.is_moderator(&caller_with(&[])));
    }

    #[test]
    fn test_custom_roles() {
        let policy = RolePolicy::new(["support"]);
        assert!(policy.is_moderator(&caller_with(&["support"])));
        assert!(!policy.is_moderator(&caller_with(&["admin"])));
    }
}
