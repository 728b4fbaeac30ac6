//! Route guard: decides, per navigation, whether to allow or where to redirect.

use crate::role::{Role, LOGIN_ROUTE};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No token. `from` is the attempted location, offered to the login flow
    /// as a best-effort return target.
    RedirectToLogin { from: String },
    /// Authenticated but not allowed here: go to the role's home.
    RedirectToHome { location: String },
}

/// Access requirement of one route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAccess {
    roles: Vec<Role>,
}

impl RouteAccess {
    /// Any authenticated caller.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn required(&self) -> &[Role] {
        &self.roles
    }
}

/// Pure decision over (token present?, role authorized?).
pub fn decide(
    token_present: bool,
    role: Option<&Role>,
    access: &RouteAccess,
    attempted: &str,
) -> GuardDecision {
    if !token_present {
        return GuardDecision::RedirectToLogin {
            from: attempted.to_string(),
        };
    }

    if access.roles.is_empty() {
        return GuardDecision::Allow;
    }

    if let Some(role) = role {
        if access.roles.contains(role) {
            return GuardDecision::Allow;
        }
    }

    let location = role
        .and_then(Role::home_route)
        .unwrap_or(LOGIN_ROUTE)
        .to_string();
    GuardDecision::RedirectToHome { location }
}

/// Evaluates the guard for a loaded session.
pub fn check(session: &Session, access: &RouteAccess, attempted: &str) -> GuardDecision {
    let role = session.resolved_role();
    decide(session.has_token(), role.as_ref(), access, attempted)
}

/// Where `/` sends a caller.
pub fn home_for(session: &Session) -> &'static str {
    if !session.has_token() {
        return LOGIN_ROUTE;
    }
    session
        .resolved_role()
        .and_then(|role| role.home_route())
        .unwrap_or(LOGIN_ROUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_token_redirects_to_login_with_origin() {
        for access in [
            RouteAccess::authenticated(),
            RouteAccess::roles([Role::Superviseur]),
        ] {
            assert_eq!(
                decide(false, Some(&Role::Superviseur), &access, "/agents/workload"),
                GuardDecision::RedirectToLogin {
                    from: "/agents/workload".to_string()
                }
            );
        }
    }

    #[test]
    fn unrestricted_route_allows_any_role() {
        let access = RouteAccess::authenticated();
        assert_eq!(decide(true, Some(&Role::Agent), &access, "/profile"), GuardDecision::Allow);
        assert_eq!(decide(true, None, &access, "/profile"), GuardDecision::Allow);
    }

    #[test]
    fn matching_role_is_allowed() {
        let access = RouteAccess::roles([Role::Superviseur, Role::Agent]);
        assert_eq!(decide(true, Some(&Role::Agent), &access, "/x"), GuardDecision::Allow);
    }

    #[test]
    fn wrong_role_goes_home() {
        let access = RouteAccess::roles([Role::Superviseur]);
        assert_eq!(
            decide(true, Some(&Role::Agent), &access, "/agents"),
            GuardDecision::RedirectToHome {
                location: "/agent/dossiers".to_string()
            }
        );
        assert_eq!(
            decide(true, Some(&Role::Importateur), &access, "/agents"),
            GuardDecision::RedirectToHome {
                location: "/dashboard-operateur".to_string()
            }
        );
    }

    #[test]
    fn unrecognized_or_missing_role_goes_to_login() {
        let access = RouteAccess::roles([Role::Agent]);
        assert_eq!(
            decide(true, Some(&Role::Other("AUDITEUR".into())), &access, "/agent/tasks"),
            GuardDecision::RedirectToHome {
                location: "/login".to_string()
            }
        );
        assert_eq!(
            decide(true, None, &access, "/agent/tasks"),
            GuardDecision::RedirectToHome {
                location: "/login".to_string()
            }
        );
    }

    #[test]
    fn home_follows_role() {
        assert_eq!(home_for(&Session::anonymous()), "/login");
        assert_eq!(home_for(&Session::new("t", Some(Role::Superviseur))), "/agents");
        assert_eq!(home_for(&Session::new("t", None)), "/login");
    }
}
