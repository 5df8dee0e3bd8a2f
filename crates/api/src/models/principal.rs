//! Authenticated caller identity.
//!
//! A [`Principal`] is resolved from the request's bearer token by the auth
//! middleware and handed to handlers by the authorization extractors.

/// Capability level of a caller.
///
/// Variants are ordered by privilege, so `role >= required` is the
/// authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Any authenticated caller.
    LoggedUser,
    /// May create, modify, and delete shops.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoggedUser => write!(f, "logged_user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The caller behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn new(role: Role) -> Self {
        Self { role }
    }

    /// Whether the caller may alter privileged fields.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Whether the caller's role satisfies `required`.
    #[must_use]
    pub fn has_role(&self, required: Role) -> bool {
        self.role >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfies_every_role() {
        let admin = Principal::new(Role::Admin);
        assert!(admin.has_role(Role::Admin));
        assert!(admin.has_role(Role::LoggedUser));
        assert!(admin.is_admin());
    }

    #[test]
    fn test_logged_user_is_not_admin() {
        let user = Principal::new(Role::LoggedUser);
        assert!(user.has_role(Role::LoggedUser));
        assert!(!user.has_role(Role::Admin));
        assert!(!user.is_admin());
    }
}
