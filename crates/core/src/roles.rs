//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_USER: &str = "user";
pub const ROLE_PUBLISHER: &str = "publisher";
pub const ROLE_ADMIN: &str = "admin";

/// Roles a caller may pick for themselves at registration.
pub const SELF_ASSIGNABLE_ROLES: &[&str] = &[ROLE_USER, ROLE_PUBLISHER];

/// Every role an administrator may assign.
pub const ALL_ROLES: &[&str] = &[ROLE_USER, ROLE_PUBLISHER, ROLE_ADMIN];

/// Check whether `role` is one of [`ALL_ROLES`].
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_not_self_assignable() {
        assert!(is_valid_role(ROLE_ADMIN));
        assert!(!SELF_ASSIGNABLE_ROLES.contains(&ROLE_ADMIN));
    }

    #[test]
    fn unknown_role_is_invalid() {
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
    }
}
