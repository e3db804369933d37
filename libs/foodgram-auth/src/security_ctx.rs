use crate::errors::AuthError;

/// Identity of the caller for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityContext {
    user_id: Option<i64>,
}

impl SecurityContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    #[must_use]
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    /// Returns the caller id or `Unauthenticated` for anonymous callers.
    ///
    /// # Errors
    /// Returns [`AuthError::Unauthenticated`] when no user is attached.
    pub fn require_user(&self) -> Result<i64, AuthError> {
        self.user_id.ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_user() {
        let ctx = SecurityContext::anonymous();
        assert!(ctx.is_anonymous());
        assert_eq!(ctx.user_id(), None);
        assert!(matches!(ctx.require_user(), Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn user_context_exposes_id() {
        let ctx = SecurityContext::for_user(42);
        assert!(!ctx.is_anonymous());
        assert!(matches!(ctx.require_user(), Ok(42)));
    }
}
