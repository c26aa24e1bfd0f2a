use crate::{EngineError, ResultEngine, User};

use super::Engine;

/// The only username allowed to read company financials.
const FINANCIALS_USERNAME: &str = "admin";

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

impl Engine {
    /// Companies can only be managed by staff users.
    pub fn require_staff(&self, user: &User) -> ResultEngine<()> {
        if !user.is_staff {
            tracing::debug!(username = %user.username, "staff access denied");
            return Err(EngineError::Forbidden(PERMISSION_DENIED.to_string()));
        }
        Ok(())
    }

    /// Company financials are restricted to the staff user named `admin`.
    pub fn require_financials_access(&self, user: &User) -> ResultEngine<()> {
        self.require_staff(user)?;
        if user.username != FINANCIALS_USERNAME {
            tracing::debug!(username = %user.username, "financials access denied");
            return Err(EngineError::Forbidden(PERMISSION_DENIED.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, is_staff: bool) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            is_staff,
        }
    }

    async fn engine() -> Engine {
        Engine::builder().build().await.unwrap()
    }

    #[tokio::test]
    async fn staff_check() {
        let engine = engine().await;

        assert!(engine.require_staff(&user("bob", true)).is_ok());
        assert!(matches!(
            engine.require_staff(&user("bob", false)),
            Err(EngineError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn financials_need_staff_named_admin() {
        let engine = engine().await;

        assert!(engine.require_financials_access(&user("admin", true)).is_ok());
        assert!(engine.require_financials_access(&user("admin", false)).is_err());
        assert!(engine.require_financials_access(&user("manager", true)).is_err());
    }
}
