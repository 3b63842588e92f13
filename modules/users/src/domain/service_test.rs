//! Tests for `UsersService` over the in-memory repository.

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use auth::{AuthService, JwtConfig, PasswordHasher, SystemClock, TokenCodec};
    use auth_sdk::UserLookup;
    use parkapi_security::{Role, SecurityContext};
    use regex::Regex;

    use crate::domain::error::DomainError;
    use crate::domain::service::{USERNAME_PATTERN, UsersService};
    use crate::infra::storage::in_memory::InMemoryUserRepository;

    struct Fixture {
        repo: Arc<InMemoryUserRepository>,
        svc: UsersService,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryUserRepository::new());
        let codec = Arc::new(TokenCodec::new(
            &JwtConfig::default(),
            Arc::new(SystemClock),
        ));
        let auth = Arc::new(AuthService::new(
            repo.clone(),
            codec,
            PasswordHasher::new(4),
        ));
        let svc = UsersService::new(repo.clone(), auth);
        Fixture { repo, svc }
    }

    fn ctx(username: &str, role: Role) -> SecurityContext {
        SecurityContext::builder()
            .username(username)
            .role(role)
            .build()
    }

    #[tokio::test]
    async fn create_user_stores_hashed_client() {
        let f = fixture();

        let user = f.svc.create_user("tody@email.com", "123456").await.unwrap();

        assert_eq!(user.username, "tody@email.com");
        assert_eq!(user.role, Role::Client);
        let stored = f.repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "123456");
        assert!(stored.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn create_user_rejects_invalid_input() {
        let f = fixture();

        for (username, password, field) in [
            ("", "123456", "username"),
            ("tody", "123456", "username"),
            ("tody@email", "123456", "username"),
            ("Tody@Email.com", "123456", "username"),
            ("tody@email.com", "12345", "password"),
            ("tody@email.com", "1234567", "password"),
        ] {
            let res = f.svc.create_user(username, password).await;
            assert!(
                matches!(&res, Err(DomainError::Validation { field: f, .. }) if f == field),
                "{username}/{password}: {res:?}"
            );
        }
        assert!(f.repo.is_empty());
    }

    #[tokio::test]
    async fn username_pattern_accepts_plus_and_dot_addresses() {
        let f = fixture();
        assert!(Regex::new(USERNAME_PATTERN).is_ok());

        for username in ["tody.silva@email.com", "tody+park@mail.co", "t-1@sub.email.io"] {
            let user = f.svc.create_user(username, "123456").await.unwrap();
            assert_eq!(user.username, username);
        }
    }

    #[tokio::test]
    async fn create_user_twice_is_duplicate() {
        let f = fixture();
        f.svc.create_user("tody@email.com", "123456").await.unwrap();

        let res = f.svc.create_user("tody@email.com", "654321").await;
        assert!(matches!(res, Err(DomainError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn client_sees_only_own_user() {
        let f = fixture();
        let tody = f.svc.create_user("tody@email.com", "123456").await.unwrap();
        let other = f.svc.create_user("other@email.com", "123456").await.unwrap();
        let caller = ctx("tody@email.com", Role::Client);

        assert_eq!(f.svc.get_user(&caller, tody.id).await.unwrap(), tody);
        assert!(matches!(
            f.svc.get_user(&caller, other.id).await,
            Err(DomainError::Forbidden)
        ));
        assert!(matches!(
            f.svc.get_user(&caller, 999).await,
            Err(DomainError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn admin_sees_anyone_and_gets_not_found() {
        let f = fixture();
        let tody = f.svc.create_user("tody@email.com", "123456").await.unwrap();
        let admin = ctx("root@park.io", Role::Admin);

        assert_eq!(f.svc.get_user(&admin, tody.id).await.unwrap(), tody);
        assert!(matches!(
            f.svc.get_user(&admin, 999).await,
            Err(DomainError::UserNotFound { id: 999 })
        ));
    }

    #[tokio::test]
    async fn list_requires_admin() {
        let f = fixture();
        f.svc.create_user("tody@email.com", "123456").await.unwrap();
        f.svc.create_user("other@email.com", "123456").await.unwrap();

        assert!(matches!(
            f.svc.list_users(&ctx("tody@email.com", Role::Client)).await,
            Err(DomainError::Forbidden)
        ));
        let all = f
            .svc
            .list_users(&ctx("root@park.io", Role::Admin))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn change_password_checks_length_then_owner() {
        let f = fixture();
        let tody = f.svc.create_user("tody@email.com", "123456").await.unwrap();
        let other = f.svc.create_user("other@email.com", "123456").await.unwrap();
        let caller = ctx("tody@email.com", Role::Client);

        let short = f
            .svc
            .change_password(&caller, tody.id, "123456", "abc", "abc")
            .await;
        assert!(matches!(short, Err(DomainError::InvalidPassword(_))));

        let foreign = f
            .svc
            .change_password(&caller, other.id, "123456", "abcdef", "abcdef")
            .await;
        assert!(matches!(foreign, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn change_password_mismatch_leaves_hash_unchanged() {
        let f = fixture();
        let tody = f.svc.create_user("tody@email.com", "123456").await.unwrap();
        let before = f.repo.find_by_id(tody.id).await.unwrap().unwrap();

        let res = f
            .svc
            .change_password(
                &ctx("tody@email.com", Role::Client),
                tody.id,
                "123456",
                "abcdef",
                "xyz123",
            )
            .await;

        assert!(matches!(
            res,
            Err(DomainError::Auth(auth::DomainError::PasswordMismatch))
        ));
        let after = f.repo.find_by_id(tody.id).await.unwrap().unwrap();
        assert_eq!(before.password_hash, after.password_hash);
    }

    #[tokio::test]
    async fn change_password_succeeds_for_owner() {
        let f = fixture();
        let tody = f.svc.create_user("tody@email.com", "123456").await.unwrap();

        f.svc
            .change_password(
                &ctx("tody@email.com", Role::Client),
                tody.id,
                "123456",
                "abcdef",
                "abcdef",
            )
            .await
            .unwrap();

        let stored = f.repo.find_by_id(tody.id).await.unwrap().unwrap();
        let hasher = PasswordHasher::new(4);
        assert!(hasher.matches("abcdef", &stored.password_hash));
        assert!(!hasher.matches("123456", &stored.password_hash));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let f = fixture();

        let first = f.svc.ensure_admin("root@park.io", "adm123").await.unwrap();
        let second = f.svc.ensure_admin("root@park.io", "other1").await.unwrap();

        assert_eq!(first.role, Role::Admin);
        assert_eq!(first, second);
        assert_eq!(f.repo.len(), 1);
    }
}
