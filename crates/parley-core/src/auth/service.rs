//! Auth gateway service.
//!
//! `AuthUserService` owns user records, checks credentials, and drives the
//! token lifecycle: Issued, then Verified on each protected call, then either
//! expired naturally or revoked by logout.

use chrono::Utc;
use parley_types::auth::{
    AuthUser, CreateAuthUserParams, IssuedToken, NewAuthUser, SessionCookie, TokenClaims,
    UpdateAuthUserParams,
};
use parley_types::error::{AuthError, RepositoryError};
use tracing::{debug, info, warn};

use crate::auth::capability::{PasswordScheme, TokenCodec};
use crate::auth::revocation::RevokedTokens;
use crate::repository::auth_user::AuthUserRepository;

/// Service for user records, credential checks, and session tokens.
///
/// Generic over the repository and both capabilities so that parley-core
/// never depends on parley-infra.
pub struct AuthUserService<R: AuthUserRepository, H: PasswordScheme, T: TokenCodec> {
    repo: R,
    passwords: H,
    tokens: T,
    revoked: RevokedTokens,
    secure_cookies: bool,
}

fn storage(e: RepositoryError) -> AuthError {
    AuthError::Storage(e.to_string())
}

impl<R: AuthUserRepository, H: PasswordScheme, T: TokenCodec> AuthUserService<R, H, T> {
    pub fn new(repo: R, passwords: H, tokens: T, secure_cookies: bool) -> Self {
        Self {
            repo,
            passwords,
            tokens,
            revoked: RevokedTokens::new(),
            secure_cookies,
        }
    }

    // --- User records ---

    /// Register a user. The plaintext password is hashed before storage.
    pub async fn create_auth_user(&self, new_user: &NewAuthUser) -> Result<AuthUser, AuthError> {
        let email = new_user.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation(format!("invalid email '{email}'")));
        }
        if new_user.password.is_empty() {
            return Err(AuthError::Validation("password must not be empty".to_string()));
        }

        let password_hash = self.passwords.hash(&new_user.password)?;
        let username = if new_user.username.is_empty() {
            email.to_string()
        } else {
            new_user.username.clone()
        };

        let params = CreateAuthUserParams {
            email: email.to_string(),
            password_hash,
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            username,
            is_superuser: new_user.is_superuser,
            is_active: true,
            is_staff: new_user.is_staff,
        };

        let user = self.repo.create(&params).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::Conflict(email.to_string()),
            other => storage(other),
        })?;
        info!(user_id = user.id, email = %user.email, "User created");
        Ok(user)
    }

    pub async fn get_auth_user_by_id(&self, id: i32) -> Result<AuthUser, AuthError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(AuthError::NotFound)
    }

    pub async fn get_auth_user_by_email(&self, email: &str) -> Result<AuthUser, AuthError> {
        self.repo
            .get_by_email(email.trim())
            .await
            .map_err(storage)?
            .ok_or(AuthError::NotFound)
    }

    pub async fn update_auth_user(
        &self,
        params: &UpdateAuthUserParams,
    ) -> Result<AuthUser, AuthError> {
        self.repo.update(params).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::NotFound,
            RepositoryError::Conflict(_) => AuthError::Conflict(params.email.clone()),
            other => storage(other),
        })
    }

    pub async fn get_all_auth_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        self.repo.list_all().await.map_err(storage)
    }

    // --- Credentials ---

    /// Check an email/password pair.
    ///
    /// An unknown email is `AuthError::NotFound`, a wrong password is
    /// `AuthError::InvalidCredentials`. The returned record still carries the
    /// stored hash; it is skipped on serialization.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self
            .repo
            .get_by_email(email)
            .await
            .map_err(storage)?
            .ok_or(AuthError::NotFound)?;

        if !self.passwords.validate(password, &user.password) {
            warn!(email = %email, "Rejected login: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        debug!(user_id = user.id, "User authenticated");
        Ok(user)
    }

    // --- Tokens ---

    /// Sign a session token for an authenticated user.
    pub fn issue_token(&self, user: &AuthUser) -> Result<IssuedToken, AuthError> {
        let issued = self.tokens.issue(user.id, Utc::now())?;
        debug!(user_id = user.id, expires_at = %issued.expires_at, "Token issued");
        Ok(issued)
    }

    /// Verify a token: signature, audience, expiry, then the revocation set.
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let now = Utc::now();
        let claims = self.tokens.verify(token, now)?;
        if self.revoked.is_revoked(&claims.jti, now) {
            return Err(AuthError::TokenInvalid("token revoked".to_string()));
        }
        Ok(claims)
    }

    /// End a session.
    ///
    /// Verification errors propagate unchanged. On success the token is
    /// revoked until its natural expiry and an already-expired cookie is
    /// returned for the client.
    pub fn logout(&self, token: &str) -> Result<SessionCookie, AuthError> {
        let claims = self.verify_token(token)?;
        let now = Utc::now();

        match claims.expires_at() {
            Some(expires_at) => self.revoked.revoke(&claims.jti, expires_at),
            None => warn!(jti = %claims.jti, "Token expiry out of range, not recorded"),
        }
        self.revoked.purge_expired(now);

        info!(subject = %claims.sub, "User logged out");
        Ok(self
            .tokens
            .expired_cookie(&claims.sub, self.secure_cookies, now))
    }

    /// Drop revocation entries for tokens that have expired on their own.
    pub fn purge_revoked(&self) -> usize {
        self.revoked.purge_expired(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use parley_types::auth::SESSION_COOKIE_NAME;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    // --- Fakes ---

    #[derive(Default)]
    struct MockUserRepo {
        users: Mutex<Vec<AuthUser>>,
    }

    impl AuthUserRepository for MockUserRepo {
        async fn create(&self, params: &CreateAuthUserParams) -> Result<AuthUser, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == params.email) {
                return Err(RepositoryError::Conflict("UNIQUE constraint failed".to_string()));
            }
            let user = AuthUser {
                id: users.len() as i32 + 1,
                email: params.email.clone(),
                password: params.password_hash.clone(),
                first_name: params.first_name.clone(),
                last_name: params.last_name.clone(),
                username: params.username.clone(),
                is_superuser: params.is_superuser,
                is_active: params.is_active,
                is_staff: params.is_staff,
                date_joined: Utc::now(),
                last_login: None,
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn get_by_id(&self, id: i32) -> Result<Option<AuthUser>, RepositoryError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn get_by_email(&self, email: &str) -> Result<Option<AuthUser>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn update(&self, params: &UpdateAuthUserParams) -> Result<AuthUser, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == params.id)
                .ok_or(RepositoryError::NotFound)?;
            user.email = params.email.clone();
            user.first_name = params.first_name.clone();
            user.last_name = params.last_name.clone();
            Ok(user.clone())
        }

        async fn list_all(&self) -> Result<Vec<AuthUser>, RepositoryError> {
            Ok(self.users.lock().unwrap().clone())
        }
    }

    /// Reversible "hash" so tests can assert on what reached storage.
    struct PrefixScheme;

    impl PasswordScheme for PrefixScheme {
        fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{plaintext}"))
        }

        fn validate(&self, plaintext: &str, stored_hash: &str) -> bool {
            stored_hash.strip_prefix("hashed:") == Some(plaintext)
        }
    }

    /// Tokens look like `{user_id}.{jti}.{exp}`; anything else is malformed.
    struct FakeCodec {
        lifetime: Duration,
        counter: AtomicU32,
    }

    impl FakeCodec {
        fn new(lifetime: Duration) -> Self {
            Self {
                lifetime,
                counter: AtomicU32::new(0),
            }
        }
    }

    impl TokenCodec for FakeCodec {
        fn issue(&self, user_id: i32, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
            let jti = self.counter.fetch_add(1, Ordering::SeqCst);
            let expires_at = now + self.lifetime;
            Ok(IssuedToken {
                token: format!("{user_id}.{jti}.{}", expires_at.timestamp()),
                expires_at,
            })
        }

        fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
            let parts: Vec<&str> = token.split('.').collect();
            let [sub, jti, exp] = parts.as_slice() else {
                return Err(AuthError::TokenInvalid("malformed token".to_string()));
            };
            let exp: i64 = exp
                .parse()
                .map_err(|_| AuthError::TokenInvalid("malformed expiry".to_string()))?;
            if exp <= now.timestamp() {
                return Err(AuthError::TokenInvalid("token expired".to_string()));
            }
            Ok(TokenClaims {
                sub: sub.to_string(),
                aud: "parley".to_string(),
                jti: jti.to_string(),
                iat: now.timestamp(),
                exp,
            })
        }

        fn expired_cookie(&self, subject: &str, secure: bool, now: DateTime<Utc>) -> SessionCookie {
            SessionCookie {
                name: SESSION_COOKIE_NAME.to_string(),
                value: subject.to_string(),
                path: "/".to_string(),
                http_only: true,
                secure,
                expires: now - Duration::hours(24),
            }
        }
    }

    type TestService = AuthUserService<MockUserRepo, PrefixScheme, FakeCodec>;

    fn service() -> TestService {
        AuthUserService::new(
            MockUserRepo::default(),
            PrefixScheme,
            FakeCodec::new(Duration::hours(1)),
            false,
        )
    }

    fn new_user(email: &str, password: &str) -> NewAuthUser {
        NewAuthUser {
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let svc = service();
        let user = svc
            .create_auth_user(&new_user("ada@example.com", "s3cret"))
            .await
            .unwrap();
        assert_eq!(user.password, "hashed:s3cret");
        assert_eq!(user.username, "ada@example.com");
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let svc = service();
        svc.create_auth_user(&new_user("ada@example.com", "a"))
            .await
            .unwrap();
        let err = svc
            .create_auth_user(&new_user("ada@example.com", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(email) if email == "ada@example.com"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let svc = service();
        assert!(matches!(
            svc.create_auth_user(&new_user("not-an-email", "pw")).await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            svc.create_auth_user(&new_user("ada@example.com", "")).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_distinguishes_unknown_and_wrong_password() {
        let svc = service();
        svc.create_auth_user(&new_user("ada@example.com", "right"))
            .await
            .unwrap();

        let ok = svc.authenticate("ada@example.com", "right").await.unwrap();
        assert_eq!(ok.email, "ada@example.com");

        assert!(matches!(
            svc.authenticate("ada@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.authenticate("nobody@example.com", "right").await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_lookup_by_email_and_id() {
        let svc = service();
        let created = svc
            .create_auth_user(&new_user("ada@example.com", "pw"))
            .await
            .unwrap();

        let by_email = svc.get_auth_user_by_email(" ada@example.com ").await.unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(svc.get_auth_user_by_id(created.id).await.unwrap().email, "ada@example.com");
        assert!(matches!(
            svc.get_auth_user_by_email("nobody@example.com").await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let svc = service();
        let err = svc
            .update_auth_user(&UpdateAuthUserParams {
                id: 99,
                email: "x@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn test_logout_returns_expired_cookie_and_revokes() {
        let svc = service();
        let user = svc
            .create_auth_user(&new_user("ada@example.com", "pw"))
            .await
            .unwrap();
        let issued = svc.issue_token(&user).unwrap();

        let claims = svc.verify_token(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));

        let cookie = svc.logout(&issued.token).unwrap();
        assert_eq!(cookie.name, SESSION_COOKIE_NAME);
        assert_eq!(cookie.value, user.id.to_string());
        assert!(cookie.http_only);
        assert!(!cookie.secure);
        assert!(cookie.is_expired_at(Utc::now()));

        let err = svc.verify_token(&issued.token).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(reason) if reason == "token revoked"));
    }

    #[tokio::test]
    async fn test_logout_leaves_other_tokens_valid() {
        let svc = service();
        let user = svc
            .create_auth_user(&new_user("ada@example.com", "pw"))
            .await
            .unwrap();
        let first = svc.issue_token(&user).unwrap();
        let second = svc.issue_token(&user).unwrap();

        svc.logout(&first.token).unwrap();
        assert!(svc.verify_token(&second.token).is_ok());
    }

    #[test]
    fn test_logout_propagates_verification_error() {
        let svc = service();
        let err = svc.logout("garbage").unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(reason) if reason == "malformed token"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = AuthUserService::new(
            MockUserRepo::default(),
            PrefixScheme,
            FakeCodec::new(Duration::seconds(-5)),
            true,
        );
        let user = AuthUser {
            id: 7,
            email: "e@example.com".to_string(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            username: "e".to_string(),
            is_superuser: false,
            is_active: true,
            is_staff: false,
            date_joined: Utc::now(),
            last_login: None,
        };
        let issued = svc.issue_token(&user).unwrap();
        assert!(matches!(
            svc.verify_token(&issued.token),
            Err(AuthError::TokenInvalid(_))
        ));
    }
}
