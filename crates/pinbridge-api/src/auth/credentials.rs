use chrono::Utc;
use pinbridge_core::models::{RegisterRequest, User};
use pinbridge_core::AppError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;
use validator::Validate;

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, AppError> {
    use argon2::{
        password_hash::{PasswordHasher, SaltString},
        Argon2,
    };

    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    use argon2::{
        password_hash::{PasswordHash, PasswordVerifier},
        Argon2,
    };

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Accounts keyed by email, held for the lifetime of the process.
#[derive(Default)]
pub struct CredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new account.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        request.validate()?;

        if self.users.read().await.contains_key(&request.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password = request.password;
        let password_hash = blocking(move || hash_password(&password)).await?;

        let user = User {
            email: request.email,
            password_hash,
            created_at: Utc::now(),
        };

        // Re-check under the write lock; a concurrent registration may have won
        match self.users.write().await.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict("User already exists".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                tracing::info!(email = %user.email, "User registered");
                Ok(user)
            }
        }
    }

    /// Check an email and password pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .users
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_string();
        let hash = user.password_hash.clone();
        if blocking(move || verify_password(&password, &hash)).await? {
            Ok(user)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}
