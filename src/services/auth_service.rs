use crate::config::get_config;
use crate::dto::auth_dto::{LoginRequest, RegisterRequest};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::User;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterRequest) -> Result<User> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(&payload.email)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Err(Error::Conflict(format!(
                "Email {} is already registered",
                payload.email
            )));
        }

        let password_hash = hash_password(&payload.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, is_admin, fullname, date_of_birth, qualification)
            VALUES (?, ?, FALSE, ?, ?, ?)
            RETURNING id, email, password_hash, is_admin, fullname, date_of_birth, qualification
            "#,
        )
        .bind(payload.email)
        .bind(password_hash)
        .bind(payload.fullname)
        .bind(payload.date_of_birth)
        .bind(payload.qualification)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    pub async fn login(&self, payload: LoginRequest) -> Result<(String, User)> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, is_admin, fullname, date_of_birth, qualification
            FROM users WHERE email = ?
            "#,
        )
        .bind(&payload.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| Error::Internal(format!("Stored password hash is invalid: {}", e)))?;
        if Argon2::default()
            .verify_password(payload.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }

        let token = issue_token(&user)?;
        Ok((token, user))
    }

    /// First-boot bootstrap: creates the configured admin account if no user
    /// with that email exists yet.
    pub async fn ensure_admin(&self) -> Result<()> {
        let config = get_config();
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(&config.admin_email)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            tracing::debug!("admin user already exists");
            return Ok(());
        }

        let password_hash = hash_password(&config.admin_password)?;
        let birth_date = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
        sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, is_admin, fullname, date_of_birth, qualification)
            VALUES (?, ?, TRUE, 'Admin User', ?, 'Administrator')
            "#,
        )
        .bind(&config.admin_email)
        .bind(password_hash)
        .bind(birth_date)
        .execute(&self.pool)
        .await?;

        tracing::info!(email = %config.admin_email, "admin user created");
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn issue_token(user: &User) -> Result<String> {
    let config = get_config();
    let expires_at = Utc::now() + Duration::hours(config.token_ttl_hours);
    let claims = Claims {
        sub: user.id.to_string(),
        exp: expires_at.timestamp() as usize,
        is_admin: user.is_admin,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to issue token: {}", e)))
}
