use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    auth::{
        claims::Claims,
        dto::{PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, password_weakness, verify_password},
        repo_types::User,
    },
    db,
    error::{AppError, AppResult},
};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shape checks done before the database is consulted.
pub fn validate_registration(req: &RegisterRequest) -> AppResult<()> {
    let name_len = req.name.trim().chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
        return Err(AppError::Validation(format!(
            "Name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
        )));
    }
    if !is_valid_email(&normalize_email(&req.email)) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if let Some(reason) = password_weakness(&req.password) {
        return Err(AppError::Validation(reason.into()));
    }
    Ok(())
}

/// Create a user and return its id.
pub async fn register(db: &PgPool, req: &RegisterRequest) -> AppResult<i64> {
    validate_registration(req)?;
    let email = normalize_email(&req.email);

    if User::find_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&req.password)?;
    // a concurrent registration can still win the race; the unique index decides
    let user = User::create(db, req.name.trim(), &email, &hash)
        .await
        .map_err(|e| db::conflict_on_unique(e, "Email already registered"))?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user.id)
}

/// Check credentials and issue an access token.
pub async fn authenticate(
    db: &PgPool,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> AppResult<String> {
    let email = normalize_email(email);
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let Some(user) = User::find_by_email(db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(invalid());
    }

    let token = keys.sign(&user.email)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(token)
}

/// Load the public profile of the token subject.
pub async fn profile(db: &PgPool, claims: &Claims) -> AppResult<PublicUser> {
    let user = User::find_by_email(db, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}
