use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, StoreError},
    state::AppState,
    users::{
        dto::{LoginRequest, RegisterRequest},
        password::{hash_password, verify_password},
        repo_types::User,
    },
};

/// Trims and lowercases an address. Idempotent.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Dot-atom local part, hostname labels without edge hyphens, alphabetic TLD of 2+.
pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref LOCAL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
                .unwrap();
        static ref LABEL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$").unwrap();
        static ref TLD_RE: Regex = Regex::new(r"^[a-zA-Z]{2,63}$").unwrap();
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.len() > 64 || domain.len() > 253 || !LOCAL_RE.is_match(local) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    match labels.split_last() {
        Some((tld, hosts)) if !hosts.is_empty() => {
            TLD_RE.is_match(tld) && hosts.iter().all(|l| LABEL_RE.is_match(l))
        }
        _ => false,
    }
}

fn checked_email(raw: &str) -> Result<String, AppError> {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email format".into()));
    }
    Ok(email)
}

#[instrument(skip(state, req))]
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<User, AppError> {
    let email = checked_email(&req.email)?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&req.password)?;

    // A concurrent signup can slip past the lookup above; the unique index catches it.
    let user = match state.users.create(name, &email, &hash).await {
        Ok(u) => u,
        Err(StoreError::Duplicate(constraint)) => {
            warn!(email = %email, %constraint, "lost signup race");
            return Err(AppError::Conflict("User already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Verifies credentials. Issues no session; the caller only learns success.
#[instrument(skip(state, req))]
pub async fn authenticate(state: &AppState, req: LoginRequest) -> Result<User, AppError> {
    let email = checked_email(&req.email)?;

    let user = match state.users.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::NotFound("User not found".into()));
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials("Incorrect password".into()));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

#[instrument(skip(state))]
pub async fn list_users(state: &AppState) -> Result<Vec<User>, AppError> {
    Ok(state.users.list().await?)
}

/// Removes the user only; their blogs are left in place.
#[instrument(skip(state))]
pub async fn delete_user(state: &AppState, id: &str) -> Result<(), AppError> {
    let not_found = || AppError::NotFound("User Not Found".into());
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    if !state.users.delete(id).await? {
        return Err(not_found());
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}
