use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use cookie::Cookie;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        codes::CodeEngine,
        dto::{
            ChangePasswordRequest, CredentialsRequest, PublicUser, SendCodeRequest, SignupResponse,
            StatusResponse, TokenResponse, VerifyCodeRequest,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_secret, verify_secret, HASH_COST},
        repo_types::User,
        validation::{validate_code, validate_email, validate_password},
    },
    error::AuthError,
    state::AppState,
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AuthError> {
    let email = normalize_email(&payload.email);
    validate_email(&email)?;
    validate_password(&payload.password)?;

    // Pre-check for a friendly error; the unique constraint in the
    // migration is what actually closes the race.
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "signup with existing email");
        return Err(AuthError::DuplicateEmail);
    }

    let hash = hash_secret(&payload.password, HASH_COST)?;
    let user = User::create(&state.db, &email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "account created");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: "Account created successfully".into(),
            result: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let email = normalize_email(&payload.email);
    validate_email(&email)?;
    validate_password(&payload.password)?;

    // Unknown email and wrong password fall through to the same error.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "signin with unknown email");
            AuthError::InvalidCredentials
        })?;

    if !verify_secret(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "signin with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email, user.verified)?;

    let mut cookie = Cookie::new("Authorization", format!("Bearer {token}"));
    cookie.set_path("/");
    cookie.set_http_only(state.config.is_production());
    cookie.set_expires(OffsetDateTime::now_utc() + TimeDuration::hours(state.config.jwt.ttl_hours));

    info!(user_id = %user.id, "signed in");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
        Json(TokenResponse {
            success: true,
            token,
            message: "Logged in successfully".into(),
        }),
    ))
}

#[instrument(skip_all)]
pub async fn logout(AuthUser(claims): AuthUser) -> Result<impl IntoResponse, AuthError> {
    let mut cookie = Cookie::new("Authorization", "");
    cookie.set_path("/");
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);

    info!(user_id = %claims.sub, "signed out");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
        Json(StatusResponse::ok("Logged out successfully")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn send_verification_code(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<SendCodeRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    let email = normalize_email(&payload.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(AuthError::NotFound)?;
    if user.verified {
        return Err(AuthError::AlreadyVerified);
    }

    let engine = CodeEngine::from_ref(&state);
    let code = engine.generate();

    // Store the digest only once the relay has accepted the mail; a
    // rejected send must not leave a redeemable code behind.
    state
        .mailer
        .send_code(&user.email, &code)
        .await
        .map_err(AuthError::MailDelivery)?;

    let digest = engine.digest(&code)?;
    User::set_verification_code(&state.db, user.id, &digest).await?;

    info!(user_id = %user.id, "verification code issued");
    Ok(Json(StatusResponse::ok("Verification code sent successfully")))
}

#[instrument(skip(state, payload))]
pub async fn verify_verification_code(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<VerifyCodeRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    let email = normalize_email(&payload.email);
    validate_email(&email)?;
    validate_code(&payload.provided_code)?;

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(AuthError::NotFound)?;
    if user.verified {
        return Err(AuthError::AlreadyVerified);
    }

    // Both fields are written together; losing either invalidates the code.
    let (stored_digest, sent_at) = match (&user.verification_code, user.verification_code_sent_at)
    {
        (Some(digest), Some(sent_at)) => (digest, sent_at),
        _ => return Err(AuthError::NoCodeIssued),
    };

    let engine = CodeEngine::from_ref(&state);
    if engine.is_expired(sent_at) {
        warn!(user_id = %user.id, "verification code expired");
        return Err(AuthError::CodeExpired);
    }
    if !engine.matches(&payload.provided_code, stored_digest)? {
        warn!(user_id = %user.id, "verification code mismatch");
        return Err(AuthError::CodeMismatch);
    }

    User::mark_verified(&state.db, user.id).await?;

    info!(user_id = %user.id, "account verified");
    Ok(Json(StatusResponse::ok("Your account has been verified")))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    validate_password(&payload.old_password)?;
    validate_password(&payload.new_password)?;

    if !claims.verified {
        warn!(user_id = %claims.sub, "password change before verification");
        return Err(AuthError::NotVerified);
    }

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !verify_secret(&payload.old_password, &user.password_hash)? {
        warn!(user_id = %user.id, "password change with wrong old password");
        return Err(AuthError::InvalidCredentials);
    }

    let hash = hash_secret(&payload.new_password, HASH_COST)?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password updated");
    Ok(Json(StatusResponse::ok("Password updated successfully")))
}
