//! Back-office account commands (admin only).

use secrecy::SecretString;

use storekeeper_backoffice::AppState;
use storekeeper_backoffice::models::{NewUser, User};
use storekeeper_core::UserRole;

use super::{CliError, emit, emit_rows};

/// Create an account.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown role, or the
/// back-office error (`Unauthorized`, `InvalidInput`).
pub fn create(
    state: &mut AppState,
    actor: &User,
    username: String,
    full_name: String,
    role: &str,
    password: String,
) -> Result<(), CliError> {
    let role: UserRole = role
        .parse()
        .map_err(|e: String| CliError::InvalidArgument("--role", e))?;

    let user = state.users().create_user(
        NewUser {
            username,
            password: SecretString::from(password),
            full_name,
            role,
        },
        actor,
    )?;

    emit(&format!(
        "Created user '{}' ({}) with role {}",
        user.username, user.id, user.role
    ))
}

/// List every account.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins.
pub fn list(state: &mut AppState, actor: &User) -> Result<(), CliError> {
    let users = state.users().list_users(actor)?;

    emit_rows(
        &format!(
            "{:<36}  {:<20}  {:<24}  {:<8}  {}",
            "ID", "USERNAME", "FULL NAME", "ROLE", "ACTIVE"
        ),
        users.iter().map(|user| {
            format!(
                "{:<36}  {:<20}  {:<24}  {:<8}  {}",
                user.id,
                user.username,
                user.full_name,
                user.role.to_string(),
                if user.is_active { "yes" } else { "no" }
            )
        }),
    )
}
