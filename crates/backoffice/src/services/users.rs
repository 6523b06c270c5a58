//! Back-office accounts: login, administration and bootstrap.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use storekeeper_core::{UserId, UserRole, Username};

use crate::db::JsonStore;
use crate::error::AppError;
use crate::models::{NewUser, User};

/// Username of the bootstrap administrator.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
const BOOTSTRAP_ADMIN_FULL_NAME: &str = "Administrator";
const LOGIN_FAILED: &str = "Invalid username or password";

/// User service.
///
/// Usernames are unique and matched case-insensitively. Every mutation
/// requires an active admin actor.
pub struct UserService<'a> {
    users: &'a mut JsonStore<User>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(users: &'a mut JsonStore<User>) -> Self {
        Self { users }
    }

    /// Authenticate a user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::LoginFailed` for an unknown username, an inactive
    /// account or a wrong password. The message does not say which.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, username: &str, password: &SecretString) -> Result<User, AppError> {
        let users = self.users.load_all()?;
        let Some(user) = users
            .into_iter()
            .find(|user| user.username.eq_ignore_ascii_case(username.trim()))
        else {
            tracing::warn!("Login failed: unknown username");
            return Err(AppError::LoginFailed(LOGIN_FAILED.to_string()));
        };

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login failed: account inactive");
            return Err(AppError::LoginFailed(LOGIN_FAILED.to_string()));
        }

        if !verify_password(password.expose_secret(), &user.password_hash) {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::LoginFailed(LOGIN_FAILED.to_string()));
        }

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` unless `actor` is an active admin,
    /// and `AppError::InvalidInput` for a malformed or taken username or an
    /// empty password.
    #[instrument(skip(self, input, actor), fields(username = %input.username, actor_id = %actor.id))]
    pub fn create_user(&mut self, input: NewUser, actor: &User) -> Result<User, AppError> {
        require_admin(actor)?;
        let user = self.build_user(input)?;

        self.users.add(user.clone())?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Replace an account's fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` unless `actor` is an active admin,
    /// and `AppError::InvalidInput` for an unknown id or a malformed or taken
    /// username.
    #[instrument(skip(self, user, actor), fields(user_id = %user.id, actor_id = %actor.id))]
    pub fn update_user(&mut self, user: User, actor: &User) -> Result<(), AppError> {
        require_admin(actor)?;
        let username = Username::parse(&user.username)?;

        let users = self.users.load_all()?;
        if users
            .iter()
            .any(|other| other.id != user.id && username.collides_with(&other.username))
        {
            return Err(AppError::InvalidInput(format!(
                "Username '{username}' already exists"
            )));
        }

        let id = user.id.clone();
        if !self.users.update(user)? {
            return Err(AppError::InvalidInput(format!("User with ID {id} not found")));
        }
        Ok(())
    }

    /// Set a new password. Admins may change any account, others only their own.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when a non-admin targets another
    /// account, `AppError::InvalidInput` for an unknown id or empty password.
    #[instrument(skip(self, password, actor), fields(actor_id = %actor.id))]
    pub fn change_password(
        &mut self,
        id: &UserId,
        password: &SecretString,
        actor: &User,
    ) -> Result<(), AppError> {
        require_active(actor)?;
        if !actor.is_admin() && &actor.id != id {
            return Err(AppError::Unauthorized(
                "Only administrators can change other users' passwords".to_string(),
            ));
        }

        let mut user = self.find(id)?;
        user.password_hash = hash_password(non_empty_password(password)?)?;
        self.users.update(user)?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    /// Delete an account other than the actor's own.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` unless `actor` is an active admin,
    /// and `AppError::InvalidInput` for self-deletion or an unknown id.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub fn delete_user(&mut self, id: &UserId, actor: &User) -> Result<(), AppError> {
        require_admin(actor)?;
        if &actor.id == id {
            return Err(AppError::InvalidInput(
                "You cannot delete your own account".to_string(),
            ));
        }

        if self.users.delete(id)? == 0 {
            return Err(AppError::InvalidInput(format!("User with ID {id} not found")));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// All accounts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` unless `actor` is an active admin.
    pub fn list_users(&mut self, actor: &User) -> Result<Vec<User>, AppError> {
        require_admin(actor)?;
        Ok(self.users.load_all()?)
    }

    /// One account. Admins may read any account, others only their own.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` for a non-admin reading another
    /// account and `AppError::InvalidInput` for an unknown id.
    pub fn get_user(&self, id: &UserId, actor: &User) -> Result<User, AppError> {
        require_active(actor)?;
        if !actor.is_admin() && &actor.id != id {
            return Err(AppError::Unauthorized(
                "Only administrators can view other users".to_string(),
            ));
        }
        self.find(id)
    }

    /// Create the `admin` account if no administrator exists yet.
    ///
    /// Returns the new account, or `None` if an admin was already present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the password is empty or the
    /// `admin` username is held by a non-admin account.
    #[instrument(skip(self, password))]
    pub fn initialize_admin(&mut self, password: &SecretString) -> Result<Option<User>, AppError> {
        let users = self.users.load_all()?;
        if users.iter().any(User::is_admin) {
            tracing::debug!("Admin account already present");
            return Ok(None);
        }

        let admin = self.build_user(NewUser {
            username: BOOTSTRAP_ADMIN_USERNAME.to_string(),
            password: password.clone(),
            full_name: BOOTSTRAP_ADMIN_FULL_NAME.to_string(),
            role: UserRole::Admin,
        })?;

        self.users.add(admin.clone())?;
        tracing::info!(user_id = %admin.id, "Bootstrap admin created");
        Ok(Some(admin))
    }

    fn find(&self, id: &UserId) -> Result<User, AppError> {
        self.users
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::InvalidInput(format!("User with ID {id} not found")))
    }

    /// Validate input against the reloaded set and hash the password.
    fn build_user(&mut self, input: NewUser) -> Result<User, AppError> {
        let username = Username::parse(input.username.trim())?;
        let password = non_empty_password(&input.password)?;

        let users = self.users.load_all()?;
        if users
            .iter()
            .any(|other| username.collides_with(&other.username))
        {
            return Err(AppError::InvalidInput(format!(
                "Username '{username}' already exists"
            )));
        }

        Ok(User {
            id: UserId::generate(),
            username: username.into_inner(),
            password_hash: hash_password(password)?,
            full_name: input.full_name.trim().to_string(),
            role: input.role,
            is_active: true,
            created_at: Utc::now(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn require_active(actor: &User) -> Result<(), AppError> {
    if !actor.is_active {
        return Err(AppError::Unauthorized(format!(
            "User {} is inactive",
            actor.username
        )));
    }
    Ok(())
}

fn require_admin(actor: &User) -> Result<(), AppError> {
    require_active(actor)?;
    if !actor.is_admin() {
        return Err(AppError::Unauthorized(
            "Only administrators can manage users".to_string(),
        ));
    }
    Ok(())
}

fn non_empty_password(password: &SecretString) -> Result<&str, AppError> {
    let exposed = password.expose_secret();
    if exposed.is_empty() {
        return Err(AppError::InvalidInput("Password cannot be empty".to_string()));
    }
    Ok(exposed)
}

/// Hash a password using Argon2.
///
/// # Errors
///
/// Returns `AppError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::PasswordHash)
}

/// Verify a password against a stored hash. Unparseable hashes never match.
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(dir: &std::path::Path) -> JsonStore<User> {
        JsonStore::open(dir.join("users.json")).unwrap()
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn account(username: &str, role: UserRole, hash: &str) -> User {
        User {
            id: UserId::generate(),
            username: username.to_string(),
            password_hash: hash.to_string(),
            full_name: String::new(),
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: secret("Pa55-word!"),
            full_name: "Front Desk".to_string(),
            role: UserRole::Employee,
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret-Value").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-Value", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret-Value", "not-a-phc-string"));
    }

    #[test]
    fn test_initialize_admin_then_login() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let mut service = UserService::new(&mut users);

        let admin = service
            .initialize_admin(&secret("Xk9#vQ2!mT7z"))
            .unwrap()
            .unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.full_name, "Administrator");
        assert!(admin.is_admin());

        // Second call is a no-op
        assert!(service
            .initialize_admin(&secret("Xk9#vQ2!mT7z"))
            .unwrap()
            .is_none());

        let logged_in = service.login("ADMIN", &secret("Xk9#vQ2!mT7z")).unwrap();
        assert_eq!(logged_in.id, admin.id);

        assert!(matches!(
            service.login("admin", &secret("nope")),
            Err(AppError::LoginFailed(_))
        ));
        assert!(matches!(
            service.login("ghost", &secret("Xk9#vQ2!mT7z")),
            Err(AppError::LoginFailed(_))
        ));
    }

    #[test]
    fn test_login_rejects_inactive_account() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let hash = hash_password("Pa55-word!").unwrap();
        let mut clerk = account("clerk", UserRole::Employee, &hash);
        clerk.is_active = false;
        users.add(clerk).unwrap();

        let mut service = UserService::new(&mut users);
        assert!(matches!(
            service.login("clerk", &secret("Pa55-word!")),
            Err(AppError::LoginFailed(_))
        ));
    }

    #[test]
    fn test_create_user_requires_admin() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let clerk = account("clerk", UserRole::Employee, "x");
        users.add(clerk.clone()).unwrap();

        let mut service = UserService::new(&mut users);
        assert!(matches!(
            service.create_user(new_user("another"), &clerk),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            service.list_users(&clerk),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_inactive_admin_is_unauthorized() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let mut boss = account("boss", UserRole::Admin, "x");
        boss.is_active = false;

        let mut service = UserService::new(&mut users);
        assert!(matches!(
            service.create_user(new_user("clerk"), &boss),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_create_user_validates_username() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let boss = account("boss", UserRole::Admin, "x");
        users.add(boss.clone()).unwrap();

        let mut service = UserService::new(&mut users);
        for bad in ["ab", "has space", "way_too_long_username_x", "dash-ed"] {
            assert!(
                matches!(
                    service.create_user(new_user(bad), &boss),
                    Err(AppError::InvalidInput(_))
                ),
                "{bad} should be rejected"
            );
        }

        assert!(matches!(
            service.create_user(new_user("BOSS"), &boss),
            Err(AppError::InvalidInput(msg)) if msg.contains("already exists")
        ));

        let mut empty_password = new_user("clerk");
        empty_password.password = secret("");
        assert!(matches!(
            service.create_user(empty_password, &boss),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_user_rules() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let boss = account("boss", UserRole::Admin, "x");
        let clerk = account("clerk", UserRole::Employee, "x");
        users.add(boss.clone()).unwrap();
        users.add(clerk.clone()).unwrap();

        let mut service = UserService::new(&mut users);
        assert!(matches!(
            service.delete_user(&boss.id, &boss),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service.delete_user(&boss.id, &clerk),
            Err(AppError::Unauthorized(_))
        ));

        service.delete_user(&clerk.id, &boss).unwrap();
        assert_eq!(service.list_users(&boss).unwrap().len(), 1);
        assert!(matches!(
            service.delete_user(&clerk.id, &boss),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_get_user_self_or_admin() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let boss = account("boss", UserRole::Admin, "x");
        let clerk = account("clerk", UserRole::Employee, "x");
        let other = account("other", UserRole::Employee, "x");
        for user in [&boss, &clerk, &other] {
            users.add(user.clone()).unwrap();
        }

        let service = UserService::new(&mut users);
        assert_eq!(service.get_user(&clerk.id, &clerk).unwrap().id, clerk.id);
        assert_eq!(service.get_user(&clerk.id, &boss).unwrap().id, clerk.id);
        assert!(matches!(
            service.get_user(&other.id, &clerk),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_update_user_rejects_taken_username() {
        let tmp = tempfile::tempdir().unwrap();
        let mut users = store(tmp.path());
        let boss = account("boss", UserRole::Admin, "x");
        let clerk = account("clerk", UserRole::Employee, "x");
        users.add(boss.clone()).unwrap();
        users.add(clerk.clone()).unwrap();

        let mut service = UserService::new(&mut users);
        let mut renamed = clerk.clone();
        renamed.username = "Boss".to_string();
        assert!(matches!(
            service.update_user(renamed, &boss),
            Err(AppError::InvalidInput(_))
        ));

        let mut deactivated = clerk.clone();
        deactivated.is_active = false;
        service.update_user(deactivated, &boss).unwrap();
        assert!(!service.get_user(&clerk.id, &boss).unwrap().is_active);
    }
}
