//! Admin account management.

use gala_core::{AdminRole, Email};
use gala_server::db::admins::AdminRepository;
use gala_server::db::create_pool;
use gala_server::services::auth::hash_password;

use super::{CommandError, database_url};

/// Create an admin account with the given role and password.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), CommandError> {
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidArgument(format!("email: {e}")))?;
    let role = role
        .parse::<AdminRole>()
        .map_err(CommandError::InvalidArgument)?;

    if password.len() < 12 {
        return Err(CommandError::InvalidArgument(
            "password must be at least 12 characters".to_string(),
        ));
    }

    let password_hash = hash_password(password)?;

    let url = database_url()?;
    let pool = create_pool(&url).await?;

    let user = AdminRepository::new(&pool)
        .create(name, &email, &password_hash, role)
        .await?;

    tracing::info!(
        id = %user.id,
        email = %user.email,
        role = %user.role,
        "admin account created"
    );
    Ok(())
}
