use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::repositories::{NewUser, UserRepository};

/// Creates the superuser named by `admin_username`/`admin_email`/
/// `admin_password` unless one of them is unset or the account exists.
pub async fn initialize_admin_user(db: &'static DatabaseConnection, config: &Config) -> Result<()> {
    let (Some(username), Some(email), Some(password)) = (
        config.admin_username.as_deref(),
        config.admin_email.as_deref(),
        config.admin_password.as_deref(),
    ) else {
        tracing::debug!("Admin account not configured, skipping initialization");
        return Ok(());
    };

    let user_repo = UserRepository::with_connection(db);

    if user_repo
        .username_exists(username)
        .await
        .context("Failed to check existing admin")?
    {
        tracing::info!("Admin user already exists, skipping initialization");
        return Ok(());
    }

    tracing::info!("Creating admin user...");

    let password_hash =
        bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash admin password")?;

    let admin = user_repo
        .create(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
            password_hash,
            is_superuser: true,
        })
        .await
        .context("Failed to insert admin user")?;

    tracing::info!(user_id = %admin.user_id, username = %admin.username, "Admin user created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::repositories::test_support::test_db;

    fn config_with_admin(admin: Option<(&str, &str, &str)>) -> Config {
        let mut args = vec![
            "learning_hub_api",
            "--database-url",
            "sqlite::memory:",
            "--jwt-secret",
            "secret",
        ];
        if let Some((username, email, password)) = admin {
            args.extend([
                "--admin-username",
                username,
                "--admin-email",
                email,
                "--admin-password",
                password,
            ]);
        }
        Config::parse_from(args)
    }

    #[tokio::test]
    async fn test_creates_superuser_once() {
        let db = test_db().await;
        let config = config_with_admin(Some(("root", "root@uni.edu", "Adm1n-pass")));

        initialize_admin_user(db, &config).await.unwrap();
        initialize_admin_user(db, &config).await.unwrap();

        let admin = UserRepository::with_connection(db)
            .find_by_username("root")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_superuser);
        assert!(bcrypt::verify("Adm1n-pass", &admin.password).unwrap());
    }

    #[tokio::test]
    async fn test_skips_when_not_configured() {
        let db = test_db().await;
        initialize_admin_user(db, &config_with_admin(None)).await.unwrap();

        let users = UserRepository::with_connection(db);
        assert!(!users.username_exists("root").await.unwrap());
    }
}
