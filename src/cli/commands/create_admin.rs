use anyhow::{Context, Result};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, EntityTrait, QueryFilter, Set};
use tracing::{debug, info};

use crate::auth::hash_password;

/// Create a staff user for the dashboard. If the username already exists,
/// the password is reset and the staff flag is set instead.
pub async fn create_admin(database_url: &str, username: &str, password: &str) -> Result<()> {
    info!("Creating staff user '{}'", username);
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let password_hash = hash_password(password).context("Failed to hash password")?;

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&db)
        .await?;

    match existing {
        Some(found) => {
            let mut active: user::ActiveModel = found.into();
            active.password_hash = Set(password_hash);
            active.is_staff = Set(true);
            active.update(&db).await?;
            info!("User '{}' already existed; password reset and staff flag set", username);
        }
        None => {
            user::ActiveModel {
                username: Set(username.to_string()),
                password_hash: Set(password_hash),
                is_staff: Set(true),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            info!("Successfully created staff user '{}'", username);
        }
    }

    Ok(())
}
