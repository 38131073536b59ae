use sea_orm::sea_query::{Index, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::info;

use backoffice_common::{UserRole, UserStatus};

use crate::config::AuthConfig;
use crate::entity::{attachment, user};
use crate::resource::NewRow;
use crate::utils::hash;

/// Create the configured bootstrap admin if both credentials are set and
/// no account uses that email yet.
pub async fn seed_bootstrap_admin(db: &DatabaseConnection, auth: &AuthConfig) -> Result<(), DbErr> {
    let (Some(email), Some(password)) = (
        auth.bootstrap_admin_email.as_deref(),
        auth.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    let email = email.trim().to_lowercase();
    let exists = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let password = hash::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let row = NewRow::generate();
    let model = user::ActiveModel {
        uid: Set(row.uid),
        email: Set(email.clone()),
        name: Set("Administrator".into()),
        nickname: Set("admin".into()),
        phone: Set(None),
        password: Set(password),
        role: Set(UserRole::Admin),
        status: Set(UserStatus::Active),
        last_login_at: Set(None),
        is_use: Set(true),
        created_at: Set(row.now),
        updated_at: Set(row.now),
        ..Default::default()
    };

    let result = user::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => info!(%email, "Seeded bootstrap admin"),
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Attachment sets are always loaded by owner:
    // SELECT * FROM attachment WHERE owner_type = ? AND owner_uid IN (...)
    let index = Index::create()
        .if_not_exists()
        .name("idx_attachment_owner")
        .table(attachment::Entity)
        .col(attachment::Column::OwnerType)
        .col(attachment::Column::OwnerUid)
        .to_owned();

    let stmt = match db.get_database_backend() {
        DbBackend::Sqlite => index.to_string(SqliteQueryBuilder),
        _ => index.to_string(PostgresQueryBuilder),
    };

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_attachment_owner exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_attachment_owner: {}", e);
        }
    }

    Ok(())
}
