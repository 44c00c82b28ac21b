use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use sea_orm_migration::MigratorTrait;
use users_directory_sdk::{User, UserFilter};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::domain::error::DomainError;
use crate::domain::page_token::MAX_OFFSET;
use crate::domain::patch::UserPatch;
use crate::domain::repo::{ListWindow, NewUserRecord, UsersRepository};
use crate::infra::storage::entity::{ActiveModel, Column, Entity as UserEntity};
use crate::infra::storage::mapper::patch_to_active_model;
use crate::infra::storage::migrations::Migrator;

/// SeaORM implementation of [`UsersRepository`].
#[derive(Clone)]
pub struct SeaOrmUsersRepository {
    conn: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Connect and bring the schema up to date.
    ///
    /// # Errors
    /// Fails when the database is unreachable or a migration fails.
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let mut opts = ConnectOptions::new(cfg.dsn.clone());
        opts.max_connections(cfg.max_connections).sqlx_logging(false);
        if cfg.dsn.starts_with("sqlite::memory:") {
            // every connection opens its own private in-memory database
            opts.max_connections(1).min_connections(1);
        }

        let conn = Database::connect(opts)
            .await
            .with_context(|| format!("connect to database '{}'", redact_dsn(&cfg.dsn)))?;
        Migrator::up(&conn, None)
            .await
            .context("run users directory migrations")?;

        tracing::info!(dsn = %redact_dsn(&cfg.dsn), "Users directory database ready");
        Ok(Self::new(conn))
    }

    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn create(&self, record: NewUserRecord) -> Result<Option<User>, DomainError> {
        let am: ActiveModel = record.into();
        match am.insert(&self.conn).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let am = patch_to_active_model(id, patch);
        match am.update(&self.conn).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::user_not_found(id)),
            Err(DbErr::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let res = UserEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &UserFilter,
        window: ListWindow,
    ) -> Result<Vec<User>, DomainError> {
        // offsets and limits are bound as signed 64-bit integers
        if window.offset > MAX_OFFSET {
            return Ok(Vec::new());
        }

        let mut cond = Condition::all();
        if let Some(v) = &filter.first_name {
            cond = cond.add(Column::FirstName.eq(v.as_str()));
        }
        if let Some(v) = &filter.last_name {
            cond = cond.add(Column::LastName.eq(v.as_str()));
        }
        if let Some(v) = &filter.country {
            cond = cond.add(Column::Country.eq(v.as_str()));
        }

        let rows = UserEntity::find()
            .filter(cond)
            .order_by_asc(Column::CreatedAtUs)
            .order_by_asc(Column::Id)
            .offset(window.offset)
            .limit(window.limit.min(MAX_OFFSET))
            .all(&self.conn)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Classify a database error: uniqueness violations are a caller problem,
/// everything else is internal.
fn db_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        tracing::debug!(%detail, "Unique constraint violated");
        return DomainError::UserAlreadyExists;
    }
    DomainError::database(e)
}

/// Strip credentials from a DSN before it is logged.
fn redact_dsn(dsn: &str) -> String {
    match (dsn.find("://"), dsn.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &dsn[..scheme_end], &dsn[at..])
        }
        _ => dsn.to_owned(),
    }
}
