use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, DbConn, DbErr, EntityTrait, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait,
    QueryFilter, SqlErr,
};
use uuid::Uuid;

use folio_core::error::RepoError;
use folio_core::ports::BaseRepository;

/// Generic SeaORM repository, valid on either dialect.
pub struct SeaBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> SeaBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, Uuid> for SeaBaseRepository<E>
where
    E: EntityTrait,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<T>, RepoError> {
        let Some(key) = E::PrimaryKey::iter().next() else {
            return Ok(Vec::new());
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = E::find()
            .filter(key.into_column().is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

/// Translate a SeaORM error into the repository vocabulary.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => return RepoError::Constraint(message),
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => return RepoError::ForeignKey(message),
        _ => {}
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => {
            let message = other.to_string();
            let lower = message.to_lowercase();
            if lower.contains("unique") || lower.contains("duplicate") {
                RepoError::Constraint(message)
            } else if lower.contains("foreign key") {
                RepoError::ForeignKey(message)
            } else {
                RepoError::Query(message)
            }
        }
    }
}

/// Result of `ActiveModel::update`: a missing row is `None`, not an error.
pub(crate) fn updated<M>(result: Result<M, DbErr>) -> Result<Option<M>, RepoError> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Ok(None),
        Err(e) => Err(map_db_err(e)),
    }
}

/// Insertion time, truncated to what every dialect stores.
pub(crate) fn creation_timestamp() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}
