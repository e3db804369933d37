use async_trait::async_trait;
use foodgram_db::is_unique_violation;
use foodgram_sdk::User;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::{NewUserRecord, UsersRepository, Window};
use crate::domain::views::Paged;

use super::db::db_err;
use super::entity::user::{self, Entity as UserEntity};

/// SeaORM-backed user directory.
#[derive(Clone, Default)]
pub struct OrmUsersRepository;

impl OrmUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UsersRepository for OrmUsersRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id).one(conn).await.map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_many<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        window: Window,
    ) -> Result<Paged<User>, DomainError> {
        let total = UserEntity::find().count(conn).await.map_err(db_err)?;
        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .offset(window.offset)
            .limit(window.limit)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(Paged {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let n = UserEntity::find()
            .filter(user::Column::Id.eq(id))
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(n > 0)
    }

    async fn email_taken<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<bool, DomainError> {
        let n = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(n > 0)
    }

    async fn username_taken<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<bool, DomainError> {
        let n = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(n > 0)
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        record: NewUserRecord,
    ) -> Result<Option<User>, DomainError> {
        let am = user::ActiveModel {
            id: ActiveValue::NotSet,
            email: ActiveValue::Set(record.email),
            username: ActiveValue::Set(record.username),
            first_name: ActiveValue::Set(record.first_name),
            last_name: ActiveValue::Set(record.last_name),
            password_hash: ActiveValue::Set(record.password_hash),
            avatar: ActiveValue::Set(None),
            date_joined: ActiveValue::Set(OffsetDateTime::now_utc()),
        };

        let id = match UserEntity::insert(am).exec(conn).await {
            Ok(res) => res.last_insert_id,
            Err(e) if is_unique_violation(&e) => return Ok(None),
            Err(e) => return Err(db_err(e)),
        };

        self.get(conn, id).await
    }

    async fn password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<String>, DomainError> {
        let found = UserEntity::find_by_id(id).one(conn).await.map_err(db_err)?;
        Ok(found.map(|m| m.password_hash))
    }

    async fn set_password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        password_hash: String,
    ) -> Result<(), DomainError> {
        let am = user::ActiveModel {
            id: ActiveValue::Unchanged(id),
            password_hash: ActiveValue::Set(password_hash),
            ..Default::default()
        };
        UserEntity::update(am).exec(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_avatar<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        avatar: Option<String>,
    ) -> Result<(), DomainError> {
        let am = user::ActiveModel {
            id: ActiveValue::Unchanged(id),
            avatar: ActiveValue::Set(avatar),
            ..Default::default()
        };
        UserEntity::update(am).exec(conn).await.map_err(db_err)?;
        Ok(())
    }
}
