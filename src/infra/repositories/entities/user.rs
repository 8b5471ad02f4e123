//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{FromQueryResult, QuerySelect, Select};

use crate::domain::{AccessLevel, User};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub access_level: i16,
    pub photo: Option<Vec<u8>>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// User row without the photo bytes.
#[derive(Debug, FromQueryResult)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub access_level: i16,
    pub has_photo: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Select every column except `photo`, which is replaced by a `has_photo` flag.
pub fn select_rows() -> Select<Entity> {
    Entity::find()
        .select_only()
        .columns([
            Column::Id,
            Column::Name,
            Column::Username,
            Column::Email,
            Column::PasswordHash,
            Column::AccessLevel,
            Column::CreatedAt,
            Column::UpdatedAt,
        ])
        .expr_as(Expr::col(Column::Photo).is_not_null(), "has_photo")
}

fn access_level(raw: i16) -> Result<AccessLevel, AppError> {
    AccessLevel::try_from(raw)
        .map_err(|e| AppError::internal(format!("Corrupt users.access_level: {}", e)))
}

/// Convert database row to domain entity
impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            access_level: access_level(row.access_level)?,
            has_photo: row.has_photo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            name: model.name,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            access_level: access_level(model.access_level)?,
            has_photo: model.photo.is_some(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
