//! Todo database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{FromQueryResult, QuerySelect, Select};

use crate::domain::Todo;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status_id: i64,
    pub image: Option<Vec<u8>>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Todo row without the image bytes.
#[derive(Debug, FromQueryResult)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status_id: i64,
    pub has_image: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Select every column except `image`, which is replaced by a `has_image` flag.
pub fn select_rows() -> Select<Entity> {
    Entity::find()
        .select_only()
        .columns([
            Column::Id,
            Column::Title,
            Column::Description,
            Column::StatusId,
            Column::CreatedAt,
            Column::UpdatedAt,
        ])
        .expr_as(Expr::col(Column::Image).is_not_null(), "has_image")
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            title: row.title,
            description: row.description,
            status_id: row.status_id,
            has_image: row.has_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Model> for Todo {
    fn from(model: Model) -> Self {
        Todo {
            id: model.id,
            title: model.title,
            description: model.description,
            status_id: model.status_id,
            has_image: model.image.is_some(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
