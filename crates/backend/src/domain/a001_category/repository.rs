use chrono::Utc;
use contracts::domain::a001_category::aggregate::{
    Category, CategoryId, CategorySearchItem, CategorySummary, NewCategory,
};
use contracts::domain::common::EntityMetadata;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub kind: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(m: Model) -> Self {
        Category {
            id: CategoryId(m.id),
            name: m.name,
            description: m.description,
            kind: m.kind,
            active: m.active,
            metadata: EntityMetadata::from_parts(m.created_at, m.updated_at),
            subcategories: Vec::new(),
        }
    }
}

impl From<Model> for CategorySummary {
    fn from(m: Model) -> Self {
        CategorySummary {
            id: CategoryId(m.id),
            name: m.name,
            kind: m.kind,
            active: m.active,
        }
    }
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: CategoryId) -> Result<Option<Category>, DbErr> {
    let result = Entity::find_by_id(id.0).one(db).await?;
    Ok(result.map(Into::into))
}

/// Exact lookup of an already normalized name, optionally skipping one row
pub async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude: Option<CategoryId>,
) -> Result<Option<Category>, DbErr> {
    let mut query = Entity::find().filter(Column::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(Column::Id.ne(id.0));
    }
    Ok(query.one(db).await?.map(Into::into))
}

/// Active categories ordered by name
pub async fn list_active<C: ConnectionTrait>(db: &C) -> Result<Vec<Category>, DbErr> {
    let items = Entity::find()
        .filter(Column::Active.eq(true))
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Summaries for the given ids; unknown ids are simply absent
pub async fn summaries_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<Vec<CategorySummary>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let items = Entity::find()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Typeahead over active categories
pub async fn search<C: ConnectionTrait>(
    db: &C,
    term: &str,
    limit: u64,
) -> Result<Vec<CategorySearchItem>, DbErr> {
    let items = Entity::find()
        .filter(Column::Name.contains(term))
        .filter(Column::Active.eq(true))
        .order_by_asc(Column::Name)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|m| CategorySearchItem {
            id: CategoryId(m.id),
            name: m.name,
        })
        .collect();
    Ok(items)
}

pub async fn insert<C: ConnectionTrait>(db: &C, new: &NewCategory) -> Result<Category, DbErr> {
    let now = Utc::now();
    let active = ActiveModel {
        name: Set(new.name.clone()),
        description: Set(new.description.clone()),
        kind: Set(new.kind.clone()),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Category) -> Result<(), DbErr> {
    let active = ActiveModel {
        id: Set(aggregate.id.0),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        kind: Set(aggregate.kind.clone()),
        active: Set(aggregate.active),
        updated_at: Set(aggregate.metadata.updated_at),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}
