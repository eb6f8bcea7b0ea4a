use chrono::Utc;
use contracts::domain::a001_category::aggregate::CategoryId;
use contracts::domain::a002_subcategory::aggregate::{
    NewSubcategory, Subcategory, SubcategoryId, SubcategorySearchItem,
};
use contracts::domain::common::EntityMetadata;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set};

use crate::domain::a001_category::repository as category;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_subcategory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category_id: i32,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::a001_category::repository::Entity",
        from = "Column::CategoryId",
        to = "crate::domain::a001_category::repository::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Subcategory {
    fn from(m: Model) -> Self {
        Subcategory {
            id: SubcategoryId(m.id),
            name: m.name,
            description: m.description,
            category_id: CategoryId(m.category_id),
            category_name: None,
            active: m.active,
            metadata: EntityMetadata::from_parts(m.created_at, m.updated_at),
        }
    }
}

fn with_category_name((m, parent): (Model, Option<category::Model>)) -> Subcategory {
    let mut sub: Subcategory = m.into();
    sub.category_name = parent.map(|c| c.name);
    sub
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    id: SubcategoryId,
) -> Result<Option<Subcategory>, DbErr> {
    let result = Entity::find_by_id(id.0)
        .find_also_related(category::Entity)
        .one(db)
        .await?;
    Ok(result.map(with_category_name))
}

/// Same normalized name under the same parent, optionally skipping one row
pub async fn find_by_name_in_category<C: ConnectionTrait>(
    db: &C,
    name: &str,
    category_id: CategoryId,
    exclude: Option<SubcategoryId>,
) -> Result<Option<Subcategory>, DbErr> {
    let mut query = Entity::find()
        .filter(Column::Name.eq(name))
        .filter(Column::CategoryId.eq(category_id.0));
    if let Some(id) = exclude {
        query = query.filter(Column::Id.ne(id.0));
    }
    Ok(query.one(db).await?.map(Into::into))
}

/// Active subcategories ordered by name, optionally restricted to one parent
pub async fn list_active<C: ConnectionTrait>(
    db: &C,
    category_id: Option<CategoryId>,
) -> Result<Vec<Subcategory>, DbErr> {
    let mut query = Entity::find().filter(Column::Active.eq(true));
    if let Some(id) = category_id {
        query = query.filter(Column::CategoryId.eq(id.0));
    }
    let items = query
        .find_also_related(category::Entity)
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(with_category_name)
        .collect();
    Ok(items)
}

/// Active subcategories of several parents at once, ordered by name
pub async fn list_active_for_categories<C: ConnectionTrait>(
    db: &C,
    category_ids: &[i32],
) -> Result<Vec<Subcategory>, DbErr> {
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }
    let items = Entity::find()
        .filter(Column::Active.eq(true))
        .filter(Column::CategoryId.is_in(category_ids.iter().copied()))
        .find_also_related(category::Entity)
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(with_category_name)
        .collect();
    Ok(items)
}

pub async fn count_active_in_category<C: ConnectionTrait>(
    db: &C,
    category_id: CategoryId,
) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::CategoryId.eq(category_id.0))
        .filter(Column::Active.eq(true))
        .count(db)
        .await
}

pub async fn search<C: ConnectionTrait>(
    db: &C,
    term: &str,
    category_id: Option<CategoryId>,
    limit: u64,
) -> Result<Vec<SubcategorySearchItem>, DbErr> {
    let mut query = Entity::find()
        .filter(Column::Name.contains(term))
        .filter(Column::Active.eq(true));
    if let Some(id) = category_id {
        query = query.filter(Column::CategoryId.eq(id.0));
    }
    let items = query
        .order_by_asc(Column::Name)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|m| SubcategorySearchItem {
            id: SubcategoryId(m.id),
            name: m.name,
            category_id: CategoryId(m.category_id),
        })
        .collect();
    Ok(items)
}

pub async fn insert<C: ConnectionTrait>(db: &C, new: &NewSubcategory) -> Result<Subcategory, DbErr> {
    let now = Utc::now();
    let active = ActiveModel {
        name: Set(new.name.clone()),
        description: Set(new.description.clone()),
        category_id: Set(new.category_id.0),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Subcategory) -> Result<(), DbErr> {
    let active = ActiveModel {
        id: Set(aggregate.id.0),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        category_id: Set(aggregate.category_id.0),
        active: Set(aggregate.active),
        updated_at: Set(aggregate.metadata.updated_at),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}
