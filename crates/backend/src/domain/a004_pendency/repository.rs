use contracts::domain::a001_category::aggregate::CategoryId;
use contracts::domain::a004_pendency::aggregate::{Pendency, PendencyId};
use contracts::domain::common::EntityMetadata;
use contracts::shared::api::PageRequest;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_pendency")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub entry_date: chrono::NaiveDate,
    pub due_date: chrono::NaiveDate,
    pub completion_date: Option<chrono::NaiveDate>,
    pub status_id: Option<i32>,
    pub client_id: Option<i32>,
    pub parent_tab: Option<String>,
    pub primary_tab: Option<String>,
    pub owner_id: Option<i32>,
    pub description: Option<String>,
    pub seen_by_management: bool,
    pub archived: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Pendency {
    fn from(m: Model) -> Self {
        Pendency {
            id: PendencyId(m.id),
            entry_date: m.entry_date,
            due_date: m.due_date,
            completion_date: m.completion_date,
            status_id: m.status_id.map(CategoryId),
            client_id: m.client_id,
            parent_tab: m.parent_tab,
            primary_tab: m.primary_tab,
            owner_id: m.owner_id.map(CategoryId),
            description: m.description,
            seen_by_management: m.seen_by_management,
            metadata: EntityMetadata::from_parts(m.created_at, m.updated_at),
            archived: m.archived,
        }
    }
}

fn to_active(aggregate: &Pendency) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        entry_date: Set(aggregate.entry_date),
        due_date: Set(aggregate.due_date),
        completion_date: Set(aggregate.completion_date),
        status_id: Set(aggregate.status_id.map(|c| c.0)),
        client_id: Set(aggregate.client_id),
        parent_tab: Set(aggregate.parent_tab.clone()),
        primary_tab: Set(aggregate.primary_tab.clone()),
        owner_id: Set(aggregate.owner_id.map(|c| c.0)),
        description: Set(aggregate.description.clone()),
        seen_by_management: Set(aggregate.seen_by_management),
        archived: Set(aggregate.archived),
        created_at: sea_orm::ActiveValue::NotSet,
        updated_at: Set(aggregate.metadata.updated_at),
    }
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: PendencyId) -> Result<Option<Pendency>, DbErr> {
    let result = Entity::find_by_id(id.0).one(db).await?;
    Ok(result.map(Into::into))
}

/// One page of pendencies ordered by due date, plus the total match count.
///
/// The search term matches description, parent tab and primary tab.
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    archived: bool,
    search: Option<&str>,
    page: &PageRequest,
) -> Result<(Vec<Pendency>, u64), DbErr> {
    let mut query = Entity::find().filter(Column::Archived.eq(archived));
    if let Some(term) = search {
        query = query.filter(
            Condition::any()
                .add(Column::Description.contains(term))
                .add(Column::ParentTab.contains(term))
                .add(Column::PrimaryTab.contains(term)),
        );
    }

    let total = query.clone().count(db).await?;
    let items = query
        .order_by_asc(Column::DueDate)
        .order_by_asc(Column::Id)
        .offset(page.offset())
        .limit(page.per_page)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok((items, total))
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Pendency) -> Result<Pendency, DbErr> {
    let mut active = to_active(aggregate);
    active.created_at = Set(aggregate.metadata.created_at);
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Pendency) -> Result<(), DbErr> {
    let mut active = to_active(aggregate);
    active.id = Set(aggregate.id.0);
    active.update(db).await?;
    Ok(())
}
