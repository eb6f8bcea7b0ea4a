use contracts::domain::a001_category::aggregate::CategoryId;
use contracts::domain::a003_prospect::aggregate::{Prospect, ProspectId};
use contracts::domain::a003_prospect::contract_nature;
use contracts::domain::common::EntityMetadata;
use contracts::enums::PersonKind;
use contracts::shared::api::PageRequest;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_prospect")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub contract_number: String,
    pub person_kind: String,
    pub tax_id: String,
    pub legal_name: String,
    pub entry_date: chrono::NaiveDate,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    pub negotiation_status_id: Option<i32>,
    /// JSON array of category ids
    pub contract_nature_ids: Option<String>,
    pub followup_id: Option<i32>,
    pub line_count: Option<i32>,
    pub branch_count: Option<i32>,
    pub city_id: Option<i32>,
    pub consultant_id: Option<i32>,
    pub acceptance_date: Option<chrono::NaiveDate>,
    pub acceptance_type_id: Option<i32>,
    pub acceptance_document_link: Option<String>,
    pub notes_negotiation: Option<String>,
    pub notes_services: Option<String>,
    pub notes_financial: Option<String>,
    pub archived: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Prospect {
    fn from(m: Model) -> Self {
        let person_kind = PersonKind::from_code(&m.person_kind).unwrap_or_else(|| {
            tracing::warn!(
                "Prospect {} has unknown person kind {:?}, reading as PF",
                m.id,
                m.person_kind
            );
            PersonKind::Individual
        });

        Prospect {
            id: ProspectId(m.id),
            contract_number: m.contract_number,
            person_kind,
            tax_id: m.tax_id,
            legal_name: m.legal_name,
            entry_date: m.entry_date,
            contact_name: m.contact_name,
            phone: m.phone,
            email: m.email,
            negotiation_status_id: m.negotiation_status_id.map(CategoryId),
            contract_nature_ids: contract_nature::decode(m.contract_nature_ids.as_deref()),
            followup_id: m.followup_id.map(CategoryId),
            line_count: m.line_count,
            branch_count: m.branch_count,
            city_id: m.city_id.map(CategoryId),
            consultant_id: m.consultant_id.map(CategoryId),
            acceptance_date: m.acceptance_date,
            acceptance_type_id: m.acceptance_type_id.map(CategoryId),
            acceptance_document_link: m.acceptance_document_link,
            notes_negotiation: m.notes_negotiation,
            notes_services: m.notes_services,
            notes_financial: m.notes_financial,
            metadata: EntityMetadata::from_parts(m.created_at, m.updated_at),
            archived: m.archived,
        }
    }
}

/// Every column except the primary key and `created_at`
fn to_active(aggregate: &Prospect) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        contract_number: Set(aggregate.contract_number.clone()),
        person_kind: Set(aggregate.person_kind.code().to_string()),
        tax_id: Set(aggregate.tax_id.clone()),
        legal_name: Set(aggregate.legal_name.clone()),
        entry_date: Set(aggregate.entry_date),
        contact_name: Set(aggregate.contact_name.clone()),
        phone: Set(aggregate.phone.clone()),
        email: Set(aggregate.email.clone()),
        negotiation_status_id: Set(aggregate.negotiation_status_id.map(|c| c.0)),
        contract_nature_ids: Set(contract_nature::encode(&aggregate.contract_nature_ids)),
        followup_id: Set(aggregate.followup_id.map(|c| c.0)),
        line_count: Set(aggregate.line_count),
        branch_count: Set(aggregate.branch_count),
        city_id: Set(aggregate.city_id.map(|c| c.0)),
        consultant_id: Set(aggregate.consultant_id.map(|c| c.0)),
        acceptance_date: Set(aggregate.acceptance_date),
        acceptance_type_id: Set(aggregate.acceptance_type_id.map(|c| c.0)),
        acceptance_document_link: Set(aggregate.acceptance_document_link.clone()),
        notes_negotiation: Set(aggregate.notes_negotiation.clone()),
        notes_services: Set(aggregate.notes_services.clone()),
        notes_financial: Set(aggregate.notes_financial.clone()),
        archived: Set(aggregate.archived),
        created_at: sea_orm::ActiveValue::NotSet,
        updated_at: Set(aggregate.metadata.updated_at),
    }
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: ProspectId) -> Result<Option<Prospect>, DbErr> {
    let result = Entity::find_by_id(id.0).one(db).await?;
    Ok(result.map(Into::into))
}

/// All stored contract numbers, in no particular order
pub async fn contract_numbers<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
    Entity::find()
        .select_only()
        .column(Column::ContractNumber)
        .into_tuple::<String>()
        .all(db)
        .await
}

/// One page of prospects, newest first, plus the total match count.
///
/// The search term matches contract number, legal name, contact name and
/// tax id.
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    archived: bool,
    search: Option<&str>,
    page: &PageRequest,
) -> Result<(Vec<Prospect>, u64), DbErr> {
    let mut query = Entity::find().filter(Column::Archived.eq(archived));
    if let Some(term) = search {
        query = query.filter(
            Condition::any()
                .add(Column::ContractNumber.contains(term))
                .add(Column::LegalName.contains(term))
                .add(Column::ContactName.contains(term))
                .add(Column::TaxId.contains(term)),
        );
    }

    let total = query.clone().count(db).await?;
    let items = query
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .offset(page.offset())
        .limit(page.per_page)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok((items, total))
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Prospect) -> Result<Prospect, DbErr> {
    let mut active = to_active(aggregate);
    active.created_at = Set(aggregate.metadata.created_at);
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Prospect) -> Result<(), DbErr> {
    let mut active = to_active(aggregate);
    active.id = Set(aggregate.id.0);
    active.update(db).await?;
    Ok(())
}

/// Hard delete; returns false when nothing matched
pub async fn delete<C: ConnectionTrait>(db: &C, id: ProspectId) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.0).exec(db).await?;
    Ok(result.rows_affected > 0)
}
