use super::{numbering, repository};
use crate::domain::a001_category::service as category_service;
use crate::shared::error::{ServiceError, ServiceResult};
use contracts::domain::a003_prospect::aggregate::{
    Prospect, ProspectDetails, ProspectDto, ProspectId, ProspectUpdateDto,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::api::{ListQuery, Page};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

fn not_found() -> ServiceError {
    ServiceError::NotFound(Prospect::not_found_message())
}

/// Attach resolved category summaries to each prospect
async fn with_references<C: ConnectionTrait>(
    db: &C,
    prospects: Vec<Prospect>,
) -> ServiceResult<Vec<ProspectDetails>> {
    let refs: Vec<_> = prospects.iter().flat_map(|p| p.references()).collect();
    let categories = category_service::resolve(db, &refs).await?;
    let lookup = |id: Option<_>| id.and_then(|id| categories.get(&id).cloned());

    Ok(prospects
        .into_iter()
        .map(|p| ProspectDetails {
            negotiation_status: lookup(p.negotiation_status_id),
            contract_natures: p
                .contract_nature_ids
                .iter()
                .filter_map(|id| categories.get(id).cloned())
                .collect(),
            followup: lookup(p.followup_id),
            city: lookup(p.city_id),
            consultant: lookup(p.consultant_id),
            acceptance_type: lookup(p.acceptance_type_id),
            prospect: p,
        })
        .collect())
}

async fn details<C: ConnectionTrait>(db: &C, prospect: Prospect) -> ServiceResult<ProspectDetails> {
    with_references(db, vec![prospect])
        .await?
        .pop()
        .ok_or_else(not_found)
}

/// Список проспектов с пагинацией: newest first, archived or not
pub async fn list(
    db: &DatabaseConnection,
    query: &ListQuery,
) -> ServiceResult<Page<ProspectDetails>> {
    let page = query.page_request();
    let (items, total) =
        repository::list_page(db, query.archived(), query.search_term(), &page).await?;
    let items = with_references(db, items).await?;
    Ok(Page::new(items, total, &page))
}

pub async fn get_by_id(db: &DatabaseConnection, id: ProspectId) -> ServiceResult<ProspectDetails> {
    let prospect = repository::get_by_id(db, id).await?.ok_or_else(not_found)?;
    details(db, prospect).await
}

/// Создание проспекта: validate, reserve a contract number, insert
pub async fn create(db: &DatabaseConnection, dto: ProspectDto) -> ServiceResult<ProspectDetails> {
    dto.validate().map_err(ServiceError::Validation)?;

    let txn = db.begin().await?;
    let explicit = dto.explicit_contract_number().map(str::to_owned);
    let contract_number = numbering::assign(&txn, explicit.as_deref()).await?;

    let mut prospect = Prospect::new_for_insert(contract_number, dto);
    category_service::ensure_references_exist(&txn, &prospect.references()).await?;
    prospect.before_write();

    let created = repository::insert(&txn, &prospect).await?;
    let result = details(&txn, created).await?;
    txn.commit().await?;

    tracing::info!(
        "Prospect created: {} (contract {})",
        result.prospect.id,
        result.prospect.contract_number
    );
    Ok(result)
}

/// Allow-listed partial update with re-validation of touched identifiers
pub async fn update(
    db: &DatabaseConnection,
    id: ProspectId,
    dto: ProspectUpdateDto,
) -> ServiceResult<ProspectDetails> {
    let txn = db.begin().await?;
    let mut prospect = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;

    dto.validate_against(&prospect)
        .map_err(ServiceError::Validation)?;
    prospect.apply(dto);
    category_service::ensure_references_exist(&txn, &prospect.references()).await?;
    prospect.before_write();

    repository::update(&txn, &prospect).await?;
    let result = details(&txn, prospect).await?;
    txn.commit().await?;
    Ok(result)
}

/// Archive or unarchive. Idempotent; only the flag and `updated_at` change.
pub async fn set_archived(
    db: &DatabaseConnection,
    id: ProspectId,
    archived: bool,
) -> ServiceResult<()> {
    let txn = db.begin().await?;
    let mut prospect = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;
    prospect.set_archived(archived);
    repository::update(&txn, &prospect).await?;
    txn.commit().await?;

    tracing::info!("Prospect {} archived={}", id, archived);
    Ok(())
}

/// Hard delete. Pendencies are not linked by key and stay untouched.
pub async fn delete(db: &DatabaseConnection, id: ProspectId) -> ServiceResult<()> {
    let txn = db.begin().await?;
    if !repository::delete(&txn, id).await? {
        return Err(not_found());
    }
    txn.commit().await?;

    tracing::info!("Prospect deleted: {}", id);
    Ok(())
}
