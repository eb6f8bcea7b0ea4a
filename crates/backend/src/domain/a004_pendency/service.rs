use super::repository;
use crate::domain::a001_category::service as category_service;
use crate::shared::error::{ServiceError, ServiceResult};
use contracts::domain::a004_pendency::aggregate::{
    Pendency, PendencyDetails, PendencyDto, PendencyId, PendencyUpdateDto,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::api::{ListQuery, Page};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

fn not_found() -> ServiceError {
    ServiceError::NotFound(Pendency::not_found_message())
}

async fn with_references<C: ConnectionTrait>(
    db: &C,
    pendencies: Vec<Pendency>,
) -> ServiceResult<Vec<PendencyDetails>> {
    let refs: Vec<_> = pendencies.iter().flat_map(|p| p.references()).collect();
    let categories = category_service::resolve(db, &refs).await?;

    Ok(pendencies
        .into_iter()
        .map(|p| PendencyDetails {
            status: p.status_id.and_then(|id| categories.get(&id).cloned()),
            owner: p.owner_id.and_then(|id| categories.get(&id).cloned()),
            pendency: p,
        })
        .collect())
}

async fn details<C: ConnectionTrait>(db: &C, pendency: Pendency) -> ServiceResult<PendencyDetails> {
    with_references(db, vec![pendency])
        .await?
        .pop()
        .ok_or_else(not_found)
}

/// Список задач: earliest due date first
pub async fn list(
    db: &DatabaseConnection,
    query: &ListQuery,
) -> ServiceResult<Page<PendencyDetails>> {
    let page = query.page_request();
    let (items, total) =
        repository::list_page(db, query.archived(), query.search_term(), &page).await?;
    let items = with_references(db, items).await?;
    Ok(Page::new(items, total, &page))
}

pub async fn get_by_id(db: &DatabaseConnection, id: PendencyId) -> ServiceResult<PendencyDetails> {
    let pendency = repository::get_by_id(db, id).await?.ok_or_else(not_found)?;
    details(db, pendency).await
}

pub async fn create(db: &DatabaseConnection, dto: PendencyDto) -> ServiceResult<PendencyDetails> {
    let mut pendency = Pendency::new_for_insert(dto);

    let txn = db.begin().await?;
    category_service::ensure_references_exist(&txn, &pendency.references()).await?;
    pendency.before_write();
    let created = repository::insert(&txn, &pendency).await?;
    let result = details(&txn, created).await?;
    txn.commit().await?;

    tracing::info!("Pendency created: {}", result.pendency.id);
    Ok(result)
}

pub async fn update(
    db: &DatabaseConnection,
    id: PendencyId,
    dto: PendencyUpdateDto,
) -> ServiceResult<PendencyDetails> {
    let txn = db.begin().await?;
    let mut pendency = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;

    pendency.apply(dto);
    category_service::ensure_references_exist(&txn, &pendency.references()).await?;
    pendency.before_write();

    repository::update(&txn, &pendency).await?;
    let result = details(&txn, pendency).await?;
    txn.commit().await?;
    Ok(result)
}

/// Archive or unarchive; completion state does not matter
pub async fn set_archived(
    db: &DatabaseConnection,
    id: PendencyId,
    archived: bool,
) -> ServiceResult<()> {
    let txn = db.begin().await?;
    let mut pendency = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;
    pendency.set_archived(archived);
    repository::update(&txn, &pendency).await?;
    txn.commit().await?;

    tracing::info!("Pendency {} archived={}", id, archived);
    Ok(())
}
