use super::repository;
use crate::domain::a001_category::repository as category_repository;
use crate::shared::error::{ServiceError, ServiceResult};
use contracts::domain::a001_category::aggregate::{Category, CategoryId};
use contracts::domain::a002_subcategory::aggregate::{
    Subcategory, SubcategoryDto, SubcategoryId, SubcategorySearchItem, SubcategoryUpdateDto,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::api::{SearchQuery, SEARCH_LIMIT};
use sea_orm::{DatabaseConnection, TransactionTrait};

fn already_exists(name: &str) -> String {
    format!("Subcategoria \"{}\" já existe nesta categoria", name)
}

fn not_found() -> ServiceError {
    ServiceError::NotFound(Subcategory::not_found_message())
}

/// Активные подкатегории, optionally of one category
pub async fn list(
    db: &DatabaseConnection,
    category_id: Option<CategoryId>,
) -> ServiceResult<Vec<Subcategory>> {
    Ok(repository::list_active(db, category_id).await?)
}

/// Single subcategory, archived ones included
pub async fn get_by_id(db: &DatabaseConnection, id: SubcategoryId) -> ServiceResult<Subcategory> {
    repository::get_by_id(db, id).await?.ok_or_else(not_found)
}

/// Создание подкатегории под существующей активной категорией
pub async fn create(db: &DatabaseConnection, dto: SubcategoryDto) -> ServiceResult<Subcategory> {
    let new = dto.validate().map_err(ServiceError::Validation)?;

    let txn = db.begin().await?;
    let parent = category_repository::get_by_id(&txn, new.category_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(Category::not_found_message()))?;
    if !parent.active {
        return Err(ServiceError::Validation(format!(
            "Categoria \"{}\" está arquivada",
            parent.name
        )));
    }

    if repository::find_by_name_in_category(&txn, &new.name, new.category_id, None)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(already_exists(&new.name)));
    }

    let mut created = repository::insert(&txn, &new)
        .await
        .map_err(|e| ServiceError::from(e).integrity_as_conflict(already_exists(&new.name)))?;
    txn.commit().await?;

    created.category_name = Some(parent.name);
    tracing::info!(
        "Subcategory created: {} ({}) under category {}",
        created.name,
        created.id,
        created.category_id
    );
    Ok(created)
}

/// Обновление подкатегории; the parent never changes
pub async fn update(
    db: &DatabaseConnection,
    id: SubcategoryId,
    dto: SubcategoryUpdateDto,
) -> ServiceResult<Subcategory> {
    let patch = dto.validate().map_err(ServiceError::Validation)?;

    let txn = db.begin().await?;
    let mut subcategory = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;

    if let Some(name) = &patch.name {
        if repository::find_by_name_in_category(&txn, name, subcategory.category_id, Some(id))
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(already_exists(name)));
        }
    }

    subcategory.apply(patch);
    subcategory.before_write();
    repository::update(&txn, &subcategory)
        .await
        .map_err(|e| ServiceError::from(e).integrity_as_conflict(already_exists(&subcategory.name)))?;
    txn.commit().await?;

    Ok(subcategory)
}

/// Unconditional soft delete
pub async fn archive(db: &DatabaseConnection, id: SubcategoryId) -> ServiceResult<()> {
    let txn = db.begin().await?;
    let mut subcategory = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;
    subcategory.archive();
    repository::update(&txn, &subcategory).await?;
    txn.commit().await?;

    tracing::info!("Subcategory archived: {}", id);
    Ok(())
}

pub async fn search(
    db: &DatabaseConnection,
    query: &SearchQuery,
) -> ServiceResult<Vec<SubcategorySearchItem>> {
    let Some(term) = query.term() else {
        return Ok(Vec::new());
    };
    let category_id = query.categoria_id.map(CategoryId);
    Ok(repository::search(db, term, category_id, SEARCH_LIMIT).await?)
}
