use super::repository;
use crate::domain::a002_subcategory::repository as subcategory_repository;
use crate::shared::error::{ServiceError, ServiceResult};
use contracts::domain::a001_category::aggregate::{
    Category, CategoryDto, CategoryId, CategorySearchItem, CategorySummary, CategoryUpdateDto,
};
use contracts::domain::a002_subcategory::aggregate::SubcategoryDto;
use contracts::domain::common::AggregateRoot;
use contracts::enums::{CategoryRef, ReferenceKind};
use contracts::shared::api::{SearchQuery, SEARCH_LIMIT};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use std::collections::HashMap;

fn already_exists(name: &str) -> String {
    format!("Categoria \"{}\" já existe", name)
}

fn not_found() -> ServiceError {
    ServiceError::NotFound(Category::not_found_message())
}

/// Attach active subcategories to each category
async fn with_subcategories<C: ConnectionTrait>(
    db: &C,
    mut categories: Vec<Category>,
) -> ServiceResult<Vec<Category>> {
    let ids: Vec<i32> = categories.iter().map(|c| c.id.0).collect();
    let subs = subcategory_repository::list_active_for_categories(db, &ids).await?;
    for category in categories.iter_mut() {
        category.subcategories = subs
            .iter()
            .filter(|s| s.category_id == category.id)
            .cloned()
            .collect();
    }
    Ok(categories)
}

/// Активные категории, по имени
pub async fn list(db: &DatabaseConnection) -> ServiceResult<Vec<Category>> {
    let categories = repository::list_active(db).await?;
    with_subcategories(db, categories).await
}

/// Категория по ID (including archived ones)
pub async fn get_by_id(db: &DatabaseConnection, id: CategoryId) -> ServiceResult<Category> {
    let category = repository::get_by_id(db, id).await?.ok_or_else(not_found)?;
    let mut items = with_subcategories(db, vec![category]).await?;
    items.pop().ok_or_else(not_found)
}

/// Создание новой категории
pub async fn create(db: &DatabaseConnection, dto: CategoryDto) -> ServiceResult<Category> {
    let new = dto.validate().map_err(ServiceError::Validation)?;

    let txn = db.begin().await?;
    if repository::find_by_name(&txn, &new.name, None).await?.is_some() {
        return Err(ServiceError::Conflict(already_exists(&new.name)));
    }
    let created = repository::insert(&txn, &new)
        .await
        .map_err(|e| ServiceError::from(e).integrity_as_conflict(already_exists(&new.name)))?;
    txn.commit().await?;

    tracing::info!("Category created: {} ({})", created.name, created.id);
    Ok(created)
}

/// Обновление категории
pub async fn update(
    db: &DatabaseConnection,
    id: CategoryId,
    dto: CategoryUpdateDto,
) -> ServiceResult<Category> {
    let patch = dto.validate().map_err(ServiceError::Validation)?;

    let txn = db.begin().await?;
    let mut category = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;

    if let Some(name) = &patch.name {
        if repository::find_by_name(&txn, name, Some(id)).await?.is_some() {
            return Err(ServiceError::Conflict(already_exists(name)));
        }
    }

    category.apply(patch);
    category.before_write();
    repository::update(&txn, &category)
        .await
        .map_err(|e| ServiceError::from(e).integrity_as_conflict(already_exists(&category.name)))?;
    let mut items = with_subcategories(&txn, vec![category]).await?;
    txn.commit().await?;

    items.pop().ok_or_else(not_found)
}

/// Archive a category. Refused while it still has active subcategories.
pub async fn archive(db: &DatabaseConnection, id: CategoryId) -> ServiceResult<()> {
    let txn = db.begin().await?;
    let mut category = repository::get_by_id(&txn, id).await?.ok_or_else(not_found)?;

    let active_subcategories = subcategory_repository::count_active_in_category(&txn, id).await?;
    if active_subcategories > 0 {
        return Err(ServiceError::Validation(format!(
            "Não é possível arquivar a categoria. Existem {} subcategorias ativas.",
            active_subcategories
        )));
    }

    category.archive();
    repository::update(&txn, &category).await?;
    txn.commit().await?;

    tracing::info!("Category archived: {}", id);
    Ok(())
}

/// Typeahead; a blank term yields no results
pub async fn search(
    db: &DatabaseConnection,
    query: &SearchQuery,
) -> ServiceResult<Vec<CategorySearchItem>> {
    match query.term() {
        Some(term) => Ok(repository::search(db, term, SEARCH_LIMIT).await?),
        None => Ok(Vec::new()),
    }
}

/// Summaries of the referenced categories, keyed by id
pub async fn resolve<C: ConnectionTrait>(
    db: &C,
    refs: &[CategoryRef],
) -> ServiceResult<HashMap<CategoryId, CategorySummary>> {
    let mut ids: Vec<i32> = refs.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    let found = repository::summaries_by_ids(db, &ids).await?;
    Ok(found.into_iter().map(|s| (s.id, s)).collect())
}

/// Every referenced category must exist; the error names the offending field
pub async fn ensure_references_exist<C: ConnectionTrait>(
    db: &C,
    refs: &[CategoryRef],
) -> ServiceResult<()> {
    let found = resolve(db, refs).await?;
    match refs.iter().find(|r| !found.contains_key(&CategoryId(r.id))) {
        Some(missing) => Err(ServiceError::Validation(format!(
            "{}: categoria {} não encontrada",
            missing.kind.field_name(),
            missing.id
        ))),
        None => Ok(()),
    }
}

/// Default taxonomy: (name, reference kind the options serve, subcategories)
const DEFAULT_TAXONOMY: &[(&str, ReferenceKind, &[&str])] = &[
    (
        "Status Prospecção",
        ReferenceKind::NegotiationStatus,
        &[
            "Em andamento",
            "Aguardando retorno",
            "Proposta enviada",
            "Negociação",
            "Fechado - Ganho",
            "Fechado - Perdido",
            "Cancelado",
        ],
    ),
    (
        "Natureza do Contrato",
        ReferenceKind::ContractNature,
        &[
            "Telefonia Fixa",
            "Telefonia Móvel",
            "Internet",
            "Dados",
            "Voz sobre IP (VoIP)",
            "Serviços de Rede",
        ],
    ),
    (
        "Follow-up",
        ReferenceKind::Followup,
        &[
            "Ligar em 1 dia",
            "Ligar em 3 dias",
            "Ligar em 1 semana",
            "Ligar em 15 dias",
            "Ligar em 1 mês",
            "Enviar e-mail",
            "Enviar WhatsApp",
        ],
    ),
    (
        "Consultor",
        ReferenceKind::Consultant,
        &["João Silva", "Maria Santos", "Pedro Oliveira", "Ana Costa"],
    ),
    (
        "Tipo de Aceite de Contrato",
        ReferenceKind::AcceptanceType,
        &[
            "Assinatura física",
            "Assinatura digital",
            "E-mail de confirmação",
            "WhatsApp",
            "Verbal (gravado)",
        ],
    ),
];

/// Вставка тестовых данных: default categories with their subcategories.
///
/// Categories that already exist are left alone. Returns how many were created.
pub async fn insert_test_data(db: &DatabaseConnection) -> ServiceResult<usize> {
    let txn = db.begin().await?;
    let mut created = 0;

    for (name, kind, subcategories) in DEFAULT_TAXONOMY {
        let new = CategoryDto {
            nome: Some((*name).to_string()),
            descricao: Some(format!("Opções de {}", name)),
            tipo: Some(kind.default_category_tag().to_string()),
        }
        .validate()
        .map_err(ServiceError::Validation)?;

        if repository::find_by_name(&txn, &new.name, None).await?.is_some() {
            tracing::debug!("Default category {} already present", new.name);
            continue;
        }

        let category = repository::insert(&txn, &new).await?;
        for sub in subcategories.iter() {
            let new_sub = SubcategoryDto {
                nome: Some((*sub).to_string()),
                descricao: None,
                categoria_id: Some(category.id.0),
            }
            .validate()
            .map_err(ServiceError::Validation)?;
            subcategory_repository::insert(&txn, &new_sub).await?;
        }
        created += 1;
    }

    txn.commit().await?;
    tracing::info!("Default taxonomy: {} categories created", created);
    Ok(created)
}
