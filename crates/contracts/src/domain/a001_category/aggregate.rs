use serde::{Deserialize, Serialize};

use crate::aggregate_id;
use crate::domain::a002_subcategory::aggregate::Subcategory;
use crate::domain::common::{AggregateRoot, EntityMetadata};
use crate::shared::text::normalize_name;

// ============================================================================
// ID Type
// ============================================================================

aggregate_id!(
    /// Уникальный идентификатор категории
    CategoryId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Category of the shared taxonomy.
///
/// Categories double as a flexible enumeration store: negotiation statuses,
/// cities, consultants and so on are all categories told apart by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "descricao")]
    pub description: String,

    /// Free-text classification tag (e.g. "consultor")
    #[serde(rename = "tipo")]
    pub kind: String,

    #[serde(rename = "ativo")]
    pub active: bool,

    #[serde(flatten)]
    pub metadata: EntityMetadata,

    /// Active subcategories only
    #[serde(rename = "subcategorias", default)]
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    /// Apply a partial update. The name must already be normalized.
    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
    }

    pub fn archive(&mut self) {
        self.active = false;
        self.before_write();
    }
}

impl AggregateRoot for Category {
    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn element_name() -> &'static str {
        "Categoria"
    }
}

/// Compact view of a category embedded in records that reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "ativo")]
    pub active: bool,
}

/// Typeahead result item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySearchItem {
    pub id: CategoryId,
    #[serde(rename = "nome")]
    pub name: String,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Тело запроса на создание категории
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDto {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<String>,
}

/// Validated, normalized input for a new category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub kind: String,
}

impl CategoryDto {
    pub fn validate(&self) -> Result<NewCategory, String> {
        let name = self
            .nome
            .as_deref()
            .map(normalize_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| "Nome da categoria é obrigatório".to_string())?;

        Ok(NewCategory {
            name,
            description: trimmed_or_empty(self.descricao.as_deref()),
            kind: trimmed_or_empty(self.tipo.as_deref()),
        })
    }
}

/// Тело запроса на изменение категории; absent fields stay untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdateDto {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<String>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
}

impl CategoryUpdateDto {
    pub fn validate(&self) -> Result<CategoryPatch, String> {
        let name = match self.nome.as_deref() {
            Some(raw) => {
                let name = normalize_name(raw);
                if name.is_empty() {
                    return Err("Nome da categoria é obrigatório".into());
                }
                Some(name)
            }
            None => None,
        };

        Ok(CategoryPatch {
            name,
            description: self.descricao.as_deref().map(|s| s.trim().to_string()),
            kind: self.tipo.as_deref().map(|s| s.trim().to_string()),
        })
    }
}

pub(crate) fn trimmed_or_empty(value: Option<&str>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}
