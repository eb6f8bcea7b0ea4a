use serde::{Deserialize, Serialize};

use crate::aggregate_id;
use crate::domain::a001_category::aggregate::{trimmed_or_empty, CategoryId};
use crate::domain::common::{AggregateRoot, EntityMetadata};
use crate::shared::text::normalize_name;

aggregate_id!(
    /// Уникальный идентификатор подкатегории
    SubcategoryId
);

/// Subcategory, unique by name within its owning category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "descricao")]
    pub description: String,

    #[serde(rename = "categoria_id")]
    pub category_id: CategoryId,

    #[serde(rename = "categoria_nome", default)]
    pub category_name: Option<String>,

    #[serde(rename = "ativo")]
    pub active: bool,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Subcategory {
    pub fn apply(&mut self, patch: SubcategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    pub fn archive(&mut self) {
        self.active = false;
        self.before_write();
    }
}

impl AggregateRoot for Subcategory {
    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn element_name() -> &'static str {
        "Subcategoria"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategorySearchItem {
    pub id: SubcategoryId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria_id")]
    pub category_id: CategoryId,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubcategoryDto {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub categoria_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubcategory {
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
}

impl SubcategoryDto {
    pub fn validate(&self) -> Result<NewSubcategory, String> {
        let name = self
            .nome
            .as_deref()
            .map(normalize_name)
            .filter(|n| !n.is_empty());

        match (name, self.categoria_id) {
            (Some(name), Some(category_id)) => Ok(NewSubcategory {
                name,
                description: trimmed_or_empty(self.descricao.as_deref()),
                category_id: CategoryId(category_id),
            }),
            _ => Err("Nome da subcategoria e categoria são obrigatórios".into()),
        }
    }
}

/// The owning category is fixed at creation; only name and description move.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubcategoryUpdateDto {
    pub nome: Option<String>,
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubcategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SubcategoryUpdateDto {
    pub fn validate(&self) -> Result<SubcategoryPatch, String> {
        let name = match self.nome.as_deref() {
            Some(raw) => {
                let name = normalize_name(raw);
                if name.is_empty() {
                    return Err("Nome da subcategoria é obrigatório".into());
                }
                Some(name)
            }
            None => None,
        };

        Ok(SubcategoryPatch {
            name,
            description: self.descricao.as_deref().map(|s| s.trim().to_string()),
        })
    }
}
