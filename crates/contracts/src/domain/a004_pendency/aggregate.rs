use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate_id;
use crate::domain::a001_category::aggregate::{CategoryId, CategorySummary};
use crate::domain::common::{AggregateRoot, EntityMetadata};
use crate::enums::{CategoryRef, ReferenceKind};
use crate::shared::serde_helpers::double_option;

aggregate_id!(
    /// Уникальный идентификатор задачи
    PendencyId
);

/// Follow-up task owned by a module/screen and optionally tied to a client.
///
/// No field validation beyond type coercion; completion date and the
/// management flag are informational and never gate archiving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pendency {
    pub id: PendencyId,

    #[serde(rename = "data_entrada")]
    pub entry_date: NaiveDate,

    #[serde(rename = "data_prevista")]
    pub due_date: NaiveDate,

    #[serde(rename = "data_finalizacao")]
    pub completion_date: Option<NaiveDate>,

    #[serde(rename = "status_pendencia_id")]
    pub status_id: Option<CategoryId>,

    /// Client id of an external system, not checked here
    #[serde(rename = "cliente_id")]
    pub client_id: Option<i32>,

    #[serde(rename = "aba_mae")]
    pub parent_tab: Option<String>,

    #[serde(rename = "aba_principal")]
    pub primary_tab: Option<String>,

    #[serde(rename = "colaborador_id")]
    pub owner_id: Option<CategoryId>,

    #[serde(rename = "descricao")]
    pub description: Option<String>,

    #[serde(rename = "visto_gerencia")]
    pub seen_by_management: bool,

    #[serde(flatten)]
    pub metadata: EntityMetadata,

    #[serde(rename = "arquivado")]
    pub archived: bool,
}

impl Pendency {
    pub fn new_for_insert(dto: PendencyDto) -> Self {
        Self {
            id: PendencyId(0),
            entry_date: dto
                .data_entrada
                .unwrap_or_else(|| Utc::now().date_naive()),
            due_date: dto.data_prevista,
            completion_date: dto.data_finalizacao,
            status_id: dto.status_pendencia_id.map(CategoryId),
            client_id: dto.cliente_id,
            parent_tab: dto.aba_mae,
            primary_tab: dto.aba_principal,
            owner_id: dto.colaborador_id.map(CategoryId),
            description: dto.descricao,
            seen_by_management: dto.visto_gerencia.unwrap_or(false),
            metadata: EntityMetadata::new(),
            archived: false,
        }
    }

    pub fn references(&self) -> Vec<CategoryRef> {
        [
            (ReferenceKind::PendencyStatus, self.status_id),
            (ReferenceKind::Collaborator, self.owner_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| CategoryRef::optional(kind, id.map(|c| c.0)))
        .collect()
    }

    pub fn apply(&mut self, dto: PendencyUpdateDto) {
        if let Some(v) = dto.data_entrada {
            self.entry_date = v;
        }
        if let Some(v) = dto.data_prevista {
            self.due_date = v;
        }
        if let Some(v) = dto.data_finalizacao {
            self.completion_date = v;
        }
        if let Some(v) = dto.status_pendencia_id {
            self.status_id = v.map(CategoryId);
        }
        if let Some(v) = dto.cliente_id {
            self.client_id = v;
        }
        if let Some(v) = dto.aba_mae {
            self.parent_tab = v;
        }
        if let Some(v) = dto.aba_principal {
            self.primary_tab = v;
        }
        if let Some(v) = dto.colaborador_id {
            self.owner_id = v.map(CategoryId);
        }
        if let Some(v) = dto.descricao {
            self.description = v;
        }
        if let Some(v) = dto.visto_gerencia {
            self.seen_by_management = v;
        }
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
        self.before_write();
    }
}

impl AggregateRoot for Pendency {
    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn element_name() -> &'static str {
        "Pendência"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendencyDetails {
    #[serde(flatten)]
    pub pendency: Pendency,

    #[serde(rename = "status_pendencia")]
    pub status: Option<CategorySummary>,

    #[serde(rename = "colaborador")]
    pub owner: Option<CategorySummary>,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendencyDto {
    /// Defaults to today
    #[serde(default)]
    pub data_entrada: Option<NaiveDate>,
    pub data_prevista: NaiveDate,
    #[serde(default)]
    pub data_finalizacao: Option<NaiveDate>,
    #[serde(default)]
    pub status_pendencia_id: Option<i32>,
    #[serde(default)]
    pub cliente_id: Option<i32>,
    #[serde(default)]
    pub aba_mae: Option<String>,
    #[serde(default)]
    pub aba_principal: Option<String>,
    #[serde(default)]
    pub colaborador_id: Option<i32>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub visto_gerencia: Option<bool>,
}

/// Allow-listed partial update; `null` clears nullable fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendencyUpdateDto {
    #[serde(default)]
    pub data_entrada: Option<NaiveDate>,
    #[serde(default)]
    pub data_prevista: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub data_finalizacao: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status_pendencia_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cliente_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub aba_mae: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub aba_principal: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub colaborador_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub descricao: Option<Option<String>>,
    #[serde(default)]
    pub visto_gerencia: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pendency {
        let dto: PendencyDto = serde_json::from_value(serde_json::json!({
            "data_prevista": "2024-05-10",
            "aba_mae": "Comercial",
            "colaborador_id": 4
        }))
        .unwrap();
        Pendency::new_for_insert(dto)
    }

    #[test]
    fn test_defaults_on_create() {
        let p = sample();
        assert_eq!(p.entry_date, Utc::now().date_naive());
        assert!(!p.seen_by_management);
        assert!(!p.archived);
        assert_eq!(
            p.references(),
            vec![CategoryRef::new(ReferenceKind::Collaborator, 4)]
        );
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let res = serde_json::from_value::<PendencyDto>(serde_json::json!({
            "data_prevista": "10/05/2024"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn test_complete_and_clear() {
        let mut p = sample();
        p.apply(
            serde_json::from_value(serde_json::json!({
                "data_finalizacao": "2024-05-09",
                "visto_gerencia": true,
                "colaborador_id": null
            }))
            .unwrap(),
        );
        assert_eq!(
            p.completion_date,
            NaiveDate::from_ymd_opt(2024, 5, 9)
        );
        assert!(p.seen_by_management);
        assert_eq!(p.owner_id, None);
        assert_eq!(p.parent_tab.as_deref(), Some("Comercial"));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["data_prevista"], "2024-05-10");
        assert_eq!(json["arquivado"], false);
        assert_eq!(json["colaborador_id"], 4);
        assert!(json.get("updated_at").is_some());
    }
}
