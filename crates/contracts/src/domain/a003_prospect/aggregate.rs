use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate_id;
use crate::domain::a001_category::aggregate::{CategoryId, CategorySummary};
use crate::domain::common::{AggregateRoot, EntityMetadata};
use crate::enums::{CategoryRef, PersonKind, ReferenceKind};
use crate::shared::serde_helpers::double_option;
use crate::shared::validation::{is_valid_email, is_valid_phone};

use super::contract_nature::dedup_ordered;

// ============================================================================
// ID Type
// ============================================================================

aggregate_id!(
    /// Уникальный идентификатор проспекта
    ProspectId
);

pub const CONTRACT_NUMBER_MAX_LEN: usize = 10;

const PHONE_FORMAT_MESSAGE: &str = "Celular inválido. Use o formato (XX) XXXXX-XXXX";

// ============================================================================
// Aggregate Root
// ============================================================================

/// Sales prospect: a lead or contract being negotiated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub id: ProspectId,

    /// Assigned once at creation, never changed
    #[serde(rename = "numero_contrato")]
    pub contract_number: String,

    #[serde(rename = "tipo_pessoa")]
    pub person_kind: PersonKind,

    /// CPF or CNPJ, stored as entered
    #[serde(rename = "cpf_cnpj")]
    pub tax_id: String,

    #[serde(rename = "nome_razao_social")]
    pub legal_name: String,

    #[serde(rename = "data_entrada")]
    pub entry_date: NaiveDate,

    #[serde(rename = "nome_responsavel")]
    pub contact_name: String,

    #[serde(rename = "celular")]
    pub phone: String,

    pub email: String,

    #[serde(rename = "status_negociacao_id")]
    pub negotiation_status_id: Option<CategoryId>,

    #[serde(rename = "natureza_contrato_ids")]
    pub contract_nature_ids: Vec<CategoryId>,

    #[serde(rename = "followup_id")]
    pub followup_id: Option<CategoryId>,

    #[serde(rename = "total_linhas")]
    pub line_count: Option<i32>,

    #[serde(rename = "filiais")]
    pub branch_count: Option<i32>,

    #[serde(rename = "cidade_id")]
    pub city_id: Option<CategoryId>,

    #[serde(rename = "consultor_id")]
    pub consultant_id: Option<CategoryId>,

    #[serde(rename = "data_aceite")]
    pub acceptance_date: Option<NaiveDate>,

    #[serde(rename = "tipo_aceite_id")]
    pub acceptance_type_id: Option<CategoryId>,

    #[serde(rename = "link_upload_aceite")]
    pub acceptance_document_link: Option<String>,

    #[serde(rename = "descricao_tratativas")]
    pub notes_negotiation: Option<String>,

    #[serde(rename = "descricao_servicos")]
    pub notes_services: Option<String>,

    #[serde(rename = "descricao_financeiro")]
    pub notes_financial: Option<String>,

    #[serde(flatten)]
    pub metadata: EntityMetadata,

    #[serde(rename = "arquivado")]
    pub archived: bool,
}

impl Prospect {
    /// Build a new record from a validated DTO; the id is assigned on insert.
    pub fn new_for_insert(contract_number: String, dto: ProspectDto) -> Self {
        Self {
            id: ProspectId(0),
            contract_number,
            person_kind: dto.tipo_pessoa,
            tax_id: dto.cpf_cnpj.trim().to_string(),
            legal_name: dto.nome_razao_social.trim().to_string(),
            entry_date: dto.data_entrada,
            contact_name: dto.nome_responsavel.trim().to_string(),
            phone: dto.celular.trim().to_string(),
            email: dto.email.trim().to_string(),
            negotiation_status_id: dto.status_negociacao_id.map(CategoryId),
            contract_nature_ids: dedup_ordered(
                &dto.natureza_contrato_ids
                    .into_iter()
                    .map(CategoryId)
                    .collect::<Vec<_>>(),
            ),
            followup_id: dto.followup_id.map(CategoryId),
            line_count: dto.total_linhas,
            branch_count: dto.filiais,
            city_id: dto.cidade_id.map(CategoryId),
            consultant_id: dto.consultor_id.map(CategoryId),
            acceptance_date: dto.data_aceite,
            acceptance_type_id: dto.tipo_aceite_id.map(CategoryId),
            acceptance_document_link: dto.link_upload_aceite,
            notes_negotiation: dto.descricao_tratativas,
            notes_services: dto.descricao_servicos,
            notes_financial: dto.descricao_financeiro,
            metadata: EntityMetadata::new(),
            archived: false,
        }
    }

    /// Every category the record points at, tagged with what it means here
    pub fn references(&self) -> Vec<CategoryRef> {
        let mut refs: Vec<CategoryRef> = [
            (ReferenceKind::NegotiationStatus, self.negotiation_status_id),
            (ReferenceKind::Followup, self.followup_id),
            (ReferenceKind::City, self.city_id),
            (ReferenceKind::Consultant, self.consultant_id),
            (ReferenceKind::AcceptanceType, self.acceptance_type_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| CategoryRef::optional(kind, id.map(|c| c.0)))
        .collect();

        refs.extend(
            self.contract_nature_ids
                .iter()
                .map(|id| CategoryRef::new(ReferenceKind::ContractNature, id.0)),
        );
        refs
    }

    /// Apply an allow-listed partial update.
    ///
    /// Contract number, id, timestamps and the archive flag are not reachable
    /// from here.
    pub fn apply(&mut self, dto: ProspectUpdateDto) {
        if let Some(kind) = dto.tipo_pessoa {
            self.person_kind = kind;
        }
        if let Some(tax_id) = dto.cpf_cnpj {
            self.tax_id = tax_id.trim().to_string();
        }
        if let Some(name) = dto.nome_razao_social {
            self.legal_name = name.trim().to_string();
        }
        if let Some(date) = dto.data_entrada {
            self.entry_date = date;
        }
        if let Some(name) = dto.nome_responsavel {
            self.contact_name = name.trim().to_string();
        }
        if let Some(phone) = dto.celular {
            self.phone = phone.trim().to_string();
        }
        if let Some(email) = dto.email {
            self.email = email.trim().to_string();
        }
        if let Some(v) = dto.status_negociacao_id {
            self.negotiation_status_id = v.map(CategoryId);
        }
        if let Some(v) = dto.natureza_contrato_ids {
            let ids: Vec<CategoryId> = v.unwrap_or_default().into_iter().map(CategoryId).collect();
            self.contract_nature_ids = dedup_ordered(&ids);
        }
        if let Some(v) = dto.followup_id {
            self.followup_id = v.map(CategoryId);
        }
        if let Some(v) = dto.total_linhas {
            self.line_count = v;
        }
        if let Some(v) = dto.filiais {
            self.branch_count = v;
        }
        if let Some(v) = dto.cidade_id {
            self.city_id = v.map(CategoryId);
        }
        if let Some(v) = dto.consultor_id {
            self.consultant_id = v.map(CategoryId);
        }
        if let Some(v) = dto.data_aceite {
            self.acceptance_date = v;
        }
        if let Some(v) = dto.tipo_aceite_id {
            self.acceptance_type_id = v.map(CategoryId);
        }
        if let Some(v) = dto.link_upload_aceite {
            self.acceptance_document_link = v;
        }
        if let Some(v) = dto.descricao_tratativas {
            self.notes_negotiation = v;
        }
        if let Some(v) = dto.descricao_servicos {
            self.notes_services = v;
        }
        if let Some(v) = dto.descricao_financeiro {
            self.notes_financial = v;
        }
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
        self.before_write();
    }
}

impl AggregateRoot for Prospect {
    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn element_name() -> &'static str {
        "Prospecção"
    }
}

/// Prospect together with the categories its ids resolve to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectDetails {
    #[serde(flatten)]
    pub prospect: Prospect,

    #[serde(rename = "status_negociacao")]
    pub negotiation_status: Option<CategorySummary>,

    #[serde(rename = "naturezas_contrato", default)]
    pub contract_natures: Vec<CategorySummary>,

    pub followup: Option<CategorySummary>,

    #[serde(rename = "cidade")]
    pub city: Option<CategorySummary>,

    #[serde(rename = "consultor")]
    pub consultant: Option<CategorySummary>,

    #[serde(rename = "tipo_aceite")]
    pub acceptance_type: Option<CategorySummary>,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Тело запроса на создание проспекта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectDto {
    /// Explicit number; generated when absent
    #[serde(default)]
    pub numero_contrato: Option<String>,
    pub tipo_pessoa: PersonKind,
    pub cpf_cnpj: String,
    pub nome_razao_social: String,
    pub data_entrada: NaiveDate,
    pub nome_responsavel: String,
    pub celular: String,
    pub email: String,
    #[serde(default)]
    pub status_negociacao_id: Option<i32>,
    #[serde(default)]
    pub natureza_contrato_ids: Vec<i32>,
    #[serde(default)]
    pub followup_id: Option<i32>,
    #[serde(default)]
    pub total_linhas: Option<i32>,
    #[serde(default)]
    pub filiais: Option<i32>,
    #[serde(default)]
    pub cidade_id: Option<i32>,
    #[serde(default)]
    pub consultor_id: Option<i32>,
    #[serde(default)]
    pub data_aceite: Option<NaiveDate>,
    #[serde(default)]
    pub tipo_aceite_id: Option<i32>,
    #[serde(default)]
    pub link_upload_aceite: Option<String>,
    #[serde(default)]
    pub descricao_tratativas: Option<String>,
    #[serde(default)]
    pub descricao_servicos: Option<String>,
    #[serde(default)]
    pub descricao_financeiro: Option<String>,
}

impl ProspectDto {
    /// Field checks run before anything touches the database
    pub fn validate(&self) -> Result<(), String> {
        validate_tax_id(self.tipo_pessoa, &self.cpf_cnpj)?;

        if !is_valid_email(self.email.trim()) {
            return Err("E-mail inválido".into());
        }
        if !is_valid_phone(self.celular.trim()) {
            return Err(PHONE_FORMAT_MESSAGE.into());
        }
        if self.nome_razao_social.trim().is_empty() {
            return Err("Nome/Razão social é obrigatório".into());
        }
        if self.nome_responsavel.trim().is_empty() {
            return Err("Nome do responsável é obrigatório".into());
        }
        if let Some(number) = self.explicit_contract_number() {
            if number.len() > CONTRACT_NUMBER_MAX_LEN {
                return Err("Número de contrato inválido".into());
            }
        }
        Ok(())
    }

    /// Trimmed explicit contract number, `None` when absent or blank
    pub fn explicit_contract_number(&self) -> Option<&str> {
        self.numero_contrato
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Allow-listed partial update.
///
/// Absent keys leave the field untouched; for nullable fields an explicit
/// `null` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProspectUpdateDto {
    #[serde(default)]
    pub tipo_pessoa: Option<PersonKind>,
    #[serde(default)]
    pub cpf_cnpj: Option<String>,
    #[serde(default)]
    pub nome_razao_social: Option<String>,
    #[serde(default)]
    pub data_entrada: Option<NaiveDate>,
    #[serde(default)]
    pub nome_responsavel: Option<String>,
    #[serde(default)]
    pub celular: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub status_negociacao_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub natureza_contrato_ids: Option<Option<Vec<i32>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub followup_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_linhas: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub filiais: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cidade_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub consultor_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub data_aceite: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tipo_aceite_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub link_upload_aceite: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub descricao_tratativas: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub descricao_servicos: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub descricao_financeiro: Option<Option<String>>,
}

impl ProspectUpdateDto {
    /// Re-validate every identifier or contact the update touches, against
    /// the values the record will hold afterwards.
    pub fn validate_against(&self, current: &Prospect) -> Result<(), String> {
        if self.tipo_pessoa.is_some() || self.cpf_cnpj.is_some() {
            let kind = self.tipo_pessoa.unwrap_or(current.person_kind);
            let tax_id = self.cpf_cnpj.as_deref().unwrap_or(&current.tax_id);
            validate_tax_id(kind, tax_id)?;
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email.trim()) {
                return Err("E-mail inválido".into());
            }
        }
        if let Some(phone) = &self.celular {
            if !is_valid_phone(phone.trim()) {
                return Err(PHONE_FORMAT_MESSAGE.into());
            }
        }
        if matches!(&self.nome_razao_social, Some(n) if n.trim().is_empty()) {
            return Err("Nome/Razão social é obrigatório".into());
        }
        if matches!(&self.nome_responsavel, Some(n) if n.trim().is_empty()) {
            return Err("Nome do responsável é obrigatório".into());
        }
        Ok(())
    }
}

fn validate_tax_id(kind: PersonKind, tax_id: &str) -> Result<(), String> {
    if kind.is_valid_tax_id(tax_id) {
        Ok(())
    } else {
        Err(format!("{} inválido", kind.tax_id_label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto() -> ProspectDto {
        serde_json::from_value(serde_json::json!({
            "tipo_pessoa": "PF",
            "cpf_cnpj": "529.982.247-25",
            "nome_razao_social": "João da Silva",
            "data_entrada": "2024-03-01",
            "nome_responsavel": "João da Silva",
            "celular": "(11) 98765-4321",
            "email": "joao@exemplo.com.br",
            "natureza_contrato_ids": [3, 1, 3]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_dto_passes() {
        assert_eq!(sample_dto().validate(), Ok(()));
    }

    #[test]
    fn test_field_specific_messages() {
        let mut dto = sample_dto();
        dto.cpf_cnpj = "111.111.111-11".into();
        assert_eq!(dto.validate().unwrap_err(), "CPF inválido");

        let mut dto = sample_dto();
        dto.tipo_pessoa = PersonKind::Organization;
        assert_eq!(dto.validate().unwrap_err(), "CNPJ inválido");

        let mut dto = sample_dto();
        dto.email = "joao@".into();
        assert_eq!(dto.validate().unwrap_err(), "E-mail inválido");

        let mut dto = sample_dto();
        dto.celular = "11987654321".into();
        assert_eq!(dto.validate().unwrap_err(), PHONE_FORMAT_MESSAGE);
    }

    #[test]
    fn test_new_for_insert_dedups_contract_natures() {
        let prospect = Prospect::new_for_insert("0001".into(), sample_dto());
        assert_eq!(prospect.contract_nature_ids, vec![CategoryId(3), CategoryId(1)]);
        assert!(!prospect.archived);
        let kinds: Vec<ReferenceKind> = prospect.references().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReferenceKind::ContractNature, ReferenceKind::ContractNature]);
    }

    #[test]
    fn test_update_revalidates_tax_id_against_new_kind() {
        let prospect = Prospect::new_for_insert("0001".into(), sample_dto());
        let switch_kind = ProspectUpdateDto {
            tipo_pessoa: Some(PersonKind::Organization),
            ..Default::default()
        };
        assert_eq!(
            switch_kind.validate_against(&prospect).unwrap_err(),
            "CNPJ inválido"
        );

        let switch_both = ProspectUpdateDto {
            tipo_pessoa: Some(PersonKind::Organization),
            cpf_cnpj: Some("11.222.333/0001-81".into()),
            ..Default::default()
        };
        assert_eq!(switch_both.validate_against(&prospect), Ok(()));
    }

    #[test]
    fn test_update_can_clear_nullable_fields() {
        let mut dto = sample_dto();
        dto.cidade_id = Some(5);
        let mut prospect = Prospect::new_for_insert("0001".into(), dto);

        let patch: ProspectUpdateDto = serde_json::from_value(serde_json::json!({
            "cidade_id": null,
            "total_linhas": 12
        }))
        .unwrap();
        prospect.apply(patch);

        assert_eq!(prospect.city_id, None);
        assert_eq!(prospect.line_count, Some(12));
        assert_eq!(prospect.contract_number, "0001");
    }

    #[test]
    fn test_update_ignores_unknown_and_protected_fields() {
        let patch: ProspectUpdateDto = serde_json::from_value(serde_json::json!({
            "numero_contrato": "9999",
            "id": 77,
            "arquivado": true
        }))
        .unwrap();
        let mut prospect = Prospect::new_for_insert("0001".into(), sample_dto());
        let before = prospect.clone();
        prospect.apply(patch);
        assert_eq!(prospect, before);
    }
}
