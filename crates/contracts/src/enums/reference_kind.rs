use serde::{Deserialize, Serialize};

/// What a category reference stands for on the record that holds it.
///
/// All of these point into the shared category table; the kind keeps the
/// meaning attached to the id so references are never mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    NegotiationStatus,
    ContractNature,
    Followup,
    City,
    Consultant,
    AcceptanceType,
    PendencyStatus,
    Collaborator,
}

impl ReferenceKind {
    /// Wire name of the id field that carries this reference
    pub fn field_name(&self) -> &'static str {
        match self {
            ReferenceKind::NegotiationStatus => "status_negociacao_id",
            ReferenceKind::ContractNature => "natureza_contrato_ids",
            ReferenceKind::Followup => "followup_id",
            ReferenceKind::City => "cidade_id",
            ReferenceKind::Consultant => "consultor_id",
            ReferenceKind::AcceptanceType => "tipo_aceite_id",
            ReferenceKind::PendencyStatus => "status_pendencia_id",
            ReferenceKind::Collaborator => "colaborador_id",
        }
    }

    /// `tipo` tag used by the default taxonomy for this kind of reference
    pub fn default_category_tag(&self) -> &'static str {
        match self {
            ReferenceKind::NegotiationStatus => "status_prospeccao",
            ReferenceKind::ContractNature => "natureza_contrato",
            ReferenceKind::Followup => "followup",
            ReferenceKind::City => "cidade",
            ReferenceKind::Consultant => "consultor",
            ReferenceKind::AcceptanceType => "tipo_aceite_contrato",
            ReferenceKind::PendencyStatus => "status_pendencia",
            ReferenceKind::Collaborator => "colaborador",
        }
    }
}

/// Typed pointer into the category table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub kind: ReferenceKind,
    pub id: i32,
}

impl CategoryRef {
    pub fn new(kind: ReferenceKind, id: i32) -> Self {
        Self { kind, id }
    }

    /// Builds a reference only when the optional id is present
    pub fn optional(kind: ReferenceKind, id: Option<i32>) -> Option<Self> {
        id.map(|id| Self::new(kind, id))
    }
}
