use serde::{Deserialize, Serialize};

/// Kind of party behind a prospect; decides which tax id applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonKind {
    /// Pessoa física, identified by CPF
    #[serde(rename = "PF")]
    Individual,
    /// Pessoa jurídica, identified by CNPJ
    #[serde(rename = "PJ")]
    Organization,
}

impl PersonKind {
    pub fn code(&self) -> &'static str {
        match self {
            PersonKind::Individual => "PF",
            PersonKind::Organization => "PJ",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PF" => Some(PersonKind::Individual),
            "PJ" => Some(PersonKind::Organization),
            _ => None,
        }
    }

    /// Name of the tax document, as shown in validation messages
    pub fn tax_id_label(&self) -> &'static str {
        match self {
            PersonKind::Individual => "CPF",
            PersonKind::Organization => "CNPJ",
        }
    }

    pub fn is_valid_tax_id(&self, tax_id: &str) -> bool {
        match self {
            PersonKind::Individual => crate::shared::validation::is_valid_cpf(tax_id),
            PersonKind::Organization => crate::shared::validation::is_valid_cnpj(tax_id),
        }
    }
}

impl std::fmt::Display for PersonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
