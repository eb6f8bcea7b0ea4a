//! Contract number assignment on top of the `sys_sequence_counter` table.

use contracts::domain::a003_prospect::numbering::{
    canonical_contract_number, format_contract_number, next_contract_value, parse_contract_number,
    CONTRACT_SEQUENCE,
};
use sea_orm::ConnectionTrait;

use super::repository;
use crate::shared::data::sequence;
use crate::shared::error::{ServiceError, ServiceResult};

/// Number for a new prospect, reserved inside the caller's transaction.
///
/// Explicit numbers are stored in canonical form and must be unused by value.
/// Without an explicit number the next value is one past the highest numeric
/// contract number or counter value, whichever is greater. Numeric explicit
/// numbers push the counter forward so they are never handed out again.
pub async fn assign<C: ConnectionTrait>(db: &C, explicit: Option<&str>) -> ServiceResult<String> {
    let counter = sequence::current(db, CONTRACT_SEQUENCE).await?;
    let existing = repository::contract_numbers(db).await?;

    if let Some(raw) = explicit {
        let number = canonical_contract_number(raw);
        let value = parse_contract_number(&number);
        // Rows written before numbers were stored zero-padded compare by value
        let taken = existing.iter().any(|stored| {
            *stored == number || (value.is_some() && parse_contract_number(stored) == value)
        });
        if taken {
            return Err(ServiceError::Conflict(format!(
                "Número de contrato \"{}\" já existe",
                number
            )));
        }
        if let Some(value) = value {
            if value > counter.unwrap_or(0) {
                sequence::compare_and_swap(db, CONTRACT_SEQUENCE, counter, value).await?;
            }
        }
        return Ok(number);
    }

    let next = next_contract_value(existing.iter().map(String::as_str), counter.unwrap_or(0));
    sequence::compare_and_swap(db, CONTRACT_SEQUENCE, counter, next).await?;

    let number = format_contract_number(next);
    tracing::debug!("Assigned contract number {}", number);
    Ok(number)
}
