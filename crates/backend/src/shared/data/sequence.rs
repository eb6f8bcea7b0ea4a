//! Named monotonic counters (`sys_sequence_counter`).
//!
//! Writes are compare-and-swap: an update only lands if the stored value is
//! still the one the caller read, so two writers racing on the same counter
//! cannot both win.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::Set;

use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_sequence_counter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Current value, `None` if the counter was never written
pub async fn current<C: ConnectionTrait>(db: &C, name: &str) -> ServiceResult<Option<u64>> {
    let row = Entity::find_by_id(name.to_string()).one(db).await?;
    Ok(row.map(|m| m.value.max(0) as u64))
}

/// Move the counter from `expected` to `new_value`.
///
/// `expected == None` means the counter row must not exist yet. A lost race
/// surfaces as an integrity error.
pub async fn compare_and_swap<C: ConnectionTrait>(
    db: &C,
    name: &str,
    expected: Option<u64>,
    new_value: u64,
) -> ServiceResult<()> {
    match expected {
        None => {
            ActiveModel {
                name: Set(name.to_string()),
                value: Set(new_value as i64),
            }
            .insert(db)
            .await?;
        }
        Some(old) => {
            let result = Entity::update_many()
                .col_expr(Column::Value, Expr::value(new_value as i64))
                .filter(Column::Name.eq(name))
                .filter(Column::Value.eq(old as i64))
                .exec(db)
                .await?;
            if result.rows_affected == 0 {
                tracing::warn!("Counter {} moved concurrently (expected {})", name, old);
                return Err(ServiceError::Integrity(
                    "Erro de integridade dos dados".into(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::open_in_memory;

    #[tokio::test]
    async fn test_compare_and_swap() {
        let db = open_in_memory().await.unwrap();
        assert_eq!(current(&db, "c").await.unwrap(), None);

        compare_and_swap(&db, "c", None, 3).await.unwrap();
        assert_eq!(current(&db, "c").await.unwrap(), Some(3));

        compare_and_swap(&db, "c", Some(3), 4).await.unwrap();
        assert_eq!(current(&db, "c").await.unwrap(), Some(4));

        // Stale read
        let err = compare_and_swap(&db, "c", Some(3), 5).await.unwrap_err();
        assert!(matches!(err, ServiceError::Integrity(_)));
        assert_eq!(current(&db, "c").await.unwrap(), Some(4));

        // Row already created by someone else
        let err = compare_and_swap(&db, "c", None, 9).await.unwrap_err();
        assert!(matches!(err, ServiceError::Integrity(_)));
    }
}
