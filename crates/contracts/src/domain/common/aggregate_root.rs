use super::EntityMetadata;

/// Трейт для корня агрегата
pub trait AggregateRoot {
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Singular display name, used in user-facing messages
    fn element_name() -> &'static str;

    /// Message used when a lookup by id misses
    fn not_found_message() -> String {
        format!("{} não encontrada", Self::element_name())
    }

    /// Refresh `updated_at` before a write
    fn before_write(&mut self) {
        self.metadata_mut().touch();
    }
}
