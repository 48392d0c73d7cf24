//! Command abstractions.

pub use uuid::Uuid;

/// Trait that all write commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}

/// Implements [`Command`] for structs carrying a `correlation_id: Uuid` field.
///
/// ```ignore
/// impl_command!(
///     CreateCharacter => "characters.create_character",
///     DeleteCharacter => "characters.delete_character",
/// );
/// ```
#[macro_export]
macro_rules! impl_command {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl $crate::command::Command for $ty {
                fn command_type(&self) -> &'static str {
                    $name
                }

                fn correlation_id(&self) -> $crate::command::Uuid {
                    self.correlation_id
                }
            }
        )*
    };
}
