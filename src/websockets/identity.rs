use async_trait::async_trait;
use uuid::Uuid;

/// Trait for generating display names for connections that arrive without one
#[async_trait]
pub trait UsernameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based display name generator
pub struct PetNameUsernameGenerator;

impl PetNameUsernameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameUsernameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsernameGenerator for PetNameUsernameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}

/// Fresh opaque participant id for connections that arrive without one.
pub fn generate_participant_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_petname_username_generator() {
        let generator = PetNameUsernameGenerator::new();
        let name1 = generator.generate().await;
        let name2 = generator.generate().await;

        // Should generate non-empty names with dashes
        assert!(!name1.is_empty());
        assert!(name1.contains('-'));
        assert!(!name2.is_empty());
        assert!(name2.contains('-'));

        // Should typically be unique (though not guaranteed)
        // Just verify they're properly formatted
        let parts1: Vec<&str> = name1.split('-').collect();
        let parts2: Vec<&str> = name2.split('-').collect();
        assert_eq!(parts1.len(), 2);
        assert_eq!(parts2.len(), 2);
    }

    #[test]
    fn test_generated_participant_ids_are_unique() {
        let id1 = generate_participant_id();
        let id2 = generate_participant_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36); // uuid v4 text form
    }
}
