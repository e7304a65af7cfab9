use super::settings_model::{Settings, SettingsUpdate};
use crate::Result;
use async_trait::async_trait;

/// Trait defining the contract for settings persistence.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()>;
}

/// Trait defining the contract for settings operations.
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;
    async fn update_settings(&self, update: SettingsUpdate) -> Result<Settings>;
}
