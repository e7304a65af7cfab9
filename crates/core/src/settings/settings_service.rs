use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::ValidationError;
use crate::settings::settings_model::{Settings, SettingsUpdate};
use crate::settings::settings_traits::{SettingsRepositoryTrait, SettingsServiceTrait};
use crate::Result;

/// Service for reading and updating application settings.
pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        Self {
            settings_repository,
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        self.settings_repository.get_settings()
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<Settings> {
        if let Some(ref currency) = update.base_currency {
            if currency.trim().is_empty() {
                return Err(ValidationError::MissingField("baseCurrency".to_string()).into());
            }
        }
        if let Some(rate) = update.default_sell_tax_rate {
            if rate.is_sign_negative() || rate > Decimal::ONE_HUNDRED {
                return Err(ValidationError::InvalidInput(
                    "default sell tax rate must be between 0 and 100 percent".to_string(),
                )
                .into());
            }
        }
        if let Some(rate) = update.default_dividend_tax_rate {
            if rate.is_sign_negative() || rate > Decimal::ONE {
                return Err(ValidationError::InvalidInput(
                    "default dividend tax rate must be between 0 and 1".to_string(),
                )
                .into());
            }
        }
        self.settings_repository.update_settings(&update).await?;
        self.settings_repository.get_settings()
    }
}
