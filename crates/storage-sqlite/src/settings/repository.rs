use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::app_settings::dsl::*;
use crate::utils::parse_decimal_string_tolerant;
use lotfolio_core::errors::Result;
use lotfolio_core::settings::{Settings, SettingsRepositoryTrait, SettingsUpdate};

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_settings(&self) -> Result<Settings> {
        let mut conn = get_connection(&self.pool)?;
        let all_settings: Vec<(String, String)> = app_settings
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .into_core()?;

        let mut settings = Settings::default();

        for (key, value) in all_settings {
            match key.as_str() {
                "base_currency" => settings.base_currency = value,
                "default_sell_tax_rate" => {
                    settings.default_sell_tax_rate =
                        parse_decimal_string_tolerant(&value, "default_sell_tax_rate");
                }
                "default_dividend_tax_rate" => {
                    settings.default_dividend_tax_rate =
                        parse_decimal_string_tolerant(&value, "default_dividend_tax_rate");
                }
                _ => {} // Ignore unknown settings
            }
        }

        Ok(settings)
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        let update = update.clone();
        self.writer
            .exec(move |conn| {
                if let Some(ref currency) = update.base_currency {
                    diesel::replace_into(app_settings)
                        .values(&AppSettingDB {
                            setting_key: "base_currency".to_string(),
                            setting_value: currency.clone(),
                        })
                        .execute(conn)?;
                }

                if let Some(rate) = update.default_sell_tax_rate {
                    diesel::replace_into(app_settings)
                        .values(&AppSettingDB {
                            setting_key: "default_sell_tax_rate".to_string(),
                            setting_value: rate.to_string(),
                        })
                        .execute(conn)?;
                }

                if let Some(rate) = update.default_dividend_tax_rate {
                    diesel::replace_into(app_settings)
                        .values(&AppSettingDB {
                            setting_key: "default_dividend_tax_rate".to_string(),
                            setting_value: rate.to_string(),
                        })
                        .execute(conn)?;
                }

                Ok(())
            })
            .await
    }
}
