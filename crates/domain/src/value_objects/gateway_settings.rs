use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::payment_gateway_settings::PaymentGatewaySettingEntity,
    value_objects::enums::payment_providers::PaymentProvider,
};

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertGatewaySettingModel {
    pub provider: PaymentProvider,
    pub api_key: String,
    pub api_token: Option<String>,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GatewaySettingDto {
    pub id: Uuid,
    pub provider: String,
    pub api_key_preview: String,
    pub is_enabled: bool,
    pub is_default: bool,
}

impl From<PaymentGatewaySettingEntity> for GatewaySettingDto {
    fn from(entity: PaymentGatewaySettingEntity) -> Self {
        Self {
            id: entity.id,
            provider: entity.provider,
            api_key_preview: mask_credential(&entity.api_key),
            is_enabled: entity.is_enabled,
            is_default: entity.is_default,
        }
    }
}

/// Keeps only the last four characters so stored credentials never leave the API whole.
fn mask_credential(credential: &str) -> String {
    let visible: String = credential
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_last_four_characters() {
        assert_eq!(mask_credential("APP_USR-123456789"), "****6789");
    }

    #[test]
    fn masks_short_credentials_without_panicking() {
        assert_eq!(mask_credential("ab"), "****ab");
    }
}
