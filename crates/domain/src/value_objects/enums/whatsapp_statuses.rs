use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WhatsAppStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl WhatsAppStatus {
    pub fn from_str(input: &str) -> Option<Self> {
        match input {
            "disconnected" => Some(WhatsAppStatus::Disconnected),
            "connecting" => Some(WhatsAppStatus::Connecting),
            "connected" => Some(WhatsAppStatus::Connected),
            _ => None,
        }
    }
}

impl Display for WhatsAppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            WhatsAppStatus::Disconnected => "disconnected",
            WhatsAppStatus::Connecting => "connecting",
            WhatsAppStatus::Connected => "connected",
        };
        write!(f, "{}", status)
    }
}
