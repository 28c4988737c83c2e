use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingMethod {
    #[default]
    Pix,
    Boleto,
    CreditCard,
}

impl BillingMethod {
    pub fn from_str(input: &str) -> Option<Self> {
        match input {
            "pix" => Some(BillingMethod::Pix),
            "boleto" => Some(BillingMethod::Boleto),
            "credit_card" => Some(BillingMethod::CreditCard),
            _ => None,
        }
    }
}

impl Display for BillingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let method = match self {
            BillingMethod::Pix => "pix",
            BillingMethod::Boleto => "boleto",
            BillingMethod::CreditCard => "credit_card",
        };
        write!(f, "{}", method)
    }
}
