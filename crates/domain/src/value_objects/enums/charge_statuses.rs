use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl ChargeStatus {
    pub fn from_str(input: &str) -> Option<Self> {
        match input {
            "pending" => Some(ChargeStatus::Pending),
            "paid" => Some(ChargeStatus::Paid),
            "overdue" => Some(ChargeStatus::Overdue),
            "cancelled" => Some(ChargeStatus::Cancelled),
            _ => None,
        }
    }
}

impl Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            ChargeStatus::Pending => "pending",
            ChargeStatus::Paid => "paid",
            ChargeStatus::Overdue => "overdue",
            ChargeStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", status)
    }
}
