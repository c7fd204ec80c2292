use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportKind {
    #[default]
    Train,
    Flight,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Train => "TRAIN",
            TransportKind::Flight => "FLIGHT",
        }
    }

    /// Only the exact tag `FLIGHT` selects a flight; anything else is a train.
    pub fn from_tag(value: &str) -> Self {
        match value {
            "FLIGHT" => TransportKind::Flight,
            _ => TransportKind::Train,
        }
    }
}

/// One journey leg as shown on the printed card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    #[serde(rename = "type")]
    pub transport_kind: TransportKind,
    pub origin: String,
    pub destination: String,
    pub number: String,
    /// `YYYY-MM-DD`, taken as returned by the model.
    pub date: String,
    /// `HH:mm`, 24 hour clock, taken as returned by the model.
    pub time: String,
    pub passenger_name: String,
    pub gate_or_seat: String,
    pub extra_info: String,
}
