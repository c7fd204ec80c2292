use serde_json::Value;

use crate::domain::ticket::{TicketRecord, TransportKind};

/// Coerces whatever the model returned into a complete ticket.
///
/// Total: non-object input, missing keys, nulls and non-string values all fall
/// back to the empty defaults. Values are never reformatted.
pub fn normalize(raw: &Value) -> TicketRecord {
    let transport_kind = raw
        .get("type")
        .and_then(Value::as_str)
        .map(TransportKind::from_tag)
        .unwrap_or_default();

    TicketRecord {
        transport_kind,
        origin: text_field(raw, "origin"),
        destination: text_field(raw, "destination"),
        number: text_field(raw, "number"),
        date: text_field(raw, "date"),
        time: text_field(raw, "time"),
        passenger_name: text_field(raw, "passengerName"),
        gate_or_seat: text_field(raw, "gateOrSeat"),
        extra_info: text_field(raw, "extraInfo"),
    }
}

fn text_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}
