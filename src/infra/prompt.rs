pub const CHAT_SYSTEM_PROMPT: &str = "You are a JSON parser. Output only valid JSON.";

const FIELD_GUIDE: &str = r#"- type: "TRAIN" or "FLIGHT"
- origin: Departure city/station
- destination: Arrival city/station
- number: Flight number (e.g., CA1234) or Train number (e.g., G123)
- date: Date in YYYY-MM-DD format. If the year is missing, assume the current year.
- time: Departure time in HH:mm format (24 hour).
- passengerName: Name of the passenger if available.
- gateOrSeat: Seat number (for train) or Gate/Seat (for flight).
- extraInfo: Any short important note (e.g., "Check terminal 2")."#;

/// Instruction for providers that enforce the response schema themselves.
pub fn structured_prompt(text: &str) -> String {
    format!(
        "Analyze the following text which contains travel information (either a flight or a train ticket).\n\
         Extract the following information into a strict JSON object:\n\
         {FIELD_GUIDE}\n\n\
         Input Text:\n\"{text}\""
    )
}

/// Instruction for plain chat endpoints, which only have the prompt to go on.
pub fn chat_prompt(text: &str) -> String {
    format!(
        "You are a helpful assistant that parses travel tickets.\n\
         Analyze the following text: \"{text}\"\n\n\
         Return a JSON object with the following fields:\n\
         {FIELD_GUIDE}\n\n\
         RETURN ONLY JSON. NO MARKDOWN."
    )
}

/// Removes a surrounding markdown code fence (```` ``` ```` or ```` ```json ````)
/// from a model reply. Unfenced text is returned trimmed.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
