//! OBD-II response decoding for ELM327-style adapters
//!
//! The mobile client forwards the text an ELM327 adapter answers to each
//! request (e.g. `"41 0C 1A F8\r\r>"`). This module turns such lines into
//! typed readings (service 01) and diagnostic trouble codes (service 03).
//!
//! Both the spaced form (`41 0C 1A F8`) and the compact form produced after
//! `AT S0` (`410C1AF8`) are accepted. Replies are decoded line by line, so
//! a `SEARCHING...` prefix or an echoed request does not hide the data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Positive response service identifiers (request SID + 0x40)
pub mod service {
    /// Show current data (service 01)
    pub const CURRENT_DATA: u8 = 0x41;
    /// Show stored DTCs (service 03)
    pub const STORED_DTCS: u8 = 0x43;
}

/// Service 01 PIDs understood by [`decode_response`]
pub mod pid {
    pub const ENGINE_LOAD: u8 = 0x04;
    pub const COOLANT_TEMP: u8 = 0x05;
    pub const INTAKE_PRESSURE: u8 = 0x0B;
    pub const ENGINE_RPM: u8 = 0x0C;
    pub const VEHICLE_SPEED: u8 = 0x0D;
    pub const INTAKE_AIR_TEMP: u8 = 0x0F;
    pub const MAF_RATE: u8 = 0x10;
    pub const THROTTLE_POSITION: u8 = 0x11;
    pub const FUEL_LEVEL: u8 = 0x2F;
    pub const MODULE_VOLTAGE: u8 = 0x42;
    pub const AMBIENT_AIR_TEMP: u8 = 0x46;
}

/// A decoded service 01 value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Stable key for the quantity (e.g. "RPM", "CoolantTemp")
    pub key: String,
    /// PID as two upper-case hex digits
    pub pid: String,
    pub value: f64,
    pub unit: String,
}

/// Trouble code category, from the top two bits of the first DTC byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtcCategory {
    /// P codes - Powertrain (engine, transmission)
    Powertrain,
    /// C codes - Chassis (ABS, suspension)
    Chassis,
    /// B codes - Body (airbags, climate control)
    Body,
    /// U codes - Network (communication)
    Network,
}

impl DtcCategory {
    /// Get category from DTC high byte
    pub fn from_high_byte(high_byte: u8) -> Self {
        match (high_byte >> 6) & 0x03 {
            0 => DtcCategory::Powertrain,
            1 => DtcCategory::Chassis,
            2 => DtcCategory::Body,
            _ => DtcCategory::Network,
        }
    }

    /// Get category prefix character
    pub fn prefix(&self) -> char {
        match self {
            DtcCategory::Powertrain => 'P',
            DtcCategory::Chassis => 'C',
            DtcCategory::Body => 'B',
            DtcCategory::Network => 'U',
        }
    }
}

impl std::fmt::Display for DtcCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DtcCategory::Powertrain => "powertrain",
            DtcCategory::Chassis => "chassis",
            DtcCategory::Body => "body",
            DtcCategory::Network => "network",
        };
        f.write_str(s)
    }
}

/// A stored diagnostic trouble code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroubleCode {
    /// Five-character code (e.g. "P0133")
    pub code: String,
    pub category: DtcCategory,
    /// The two raw bytes as four hex digits
    pub raw: String,
}

impl TroubleCode {
    /// Decode a two-byte OBD-II DTC.
    ///
    /// Returns `None` for the `00 00` padding the adapter uses to fill frames.
    pub fn from_bytes(high: u8, low: u8) -> Option<Self> {
        if high == 0 && low == 0 {
            return None;
        }
        let category = DtcCategory::from_high_byte(high);
        // High byte bits 5-4 = first digit (0-3), bits 3-0 = second digit
        let code = format!(
            "{}{:01X}{:01X}{:02X}",
            category.prefix(),
            (high >> 4) & 0x03,
            high & 0x0F,
            low
        );
        Some(Self {
            code,
            category,
            raw: format!("{:02X}{:02X}", high, low),
        })
    }
}

/// Outcome of decoding one adapter response
#[derive(Debug, Clone, PartialEq)]
pub enum ElmResponse {
    /// Adapter status text ("OK", "SEARCHING...", "ELM327 v1.5")
    Status(String),
    /// The vehicle did not answer the request
    NoData,
    /// The adapter failed to talk to the bus
    AdapterError(String),
    /// A decoded service 01 value
    Reading(Reading),
    /// Stored trouble codes from service 03 (possibly empty)
    TroubleCodes(Vec<TroubleCode>),
    /// Anything that could not be interpreted
    Unrecognized(String),
    /// The adapter echoing the command it was sent (`010C`, `ATZ`)
    Echo(String),
}

impl ElmResponse {
    fn is_data(&self) -> bool {
        matches!(self, Self::Reading(_) | Self::TroubleCodes(_))
    }
}

/// Split a reply into cleaned, non-empty lines (prompt removed, upper-cased)
fn reply_lines(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(['\r', '\n'])
        .map(|line| line.replace('>', "").trim().to_uppercase())
        .filter(|line| !line.is_empty())
}

fn classify_text(line: &str) -> Option<ElmResponse> {
    if line == "OK"
        || line.contains('?')
        || line.contains("SEARCHING")
        || line.contains("ELM327")
        || line.contains("STOPPED")
    {
        return Some(ElmResponse::Status(line.to_string()));
    }
    if line.contains("NO DATA") {
        return Some(ElmResponse::NoData);
    }
    if line.contains("UNABLE TO CONNECT") || line.contains("CAN ERROR") {
        return Some(ElmResponse::AdapterError(line.to_string()));
    }
    if line.starts_with("AT") {
        return Some(ElmResponse::Echo(line.to_string()));
    }
    None
}

/// Decode a single cleaned line
fn decode_line(line: &str) -> ElmResponse {
    if let Some(text) = classify_text(line) {
        return text;
    }

    let compact: String = line.split_whitespace().collect();
    let bytes = match hex::decode(&compact) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => return ElmResponse::Unrecognized(line.to_string()),
    };

    match bytes[0] {
        // Requests are modes 0x01..=0x0A; the reply sets bit 6
        0x01..=0x0A => ElmResponse::Echo(line.to_string()),
        service::CURRENT_DATA if bytes.len() >= 2 => decode_current_data(bytes[1], &bytes[2..])
            .map(ElmResponse::Reading)
            .unwrap_or_else(|| ElmResponse::Unrecognized(line.to_string())),
        service::STORED_DTCS => ElmResponse::TroubleCodes(decode_trouble_codes(&bytes[1..])),
        _ => ElmResponse::Unrecognized(line.to_string()),
    }
}

/// Decode every line of a raw adapter reply, in order
pub fn decode_reply(raw: &str) -> Vec<ElmResponse> {
    reply_lines(raw).map(|line| decode_line(&line)).collect()
}

/// Decode one raw adapter reply to its most useful outcome.
///
/// A reply may span several lines (`SEARCHING...`, an echoed command, then
/// the data). The first data line wins; otherwise the first line that is
/// not an echo; otherwise the echo itself.
pub fn decode_response(raw: &str) -> ElmResponse {
    let mut lines = decode_reply(raw);
    let pick = lines
        .iter()
        .position(ElmResponse::is_data)
        .or_else(|| lines.iter().position(|r| !matches!(r, ElmResponse::Echo(_))))
        .unwrap_or(0);
    if pick < lines.len() {
        lines.swap_remove(pick)
    } else {
        ElmResponse::Unrecognized(String::new())
    }
}

fn decode_current_data(pid: u8, data: &[u8]) -> Option<Reading> {
    let a = f64::from(*data.first()?);
    let word = || -> Option<f64> { Some(256.0 * a + f64::from(*data.get(1)?)) };
    let percent = a * 100.0 / 255.0;

    let (key, value, unit) = match pid {
        pid::ENGINE_LOAD => ("EngineLoad", percent, "%"),
        pid::COOLANT_TEMP => ("CoolantTemp", a - 40.0, "°C"),
        pid::INTAKE_PRESSURE => ("IntakePressure", a, "kPa"),
        pid::ENGINE_RPM => ("RPM", word()? / 4.0, "rpm"),
        pid::VEHICLE_SPEED => ("SpeedKmH", a, "km/h"),
        pid::INTAKE_AIR_TEMP => ("IntakeAirTemp", a - 40.0, "°C"),
        pid::MAF_RATE => ("MafRate", word()? / 100.0, "g/s"),
        pid::THROTTLE_POSITION => ("ThrottlePosition", percent, "%"),
        pid::FUEL_LEVEL => ("FuelLevel", percent, "%"),
        pid::MODULE_VOLTAGE => ("ModuleVoltage", word()? / 1000.0, "V"),
        pid::AMBIENT_AIR_TEMP => ("AmbientAirTemp", a - 40.0, "°C"),
        _ => return None,
    };

    Some(Reading {
        key: key.to_string(),
        pid: format!("{:02X}", pid),
        value,
        unit: unit.to_string(),
    })
}

/// Decode the payload of a service 03 response (after the `43` byte).
///
/// CAN adapters prefix the pairs with a count byte, which shows up as an
/// odd payload length; it is skipped.
pub fn decode_trouble_codes(payload: &[u8]) -> Vec<TroubleCode> {
    let pairs = if payload.len() % 2 == 1 {
        &payload[1..]
    } else {
        payload
    };
    pairs
        .chunks_exact(2)
        .filter_map(|pair| TroubleCode::from_bytes(pair[0], pair[1]))
        .collect()
}

/// Everything decoded from one batch of adapter responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Readings in the order they were received
    pub readings: Vec<Reading>,
    /// Distinct trouble codes in first-seen order
    pub trouble_codes: Vec<TroubleCode>,
    /// Adapter status and error lines
    pub statuses: Vec<String>,
    /// Lines that could not be decoded
    pub unrecognized: Vec<String>,
    /// Last value seen per reading key
    pub latest: BTreeMap<String, f64>,
}

impl ScanReport {
    /// Decode a batch of raw replies, line by line
    pub fn from_responses<S: AsRef<str>>(responses: &[S]) -> Self {
        let mut report = Self::default();
        for raw in responses {
            for response in decode_reply(raw.as_ref()) {
                report.push(response);
            }
        }
        report
    }

    fn push(&mut self, response: ElmResponse) {
        match response {
            ElmResponse::Reading(reading) => {
                self.latest.insert(reading.key.clone(), reading.value);
                self.readings.push(reading);
            }
            ElmResponse::TroubleCodes(codes) => {
                for code in codes {
                    if !self.trouble_codes.iter().any(|c| c.code == code.code) {
                        self.trouble_codes.push(code);
                    }
                }
            }
            ElmResponse::Status(text) | ElmResponse::AdapterError(text) => {
                self.statuses.push(text)
            }
            ElmResponse::NoData => self.statuses.push("NO DATA".to_string()),
            ElmResponse::Unrecognized(text) => {
                tracing::debug!(response = %text, "Unrecognized adapter response");
                self.unrecognized.push(text)
            }
            ElmResponse::Echo(_) => {}
        }
    }
}
