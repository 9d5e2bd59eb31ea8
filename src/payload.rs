//! Share token codec.
//!
//! A token is `base64(json)` where the JSON object is `{"m": message, "t": seconds}`.
//! Tokens produced by the browser build (`btoa(JSON.stringify(..))`) decode unchanged.

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine,
};
use percent_encoding::percent_decode_str;
use serde_json::{json, Value};
use thiserror::Error;

/// What a share link carries: the message to reveal and how long to wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    pub message: String,
    pub duration_secs: u32,
}

impl TimerConfig {
    pub fn new(message: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            message: message.into(),
            duration_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is empty")]
    Empty,
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("payload has no message")]
    MissingMessage,
    #[error("payload has no duration")]
    MissingDuration,
    #[error("duration {0} is not a positive whole number of seconds")]
    InvalidDuration(String),
}

pub fn encode(config: &TimerConfig) -> String {
    let payload = json!({ "m": config.message, "t": config.duration_secs });
    STANDARD.encode(payload.to_string())
}

pub fn decode(token: &str) -> Result<TimerConfig, DecodeError> {
    let token = token.trim().trim_start_matches('#');
    let token = percent_decode_str(token).decode_utf8_lossy();

    // accept both alphabets and optional padding
    let normalized: String = token
        .chars()
        .filter(|c| *c != '=' && !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    if normalized.is_empty() {
        return Err(DecodeError::Empty);
    }

    let bytes = STANDARD_NO_PAD.decode(normalized.as_bytes())?;
    let text = String::from_utf8(bytes)?;
    let Value::Object(mut fields) = serde_json::from_str::<Value>(&text)? else {
        return Err(DecodeError::NotAnObject);
    };

    let message = match fields.remove("m") {
        Some(Value::String(m)) if !m.is_empty() => m,
        _ => return Err(DecodeError::MissingMessage),
    };
    let duration_secs = match fields.get("t") {
        None | Some(Value::Null) => return Err(DecodeError::MissingDuration),
        Some(t) => duration_from_value(t)?,
    };

    Ok(TimerConfig {
        message,
        duration_secs,
    })
}

fn duration_from_value(value: &Value) -> Result<u32, DecodeError> {
    match value {
        Value::Number(n) => {
            if let Some(secs) = n.as_u64() {
                return positive_secs(secs).ok_or_else(|| invalid(value));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= 1.0 && f <= u32::MAX as f64 => Ok(f as u32),
                _ => Err(invalid(value)),
            }
        }
        Value::String(s) => parse_duration(s).ok_or_else(|| invalid(value)),
        _ => Err(invalid(value)),
    }
}

fn invalid(value: &Value) -> DecodeError {
    DecodeError::InvalidDuration(value.to_string())
}

fn positive_secs(secs: u64) -> Option<u32> {
    u32::try_from(secs).ok().filter(|s| *s > 0)
}

/// Parses a textual duration as carried by links: a positive whole number of seconds.
pub fn parse_duration(text: &str) -> Option<u32> {
    text.trim().parse::<u64>().ok().and_then(positive_secs)
}
