pub mod stdin;

use serde::de::DeserializeOwned;

/// Deserialise a command's single JSON input document from piped stdin.
pub fn load<T: DeserializeOwned>(what: &str) -> Result<T, Box<dyn std::error::Error>> {
    match stdin::read_stdin()? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err(format!("a JSON document on stdin is required for {what}").into()),
    }
}
