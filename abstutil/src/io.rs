use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Pretty-prints JSON. Serialization of the types in this workspace can't fail, so this doesn't
/// return a `Result`.
pub fn to_json<T: Serialize>(obj: &T) -> String {
    match serde_json::to_string_pretty(obj) {
        Ok(s) => s,
        Err(err) => panic!("Can't serialize to JSON: {}", err),
    }
}

pub fn write_json<T: Serialize>(path: &str, obj: &T) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    fs_err::write(path, to_json(obj))?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let raw = fs_err::read_to_string(path)?;
    let obj = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;
    Ok(obj)
}
