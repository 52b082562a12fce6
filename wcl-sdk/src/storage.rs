// ABOUTME: Token persistence in a JSON file so tokens survive between runs
// ABOUTME: Stores, loads and clears the cached OAuth access token

use std::path::Path;

use crate::Result;
use crate::token::StoredToken;

pub fn store(path: &Path, token: &StoredToken) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_vec(token)?)?;
    Ok(())
}

pub fn load(path: &Path) -> Result<StoredToken> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn clear(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
        _ => Ok(()),
    }
}
