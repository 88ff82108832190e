//! Loading PEM keys from configuration values

use anyhow::Result;
use std::path::Path;

/// Accept either inline PEM or a path to a PEM file
///
/// Paths are tried relative to the working directory first, then relative to
/// `crate_dir` (callers pass their `CARGO_MANIFEST_DIR`).
pub fn read_pem(value: String, kind: &str, crate_dir: &str) -> Result<String> {
    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    let contents = std::fs::read_to_string(&value)
        .or_else(|_| std::fs::read_to_string(Path::new(crate_dir).join(&value)))
        .map_err(|e| anyhow::anyhow!("Failed to read {} key file: {}", kind, e))?;

    Ok(contents.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEM: &str = "-----BEGIN PUBLIC KEY-----\nMIIB\n-----END PUBLIC KEY-----";

    #[test]
    fn inline_pem_is_used_as_is() {
        assert_eq!(read_pem(PEM.to_string(), "public", "/nowhere").unwrap(), PEM);
    }

    #[test]
    fn paths_resolve_against_the_crate_dir() {
        let dir = std::env::temp_dir().join(format!("keys-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("public.pem"), format!("{}\n\n", PEM)).unwrap();

        let key = read_pem("public.pem".to_string(), "public", dir.to_str().unwrap()).unwrap();
        assert_eq!(key, PEM);

        let absolute = dir.join("public.pem").to_string_lossy().to_string();
        assert_eq!(read_pem(absolute, "public", "/nowhere").unwrap(), PEM);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_names_the_key_kind() {
        let err = read_pem("missing.pem".to_string(), "private", "/nowhere").unwrap_err();
        assert!(err.to_string().contains("private key file"));
    }
}
