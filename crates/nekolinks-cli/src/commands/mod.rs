//! Command handlers

pub mod anime;
pub mod config;
pub mod link;
pub mod settings;
pub mod tag;

use anyhow::{bail, Result};
use uuid::Uuid;

/// Resolve a record ID given in full or as an unambiguous prefix
///
/// `candidates` are the `(id, title)` pairs whose ID starts with `input`.
fn resolve_id(input: &str, kind: &str, candidates: Vec<(Uuid, &str)>) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(input) {
        return Ok(uuid);
    }

    if input.is_empty() {
        bail!("No {} ID given", kind);
    }

    match candidates.as_slice() {
        [] => bail!("No {} found matching: {}", kind, input),
        [(id, _)] => Ok(*id),
        _ => {
            eprintln!("Multiple {} entries match '{}':", kind, input);
            for (id, title) in &candidates {
                eprintln!("  {} - {}", id, title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_full_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(resolve_id(&id.to_string(), "link", vec![]).unwrap(), id);
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let id = Uuid::new_v4();
        let resolved = resolve_id("abc", "link", vec![(id, "Example")]).unwrap();
        assert_eq!(resolved, id);
    }

    #[test]
    fn test_resolve_no_match() {
        let err = resolve_id("abc", "anime", vec![]).unwrap_err();
        assert!(err.to_string().contains("No anime found"));
    }

    #[test]
    fn test_resolve_ambiguous() {
        let candidates = vec![(Uuid::new_v4(), "One"), (Uuid::new_v4(), "Two")];
        let err = resolve_id("a", "link", candidates).unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }

    #[test]
    fn test_resolve_empty_input() {
        assert!(resolve_id("", "link", vec![(Uuid::new_v4(), "One")]).is_err());
    }
}
