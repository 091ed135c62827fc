//! Secrets file (`.env`) rendering.
//!
//! Maps environment variable names to generated credentials. Compose reads
//! this file next to `docker-compose.yml` and substitutes `${NAME}`
//! references, so the passwords never appear in the compose file itself.

use zeroize::Zeroizing;

use super::generator::Credential;

/// Ordered `NAME=value` pairs destined for the secrets file.
#[derive(Debug, Default)]
pub struct SecretsRegistry<'a> {
    entries: Vec<(&'a str, &'a Credential)>,
}

impl<'a> SecretsRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding. A later insert for the same name replaces the
    /// earlier value in place.
    pub fn insert(&mut self, env: &'a str, credential: &'a Credential) {
        match self.entries.iter_mut().find(|(name, _)| *name == env) {
            Some(entry) => entry.1 = credential,
            None => self.entries.push((env, credential)),
        }
    }

    /// All variable names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Render the file body. The returned buffer is wiped on drop.
    pub fn render(&self) -> Zeroizing<String> {
        let mut out = Zeroizing::new(String::from(
            "# Generated by wpstack - database credentials for docker compose.\n\
             # Keep this file out of version control.\n",
        ));

        for (name, credential) in &self.entries {
            out.push_str(name);
            out.push('=');
            out.push_str(&quote_value(credential.expose()));
            out.push('\n');
        }

        out
    }
}

/// Single-quote values that contain anything beyond `[A-Za-z0-9_]`.
/// Quoted values are taken literally by compose, so `$` and `#` survive.
fn quote_value(value: &str) -> Zeroizing<String> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Zeroizing::new(value.to_string())
    } else {
        Zeroizing::new(format!("'{value}'"))
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

/// Validate environment variable name format (SCREAMING_SNAKE).
///
/// Valid: `MYSQL_PASSWORD`, `DB_ROOT_PASSWORD`, `A1`
/// Invalid: `mysql-password`, `_PASSWORD`, `1PASSWORD`
pub fn is_valid_env_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{Alphabet, CredentialGenerator};

    fn credential(symbols: &str, seed: u64) -> Credential {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        CredentialGenerator::with_rng(
            StdRng::seed_from_u64(seed),
            Alphabet::new(symbols).unwrap(),
            16,
        )
        .generate()
        .unwrap()
    }

    #[test]
    fn test_env_name_validation() {
        // Valid names
        assert!(is_valid_env_name("MYSQL_PASSWORD"));
        assert!(is_valid_env_name("A"));
        assert!(is_valid_env_name("DB2_ROOT"));

        // Invalid names
        assert!(!is_valid_env_name(""));
        assert!(!is_valid_env_name("mysql_password")); // lowercase
        assert!(!is_valid_env_name("_PASSWORD")); // starts with underscore
        assert!(!is_valid_env_name("1PASSWORD")); // starts with digit
        assert!(!is_valid_env_name("DB-PASSWORD")); // hyphen
    }

    #[test]
    fn test_render_plain_values() {
        let root = credential("abc", 1);
        let app = credential("xyz", 2);

        let mut registry = SecretsRegistry::new();
        registry.insert("MYSQL_ROOT_PASSWORD", &root);
        registry.insert("MYSQL_PASSWORD", &app);

        let rendered = registry.render();
        assert!(rendered.starts_with('#'));
        assert!(rendered.contains(&format!("MYSQL_ROOT_PASSWORD={}\n", root.expose())));
        assert!(rendered.contains(&format!("MYSQL_PASSWORD={}\n", app.expose())));
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            ["MYSQL_ROOT_PASSWORD", "MYSQL_PASSWORD"]
        );
    }

    #[test]
    fn test_render_quotes_special_values() {
        let odd = credential("$#", 3);
        let mut registry = SecretsRegistry::new();
        registry.insert("TOKEN", &odd);

        let rendered = registry.render();
        assert!(rendered.contains(&format!("TOKEN='{}'\n", odd.expose())));
    }

    #[test]
    fn test_insert_replaces_existing_name() {
        let first = credential("abc", 4);
        let second = credential("xyz", 5);
        let mut registry = SecretsRegistry::new();
        registry.insert("PASSWORD", &first);
        registry.insert("PASSWORD", &second);

        assert_eq!(registry.names().collect::<Vec<_>>(), ["PASSWORD"]);
        assert!(registry.render().contains(second.expose()));
    }
}
