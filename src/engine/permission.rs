//! Role-based statement permissions.
//!
//! Each role maps to a fixed list of uppercase SQL verbs. A statement may run
//! only when its leading verb appears in the list for the configured role.
//! Unknown roles resolve to the `readonly` list, never to anything wider.

/// Role with read access only. Also the fallback for unknown roles.
pub const READONLY_ROLE: &str = "readonly";
pub const WRITER_ROLE: &str = "writer";
pub const ADMIN_ROLE: &str = "admin";

pub const READONLY_VERBS: &[&str] = &["SELECT", "SHOW", "DESCRIBE", "EXPLAIN"];

pub const WRITER_VERBS: &[&str] = &[
    "SELECT", "SHOW", "DESCRIBE", "EXPLAIN", "INSERT", "UPDATE", "DELETE",
];

// Multi-word entries never match a single-token verb; the bare leading
// keyword (CREATE, DROP, ...) is what grants those statements.
pub const ADMIN_VERBS: &[&str] = &[
    "SELECT",
    "SHOW",
    "DESCRIBE",
    "EXPLAIN",
    "INSERT",
    "UPDATE",
    "DELETE",
    "CREATE",
    "ALTER",
    "DROP",
    "TRUNCATE",
    "CREATE VIEW",
    "SHOW VIEW",
    "CREATE PROCEDURE",
    "ALTER PROCEDURE",
    "DROP PROCEDURE",
    "CREATE EVENT",
    "ALTER EVENT",
    "DROP EVENT",
    "CREATE TRIGGER",
    "ALTER TRIGGER",
    "DROP TRIGGER",
    "CREATE USER",
    "ALTER USER",
    "DROP USER",
    "CREATE ROLE",
    "ALTER ROLE",
    "DROP ROLE",
    "GRANT",
    "REVOKE",
    "LOCK TABLES",
    "UNLOCK TABLES",
    "CREATE DATABASE",
    "ALTER DATABASE",
    "DROP DATABASE",
    "CREATE TABLE",
    "ALTER TABLE",
    "DROP TABLE",
    "CREATE INDEX",
    "ALTER INDEX",
    "DROP INDEX",
    "ALTER VIEW",
    "DROP VIEW",
    "USE",
];

/// Static role table.
const ROLE_PERMISSIONS: &[(&str, &[&str])] = &[
    (READONLY_ROLE, READONLY_VERBS),
    (WRITER_ROLE, WRITER_VERBS),
    (ADMIN_ROLE, ADMIN_VERBS),
];

/// The verbs one role may execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    /// Role as configured, kept verbatim for denial messages.
    role: String,
    verbs: &'static [&'static str],
}

impl PermissionSet {
    /// The configured role this set was resolved for.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Allowed verbs, in table order.
    pub fn verbs(&self) -> &'static [&'static str] {
        self.verbs
    }

    /// Check whether an uppercase verb is allowed.
    pub fn allows(&self, verb: &str) -> bool {
        self.verbs.contains(&verb)
    }
}

/// Resolve the permission set for a role.
///
/// Lookup is exact. Any role not in the table gets the `readonly` verbs.
pub fn permissions_for(role: &str) -> PermissionSet {
    let verbs = ROLE_PERMISSIONS
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, verbs)| *verbs)
        .unwrap_or(READONLY_VERBS);

    tracing::debug!(role = %role, verbs = ?verbs, "Resolved role permissions");

    PermissionSet {
        role: role.to_string(),
        verbs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readonly_vocabulary() {
        let set = permissions_for("readonly");
        assert_eq!(set.verbs(), &["SELECT", "SHOW", "DESCRIBE", "EXPLAIN"]);
        assert!(set.allows("SELECT"));
        assert!(!set.allows("INSERT"));
        assert!(!set.allows("DROP"));
    }

    #[test]
    fn test_writer_allows_dml_but_not_ddl() {
        let set = permissions_for("writer");
        for verb in ["SELECT", "SHOW", "DESCRIBE", "EXPLAIN", "INSERT", "UPDATE", "DELETE"] {
            assert!(set.allows(verb), "writer should allow {verb}");
        }
        for verb in ["CREATE", "DROP", "ALTER", "TRUNCATE", "GRANT"] {
            assert!(!set.allows(verb), "writer should not allow {verb}");
        }
    }

    #[test]
    fn test_admin_allows_ddl_and_use() {
        let set = permissions_for("admin");
        for verb in ["CREATE", "ALTER", "DROP", "TRUNCATE", "GRANT", "REVOKE", "USE"] {
            assert!(set.allows(verb), "admin should allow {verb}");
        }
    }

    #[test]
    fn test_admin_verbs_have_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for verb in ADMIN_VERBS {
            assert!(seen.insert(verb), "duplicate verb {verb}");
        }
    }

    #[test]
    fn test_roles_are_nested() {
        let writer = permissions_for("writer");
        let admin = permissions_for("admin");
        for verb in READONLY_VERBS {
            assert!(writer.allows(verb));
        }
        for verb in WRITER_VERBS {
            assert!(admin.allows(verb));
        }
    }

    #[test]
    fn test_unknown_role_falls_back_to_readonly() {
        let set = permissions_for("superuser");
        assert_eq!(set.verbs(), READONLY_VERBS);
        assert_eq!(set.role(), "superuser");
        assert!(!set.allows("DROP"));
    }

    #[test]
    fn test_role_lookup_is_case_sensitive() {
        assert_eq!(permissions_for("ADMIN").verbs(), READONLY_VERBS);
        assert_eq!(permissions_for("").verbs(), READONLY_VERBS);
    }

    #[test]
    fn test_verbs_are_matched_exactly() {
        let set = permissions_for("admin");
        assert!(!set.allows("select"));
        assert!(!set.allows("SET"));
    }
}
