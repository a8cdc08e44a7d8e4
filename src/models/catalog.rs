use std::collections::BTreeSet;
use std::fmt;

use rusqlite::Connection;
use serde::Serialize;

/// An atomic grantable capability. Ids are unique across the whole catalog,
/// not just within a group.
#[derive(Debug, Clone, Serialize)]
pub struct Permission {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub description: String,
}

/// A named collection of related permissions; the unit of "select all/none"
/// in the editing UI.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionGroup {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug)]
pub enum CatalogError {
    Db(rusqlite::Error),
    DuplicateId(i64),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Db(e) => write!(f, "Database error: {e}"),
            CatalogError::DuplicateId(id) => {
                write!(f, "Permission id {id} appears in more than one group")
            }
        }
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Db(e)
    }
}

/// The full permission catalog: every group with its permissions, plus the
/// set of all permission ids. Loaded read-only; never mutated after load.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<PermissionGroup>,
    ids: BTreeSet<i64>,
}

impl Catalog {
    /// Build a catalog from groups, rejecting any permission id that appears
    /// more than once. Id uniqueness is validated here rather than trusted.
    pub fn from_groups(groups: Vec<PermissionGroup>) -> Result<Self, CatalogError> {
        let mut ids = BTreeSet::new();
        for group in &groups {
            for perm in &group.permissions {
                if !ids.insert(perm.id) {
                    return Err(CatalogError::DuplicateId(perm.id));
                }
            }
        }
        Ok(Catalog { groups, ids })
    }

    pub fn groups(&self) -> &[PermissionGroup] {
        &self.groups
    }

    /// All permission ids, in ascending order.
    pub fn ids(&self) -> &BTreeSet<i64> {
        &self.ids
    }

    pub fn contains(&self, permission_id: i64) -> bool {
        self.ids.contains(&permission_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Load the complete catalog. An empty database yields an empty catalog;
/// a query failure is an error — callers must not conflate the two.
pub fn load(conn: &Connection) -> Result<Catalog, CatalogError> {
    let mut group_stmt = conn.prepare(
        "SELECT id, name, description FROM permission_groups ORDER BY sort_order, id",
    )?;
    let mut groups = group_stmt
        .query_map([], |row| {
            Ok(PermissionGroup {
                id: row.get("id")?,
                name: row.get("name")?,
                description: row.get("description")?,
                permissions: vec![],
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut perm_stmt = conn.prepare(
        "SELECT id, code, label, description FROM permissions \
         WHERE group_id = ?1 ORDER BY sort_order, id",
    )?;
    for group in &mut groups {
        group.permissions = perm_stmt
            .query_map([group.id], |row| {
                Ok(Permission {
                    id: row.get("id")?,
                    code: row.get("code")?,
                    label: row.get("label")?,
                    description: row.get("description")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Catalog::from_groups(groups)
}
