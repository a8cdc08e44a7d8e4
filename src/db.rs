use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, params};
use serde::Deserialize;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

const CATALOG_SEED: &str = include_str!("../data/seed/catalog.json");

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

#[derive(Deserialize)]
struct SeedCatalog {
    groups: Vec<SeedGroup>,
}

#[derive(Deserialize)]
struct SeedGroup {
    name: String,
    description: String,
    permissions: Vec<SeedPermission>,
}

#[derive(Deserialize)]
struct SeedPermission {
    code: String,
    label: String,
    description: String,
}

fn insert_catalog(conn: &Connection, seed: &SeedCatalog) -> rusqlite::Result<usize> {
    let mut created = 0;
    for (gi, group) in seed.groups.iter().enumerate() {
        conn.execute(
            "INSERT INTO permission_groups (name, description, sort_order) VALUES (?1, ?2, ?3)",
            params![group.name, group.description, gi as i64],
        )?;
        let group_id = conn.last_insert_rowid();
        for (pi, perm) in group.permissions.iter().enumerate() {
            conn.execute(
                "INSERT INTO permissions (group_id, code, label, description, sort_order) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![group_id, perm.code, perm.label, perm.description, pi as i64],
            )?;
            created += 1;
        }
    }
    Ok(created)
}

/// Seed the permission catalog and an `admin` user holding every permission.
/// Skipped when the catalog is already populated.
pub fn seed_catalog(pool: &DbPool, admin_password_hash: &str) {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM permission_groups", [], |row| row.get(0))
        .unwrap_or(0);
    if count > 0 {
        log::info!("Catalog already seeded ({count} groups), skipping");
        return;
    }

    let seed: SeedCatalog = serde_json::from_str(CATALOG_SEED)
        .unwrap_or_else(|e| panic!("Bad catalog seed JSON: {e}"));

    let created = insert_catalog(&conn, &seed).expect("Failed to insert catalog seed");

    conn.execute(
        "INSERT INTO users (username, password, display_name) VALUES ('admin', ?1, 'Administrator')",
        params![admin_password_hash],
    )
    .expect("Failed to create admin user");
    let admin_id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO user_permissions (user_id, permission_id) \
         SELECT ?1, id FROM permissions",
        params![admin_id],
    )
    .expect("Failed to grant admin permissions");

    log::info!("Catalog seed complete: {} groups, {} permissions", seed.groups.len(), created);
}
