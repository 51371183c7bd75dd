/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations in application order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_kv_store",
            sql: include_str!("../../migrations/001_kv_store.sql"),
        },
        Migration {
            id: "002_kv_namespaces",
            sql: include_str!("../../migrations/002_kv_namespaces.sql"),
        },
    ]
}
