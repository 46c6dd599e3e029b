#[cfg(test)]
mod tests {
    use automap::adapter::AdapterRegistry;
    use automap::connection::{
        ColumnDescriptor, ColumnType, ForeignKeyOrigin, MemoryConnection, MemoryTable, PrimaryKey,
    };
    use automap::inspector::SchemaInspector;

    fn id_column() -> ColumnDescriptor {
        ColumnDescriptor::new("id", ColumnType::Integer).not_null()
    }

    fn keyed(columns: Vec<ColumnDescriptor>, pk: &str) -> MemoryTable {
        MemoryTable::new()
            .with_columns(columns)
            .with_primary_key(PrimaryKey::Single(pk.to_string()))
    }

    #[test]
    fn test_suffix_column_infers_single_key() {
        let conn = MemoryConnection::new("memory")
            .with_table("users", keyed(vec![id_column()], "id"))
            .with_table(
                "orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("user_id", ColumnType::Integer),
                        ColumnDescriptor::new("total", ColumnType::Other),
                    ],
                    "id",
                ),
            )
            .without_foreign_key_support();

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);

        let keys = inspector.foreign_keys_of("orders").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].source_table, "orders");
        assert_eq!(keys[0].source_column, "user_id");
        assert_eq!(keys[0].target_table, "users");
        assert_eq!(keys[0].target_column, "id");
        assert_eq!(keys[0].origin, ForeignKeyOrigin::Inferred);
        assert!(keys[0].constraint_name.starts_with("automap_fk_"));
    }

    #[test]
    fn test_no_suffix_columns_infer_nothing() {
        let conn = MemoryConnection::new("memory")
            .with_table("users", keyed(vec![id_column()], "id"))
            .with_table(
                "orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("notes", ColumnType::String),
                    ],
                    "id",
                ),
            )
            .without_foreign_key_support();

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);
        assert!(inspector.foreign_keys_of("orders").unwrap().is_empty());
    }

    #[test]
    fn test_camel_suffix_and_uppercase_target_key() {
        let conn = MemoryConnection::new("memory")
            .with_table(
                "Users",
                keyed(
                    vec![ColumnDescriptor::new("ID", ColumnType::Integer).not_null()],
                    "ID",
                ),
            )
            .with_table(
                "Orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("UserId", ColumnType::Integer),
                    ],
                    "id",
                ),
            )
            .without_foreign_key_support();

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);

        let keys = inspector.foreign_keys_of("Orders").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].target_table, "Users");
        assert_eq!(keys[0].target_column, "ID");
    }

    #[test]
    fn test_target_key_matching_source_column_is_accepted() {
        let conn = MemoryConnection::new("memory")
            .with_table(
                "accounts",
                keyed(
                    vec![ColumnDescriptor::new("account_id", ColumnType::Integer).not_null()],
                    "account_id",
                ),
            )
            .with_table(
                "orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("account_id", ColumnType::Integer),
                    ],
                    "id",
                ),
            )
            .without_foreign_key_support();

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);

        let keys = inspector.foreign_keys_of("orders").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].target_table, "accounts");
        assert_eq!(keys[0].target_column, "account_id");
    }

    #[test]
    fn test_unconventional_target_key_rejects_candidate() {
        let conn = MemoryConnection::new("memory")
            .with_table(
                "widgets",
                keyed(
                    vec![ColumnDescriptor::new("uuid", ColumnType::String).not_null()],
                    "uuid",
                ),
            )
            .with_table(
                "orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("widget_id", ColumnType::Integer),
                    ],
                    "id",
                ),
            )
            .without_foreign_key_support();

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);
        assert!(inspector.foreign_keys_of("orders").unwrap().is_empty());
    }

    #[test]
    fn test_target_must_share_namespace_prefix() {
        // `users` lives in another subschema: the reference is not inferred.
        let conn = MemoryConnection::new("memory")
            .with_table("audit.users", keyed(vec![id_column()], "id"))
            .with_table(
                "dbo.orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("user_id", ColumnType::Integer),
                    ],
                    "id",
                ),
            )
            .without_foreign_key_support();

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);
        assert!(inspector.foreign_keys_of("dbo.orders").unwrap().is_empty());
    }

    #[test]
    fn test_qualified_target_in_same_namespace() {
        let conn = MemoryConnection::new("memory")
            .with_table("dbo.users", keyed(vec![id_column()], "id"))
            .with_table(
                "dbo.orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("user_id", ColumnType::Integer),
                    ],
                    "id",
                ),
            )
            .without_foreign_key_support();

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);

        let keys = inspector.foreign_keys_of("dbo.orders").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].target_table, "dbo.users");
    }

    #[test]
    fn test_declared_keys_bypass_inference() {
        use automap::connection::{ForeignKeyDescriptor, ForeignKeyOrigin};

        // The engine reports keys natively: inference never runs, even for
        // columns that would match the naming convention.
        let conn = MemoryConnection::new("memory")
            .with_table("users", keyed(vec![id_column()], "id"))
            .with_table(
                "orders",
                keyed(
                    vec![
                        id_column(),
                        ColumnDescriptor::new("user_id", ColumnType::Integer),
                    ],
                    "id",
                )
                .with_foreign_key(ForeignKeyDescriptor {
                    constraint_name: "fk_orders_users".to_string(),
                    source_table: "orders".to_string(),
                    source_column: "user_id".to_string(),
                    target_table: "users".to_string(),
                    target_column: "id".to_string(),
                    origin: ForeignKeyOrigin::Declared,
                }),
            );

        let registry = AdapterRegistry::new();
        let mut inspector = SchemaInspector::new(&conn, &registry);

        let keys = inspector.foreign_keys_of("orders").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].constraint_name, "fk_orders_users");
        assert_eq!(keys[0].origin, ForeignKeyOrigin::Declared);
    }
}
