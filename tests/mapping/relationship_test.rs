#[cfg(test)]
mod tests {
    use automap::adapter::AdapterRegistry;
    use automap::connection::{
        ColumnDescriptor, ColumnType, ForeignKeyDescriptor, ForeignKeyOrigin, MemoryConnection,
        MemoryTable, PrimaryKey, Row, Value,
    };
    use automap::error::MapError;
    use automap::mapping::{MapOptions, SchemaMap};

    fn id_column() -> ColumnDescriptor {
        ColumnDescriptor::new("id", ColumnType::Integer).not_null()
    }

    fn orders_to_users_fk() -> ForeignKeyDescriptor {
        ForeignKeyDescriptor {
            constraint_name: "fk_orders_users".to_string(),
            source_table: "orders".to_string(),
            source_column: "user_id".to_string(),
            target_table: "users".to_string(),
            target_column: "id".to_string(),
            origin: ForeignKeyOrigin::Declared,
        }
    }

    fn fixture() -> MemoryConnection {
        MemoryConnection::new("memory")
            .with_table(
                "users",
                MemoryTable::new()
                    .with_columns(vec![
                        id_column(),
                        ColumnDescriptor::new("name", ColumnType::String),
                    ])
                    .with_primary_key(PrimaryKey::Single("id".to_string()))
                    .with_row(Row::from_pairs([
                        ("id", Value::Integer(5)),
                        ("name", Value::from("ada")),
                    ])),
            )
            .with_table(
                "orders",
                MemoryTable::new()
                    .with_columns(vec![
                        id_column(),
                        ColumnDescriptor::new("user_id", ColumnType::Integer),
                    ])
                    .with_primary_key(PrimaryKey::Single("id".to_string()))
                    .with_foreign_key(orders_to_users_fk())
                    .with_row(Row::from_pairs([
                        ("id", Value::Integer(1)),
                        ("user_id", Value::Integer(5)),
                    ]))
                    .with_row(Row::from_pairs([
                        ("id", Value::Integer(2)),
                        ("user_id", Value::Integer(99)),
                    ]))
                    .with_row(Row::from_pairs([
                        ("id", Value::Integer(3)),
                        ("user_id", Value::Null),
                    ])),
            )
    }

    #[test]
    fn test_relationship_round_trip() {
        let conn = fixture();
        let registry = AdapterRegistry::new();
        let map = SchemaMap::inspect(&conn, &MapOptions::default(), &registry).unwrap();

        let order = map
            .entity("Order")
            .unwrap()
            .find_by_key(&conn, &Value::Integer(1))
            .unwrap()
            .unwrap();

        let user = map.related(&conn, &order, "users").unwrap().unwrap();
        assert_eq!(user.entity(), "User");
        assert_eq!(user.raw("id"), Some(&Value::Integer(5)));
        assert_eq!(user.raw("name"), Some(&Value::Text("ada".to_string())));
    }

    #[test]
    fn test_relationship_entity_name_alias_field() {
        let conn = fixture();
        let registry = AdapterRegistry::new();
        let map = SchemaMap::inspect(&conn, &MapOptions::default(), &registry).unwrap();

        let order = map
            .entity("Order")
            .unwrap()
            .find_by_key(&conn, &Value::Integer(1))
            .unwrap()
            .unwrap();

        // The secondary field named after the normalized entity name.
        let user = map.related(&conn, &order, "User").unwrap().unwrap();
        assert_eq!(user.raw("id"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_dangling_reference_resolves_to_none() {
        let conn = fixture();
        let registry = AdapterRegistry::new();
        let map = SchemaMap::inspect(&conn, &MapOptions::default(), &registry).unwrap();

        let order = map
            .entity("Order")
            .unwrap()
            .find_by_key(&conn, &Value::Integer(2))
            .unwrap()
            .unwrap();

        assert!(map.related(&conn, &order, "users").unwrap().is_none());
    }

    #[test]
    fn test_null_reference_resolves_to_none() {
        let conn = fixture();
        let registry = AdapterRegistry::new();
        let map = SchemaMap::inspect(&conn, &MapOptions::default(), &registry).unwrap();

        let order = map
            .entity("Order")
            .unwrap()
            .find_by_key(&conn, &Value::Integer(3))
            .unwrap()
            .unwrap();

        assert!(map.related(&conn, &order, "users").unwrap().is_none());
    }

    #[test]
    fn test_unknown_relation_field() {
        let conn = fixture();
        let registry = AdapterRegistry::new();
        let map = SchemaMap::inspect(&conn, &MapOptions::default(), &registry).unwrap();

        let order = map
            .entity("Order")
            .unwrap()
            .find_by_key(&conn, &Value::Integer(1))
            .unwrap()
            .unwrap();

        let err = map.related(&conn, &order, "warehouses").unwrap_err();
        assert!(matches!(err, MapError::UnknownRelation { .. }));
    }

    #[test]
    fn test_foreign_key_outside_universe_is_dropped() {
        // The FK targets a table the subschema filter excluded.
        let conn = MemoryConnection::new("memory")
            .with_table(
                "dbo.orders",
                MemoryTable::new()
                    .with_columns(vec![
                        id_column(),
                        ColumnDescriptor::new("invoice_id", ColumnType::Integer),
                    ])
                    .with_primary_key(PrimaryKey::Single("id".to_string()))
                    .with_foreign_key(ForeignKeyDescriptor {
                        constraint_name: "fk_orders_invoices".to_string(),
                        source_table: "dbo.orders".to_string(),
                        source_column: "invoice_id".to_string(),
                        target_table: "billing.invoices".to_string(),
                        target_column: "id".to_string(),
                        origin: ForeignKeyOrigin::Declared,
                    }),
            )
            .with_table(
                "billing.invoices",
                MemoryTable::new()
                    .with_columns(vec![id_column()])
                    .with_primary_key(PrimaryKey::Single("id".to_string())),
            );

        let registry = AdapterRegistry::new();
        let options = MapOptions::default().with_subschema("dbo");
        let map = SchemaMap::inspect(&conn, &options, &registry).unwrap();

        // No error, and no relation on the source entity.
        assert_eq!(map.tables().len(), 1);
        assert!(map.entity("Order").unwrap().relations.is_empty());
    }

    #[test]
    fn test_composite_key_entity_refuses_lookup_but_traverses() {
        let conn = MemoryConnection::new("memory")
            .with_table(
                "users",
                MemoryTable::new()
                    .with_columns(vec![id_column()])
                    .with_primary_key(PrimaryKey::Single("id".to_string()))
                    .with_row(Row::from_pairs([("id", Value::Integer(5))])),
            )
            .with_table(
                "order_items",
                MemoryTable::new()
                    .with_columns(vec![
                        ColumnDescriptor::new("order_id", ColumnType::Integer).not_null(),
                        ColumnDescriptor::new("user_id", ColumnType::Integer),
                    ])
                    .with_primary_key(PrimaryKey::Composite(vec![
                        "order_id".to_string(),
                        "user_id".to_string(),
                    ]))
                    .with_foreign_key(ForeignKeyDescriptor {
                        constraint_name: "fk_items_users".to_string(),
                        source_table: "order_items".to_string(),
                        source_column: "user_id".to_string(),
                        target_table: "users".to_string(),
                        target_column: "id".to_string(),
                        origin: ForeignKeyOrigin::Declared,
                    })
                    .with_row(Row::from_pairs([
                        ("order_id", Value::Integer(1)),
                        ("user_id", Value::Integer(5)),
                    ])),
            );

        let registry = AdapterRegistry::new();
        let map = SchemaMap::inspect(&conn, &MapOptions::default(), &registry).unwrap();
        let items = map.entity("OrderItem").unwrap();

        let err = items.find_by_key(&conn, &Value::Integer(1)).unwrap_err();
        assert!(matches!(err, MapError::CannotFindOnCompoundPrimaryKey(_)));

        // Traversal still works on a composite-key entity.
        let item = automap::mapping::Record::new(
            "OrderItem",
            Row::from_pairs([
                ("order_id", Value::Integer(1)),
                ("user_id", Value::Integer(5)),
            ]),
        );
        let user = map.related(&conn, &item, "users").unwrap().unwrap();
        assert_eq!(user.raw("id"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_self_referential_table() {
        let conn = MemoryConnection::new("memory").with_table(
            "employees",
            MemoryTable::new()
                .with_columns(vec![
                    id_column(),
                    ColumnDescriptor::new("manager_id", ColumnType::Integer),
                ])
                .with_primary_key(PrimaryKey::Single("id".to_string()))
                .with_foreign_key(ForeignKeyDescriptor {
                    constraint_name: "fk_employees_manager".to_string(),
                    source_table: "employees".to_string(),
                    source_column: "manager_id".to_string(),
                    target_table: "employees".to_string(),
                    target_column: "id".to_string(),
                    origin: ForeignKeyOrigin::Declared,
                })
                .with_row(Row::from_pairs([
                    ("id", Value::Integer(1)),
                    ("manager_id", Value::Null),
                ]))
                .with_row(Row::from_pairs([
                    ("id", Value::Integer(2)),
                    ("manager_id", Value::Integer(1)),
                ])),
        );

        let registry = AdapterRegistry::new();
        let map = SchemaMap::inspect(&conn, &MapOptions::default(), &registry).unwrap();

        let report = map
            .entity("Employee")
            .unwrap()
            .find_by_key(&conn, &Value::Integer(2))
            .unwrap()
            .unwrap();
        let manager = map.related(&conn, &report, "employees").unwrap().unwrap();
        assert_eq!(manager.raw("id"), Some(&Value::Integer(1)));

        let top = map.related(&conn, &manager, "employees").unwrap();
        assert!(top.is_none());
    }
}
