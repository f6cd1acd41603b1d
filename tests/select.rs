#[cfg(test)]
mod tests {
    use dbmap::{Crud, Dialect, MappingError, Query, Record, Value, params, select};
    use dbmap_tests::{MockExecutor, Response, init_logs};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};
    use std::str::FromStr;
    use time::macros::datetime;

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Address {
        city: String,
        zip: Option<String>,
    }

    #[derive(Record, Default, Debug, Clone, PartialEq)]
    #[db(table = "customers")]
    struct Customer {
        #[db(name = "customer_id", primary_key)]
        id: u64,
        name: String,
        #[db(json)]
        address: Option<Address>,
        balance: Decimal,
        created: Option<time::PrimitiveDateTime>,
        #[db(skip)]
        visits: u32,
    }

    fn mapping_error(error: &dbmap::Error) -> &MappingError {
        error
            .downcast_ref::<MappingError>()
            .expect("Expected a mapping error")
    }

    #[tokio::test]
    async fn records_with_case_insensitive_columns() {
        init_logs();
        let mut executor = MockExecutor::new(Dialect::DollarNumbered);
        executor.respond(Response::rows(
            ["CUSTOMER_ID", "Name", "ADDRESS", "balance", "created", "visits", "score"],
            vec![
                [
                    Value::Int64(Some(1)),
                    Value::Varchar(Some("Ada".into())),
                    Value::Varchar(Some(r#"{"city":"London","zip":null}"#.into())),
                    Value::Unknown(Some("10.25".into())),
                    Value::Unknown(Some("2024-02-29 13:45:00".into())),
                    Value::Int32(Some(4)),
                    Value::Float64(Some(0.5)),
                ],
                [
                    Value::Int64(Some(2)),
                    Value::Varchar(Some("Alan".into())),
                    Value::Null,
                    Value::Decimal(Some(Decimal::from(3)), 0, 0),
                    Value::Timestamp(None),
                    Value::Int32(Some(9)),
                    Value::Null,
                ],
            ],
        ));
        let mut customers: Vec<Customer> = Vec::new();
        executor
            .select(
                &mut customers,
                "SELECT * FROM customers WHERE customer_id IN (?) ORDER BY customer_id",
                params![vec![1_u64, 2]],
            )
            .await
            .unwrap();
        assert_eq!(
            customers,
            [
                Customer {
                    id: 1,
                    name: "Ada".into(),
                    address: Some(Address {
                        city: "London".into(),
                        zip: None,
                    }),
                    balance: Decimal::from_str("10.25").unwrap(),
                    created: Some(datetime!(2024-02-29 13:45:00)),
                    visits: 0,
                },
                Customer {
                    id: 2,
                    name: "Alan".into(),
                    address: None,
                    balance: Decimal::from(3),
                    created: None,
                    visits: 0,
                },
            ]
        );
        assert_eq!(
            executor.last_query(),
            Some(&Query::new(
                "SELECT * FROM customers WHERE customer_id IN ($1, $2) ORDER BY customer_id",
                params![1_u64, 2_u64],
            ))
        );
        assert_eq!(executor.open_cursors(), 0);
    }

    #[tokio::test]
    async fn scalars_and_optional_rows() {
        let mut executor = MockExecutor::new(Dialect::Native);
        executor
            .respond(Response::rows(["count(*)"], vec![[Value::Int64(Some(3))]]))
            .respond(Response::rows(["name"], vec![]));
        let mut count = 0_u64;
        select(&mut executor, &mut count, "SELECT count(*) FROM customers", params![])
            .await
            .unwrap();
        assert_eq!(count, 3);

        let mut name = Some("unchanged".to_string());
        executor
            .select(&mut name, "SELECT name FROM customers WHERE 1 = 0", params![])
            .await
            .unwrap();
        assert_eq!(name.as_deref(), Some("unchanged"));
    }

    #[tokio::test]
    async fn empty_list_matches_nothing() {
        let mut executor = MockExecutor::new(Dialect::ColonNumbered);
        let mut customers: Vec<Customer> = Vec::new();
        executor
            .select(
                &mut customers,
                "SELECT * FROM customers WHERE customer_id IN (?) AND name <> ?",
                params![Vec::<u64>::new(), "x"],
            )
            .await
            .unwrap();
        assert_eq!(
            executor.last_query(),
            Some(&Query::new(
                "SELECT * FROM customers WHERE customer_id IN (NULL) AND name <> :1",
                params!["x"],
            ))
        );
    }

    #[tokio::test]
    async fn quoted_markers_are_not_parameters() {
        let mut executor = MockExecutor::new(Dialect::DollarNumbered);
        executor.respond(Response::rows(["?"], vec![[Value::Varchar(Some("?".into()))]]));
        let mut value = String::new();
        executor
            .select(
                &mut value,
                r#"SELECT '?' AS "?" FROM customers WHERE name = ?"#,
                params!["Ada"],
            )
            .await
            .unwrap();
        assert_eq!(value, "?");
        assert_eq!(
            executor.last_query().unwrap().sql,
            r#"SELECT '?' AS "?" FROM customers WHERE name = $1"#
        );
    }

    #[tokio::test]
    async fn argument_count_mismatch_sends_nothing() {
        let mut executor = MockExecutor::new(Dialect::Native);
        let mut value = 0_i32;
        let error = executor
            .select(&mut value, "SELECT ? + ?", params![1])
            .await
            .unwrap_err();
        assert!(matches!(
            mapping_error(&error),
            MappingError::ArgumentCount {
                markers: 2,
                arguments: 1
            }
        ));
        assert!(executor.queries.is_empty());
    }

    #[tokio::test]
    async fn cursor_closed_on_every_path() {
        let mut executor = MockExecutor::new(Dialect::Native);
        executor
            .respond(Response::rows(
                ["customer_id"],
                vec![[Value::Int64(Some(1))], [Value::Int64(Some(2))]],
            ))
            .respond(Response::rows(
                ["customer_id", "address"],
                vec![[Value::Int64(Some(1)), Value::Varchar(Some("[1, 2".into()))]],
            ))
            .respond(Response::rows(
                ["id", "name"],
                vec![[Value::Int64(Some(1)), Value::Varchar(Some("Ada".into()))]],
            ))
            .respond(Response::Error("relation does not exist".into()));

        let mut customer = Customer::default();
        let error = executor
            .select(&mut customer, "SELECT customer_id FROM customers", params![])
            .await
            .unwrap_err();
        assert!(matches!(mapping_error(&error), MappingError::TooManyRows));
        assert_eq!(executor.open_cursors(), 0);

        let error = executor
            .select(&mut customer, "SELECT customer_id, address FROM customers", params![])
            .await
            .unwrap_err();
        assert!(matches!(
            mapping_error(&error),
            MappingError::ScanFailure { column, .. } if column == "address"
        ));
        assert_eq!(executor.open_cursors(), 0);

        let mut id = 0_i64;
        let error = executor
            .select(&mut id, "SELECT id, name FROM customers", params![])
            .await
            .unwrap_err();
        assert!(matches!(
            mapping_error(&error),
            MappingError::TooManyColumns {
                expected: 1,
                found: 2
            }
        ));
        assert_eq!(executor.open_cursors(), 0);

        let mut ids: Vec<i64> = vec![5];
        let error = executor
            .select(&mut ids, "SELECT id FROM missing", params![])
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "relation does not exist");
        assert_eq!(ids, [5]);
        assert_eq!(executor.open_cursors(), 0);
    }
}
