#[cfg(test)]
mod tests {
    use dbmap::{Decomposition, FieldDef, MappingError, Record, Value, decompose};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Preferences {
        theme: String,
        columns: Vec<String>,
    }

    #[derive(Record, Default, Debug, Clone, PartialEq)]
    struct UserProfile {
        #[db = "id,pk"]
        id: i64,
        #[db = "full_name"]
        name: String,
        email: Option<String>,
        #[db = ",json"]
        preferences: Preferences,
        #[db = "-"]
        session: Option<Uuid>,
        age: u16,
    }

    #[derive(Record, Default)]
    #[db(table = "audit_log")]
    struct Audit<T: Clone + Send + dbmap::AsValue> {
        #[db(name = "audit_id", primary_key)]
        id: Uuid,
        payload: T,
        #[db(skip)]
        cache: Vec<u8>,
    }

    #[test]
    fn descriptor() {
        let def = UserProfile::record_def();
        assert_eq!(def.name, "UserProfile");
        assert_eq!(def.table, "user_profile");
        assert_eq!(def.primary_key, Some(0));
        assert_eq!(
            def.fields[1],
            FieldDef::new("name").column("full_name")
        );
        assert!(def.fields[3].json);
        assert!(def.fields[4].excluded);
        assert_eq!(
            def.mapped_fields().map(|(_, f)| f.column).collect::<Vec<_>>(),
            ["id", "full_name", "email", "preferences", "age"]
        );

        let def = Audit::<i32>::record_def();
        assert_eq!(def.table, "audit_log");
        assert_eq!(def.primary_key_def().map(|f| f.column), Some("audit_id"));
        assert!(def.fields[2].excluded);
    }

    #[test]
    fn decomposition() {
        let user = UserProfile {
            id: 5,
            name: "Ada".into(),
            email: None,
            preferences: Preferences {
                theme: "dark".into(),
                columns: vec!["a".into()],
            },
            session: Some(Uuid::nil()),
            age: 36,
        };
        let Decomposition {
            columns,
            values,
            primary_key,
        } = decompose(&user).unwrap();
        assert_eq!(columns, ["full_name", "email", "preferences", "age"]);
        assert_eq!(
            values,
            [
                Value::Varchar(Some("Ada".into())),
                Value::Varchar(None),
                Value::Varchar(Some(r#"{"theme":"dark","columns":["a"]}"#.into())),
                Value::UInt16(Some(36)),
            ]
        );
        let primary_key = primary_key.unwrap();
        assert_eq!(primary_key.index, 0);
        assert_eq!(primary_key.column, "id");
        assert_eq!(primary_key.value, Value::Int64(Some(5)));
    }

    #[test]
    fn not_a_struct() {
        for error in [
            decompose(&1235).unwrap_err(),
            decompose(&vec![UserProfile::default()]).unwrap_err(),
            decompose(&Some("text".to_string())).unwrap_err(),
        ] {
            assert!(matches!(
                error.downcast_ref::<MappingError>(),
                Some(MappingError::NotAStruct(..))
            ));
        }
    }

    #[test]
    fn field_access() {
        let mut user = UserProfile::default();
        user.set_field(0, Value::Int32(Some(9))).unwrap();
        user.set_field(3, Value::Varchar(Some(r#"{"theme":"light","columns":[]}"#.into())))
            .unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(user.preferences.theme, "light");
        assert_eq!(user.get_field(5).unwrap(), Value::UInt16(Some(0)));
        for index in [4, 6] {
            assert!(matches!(
                user.get_field(index).unwrap_err().downcast_ref::<MappingError>(),
                Some(MappingError::UnknownField { record: "UserProfile", .. })
            ));
            assert!(user.set_field(index, Value::Null).is_err());
        }
    }
}
