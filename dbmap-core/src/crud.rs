use crate::{
    Decomposition, Destination, Driver, Executor, GeneratedKey, Holder, MappingError,
    PrimaryKeyPart, Query, QueryResult, Result, RowsAffected, SqlWriter, Value, decompose,
    decompose_record, expand, scan,
    stream::TryStreamExt,
};
use std::{any::type_name, future::Future, pin::pin};

/// Run `query` and scan its rows into `holder`.
///
/// The query uses `?` markers whatever the store, sequence arguments are
/// expanded (see [`expand`]).
pub async fn select<E, H>(executor: &mut E, holder: &mut H, query: &str, args: Vec<Value>) -> Result<()>
where
    E: Executor,
    H: Holder + ?Sized,
{
    let (sql, args) = expand(query, args)?;
    let dialect = executor.driver().dialect();
    let query = Query::new(dialect.translate(&sql), args);
    log::debug!("{query}");
    scan(executor.fetch(query), holder).await
}

/// Insert the record into `table`.
///
/// The primary key column is left out when its value is unset (NULL or zero)
/// and the key strategy of the driver expects the store to generate it. With
/// [`GeneratedKey::LastInsertId`] this only applies to integer keys. The
/// generated key is then written back into the record and returned in
/// [`RowsAffected::last_affected_id`] when it is an integer.
pub async fn insert<E, H>(executor: &mut E, table: &str, holder: &mut H) -> Result<RowsAffected>
where
    E: Executor,
    H: Holder + ?Sized,
{
    let (query, generated, strategy) = insert_query(executor.driver(), table, &*holder)?;
    log::debug!("{query}");
    let Some(pk) = generated else {
        return executor.execute(query).await;
    };
    let (mut affected, key) = match strategy {
        GeneratedKey::Returning => {
            let mut returned = RowsAffected::default();
            let mut rows = 0;
            let mut key = None;
            {
                let mut stream = pin!(executor.run(query));
                while let Some(item) = stream.try_next().await? {
                    match item {
                        QueryResult::Row(row) => {
                            rows += 1;
                            if key.is_none() {
                                key = row.values.into_vec().into_iter().next();
                            }
                        }
                        QueryResult::Affected(v) => returned.extend([v]),
                    }
                }
            }
            returned.rows_affected = returned.rows_affected.max(rows);
            (returned, key)
        }
        _ => {
            let affected = executor.execute(query).await?;
            let key = affected.last_affected_id.map(|v| Value::Int64(Some(v)));
            (affected, key)
        }
    };
    let Some(key) = key.filter(|v| !v.is_null()) else {
        return Err(MappingError::MissingGeneratedKey {
            record: record_name(&*holder),
            column: pk.column,
        }
        .into());
    };
    if let Some(id) = key.as_i64() {
        affected.last_affected_id = Some(id);
    }
    if let Destination::Record(record) = holder.destination() {
        record.set_field(pk.index, key)?;
    }
    Ok(affected)
}

/// Update the row of `table` identified by the record primary key.
pub fn update<E, H>(
    executor: &mut E,
    table: &str,
    holder: &H,
) -> impl Future<Output = Result<RowsAffected>> + Send
where
    E: Executor,
    H: Holder + ?Sized,
{
    let query = update_query(executor.driver(), table, holder);
    execute_prepared(executor, query)
}

/// Delete the row of `table` identified by the record primary key.
///
/// Only the primary key takes part in the condition.
pub fn delete<E, H>(
    executor: &mut E,
    table: &str,
    holder: &H,
) -> impl Future<Output = Result<RowsAffected>> + Send
where
    E: Executor,
    H: Holder + ?Sized,
{
    let query = delete_query(executor.driver(), table, holder);
    execute_prepared(executor, query)
}

async fn execute_prepared<E: Executor>(executor: &mut E, query: Result<Query>) -> Result<RowsAffected> {
    match query {
        Ok(query) => {
            log::debug!("{query}");
            executor.execute(query).await
        }
        Err(e) => Err(e),
    }
}

/// Statement of an insert, the primary key left to the store and the strategy to read it back.
pub fn insert_query<D, H>(
    driver: &D,
    table: &str,
    holder: &H,
) -> Result<(Query, Option<PrimaryKeyPart>, GeneratedKey)>
where
    D: Driver,
    H: Holder + ?Sized,
{
    let Decomposition {
        mut columns,
        mut values,
        primary_key,
    } = decompose(holder)?;
    let writer = driver.sql_writer();
    let strategy = writer.generated_key();
    let mut generated = None;
    if let Some(pk) = primary_key {
        let store_generated = match strategy {
            GeneratedKey::Returning => pk.value.is_unset_key(),
            // The driver only reports integer ids.
            GeneratedKey::LastInsertId => pk.value.is_integer() && pk.value.is_unset_key(),
            GeneratedKey::None => false,
        };
        if store_generated {
            generated = Some(pk);
        } else {
            columns.push(pk.column);
            values.push(pk.value);
        }
    }
    let returning = match (&generated, strategy) {
        (Some(pk), GeneratedKey::Returning) => Some(pk.column),
        _ => None,
    };
    let mut sql = String::with_capacity(64);
    writer.write_insert(&mut sql, table, &columns, returning);
    let query = Query::new(writer.dialect().translate(&sql), values);
    Ok((query, generated, strategy))
}

pub fn update_query<D, H>(driver: &D, table: &str, holder: &H) -> Result<Query>
where
    D: Driver,
    H: Holder + ?Sized,
{
    let (decomposition, pk) = keyed(holder)?;
    if decomposition.columns.is_empty() {
        return Err(MappingError::NoColumns(record_name(holder)).into());
    }
    let writer = driver.sql_writer();
    let mut sql = String::with_capacity(64);
    writer.write_update(&mut sql, table, &decomposition.columns, pk.column);
    let mut values = decomposition.values;
    values.push(pk.value);
    Ok(Query::new(writer.dialect().translate(&sql), values))
}

pub fn delete_query<D, H>(driver: &D, table: &str, holder: &H) -> Result<Query>
where
    D: Driver,
    H: Holder + ?Sized,
{
    let (_, pk) = keyed(holder)?;
    let writer = driver.sql_writer();
    let mut sql = String::with_capacity(64);
    writer.write_delete(&mut sql, table, pk.column);
    Ok(Query::new(writer.dialect().translate(&sql), vec![pk.value]))
}

fn keyed<H: Holder + ?Sized>(holder: &H) -> Result<(Decomposition, PrimaryKeyPart)> {
    let Some(record) = holder.as_record() else {
        return Err(MappingError::NotAStruct(type_name::<H>()).into());
    };
    let name = record.def().name;
    let mut decomposition = decompose_record(record)?;
    let Some(pk) = decomposition.primary_key.take() else {
        return Err(MappingError::InvalidPrimaryKey {
            record: name,
            reason: "no field is tagged as primary key",
        }
        .into());
    };
    if pk.value.is_null() {
        return Err(MappingError::InvalidPrimaryKey {
            record: name,
            reason: "the primary key value is NULL",
        }
        .into());
    }
    Ok((decomposition, pk))
}

fn record_name<H: Holder + ?Sized>(holder: &H) -> &'static str {
    holder
        .as_record()
        .map(|v| v.def().name)
        .unwrap_or_else(type_name::<H>)
}

/// CRUD operations as methods of every [`Executor`].
pub trait Crud: Executor {
    fn select<H: Holder + ?Sized>(
        &mut self,
        holder: &mut H,
        query: &str,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<()>> + Send {
        select(self, holder, query, args)
    }

    fn insert<H: Holder + ?Sized>(
        &mut self,
        table: &str,
        holder: &mut H,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        insert(self, table, holder)
    }

    fn update<H: Holder + ?Sized>(
        &mut self,
        table: &str,
        holder: &H,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        update(self, table, holder)
    }

    fn delete<H: Holder + ?Sized>(
        &mut self,
        table: &str,
        holder: &H,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        delete(self, table, holder)
    }
}

impl<E: Executor> Crud for E {}
