use anyhow::Result;
use indexmap::indexmap;

use relstate::codec::{decode_storage, encode_sql_literal};
use relstate::query::{Columns, OrderBy, Query, QueryKind, TableSchema};
use relstate::store::RelationalStore;
use relstate::value::{Structured, Value, ValueKind};

fn ledger_schema() -> TableSchema {
    TableSchema::new()
        .column("a", ValueKind::Integer)
        .column("b", ValueKind::Decimal)
}

#[tokio::test]
async fn test_decimal_survives_storage_exactly() -> Result<()> {
    let mut store = RelationalStore::open_in_memory()?;
    let third = Value::decimal(1, 3);

    store
        .execute_write(&[
            Query::create_table("t", &ledger_schema()),
            Query::insert_row(
                "t",
                &indexmap! {
                    "a".to_string() => Value::from(1i64),
                    "b".to_string() => third.clone(),
                },
            ),
        ])
        .await?;

    let table = store
        .read(&Query::get_table("t", Columns::All, None, None))
        .await?;
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.get_column("b")?[0], third);
    Ok(())
}

#[tokio::test]
async fn test_insert_rows_then_delete_by_match() -> Result<()> {
    let mut store = RelationalStore::open_in_memory()?;
    store
        .execute_write(&[
            Query::create_table("t", &ledger_schema()),
            Query::insert_rows(
                "t",
                &["a", "b"],
                &[
                    vec![Value::from(1i64), Value::decimal(1, 1)],
                    vec![Value::from(2i64), Value::decimal(2, 1)],
                ],
            ),
        ])
        .await?;

    store
        .execute_write(&[Query::delete_rows(
            "t",
            Some(&indexmap! { "a".to_string() => Value::from(1i64) }),
        )])
        .await?;

    let table = store
        .read(&Query::get_table("t", Columns::All, None, None))
        .await?;
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.get_column("a")?[0], Value::from(2i64));
    Ok(())
}

#[tokio::test]
async fn test_update_and_ordered_select() -> Result<()> {
    let mut store = RelationalStore::open_in_memory()?;
    store
        .execute_write(&[
            Query::create_table("t", &ledger_schema()),
            Query::insert_rows(
                "t",
                &["a", "b"],
                &[
                    vec![Value::from(2i64), Value::decimal(2, 1)],
                    vec![Value::from(1i64), Value::decimal(1, 1)],
                    vec![Value::from(3i64), Value::decimal(3, 1)],
                ],
            ),
        ])
        .await?;

    store
        .execute_write(&[Query::update_table(
            "t",
            &indexmap! { "a".to_string() => Value::from(3i64) },
            &indexmap! { "b".to_string() => Value::decimal(-1, 2) },
        )])
        .await?;

    let table = store
        .read(&Query::get_table(
            "t",
            Columns::All,
            None,
            Some(&OrderBy::asc("a")),
        ))
        .await?;
    assert_eq!(
        *table.get_column("a")?,
        vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]
    );
    assert_eq!(table.get_column("b")?[2], Value::decimal(-1, 2));
    Ok(())
}

#[tokio::test]
async fn test_sql_literals_read_back_through_engine() -> Result<()> {
    let store = RelationalStore::open_in_memory()?;
    let probes = vec![
        Value::decimal(3, 2),
        Value::from(true),
        Value::from(false),
        Value::Structured(Structured::Map(indexmap::IndexMap::new())),
        Value::from(vec![0xab_u8, 0xcd]),
        Value::from("plain"),
        Value::from(-7i64),
    ];

    for probe in probes {
        let literal = encode_sql_literal(&probe);
        let (_, rows) = store
            .execute_read(&Query::raw(
                format!("SELECT {}", literal),
                QueryKind::Select,
            ))
            .await?;
        let decoded = decode_storage(&rows[0][0])?;
        assert_eq!(decoded, probe, "literal {}", literal);
    }
    Ok(())
}

#[tokio::test]
async fn test_structured_cell_round_trip() -> Result<()> {
    let mut store = RelationalStore::open_in_memory()?;
    let schema = TableSchema::new()
        .column("id", ValueKind::Integer)
        .column("report", ValueKind::Structured);
    let report = Value::Structured(Structured::Map(indexmap! {
        "asset".to_string() => Value::from("ETH"),
        "totals".to_string() => Value::Structured(Structured::Seq(vec![
            Value::decimal(5, 4),
            Value::from(12i64),
        ])),
    }));

    store
        .execute_write(&[
            Query::create_table("reports", &schema),
            Query::insert_row(
                "reports",
                &indexmap! {
                    "id".to_string() => Value::from(1i64),
                    "report".to_string() => report.clone(),
                },
            ),
        ])
        .await?;

    let table = store
        .read(&Query::get_table("reports", Columns::All, None, None))
        .await?;
    assert_eq!(table.get_column("report")?[0], report);
    Ok(())
}

#[tokio::test]
async fn test_rows_persist_across_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("state.db");

    {
        let mut store = RelationalStore::open(&path)?;
        store
            .execute_write(&[
                Query::create_table("t", &ledger_schema()),
                Query::insert_row(
                    "t",
                    &indexmap! {
                        "a".to_string() => Value::from(9i64),
                        "b".to_string() => Value::decimal(-1, 3),
                    },
                ),
            ])
            .await?;
    }

    let store = RelationalStore::open(&path)?;
    let table = store
        .read(&Query::get_table("t", Columns::All, None, None))
        .await?;
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.get_column("b")?[0], Value::decimal(-1, 3));
    Ok(())
}

#[tokio::test]
async fn test_drop_table_removes_it() -> Result<()> {
    let mut store = RelationalStore::open_in_memory()?;
    store
        .execute_write(&[Query::create_table("t", &ledger_schema())])
        .await?;
    assert_eq!(store.list_tables().await?, vec!["t"]);

    store.execute_write(&[Query::drop_table("t")]).await?;
    assert!(store.list_tables().await?.is_empty());
    Ok(())
}
