use sqlnull::{NullBool, NullFloat64, NullInt64, NullString, NullTime};
use sqlx::{Connection, SqliteConnection};

const TEST_SCHEMA: &str = include_str!("setup.sql");

pub fn setup_if_needed() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Make a new connection
pub async fn connection() -> anyhow::Result<SqliteConnection> {
    setup_if_needed();
    Ok(SqliteConnection::connect("sqlite::memory:").await?)
}

/// Return a connection to a database pre-configured with our test schema.
pub async fn tdb() -> anyhow::Result<SqliteConnection> {
    let mut conn = connection().await?;
    sqlx::query(TEST_SCHEMA).execute(&mut conn).await?;
    Ok(conn)
}

/// One row of the `null_types` table.
#[derive(sqlx::FromRow, Debug, Default, Clone, PartialEq)]
pub struct NullTypedRecord {
    pub id: i64,
    pub string_val: NullString,
    pub int64_val: NullInt64,
    pub float64_val: NullFloat64,
    pub time_val: NullTime,
    pub bool_val: NullBool,
}

pub async fn insert_record(
    conn: &mut SqliteConnection,
    record: &NullTypedRecord,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO null_types (id, string_val, int64_val, float64_val, time_val, bool_val) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(record.id)
    .bind(record.string_val.clone())
    .bind(record.int64_val)
    .bind(record.float64_val)
    .bind(record.time_val)
    .bind(record.bool_val)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn load_record(conn: &mut SqliteConnection, id: i64) -> anyhow::Result<NullTypedRecord> {
    Ok(sqlx::query_as::<_, NullTypedRecord>("SELECT * FROM null_types WHERE id = ?")
        .bind(id)
        .fetch_one(conn)
        .await?)
}

// Test type encoding and decoding
#[macro_export]
macro_rules! test_type {
    ($name:ident<$ty:ty>($sql:literal, $($text:literal == $value:expr),+ $(,)?)) => {
        $crate::__test_prepared_type!($name<$ty>($sql, $($text == $value),+));
        $crate::test_unprepared_type!($name<$ty>($($text == $value),+));
    };

    ($name:ident<$ty:ty>($($text:literal == $value:expr),+ $(,)?)) => {
        paste::item! {
            $crate::__test_prepared_type!($name<$ty>($crate::[< query_for_test_prepared_type >]!(), $($text == $value),+));
            $crate::test_unprepared_type!($name<$ty>($($text == $value),+));
        }
    };
}

// Test type decoding only
#[macro_export]
macro_rules! test_decode_type {
    ($name:ident<$ty:ty>($($text:literal == $value:expr),+ $(,)?)) => {
        $crate::__test_prepared_decode_type!($name<$ty>($($text == $value),+));
        $crate::test_unprepared_type!($name<$ty>($($text == $value),+));
    };
}

// Test type decoding for the simple (unprepared) query API
#[macro_export]
macro_rules! test_unprepared_type {
    ($name:ident<$ty:ty>($($text:literal == $value:expr),+ $(,)?)) => {
        paste::item! {
            #[tokio::test]
            async fn [< test_unprepared_type_ $name >] () -> anyhow::Result<()> {
                use futures::TryStreamExt;
                use sqlx::{Executor, Row};

                let mut conn = sqlnull_test::connection().await?;

                $(
                    let query = format!("SELECT {}", $text);
                    let mut s = conn.fetch(&*query);
                    let row = s.try_next().await?.unwrap();
                    let rec = row.try_get::<$ty, _>(0)?;

                    assert_eq!($value, rec);

                    drop(s);
                )+

                Ok(())
            }
        }
    }
}

// Test type decoding only for the prepared query API
#[macro_export]
macro_rules! __test_prepared_decode_type {
    ($name:ident<$ty:ty>($($text:literal == $value:expr),+ $(,)?)) => {
        paste::item! {
            #[tokio::test]
            async fn [< test_prepared_decode_type_ $name >] () -> anyhow::Result<()> {
                use sqlx::Row;

                let mut conn = sqlnull_test::connection().await?;

                $(
                    let query = format!("SELECT {}", $text);

                    let row = sqlx::query(&query)
                        .fetch_one(&mut conn)
                        .await?;

                    let rec: $ty = row.try_get(0)?;

                    assert_eq!($value, rec);
                )+

                Ok(())
            }
        }
    };
}

// Test type encoding and decoding for the prepared query API
#[macro_export]
macro_rules! __test_prepared_type {
    ($name:ident<$ty:ty>($sql:expr, $($text:literal == $value:expr),+ $(,)?)) => {
        paste::item! {
            #[tokio::test]
            async fn [< test_prepared_type_ $name >] () -> anyhow::Result<()> {
                use sqlx::Row;

                let mut conn = sqlnull_test::connection().await?;

                $(
                    let query = format!($sql, $text);
                    println!("{query} bound to {:?}", $value);

                    let row = sqlx::query(&query)
                        .bind($value)
                        .bind($value)
                        .fetch_one(&mut conn)
                        .await?;

                    let matches: i32 = row.try_get(0)?;
                    let returned: $ty = row.try_get(1)?;
                    let round_trip: $ty = row.try_get(2)?;

                    assert!(matches != 0,
                            "[1] DB value mismatch; given value: {:?}\n\
                             as returned: {:?}\n\
                             round-trip: {:?}",
                            $value, returned, round_trip);

                    assert_eq!($value, returned,
                            "[2] DB value mismatch; given value: {:?}\n\
                                     as returned: {:?}\n\
                                     round-trip: {:?}",
                                    $value, returned, round_trip);

                    assert_eq!($value, round_trip,
                            "[3] DB value mismatch; given value: {:?}\n\
                                     as returned: {:?}\n\
                                     round-trip: {:?}",
                                    $value, returned, round_trip);
                )+

                Ok(())
            }
        }
    };
}

#[macro_export]
macro_rules! query_for_test_prepared_type {
    () => {
        "SELECT {0} is ?, {0}, ?"
    };
}
