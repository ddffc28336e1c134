//! Storage-backed event operations
//!
//! Each operation runs inside a single `db.call` so it holds the
//! connection for exactly one request. Availability is written as a
//! JSON-serialized range list and expanded back to slots on read.
use chrono::{Duration, NaiveDate, NaiveTime};
use rusqlite::params;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use super::error::EventError;
use super::id::EventId;
use super::slots::{TimeRange, ranges_to_slots, slots_to_ranges};
use super::{Event, EventResponse, NewEvent};

/// Insert a new event and return its freshly assigned identifier
pub async fn add_event(db: &Connection, event: NewEvent) -> Result<EventId, EventError> {
    let id = EventId::new();
    let id_str = id.canonical();

    let dates = serde_json::to_string(&event.dates)?;
    db.call(move |conn| {
        conn.execute(
            r"
          INSERT INTO event (id, name, start_time, end_time, is_specific_dates, dates)
          VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ",
            params![
                id_str,
                event.name,
                event.start_time,
                event.end_time,
                event.is_specific_dates,
                dates
            ],
        )?;
        Ok(())
    })
    .await?;

    Ok(id)
}

/// Fetch an event and every participant response attached to it, with
/// each response's availability expanded back to discrete slots.
///
/// The event row and all response rows are read within one transaction
/// so responses never reference an event state they were not written
/// against. The transaction is released on every exit path; rusqlite
/// rolls back automatically when the transaction guard drops.
pub async fn get_event(
    db: &Connection,
    id: EventId,
    slot_gap: Duration,
) -> Result<(Event, Vec<EventResponse>), EventError> {
    let id_str = id.canonical();

    let (event, rows) = db
        .call(move |conn| {
            let tx = conn.transaction()?;

            let event = tx.query_row(
                r"
              SELECT name, start_time, end_time, is_specific_dates, dates
              FROM event
              WHERE id = ?1
            ",
                [&id_str],
                |row| {
                    let dates_json: String = row.get(4)?;
                    let dates: Vec<NaiveDate> = serde_json::from_str(&dates_json)
                        .map_err(|e| column_error(4, e))?;
                    Ok(Event {
                        id,
                        name: row.get(0)?,
                        start_time: row.get::<_, NaiveTime>(1)?,
                        end_time: row.get::<_, NaiveTime>(2)?,
                        is_specific_dates: row.get(3)?,
                        dates,
                    })
                },
            )?;

            let mut stmt = tx.prepare(
                r"
              SELECT user_id, alias, availabilities
              FROM event_response
              WHERE event_id = ?1
            ",
            )?;
            let rows = stmt
                .query_map([&id_str], |row| {
                    let user_id: Option<String> = row.get(0)?;
                    let alias: String = row.get(1)?;
                    let ranges_json: String = row.get(2)?;
                    let ranges: Vec<TimeRange> = serde_json::from_str(&ranges_json)
                        .map_err(|e| column_error(2, e))?;
                    Ok((user_id, alias, ranges))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            drop(stmt);

            tx.commit()?;
            Ok((event, rows))
        })
        .await
        .map_err(map_storage_error)?;

    let mut responses = Vec::with_capacity(rows.len());
    for (user_id, alias, ranges) in rows {
        let availabilities = ranges_to_slots(&ranges, slot_gap)?;
        responses.push(EventResponse {
            event_id: id,
            user_id: user_id.and_then(|s| Uuid::parse_str(&s).ok()),
            alias,
            availabilities,
        });
    }

    Ok((event, responses))
}

/// Write one participant's availability, replacing any previous
/// submission for the same `(event_id, alias)` key.
///
/// The write is a single conditional insert, so concurrent submissions
/// for the same key resolve to last-writer-wins at the storage layer
/// without any application-level locking.
pub async fn upsert_availability(
    db: &Connection,
    response: EventResponse,
    slot_gap: Duration,
) -> Result<(), EventError> {
    let ranges = slots_to_ranges(&response.availabilities, slot_gap);
    let ranges_json = serde_json::to_string(&ranges)?;

    let event_id = response.event_id.canonical();
    let user_id = response.user_id.map(|u| u.to_string());
    let alias = response.alias;
    db.call(move |conn| {
        conn.execute(
            r"
          INSERT INTO event_response (event_id, user_id, alias, availabilities)
          VALUES (?1, ?2, ?3, ?4)
          ON CONFLICT (event_id, alias) DO UPDATE SET
            user_id = excluded.user_id,
            availabilities = excluded.availabilities
        ",
            params![event_id, user_id, alias, ranges_json],
        )?;
        Ok(())
    })
    .await?;

    Ok(())
}

/// Missing rows surface as `QueryReturnedNoRows`; everything else from
/// the storage layer is a server-side failure.
fn map_storage_error(err: tokio_rusqlite::Error) -> EventError {
    match err {
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => {
            EventError::NotFound
        }
        other => EventError::Storage(other),
    }
}

fn column_error(index: usize, err: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::initialize_db;
    use chrono::NaiveDateTime;

    async fn test_db() -> Connection {
        let db = Connection::open_in_memory()
            .await
            .expect("Failed to open in-memory db");
        db.call(|conn| {
            initialize_db(conn).expect("Failed to initialize db");
            Ok(())
        })
        .await
        .unwrap();
        db
    }

    fn gap() -> Duration {
        Duration::minutes(30)
    }

    fn draft() -> NewEvent {
        NewEvent {
            name: "sprint planning".to_string(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            is_specific_dates: true,
            dates: vec![
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            ],
        }
    }

    fn slot(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn it_round_trips_an_event() {
        let db = test_db().await;
        let id = add_event(&db, draft()).await.unwrap();

        let (event, responses) = get_event(&db, id, gap()).await.unwrap();
        assert_eq!(event.id, id);
        assert_eq!(event.name, "sprint planning");
        assert_eq!(event.dates.len(), 2);
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn it_returns_not_found_for_an_unknown_id() {
        let db = test_db().await;
        let err = get_event(&db, EventId::new(), gap()).await.unwrap_err();
        assert!(matches!(err, EventError::NotFound));
    }

    #[tokio::test]
    async fn it_replaces_availability_on_resubmission() {
        let db = test_db().await;
        let id = add_event(&db, draft()).await.unwrap();

        let first = EventResponse {
            event_id: id,
            user_id: None,
            alias: "ada".to_string(),
            availabilities: vec![slot(9, 0), slot(9, 30)],
        };
        upsert_availability(&db, first, gap()).await.unwrap();

        let second = EventResponse {
            event_id: id,
            user_id: None,
            alias: "ada".to_string(),
            availabilities: vec![slot(14, 0)],
        };
        upsert_availability(&db, second, gap()).await.unwrap();

        let (_, responses) = get_event(&db, id, gap()).await.unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].alias, "ada");
        assert_eq!(responses[0].availabilities, vec![slot(14, 0)]);
    }

    #[tokio::test]
    async fn it_keeps_responses_from_different_participants_separate() {
        let db = test_db().await;
        let id = add_event(&db, draft()).await.unwrap();

        for (alias, hour) in [("ada", 9), ("grace", 10)] {
            let response = EventResponse {
                event_id: id,
                user_id: Some(Uuid::new_v4()),
                alias: alias.to_string(),
                availabilities: vec![slot(hour, 0)],
            };
            upsert_availability(&db, response, gap()).await.unwrap();
        }

        let (_, mut responses) = get_event(&db, id, gap()).await.unwrap();
        responses.sort_by(|a, b| a.alias.cmp(&b.alias));
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].alias, "ada");
        assert!(responses[0].user_id.is_some());
        assert_eq!(responses[1].alias, "grace");
    }

    #[tokio::test]
    async fn it_expands_stored_ranges_back_to_slots() {
        let db = test_db().await;
        let id = add_event(&db, draft()).await.unwrap();

        let submitted = vec![slot(9, 0), slot(9, 30), slot(10, 0), slot(11, 0)];
        let response = EventResponse {
            event_id: id,
            user_id: None,
            alias: "ada".to_string(),
            availabilities: submitted.clone(),
        };
        upsert_availability(&db, response, gap()).await.unwrap();

        let (_, responses) = get_event(&db, id, gap()).await.unwrap();
        assert_eq!(responses[0].availabilities, submitted);
    }
}
