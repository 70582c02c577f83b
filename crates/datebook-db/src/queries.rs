use crate::Database;
use crate::models::{EventRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Events --

    pub fn create_event(
        &self,
        user_id: i64,
        date: &str,
        event: &str,
        start_time: &str,
        end_time: Option<&str>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO events (user_id, date, event, start_time, end_time) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![user_id, date, event, start_time, end_time],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All events owned by `user_id`, ordered by date and then insertion.
    pub fn events_for_user(&self, user_id: i64) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| query_events_for_user(conn, user_id))
    }

    /// Returns true iff a row matching both id and owner was removed.
    pub fn delete_event(&self, user_id: i64, event_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM events WHERE id = ?1 AND user_id = ?2",
                [event_id, user_id],
            )?;
            Ok(changed > 0)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_events_for_user(conn: &Connection, user_id: i64) -> Result<Vec<EventRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, date, event, start_time, end_time, created_at
         FROM events
         WHERE user_id = ?1
         ORDER BY date, id",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                date: row.get(2)?,
                event: row.get(3)?,
                start_time: row.get(4)?,
                end_time: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, is_unique_violation};

    fn db() -> Database {
        Database::open_in_memory().expect("in-memory db should open")
    }

    #[test]
    fn create_and_find_user() {
        let db = db();
        let id = db.create_user("alice", "hash").unwrap();
        assert!(id > 0);

        let user = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password, "hash");

        assert!(db.get_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_a_unique_violation() {
        let db = db();
        db.create_user("alice", "hash").unwrap();

        let err = db.create_user("alice", "other-hash").unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn events_ordered_by_date_then_id() {
        let db = db();
        let user = db.create_user("alice", "hash").unwrap();

        // Inserted out of calendar order; two events share a date.
        let late = db.create_event(user, "2024-02-02", "Dentist", "09:00", None).unwrap();
        let first = db.create_event(user, "2024-02-01", "Lunch", "12:00", Some("13:00")).unwrap();
        let second = db.create_event(user, "2024-02-01", "Gym", "18:00", None).unwrap();

        let events = db.events_for_user(user).unwrap();
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first, second, late]);
        assert_eq!(events[0].end_time.as_deref(), Some("13:00"));
        assert_eq!(events[1].end_time, None);
    }

    #[test]
    fn events_scoped_to_owner() {
        let db = db();
        let alice = db.create_user("alice", "hash").unwrap();
        let bob = db.create_user("bob", "hash").unwrap();

        db.create_event(alice, "2024-05-01", "Lunch", "12:00", None).unwrap();

        assert_eq!(db.events_for_user(alice).unwrap().len(), 1);
        assert!(db.events_for_user(bob).unwrap().is_empty());
    }

    #[test]
    fn delete_requires_matching_owner() {
        let db = db();
        let alice = db.create_user("alice", "hash").unwrap();
        let bob = db.create_user("bob", "hash").unwrap();
        let event = db.create_event(alice, "2024-05-01", "Lunch", "12:00", None).unwrap();

        // Wrong owner: nothing removed, row intact.
        assert!(!db.delete_event(bob, event).unwrap());
        assert_eq!(db.events_for_user(alice).unwrap().len(), 1);

        assert!(db.delete_event(alice, event).unwrap());
        assert!(db.events_for_user(alice).unwrap().is_empty());

        // Already gone.
        assert!(!db.delete_event(alice, event).unwrap());
    }
}
