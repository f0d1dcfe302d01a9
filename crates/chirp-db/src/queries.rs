use anyhow::Result;
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Database;
use crate::models::{MessageRow, UserRow};

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, email: &str, pw_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user (username, email, pw_hash) VALUES (?1, ?2, ?3)",
                params![username, email, pw_hash],
            )?;
            Ok(())
        })
    }

    pub fn user_by_id(&self, user_id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, user_id))
    }

    pub fn user_by_name(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_name(conn, username))
    }

    /// Resolve a username to its id. Used pervasively as an existence check.
    pub fn user_id(&self, username: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT user_id FROM user WHERE username = ?1",
                    [username],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    // -- Messages --

    pub fn insert_message(&self, author_id: i64, text: &str, pub_date: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO message (author_id, text, pub_date, flagged) VALUES (?1, ?2, ?3, 0)",
                params![author_id, text, pub_date],
            )?;
            Ok(())
        })
    }

    /// The `limit` most recent non-flagged messages across all users.
    pub fn recent_messages(&self, limit: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                "SELECT message.text, message.pub_date, user.username, user.email
                 FROM message
                 JOIN user ON message.author_id = user.user_id
                 WHERE message.flagged = 0
                 ORDER BY message.pub_date DESC
                 LIMIT ?1",
                &[&limit],
            )
        })
    }

    /// The `limit` most recent non-flagged messages by one author.
    pub fn user_messages(&self, user_id: i64, limit: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                "SELECT message.text, message.pub_date, user.username, user.email
                 FROM message
                 JOIN user ON message.author_id = user.user_id
                 WHERE message.flagged = 0 AND user.user_id = ?1
                 ORDER BY message.pub_date DESC
                 LIMIT ?2",
                &[&user_id, &limit],
            )
        })
    }

    /// Personal timeline: the user's own messages plus everyone they follow.
    pub fn timeline_messages(&self, user_id: i64, limit: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                "SELECT message.text, message.pub_date, user.username, user.email
                 FROM message
                 JOIN user ON message.author_id = user.user_id
                 WHERE message.flagged = 0
                   AND (user.user_id = ?1
                        OR user.user_id IN (SELECT whom_id FROM follower WHERE who_id = ?1))
                 ORDER BY message.pub_date DESC
                 LIMIT ?2",
                &[&user_id, &limit],
            )
        })
    }

    // -- Followers --

    pub fn follow(&self, who_id: i64, whom_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO follower (who_id, whom_id) VALUES (?1, ?2)",
                params![who_id, whom_id],
            )?;
            Ok(())
        })
    }

    /// Deletes every matching edge, not just one.
    pub fn unfollow(&self, who_id: i64, whom_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM follower WHERE who_id = ?1 AND whom_id = ?2",
                params![who_id, whom_id],
            )?;
            Ok(())
        })
    }

    pub fn is_following(&self, who_id: i64, whom_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let hit: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM follower WHERE who_id = ?1 AND whom_id = ?2 LIMIT 1",
                    params![who_id, whom_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(hit.is_some())
        })
    }

    /// Usernames that `who_id` follows, capped at `limit`.
    pub fn follows(&self, who_id: i64, limit: i64) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user.username FROM user
                 INNER JOIN follower ON follower.whom_id = user.user_id
                 WHERE follower.who_id = ?1
                 LIMIT ?2",
            )?;
            let names = stmt
                .query_map(params![who_id, limit], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }
}

fn query_user_by_id(conn: &Connection, user_id: i64) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT user_id, username, email, pw_hash FROM user WHERE user_id = ?1")?;

    let row = stmt
        .query_row([user_id], |row| {
            Ok(UserRow {
                user_id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                pw_hash: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_name(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT user_id, username, email, pw_hash FROM user WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                user_id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                pw_hash: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_messages(conn: &Connection, sql: &str, args: &[&dyn ToSql]) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map(args, |row| {
            Ok(MessageRow {
                text: row.get(0)?,
                pub_date: row.get(1)?,
                username: row.get(2)?,
                email: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
