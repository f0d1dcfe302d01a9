use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user (
            user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL,
            email       TEXT NOT NULL,
            pw_hash     TEXT NOT NULL
        );

        -- Edge list; no uniqueness constraint, unfollow deletes every
        -- matching row.
        CREATE TABLE IF NOT EXISTS follower (
            who_id      INTEGER NOT NULL,
            whom_id     INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS message (
            message_id  INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id   INTEGER NOT NULL,
            text        TEXT NOT NULL,
            pub_date    INTEGER NOT NULL,
            flagged     INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_message_pub_date
            ON message(pub_date);

        CREATE INDEX IF NOT EXISTS idx_follower_who
            ON follower(who_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
