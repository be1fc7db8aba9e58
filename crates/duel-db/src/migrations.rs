use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS profiles (
            user_id         TEXT PRIMARY KEY REFERENCES users(id),
            display_name    TEXT,
            startup_name    TEXT,
            category        TEXT,
            stage           TEXT,
            website         TEXT,
            twitter         TEXT,
            linkedin        TEXT,
            github          TEXT,
            avatar_url      TEXT,
            avatar_data     TEXT,
            cover_url       TEXT,
            cover_data      TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS challenges (
            id              TEXT PRIMARY KEY,
            from_user_id    TEXT NOT NULL REFERENCES users(id),
            to_user_id      TEXT NOT NULL REFERENCES users(id),
            status          TEXT NOT NULL DEFAULT 'pending',
            message         TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            accepted_at     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_challenges_to
            ON challenges(to_user_id, status, created_at);

        CREATE INDEX IF NOT EXISTS idx_challenges_from
            ON challenges(from_user_id, status);

        CREATE TABLE IF NOT EXISTS challenge_tasks (
            challenge_id    TEXT NOT NULL REFERENCES challenges(id),
            day             INTEGER NOT NULL,
            task_code       TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(challenge_id, day)
        );

        CREATE TABLE IF NOT EXISTS challenge_task_proofs (
            id              TEXT PRIMARY KEY,
            challenge_id    TEXT NOT NULL REFERENCES challenges(id),
            day             INTEGER NOT NULL,
            user_id         TEXT NOT NULL REFERENCES users(id),
            proof_url       TEXT,
            proof_data      TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(challenge_id, day, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_proofs_challenge
            ON challenge_task_proofs(challenge_id, created_at);

        CREATE TABLE IF NOT EXISTS images (
            id              TEXT PRIMARY KEY,
            owner_id        TEXT NOT NULL REFERENCES users(id),
            content_type    TEXT NOT NULL,
            size            INTEGER NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
