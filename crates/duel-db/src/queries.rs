use crate::Database;
use crate::models::{
    ChallengeRow, DirectoryFilter, ImageRow, ProfileRow, ProfileUpdate, ProofRow, TaskRow, UserRow,
};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Returns false when the email is already taken. The UNIQUE index is the
    /// arbiter here, so two concurrent registrations cannot both succeed.
    pub fn create_user(&self, id: &str, email: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO users (id, email, password) VALUES (?1, ?2, ?3)",
                (id, email, password_hash),
            ) {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, email, password, created_at FROM users WHERE email = ?1")?;
            let row = stmt
                .query_row([email], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn user_exists(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT 1 FROM users WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }

    // -- Profiles --

    /// Insert-or-replace a profile keyed on user_id. The whole form is
    /// written each time; updated_at is bumped on conflict.
    pub fn upsert_profile(&self, user_id: &str, p: &ProfileUpdate) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO profiles (
                    user_id, display_name, startup_name, category, stage,
                    website, twitter, linkedin, github,
                    avatar_url, avatar_data, cover_url, cover_data
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                 ON CONFLICT(user_id) DO UPDATE SET
                    display_name = excluded.display_name,
                    startup_name = excluded.startup_name,
                    category = excluded.category,
                    stage = excluded.stage,
                    website = excluded.website,
                    twitter = excluded.twitter,
                    linkedin = excluded.linkedin,
                    github = excluded.github,
                    avatar_url = excluded.avatar_url,
                    avatar_data = excluded.avatar_data,
                    cover_url = excluded.cover_url,
                    cover_data = excluded.cover_data,
                    updated_at = datetime('now')",
                rusqlite::params![
                    user_id,
                    p.display_name,
                    p.startup_name,
                    p.category,
                    p.stage,
                    p.website,
                    p.twitter,
                    p.linkedin,
                    p.github,
                    p.avatar_url,
                    p.avatar_data,
                    p.cover_url,
                    p.cover_data,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROFILE_COLS} FROM profiles WHERE user_id = ?1"
            ))?;
            let row = stmt.query_row([user_id], map_profile).optional()?;
            Ok(row)
        })
    }

    /// The founder directory: every profile except the caller's own, with
    /// optional name-substring / category / stage filters applied in SQL.
    pub fn list_directory(
        &self,
        exclude_user_id: &str,
        filter: &DirectoryFilter,
    ) -> Result<Vec<ProfileRow>> {
        self.with_conn(|conn| query_directory(conn, exclude_user_id, filter))
    }

    pub fn get_profiles_by_ids(&self, user_ids: &[String]) -> Result<Vec<ProfileRow>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=user_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT {PROFILE_COLS} FROM profiles WHERE user_id IN ({})",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = user_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), map_profile)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Challenges --

    pub fn insert_challenge(
        &self,
        id: &str,
        from_user_id: &str,
        to_user_id: &str,
        message: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO challenges (id, from_user_id, to_user_id, message)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, from_user_id, to_user_id, message],
            )?;
            Ok(())
        })
    }

    pub fn get_challenge(&self, id: &str) -> Result<Option<ChallengeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHALLENGE_COLS} FROM challenges WHERE id = ?1"
            ))?;
            let row = stmt.query_row([id], map_challenge).optional()?;
            Ok(row)
        })
    }

    pub fn has_pending_challenge(&self, from_user_id: &str, to_user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM challenges
                     WHERE from_user_id = ?1 AND to_user_id = ?2 AND status = 'pending'",
                    [from_user_id, to_user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Transition a challenge out of `pending`. Returns false if the row was
    /// missing or already in a terminal state — terminal states stay terminal
    /// regardless of write order.
    pub fn respond_challenge(&self, id: &str, status: &str, accept: bool) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE challenges
                 SET status = ?2,
                     accepted_at = CASE WHEN ?3 THEN datetime('now') ELSE accepted_at END
                 WHERE id = ?1 AND status = 'pending'",
                rusqlite::params![id, status, accept],
            )?;
            Ok(changed == 1)
        })
    }

    /// The caller's pending inbox, newest first.
    pub fn list_incoming_pending(&self, to_user_id: &str) -> Result<Vec<ChallengeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHALLENGE_COLS} FROM challenges
                 WHERE to_user_id = ?1 AND status = 'pending'
                 ORDER BY created_at DESC"
            ))?;
            let rows = stmt
                .query_map([to_user_id], map_challenge)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Receiver ids of the caller's pending sends — drives the
    /// "already challenged" markers in the directory.
    pub fn list_outgoing_pending_targets(&self, from_user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT to_user_id FROM challenges
                 WHERE from_user_id = ?1 AND status = 'pending'",
            )?;
            let rows = stmt
                .query_map([from_user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Accepted challenges the user participates in, newest first.
    pub fn list_accepted_for(&self, user_id: &str) -> Result<Vec<ChallengeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHALLENGE_COLS} FROM challenges
                 WHERE (from_user_id = ?1 OR to_user_id = ?1) AND status = 'accepted'
                 ORDER BY created_at DESC"
            ))?;
            let rows = stmt
                .query_map([user_id], map_challenge)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Challenge tasks --

    /// Seed one task per day when a challenge is accepted. Idempotent: a
    /// replayed accept never overwrites an existing schedule.
    pub fn seed_tasks(&self, challenge_id: &str, task_codes: &[&str]) -> Result<()> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "INSERT OR IGNORE INTO challenge_tasks (challenge_id, day, task_code)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (i, code) in task_codes.iter().enumerate() {
                stmt.execute(rusqlite::params![challenge_id, (i + 1) as u32, code])?;
            }
            Ok(())
        })
    }

    pub fn list_tasks(&self, challenge_id: &str) -> Result<Vec<TaskRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT challenge_id, day, task_code, created_at FROM challenge_tasks
                 WHERE challenge_id = ?1 ORDER BY day ASC",
            )?;
            let rows = stmt
                .query_map([challenge_id], |row| {
                    Ok(TaskRow {
                        challenge_id: row.get(0)?,
                        day: row.get(1)?,
                        task_code: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Proofs --

    /// Upsert keyed on (challenge_id, day, user_id): a re-upload replaces the
    /// stored reference but keeps the original row id.
    pub fn upsert_proof(
        &self,
        id: &str,
        challenge_id: &str,
        day: u32,
        user_id: &str,
        proof_url: Option<&str>,
        proof_data: Option<&str>,
    ) -> Result<ProofRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO challenge_task_proofs
                    (id, challenge_id, day, user_id, proof_url, proof_data)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(challenge_id, day, user_id) DO UPDATE SET
                    proof_url = excluded.proof_url,
                    proof_data = excluded.proof_data,
                    created_at = datetime('now')",
                rusqlite::params![id, challenge_id, day, user_id, proof_url, proof_data],
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {PROOF_COLS} FROM challenge_task_proofs
                 WHERE challenge_id = ?1 AND day = ?2 AND user_id = ?3"
            ))?;
            let row = stmt.query_row(rusqlite::params![challenge_id, day, user_id], map_proof)?;
            Ok(row)
        })
    }

    pub fn get_proof(
        &self,
        challenge_id: &str,
        day: u32,
        user_id: &str,
    ) -> Result<Option<ProofRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROOF_COLS} FROM challenge_task_proofs
                 WHERE challenge_id = ?1 AND day = ?2 AND user_id = ?3"
            ))?;
            let row = stmt
                .query_row(rusqlite::params![challenge_id, day, user_id], map_proof)
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_proofs(&self, challenge_id: &str) -> Result<Vec<ProofRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROOF_COLS} FROM challenge_task_proofs
                 WHERE challenge_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt
                .query_map([challenge_id], map_proof)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Images --

    pub fn insert_image(
        &self,
        id: &str,
        owner_id: &str,
        content_type: &str,
        size: i64,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO images (id, owner_id, content_type, size) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, owner_id, content_type, size],
            )?;
            Ok(())
        })
    }

    pub fn get_image(&self, id: &str) -> Result<Option<ImageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, content_type, size, created_at FROM images WHERE id = ?1",
            )?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(ImageRow {
                        id: row.get(0)?,
                        owner_id: row.get(1)?,
                        content_type: row.get(2)?,
                        size: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }
}

const PROFILE_COLS: &str = "user_id, display_name, startup_name, category, stage, \
     website, twitter, linkedin, github, \
     avatar_url, avatar_data, cover_url, cover_data, created_at, updated_at";

const CHALLENGE_COLS: &str =
    "id, from_user_id, to_user_id, status, message, created_at, accepted_at";

const PROOF_COLS: &str = "id, challenge_id, day, user_id, proof_url, proof_data, created_at";

fn map_profile(row: &rusqlite::Row<'_>) -> std::result::Result<ProfileRow, rusqlite::Error> {
    Ok(ProfileRow {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        startup_name: row.get(2)?,
        category: row.get(3)?,
        stage: row.get(4)?,
        website: row.get(5)?,
        twitter: row.get(6)?,
        linkedin: row.get(7)?,
        github: row.get(8)?,
        avatar_url: row.get(9)?,
        avatar_data: row.get(10)?,
        cover_url: row.get(11)?,
        cover_data: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

fn map_challenge(row: &rusqlite::Row<'_>) -> std::result::Result<ChallengeRow, rusqlite::Error> {
    Ok(ChallengeRow {
        id: row.get(0)?,
        from_user_id: row.get(1)?,
        to_user_id: row.get(2)?,
        status: row.get(3)?,
        message: row.get(4)?,
        created_at: row.get(5)?,
        accepted_at: row.get(6)?,
    })
}

fn map_proof(row: &rusqlite::Row<'_>) -> std::result::Result<ProofRow, rusqlite::Error> {
    Ok(ProofRow {
        id: row.get(0)?,
        challenge_id: row.get(1)?,
        day: row.get(2)?,
        user_id: row.get(3)?,
        proof_url: row.get(4)?,
        proof_data: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn query_directory(
    conn: &Connection,
    exclude_user_id: &str,
    filter: &DirectoryFilter,
) -> Result<Vec<ProfileRow>> {
    let mut sql = format!("SELECT {PROFILE_COLS} FROM profiles WHERE user_id != ?1");
    let mut params: Vec<String> = vec![exclude_user_id.to_string()];

    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        sql.push_str(
            " AND LOWER(COALESCE(display_name, '') || ' ' || COALESCE(startup_name, '')) \
             LIKE ?",
        );
        params.push(format!("%{}%", q.to_lowercase()));
    }
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        sql.push_str(" AND category = ?");
        params.push(category.to_string());
    }
    if let Some(stage) = filter.stage.as_deref().filter(|s| !s.is_empty()) {
        sql.push_str(" AND stage = ?");
        params.push(stage.to_string());
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), map_profile)?
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
    use super::*;
    use uuid::Uuid;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open(&dir.path().join("duel.db")).expect("open db");
        (dir, db)
    }

    fn seed_user(db: &Database, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, email, "argon2-hash").unwrap();
        id
    }

    fn full_profile(website: &str, twitter: &str) -> ProfileUpdate {
        ProfileUpdate {
            display_name: Some("Ada Lovelace".into()),
            startup_name: Some("Analytical Engines".into()),
            category: Some("DevTools".into()),
            stage: Some("Seed".into()),
            website: Some(website.into()),
            twitter: Some(twitter.into()),
            linkedin: Some("https://linkedin.com/in/ada".into()),
            github: Some("https://github.com/ada".into()),
            avatar_url: Some("https://img.example/a.png".into()),
            avatar_data: None,
            cover_url: None,
            cover_data: None,
        }
    }

    #[test]
    fn duplicate_email_is_rejected_by_the_unique_index() {
        let (_dir, db) = test_db();
        let first = db
            .create_user(&Uuid::new_v4().to_string(), "ada@lovelace.dev", "hash-a")
            .unwrap();
        assert!(first);

        let second = db
            .create_user(&Uuid::new_v4().to_string(), "ada@lovelace.dev", "hash-b")
            .unwrap();
        assert!(!second);

        // The original account is untouched
        let row = db.get_user_by_email("ada@lovelace.dev").unwrap().unwrap();
        assert_eq!(row.password, "hash-a");
    }

    #[test]
    fn profile_round_trip() {
        let (_dir, db) = test_db();
        let uid = seed_user(&db, "ada@example.com");

        let update = full_profile("https://engines.dev", "https://x.com/ada");
        db.upsert_profile(&uid, &update).unwrap();

        let row = db.get_profile(&uid).unwrap().expect("profile saved");
        assert_eq!(row.user_id, uid);
        assert_eq!(row.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(row.startup_name.as_deref(), Some("Analytical Engines"));
        assert_eq!(row.category.as_deref(), Some("DevTools"));
        assert_eq!(row.stage.as_deref(), Some("Seed"));
        assert_eq!(row.website.as_deref(), Some("https://engines.dev"));
        assert_eq!(row.twitter.as_deref(), Some("https://x.com/ada"));

        // Second save replaces in place
        let mut update2 = update.clone();
        update2.stage = Some("Series A+".into());
        db.upsert_profile(&uid, &update2).unwrap();
        let row = db.get_profile(&uid).unwrap().unwrap();
        assert_eq!(row.stage.as_deref(), Some("Series A+"));
    }

    #[test]
    fn directory_excludes_caller_and_filters() {
        let (_dir, db) = test_db();
        let me = seed_user(&db, "me@example.com");
        let other = seed_user(&db, "other@example.com");
        let third = seed_user(&db, "third@example.com");

        db.upsert_profile(&me, &full_profile("https://me.dev", "https://x.com/me"))
            .unwrap();
        db.upsert_profile(&other, &full_profile("https://o.dev", "https://x.com/o"))
            .unwrap();
        let mut fintech = full_profile("https://t.dev", "https://x.com/t");
        fintech.display_name = Some("Grace Hopper".into());
        fintech.category = Some("Fintech".into());
        db.upsert_profile(&third, &fintech).unwrap();

        let all = db.list_directory(&me, &DirectoryFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|p| p.user_id != me));

        let filter = DirectoryFilter {
            category: Some("Fintech".into()),
            ..Default::default()
        };
        let fintech_only = db.list_directory(&me, &filter).unwrap();
        assert_eq!(fintech_only.len(), 1);
        assert_eq!(fintech_only[0].user_id, third);

        let filter = DirectoryFilter {
            q: Some("grace".into()),
            ..Default::default()
        };
        let by_name = db.list_directory(&me, &filter).unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].display_name.as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn respond_transitions_out_of_pending_exactly_once() {
        let (_dir, db) = test_db();
        let sender = seed_user(&db, "s@example.com");
        let receiver = seed_user(&db, "r@example.com");
        let cid = Uuid::new_v4().to_string();

        db.insert_challenge(&cid, &sender, &receiver, Some("let's duel"))
            .unwrap();
        assert!(db.has_pending_challenge(&sender, &receiver).unwrap());
        assert_eq!(db.list_incoming_pending(&receiver).unwrap().len(), 1);
        assert_eq!(
            db.list_outgoing_pending_targets(&sender).unwrap(),
            vec![receiver.clone()]
        );

        assert!(db.respond_challenge(&cid, "accepted", true).unwrap());
        let row = db.get_challenge(&cid).unwrap().unwrap();
        assert_eq!(row.status, "accepted");
        assert!(row.accepted_at.is_some());

        // Terminal: a second respond is a no-op
        assert!(!db.respond_challenge(&cid, "rejected", false).unwrap());
        let row = db.get_challenge(&cid).unwrap().unwrap();
        assert_eq!(row.status, "accepted");

        // And it left the pending inbox
        assert!(db.list_incoming_pending(&receiver).unwrap().is_empty());
        assert!(db.list_accepted_for(&sender).unwrap().len() == 1);
        assert!(db.list_accepted_for(&receiver).unwrap().len() == 1);
    }

    #[test]
    fn task_seeding_is_idempotent_and_ordered() {
        let (_dir, db) = test_db();
        let sender = seed_user(&db, "s@example.com");
        let receiver = seed_user(&db, "r@example.com");
        let cid = Uuid::new_v4().to_string();
        db.insert_challenge(&cid, &sender, &receiver, None).unwrap();

        db.seed_tasks(&cid, &["mk_poll", "pr_landing", "ua_webinar"])
            .unwrap();
        // Replayed accept must not reshuffle the schedule
        db.seed_tasks(&cid, &["cc_featured", "cc_blog_post", "mk_bts"])
            .unwrap();

        let tasks = db.list_tasks(&cid).unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(
            tasks.iter().map(|t| t.day).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(tasks[0].task_code, "mk_poll");
        assert_eq!(tasks[2].task_code, "ua_webinar");
    }

    #[test]
    fn proof_upsert_replaces_on_same_tuple() {
        let (_dir, db) = test_db();
        let sender = seed_user(&db, "s@example.com");
        let receiver = seed_user(&db, "r@example.com");
        let cid = Uuid::new_v4().to_string();
        db.insert_challenge(&cid, &sender, &receiver, None).unwrap();

        let first = db
            .upsert_proof(
                &Uuid::new_v4().to_string(),
                &cid,
                1,
                &sender,
                Some("https://img.example/first.png"),
                None,
            )
            .unwrap();

        let second = db
            .upsert_proof(
                &Uuid::new_v4().to_string(),
                &cid,
                1,
                &sender,
                None,
                Some("data:image/png;base64,AAAA"),
            )
            .unwrap();

        // Same logical proof: the row id survives, the reference is replaced
        assert_eq!(first.id, second.id);
        assert_eq!(second.proof_url, None);
        assert_eq!(second.proof_data.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(db.list_proofs(&cid).unwrap().len(), 1);

        // A different day is a different proof
        db.upsert_proof(&Uuid::new_v4().to_string(), &cid, 2, &sender, None, None)
            .unwrap();
        assert_eq!(db.list_proofs(&cid).unwrap().len(), 2);
    }

    #[test]
    fn image_rows_round_trip() {
        let (_dir, db) = test_db();
        let uid = seed_user(&db, "a@example.com");
        let id = Uuid::new_v4().to_string();
        db.insert_image(&id, &uid, "image/png", 1234).unwrap();

        let row = db.get_image(&id).unwrap().expect("image row");
        assert_eq!(row.owner_id, uid);
        assert_eq!(row.content_type, "image/png");
        assert_eq!(row.size, 1234);
        assert!(db.get_image("missing").unwrap().is_none());
    }
}
