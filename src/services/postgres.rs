use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{next_average, RatingUpdate};
use crate::models::{
    AssignedStudent, DashboardStats, OnboardStudentRequest, StudentProfile, StudentSummary,
    TutorCandidate, TutorDashboard, TutorSummary,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Fields of a tutor being registered
#[derive(Debug, Clone)]
pub struct NewTutor {
    pub name: String,
    pub email: String,
    pub subject_domains: Vec<String>,
    pub teaching_languages: Vec<String>,
    pub available_slots: Vec<String>,
    pub years_of_experience: f64,
}

const TUTOR_COLUMNS: &str = "id, name, email, is_verified, subject_domains, teaching_languages, \
    available_slots, rating, total_ratings, years_of_experience, total_sessions_completed";

const STUDENT_COLUMNS: &str = "id, name, email, grade, phone_number, learning_topic, \
    educational_board, exams, tutor_gender, preferred_language, mode, session_type, \
    days_per_week, time_of_day, class_duration, week_preference, learning_style, \
    wants_assignments, current_tutor";

/// PostgreSQL client holding tutors, students and tutor rosters
///
/// Every mutation of a tutor's aggregate fields goes through a single
/// statement or a transaction holding the row lock, so concurrent requests
/// never lose an update.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Client whose pool connects on first use and skips migrations
    ///
    /// Handlers that reject a request before touching the store can be
    /// exercised with this and no running database.
    pub fn lazy(database_url: &str) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// All tutors flagged verified, the candidate pool for matching
    pub async fn fetch_verified_tutors(&self) -> Result<Vec<TutorCandidate>, PostgresError> {
        let query = format!(
            "SELECT {} FROM tutors WHERE is_verified = TRUE ORDER BY created_at, id",
            TUTOR_COLUMNS
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let tutors = rows.iter().map(tutor_from_row).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} verified tutors", tutors.len());

        Ok(tutors)
    }

    /// Every tutor, verified or not
    pub async fn list_tutors(&self) -> Result<Vec<TutorCandidate>, PostgresError> {
        let query = format!("SELECT {} FROM tutors ORDER BY created_at, id", TUTOR_COLUMNS);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let tutors = rows.iter().map(tutor_from_row).collect::<Result<Vec<_>, _>>()?;

        Ok(tutors)
    }

    pub async fn get_tutor(&self, tutor_id: Uuid) -> Result<TutorCandidate, PostgresError> {
        let query = format!("SELECT {} FROM tutors WHERE id = $1", TUTOR_COLUMNS);

        let row = sqlx::query(&query)
            .bind(tutor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Tutor {}", tutor_id)))?;

        Ok(tutor_from_row(&row)?)
    }

    /// Register a tutor; new tutors start unverified with no ratings
    pub async fn create_tutor(&self, tutor: &NewTutor) -> Result<TutorCandidate, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO tutors (id, name, email, subject_domains, teaching_languages, available_slots, years_of_experience)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TUTOR_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&tutor.name)
            .bind(&tutor.email)
            .bind(&tutor.subject_domains)
            .bind(&tutor.teaching_languages)
            .bind(&tutor.available_slots)
            .bind(tutor.years_of_experience)
            .fetch_one(&self.pool)
            .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(PostgresError::Conflict(format!(
                    "A tutor with email {} already exists",
                    tutor.email
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let created = tutor_from_row(&row)?;
        tracing::info!("Registered tutor {} ({})", created.id, created.email);

        Ok(created)
    }

    pub async fn verify_tutor(&self, tutor_id: Uuid) -> Result<TutorCandidate, PostgresError> {
        let query = format!(
            "UPDATE tutors SET is_verified = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            TUTOR_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(tutor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Tutor {}", tutor_id)))?;

        Ok(tutor_from_row(&row)?)
    }

    /// Verify every unverified tutor, returning how many changed
    pub async fn verify_all_tutors(&self) -> Result<u64, PostgresError> {
        let result = sqlx::query(
            "UPDATE tutors SET is_verified = TRUE, updated_at = NOW() WHERE is_verified = FALSE",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Verified {} tutors", result.rows_affected());

        Ok(result.rows_affected())
    }

    /// Fold a new rating into a tutor's running average
    ///
    /// The row is locked with `FOR UPDATE` for the whole read-modify-write,
    /// so concurrent submissions for the same tutor are serialized.
    pub async fn submit_rating(
        &self,
        tutor_id: Uuid,
        rating: f64,
    ) -> Result<RatingUpdate, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT rating, total_ratings FROM tutors WHERE id = $1 FOR UPDATE")
            .bind(tutor_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Tutor {}", tutor_id)))?;

        let current: f64 = row.try_get("rating")?;
        let total_ratings = count_column(&row, "total_ratings")?;

        let update = next_average(current, total_ratings, rating);

        sqlx::query(
            "UPDATE tutors SET rating = $2, total_ratings = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(tutor_id)
        .bind(update.rating)
        .bind(i64::from(update.total_ratings))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            "Rated tutor {}: {} -> {} ({} ratings)",
            tutor_id,
            current,
            update.rating,
            update.total_ratings
        );

        Ok(update)
    }

    /// Link a student to a tutor
    ///
    /// Sets the student's current tutor and adds the student to the tutor's
    /// roster. Repeating the call leaves the roster unchanged. Returns whether
    /// the roster gained an entry.
    pub async fn assign_tutor(&self, student_id: Uuid, tutor_id: Uuid) -> Result<bool, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let tutor_exists = sqlx::query("SELECT 1 FROM tutors WHERE id = $1 FOR SHARE")
            .bind(tutor_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !tutor_exists {
            return Err(PostgresError::NotFound(format!("Tutor {}", tutor_id)));
        }

        let updated = sqlx::query(
            "UPDATE students SET current_tutor = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(student_id)
        .bind(tutor_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(PostgresError::NotFound(format!("Student {}", student_id)));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO tutor_students (tutor_id, student_id)
            VALUES ($1, $2)
            ON CONFLICT (tutor_id, student_id) DO NOTHING
            "#,
        )
        .bind(tutor_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(inserted.rows_affected() > 0)
    }

    /// Increment a tutor's completed session count, returning the new total
    pub async fn complete_session(&self, tutor_id: Uuid) -> Result<u32, PostgresError> {
        let row = sqlx::query(
            r#"
            UPDATE tutors
            SET total_sessions_completed = total_sessions_completed + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING total_sessions_completed
            "#,
        )
        .bind(tutor_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::NotFound(format!("Tutor {}", tutor_id)))?;

        Ok(count_column(&row, "total_sessions_completed")?)
    }

    /// Create or update a student profile keyed by email
    ///
    /// Only the fields present in the request are written; absent ones keep
    /// their stored value.
    pub async fn upsert_student_profile(
        &self,
        profile: &OnboardStudentRequest,
    ) -> Result<StudentProfile, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO students (
                id, email, name, grade, phone_number, learning_topic, educational_board, exams,
                tutor_gender, preferred_language, mode, session_type, days_per_week, time_of_day,
                class_duration, week_preference, learning_style, wants_assignments
            )
            VALUES ($1, $2, COALESCE($3, ''), $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (email) DO UPDATE SET
                name = COALESCE($3, students.name),
                grade = COALESCE(EXCLUDED.grade, students.grade),
                phone_number = COALESCE(EXCLUDED.phone_number, students.phone_number),
                learning_topic = COALESCE(EXCLUDED.learning_topic, students.learning_topic),
                educational_board = COALESCE(EXCLUDED.educational_board, students.educational_board),
                exams = COALESCE(EXCLUDED.exams, students.exams),
                tutor_gender = COALESCE(EXCLUDED.tutor_gender, students.tutor_gender),
                preferred_language = COALESCE(EXCLUDED.preferred_language, students.preferred_language),
                mode = COALESCE(EXCLUDED.mode, students.mode),
                session_type = COALESCE(EXCLUDED.session_type, students.session_type),
                days_per_week = COALESCE(EXCLUDED.days_per_week, students.days_per_week),
                time_of_day = COALESCE(EXCLUDED.time_of_day, students.time_of_day),
                class_duration = COALESCE(EXCLUDED.class_duration, students.class_duration),
                week_preference = COALESCE(EXCLUDED.week_preference, students.week_preference),
                learning_style = COALESCE(EXCLUDED.learning_style, students.learning_style),
                wants_assignments = COALESCE(EXCLUDED.wants_assignments, students.wants_assignments),
                updated_at = NOW()
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&profile.email)
            .bind(&profile.full_name)
            .bind(&profile.grade)
            .bind(&profile.phone_number)
            .bind(&profile.learning_topic)
            .bind(&profile.educational_board)
            .bind(&profile.exams)
            .bind(profile.tutor_gender)
            .bind(&profile.preferred_language)
            .bind(profile.mode)
            .bind(profile.session_type)
            .bind(profile.days_per_week.map(i16::from))
            .bind(&profile.time_of_day)
            .bind(&profile.class_duration)
            .bind(&profile.week_preference)
            .bind(&profile.learning_style)
            .bind(&profile.wants_assignments)
            .fetch_one(&self.pool)
            .await?;

        let student = student_from_row(&row)?;
        tracing::debug!("Stored onboarding profile for student {}", student.id);

        Ok(student)
    }

    /// Counts and summaries for the admin dashboard
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, PostgresError> {
        let student_rows = sqlx::query(
            r#"
            SELECT id, name, email, learning_topic, preferred_language, current_tutor IS NOT NULL AS assigned
            FROM students
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let students = student_rows
            .iter()
            .map(|row| {
                Ok(StudentSummary {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    email: row.try_get("email")?,
                    assigned: row.try_get("assigned")?,
                    learning_topic: or_na(row.try_get("learning_topic")?),
                    preferred_language: or_na(row.try_get("preferred_language")?),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let tutor_rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.email, t.subject_domains, t.teaching_languages, t.is_verified,
                   COUNT(ts.student_id) AS assigned_count
            FROM tutors t
            LEFT JOIN tutor_students ts ON ts.tutor_id = t.id
            GROUP BY t.id
            ORDER BY t.created_at, t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let tutors = tutor_rows
            .iter()
            .map(|row| {
                let assigned_count = count_column(row, "assigned_count")? as usize;
                Ok(TutorSummary {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    email: row.try_get("email")?,
                    assigned: assigned_count > 0,
                    assigned_count,
                    subject_domains: row.try_get("subject_domains")?,
                    teaching_languages: row.try_get("teaching_languages")?,
                    is_verified: row.try_get("is_verified")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let assigned_students = students.iter().filter(|s| s.assigned).count();
        let assigned_tutors = tutors.iter().filter(|t| t.assigned).count();

        Ok(DashboardStats {
            total_students: students.len(),
            total_tutors: tutors.len(),
            assigned_students,
            unassigned_students: students.len() - assigned_students,
            assigned_tutors,
            unassigned_tutors: tutors.len() - assigned_tutors,
            students,
            tutors,
        })
    }

    /// A tutor's profile with the students on their roster
    pub async fn tutor_dashboard(&self, tutor_id: Uuid) -> Result<TutorDashboard, PostgresError> {
        let tutor = self.get_tutor(tutor_id).await?;
        self.roster(tutor).await
    }

    /// Same as [`PostgresClient::tutor_dashboard`], looked up by email
    pub async fn tutor_dashboard_by_email(&self, email: &str) -> Result<TutorDashboard, PostgresError> {
        let tutor = self.get_tutor_by_email(email).await?;
        self.roster(tutor).await
    }

    /// Emails are stored lowercased, so the lookup ignores case
    pub async fn get_tutor_by_email(&self, email: &str) -> Result<TutorCandidate, PostgresError> {
        let email = email.trim().to_lowercase();
        let query = format!("SELECT {} FROM tutors WHERE email = $1", TUTOR_COLUMNS);

        let row = sqlx::query(&query)
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Tutor with email {}", email)))?;

        Ok(tutor_from_row(&row)?)
    }

    async fn roster(&self, tutor: TutorCandidate) -> Result<TutorDashboard, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, s.email, s.learning_topic, s.preferred_language, s.grade,
                   s.mode::TEXT AS mode, s.time_of_day
            FROM tutor_students ts
            JOIN students s ON s.id = ts.student_id
            WHERE ts.tutor_id = $1
            ORDER BY ts.assigned_at, s.id
            "#,
        )
        .bind(tutor.id)
        .fetch_all(&self.pool)
        .await?;

        let assigned_students = rows
            .iter()
            .map(|row| {
                Ok(AssignedStudent {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    email: row.try_get("email")?,
                    learning_topic: or_na(row.try_get("learning_topic")?),
                    preferred_language: or_na(row.try_get("preferred_language")?),
                    grade: or_na(row.try_get("grade")?),
                    mode: or_na(row.try_get("mode")?),
                    time_of_day: or_na(row.try_get("time_of_day")?),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(TutorDashboard {
            total_assigned: assigned_students.len(),
            tutor,
            assigned_students,
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn tutor_from_row(row: &PgRow) -> Result<TutorCandidate, sqlx::Error> {
    Ok(TutorCandidate {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        is_verified: row.try_get("is_verified")?,
        subject_domains: row.try_get("subject_domains")?,
        teaching_languages: row.try_get("teaching_languages")?,
        available_slots: row.try_get("available_slots")?,
        rating: row.try_get("rating")?,
        total_ratings: count_column(row, "total_ratings")?,
        years_of_experience: row.try_get("years_of_experience")?,
        total_sessions_completed: count_column(row, "total_sessions_completed")?,
    })
}

fn student_from_row(row: &PgRow) -> Result<StudentProfile, sqlx::Error> {
    let days_per_week: Option<i16> = row.try_get("days_per_week")?;

    Ok(StudentProfile {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        grade: row.try_get("grade")?,
        phone_number: row.try_get("phone_number")?,
        learning_topic: row.try_get("learning_topic")?,
        educational_board: row.try_get("educational_board")?,
        exams: row.try_get("exams")?,
        tutor_gender: row.try_get("tutor_gender")?,
        preferred_language: row.try_get("preferred_language")?,
        mode: row.try_get("mode")?,
        session_type: row.try_get("session_type")?,
        days_per_week: days_per_week.and_then(|d| u8::try_from(d).ok()),
        time_of_day: row.try_get("time_of_day")?,
        class_duration: row.try_get("class_duration")?,
        week_preference: row.try_get("week_preference")?,
        learning_style: row.try_get("learning_style")?,
        wants_assignments: row.try_get("wants_assignments")?,
        current_tutor: row.try_get("current_tutor")?,
    })
}

/// Read a BIGINT counter, clamping into `u32`
fn count_column(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i64 = row.try_get(column)?;
    Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("Math".to_string())), "Math");
    }

    #[test]
    fn test_column_lists_cover_domain_fields() {
        for column in ["is_verified", "subject_domains", "available_slots", "total_sessions_completed"] {
            assert!(TUTOR_COLUMNS.contains(column));
        }
        for column in ["learning_topic", "preferred_language", "time_of_day", "current_tutor"] {
            assert!(STUDENT_COLUMNS.contains(column));
        }
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_rating_round_trip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let client = PostgresClient::new(&url, 2, 1, Duration::from_secs(5), Duration::from_secs(60))
            .await
            .expect("Failed to connect");

        let tutor = client
            .create_tutor(&NewTutor {
                name: "Rating Test".to_string(),
                email: format!("rating-{}@example.com", Uuid::new_v4()),
                subject_domains: vec!["Math".to_string()],
                teaching_languages: vec!["English".to_string()],
                available_slots: vec!["Evening".to_string()],
                years_of_experience: 3.0,
            })
            .await
            .unwrap();

        client.submit_rating(tutor.id, 4.0).await.unwrap();
        let update = client.submit_rating(tutor.id, 5.0).await.unwrap();

        assert_eq!(update.rating, 4.5);
        assert_eq!(update.total_ratings, 2);
    }
}
