//! Repository for the `inferences` table.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::inference::{CreateInference, FeedbackUpdate, InferenceRecord};

/// Column list for `inferences` queries.
const COLUMNS: &str = "\
    id, image_path, created_at, predicted_condition, predicted_confidence, \
    user_skin_type, user_fitzpatrick, user_ethnicity, predictions_json, \
    is_correct, corrected_condition, notes, needs_review";

/// Provides insert, feedback and listing operations for inference records.
pub struct InferenceRepo;

impl InferenceRepo {
    /// Insert a new record, returning the full row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateInference,
    ) -> Result<InferenceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO inferences \
                (id, image_path, created_at, predicted_condition, predicted_confidence, \
                 user_skin_type, user_fitzpatrick, user_ethnicity, predictions_json) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InferenceRecord>(&query)
            .bind(&input.id)
            .bind(&input.image_path)
            .bind(Utc::now())
            .bind(&input.predicted_condition)
            .bind(input.predicted_confidence)
            .bind(&input.profile.skin_type)
            .bind(&input.profile.fitzpatrick)
            .bind(&input.profile.ethnicity)
            .bind(Json(input.predictions_json()))
            .fetch_one(pool)
            .await
    }

    /// Find a record by ID.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: &str,
    ) -> Result<Option<InferenceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inferences WHERE id = ?");
        sqlx::query_as::<_, InferenceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a feedback submission. Returns the updated row, or `None` if the
    /// ID does not exist (nothing is written in that case).
    ///
    /// A negative verdict also stores the corrected label and raises
    /// `needs_review`. A positive verdict clears both, so the last verdict
    /// decides the record's authoritative label.
    pub async fn apply_feedback(
        pool: &SqlitePool,
        id: &str,
        input: &FeedbackUpdate,
    ) -> Result<Option<InferenceRecord>, sqlx::Error> {
        if input.is_correct {
            // A later positive verdict supersedes an earlier correction.
            let query = format!(
                "UPDATE inferences \
                 SET is_correct = 1, corrected_condition = NULL, needs_review = 0, \
                     notes = COALESCE(?, notes) \
                 WHERE id = ? \
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, InferenceRecord>(&query)
                .bind(&input.notes)
                .bind(id)
                .fetch_optional(pool)
                .await
        } else {
            let query = format!(
                "UPDATE inferences \
                 SET is_correct = 0, corrected_condition = ?, needs_review = 1, \
                     notes = COALESCE(?, notes) \
                 WHERE id = ? \
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, InferenceRecord>(&query)
                .bind(&input.corrected_condition)
                .bind(&input.notes)
                .bind(id)
                .fetch_optional(pool)
                .await
        }
    }

    /// List records newest-first, optionally filtered on `needs_review`.
    pub async fn list(
        pool: &SqlitePool,
        needs_review: Option<bool>,
        limit: i64,
    ) -> Result<Vec<InferenceRecord>, sqlx::Error> {
        let where_clause = if needs_review.is_some() {
            "WHERE needs_review = ?"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM inferences {where_clause} \
             ORDER BY created_at DESC, rowid DESC \
             LIMIT ?"
        );

        let mut q = sqlx::query_as::<_, InferenceRecord>(&query);
        if let Some(flag) = needs_review {
            q = q.bind(flag);
        }
        q.bind(limit).fetch_all(pool).await
    }

    /// All records confirmed correct, in insertion order.
    pub async fn list_confirmed(pool: &SqlitePool) -> Result<Vec<InferenceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inferences WHERE is_correct = 1 ORDER BY rowid ASC"
        );
        sqlx::query_as::<_, InferenceRecord>(&query)
            .fetch_all(pool)
            .await
    }
}
