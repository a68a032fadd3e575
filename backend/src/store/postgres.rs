use async_trait::async_trait;
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};
use uuid::Uuid;

use speakerdrive_shared::{
    EventDetails, IdentityMetadata, IdentityMetadataUpdate, Lead, LeadUnlock, Profile,
    ProfileUpdate, User, UserType,
};

use super::{Credentials, NewUser, Store, StoreError, StoreResult, StoredLead, UnlockOutcome};

const USER_COLUMNS: &str = "id, email, metadata, created_at";

const PROFILE_COLUMNS: &str = "id, auth_id, email, display_name, services, industries, avatar_url, \
     user_type, user_role, email_provider, email_setup_completed, unlock_credits, created_at, updated_at";

const LEAD_COLUMNS: &str = "id, name, focus, image_url, unlock_type, gated_value, industry_category, \
     extension_type, added_at, linkedin_url, event_purpose, detailed_info, host_organization, \
     target_audience, company_size, location, event_details";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_err(column: &str, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: message.into(),
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let Json(metadata): Json<IdentityMetadata> = row.try_get("metadata")?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        metadata,
        created_at: row.try_get("created_at")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    let user_type: String = row.try_get("user_type")?;
    Ok(Profile {
        id: row.try_get("id")?,
        auth_id: row.try_get("auth_id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        services: row.try_get("services")?,
        industries: row.try_get("industries")?,
        avatar_url: row.try_get("avatar_url")?,
        user_type: user_type
            .parse::<UserType>()
            .map_err(|e| decode_err("user_type", e))?,
        user_role: row.try_get("user_role")?,
        email_provider: row.try_get("email_provider")?,
        email_setup_completed: row.try_get("email_setup_completed")?,
        unlock_credits: row.try_get("unlock_credits")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn lead_from_row(row: &PgRow) -> Result<StoredLead, sqlx::Error> {
    let unlock_type: String = row.try_get("unlock_type")?;
    let unlock_type: speakerdrive_shared::UnlockType = unlock_type
        .parse()
        .map_err(|e| decode_err("unlock_type", e))?;
    let extension_type: String = row.try_get("extension_type")?;
    let event_details: Option<Json<EventDetails>> = row.try_get("event_details")?;

    Ok(StoredLead {
        lead: Lead {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            focus: row.try_get("focus")?,
            image_url: row.try_get("image_url")?,
            lead_type: unlock_type.lead_type(),
            unlock_type,
            unlock_value: None,
            is_unlocked: false,
            industry_category: row.try_get("industry_category")?,
            extension_type: extension_type
                .parse()
                .map_err(|e| decode_err("extension_type", e))?,
            added_at: row.try_get("added_at")?,
            linkedin_url: row.try_get("linkedin_url")?,
            event_purpose: row.try_get("event_purpose")?,
            detailed_info: row.try_get("detailed_info")?,
            host_organization: row.try_get("host_organization")?,
            target_audience: row.try_get("target_audience")?,
            company_size: row.try_get("company_size")?,
            location: row.try_get("location")?,
            event_details: event_details.map(|Json(d)| d),
        },
        gated_value: row.try_get("gated_value")?,
    })
}

fn unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let user_id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            "INSERT INTO users (id, email, password_hash, metadata)
             VALUES ($1, LOWER($2), $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(Json(&new_user.metadata))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if unique_violation(&e) {
                StoreError::Conflict("Email already registered".to_string())
            } else {
                StoreError::Database(e)
            }
        })?;
        let user = user_from_row(&row)?;

        sqlx::query(
            "INSERT INTO profiles (id, auth_id, email, user_type, user_role, unlock_credits)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&user.email)
        .bind(user.metadata.user_type.as_str())
        .bind(&user.metadata.user_role)
        .bind(new_user.initial_credits)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_credentials(&self, email: &str) -> StoreResult<Option<Credentials>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash, failed_login_attempts, locked_until
             FROM users WHERE email = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(Credentials {
            user: user_from_row(&row)?,
            password_hash: row.try_get("password_hash")?,
            failed_login_attempts: row.try_get("failed_login_attempts")?,
            locked_until: row.try_get("locked_until")?,
        }))
    }

    async fn record_login_failure(
        &self,
        id: Uuid,
        max_attempts: i32,
        lock_for: chrono::Duration,
    ) -> StoreResult<()> {
        // A lapsed lock starts a fresh run of attempts
        sqlx::query(
            "UPDATE users SET
               failed_login_attempts = CASE WHEN locked_until <= NOW() THEN 1
                                            ELSE failed_login_attempts + 1 END,
               locked_until = CASE
                 WHEN (CASE WHEN locked_until <= NOW() THEN 1
                            ELSE failed_login_attempts + 1 END) >= $2
                   THEN NOW() + make_interval(secs => $3)
                 WHEN locked_until <= NOW() THEN NULL
                 ELSE locked_until END
             WHERE id = $1",
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_for.num_seconds() as f64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_login_success(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query(
            "UPDATE users SET failed_login_attempts = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_identity_metadata(
        &self,
        id: Uuid,
        update: &IdentityMetadataUpdate,
    ) -> StoreResult<User> {
        // JSONB `||` merges the patch over the stored object
        let patch = serde_json::to_value(update)?;
        let row = sqlx::query(&format!(
            "UPDATE users SET metadata = metadata || $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(patch)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("User".to_string()))?;
        Ok(user_from_row(&row)?)
    }

    async fn remove_avatar(&self, id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query(
            "UPDATE users SET metadata = (metadata - 'avatar_url')
                 || jsonb_build_object('avatar_updated_at', to_jsonb(NOW()))
             WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound("User".to_string()));
        }
        sqlx::query("UPDATE profiles SET avatar_url = NULL, updated_at = NOW() WHERE auth_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_profile(&self, auth_id: Uuid) -> StoreResult<Option<Profile>> {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE auth_id = $1"
        ))
        .bind(auth_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    async fn update_profile(&self, auth_id: Uuid, update: &ProfileUpdate) -> StoreResult<Profile> {
        let row = sqlx::query(&format!(
            "UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                services = COALESCE($3, services),
                industries = COALESCE($4, industries),
                avatar_url = COALESCE($5, avatar_url),
                email_provider = COALESCE($6, email_provider),
                email_setup_completed = COALESCE($7, email_setup_completed),
                updated_at = NOW()
             WHERE auth_id = $1
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(auth_id)
        .bind(&update.display_name)
        .bind(&update.services)
        .bind(&update.industries)
        .bind(&update.avatar_url)
        .bind(&update.email_provider)
        .bind(update.email_setup_completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Profile".to_string()))?;
        Ok(profile_from_row(&row)?)
    }

    async fn list_leads(&self) -> StoreResult<Vec<StoredLead>> {
        let rows = sqlx::query(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads ORDER BY added_at DESC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(lead_from_row).collect::<Result<_, _>>()?)
    }

    async fn get_lead(&self, id: &str) -> StoreResult<Option<StoredLead>> {
        let row = sqlx::query(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(lead_from_row).transpose()?)
    }

    async fn insert_lead_if_absent(&self, stored: &StoredLead) -> StoreResult<bool> {
        let lead = &stored.lead;
        let result = sqlx::query(
            "INSERT INTO leads (
                id, name, focus, image_url, unlock_type, gated_value, industry_category,
                extension_type, added_at, linkedin_url, event_purpose, detailed_info,
                host_organization, target_audience, company_size, location, event_details
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&lead.id)
        .bind(&lead.name)
        .bind(&lead.focus)
        .bind(&lead.image_url)
        .bind(lead.unlock_type.as_str())
        .bind(&stored.gated_value)
        .bind(&lead.industry_category)
        .bind(lead.extension_type.as_str())
        .bind(lead.added_at)
        .bind(&lead.linkedin_url)
        .bind(&lead.event_purpose)
        .bind(&lead.detailed_info)
        .bind(&lead.host_organization)
        .bind(&lead.target_audience)
        .bind(&lead.company_size)
        .bind(&lead.location)
        .bind(lead.event_details.as_ref().map(Json))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn unlocks_for_user(&self, user_id: Uuid) -> StoreResult<Vec<LeadUnlock>> {
        let unlocks = sqlx::query_as::<_, LeadUnlock>(
            "SELECT user_id, lead_id, unlock_value, unlocked_at
             FROM lead_unlocks WHERE user_id = $1 ORDER BY unlocked_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(unlocks)
    }

    async fn find_unlock(&self, user_id: Uuid, lead_id: &str) -> StoreResult<Option<LeadUnlock>> {
        let unlock = sqlx::query_as::<_, LeadUnlock>(
            "SELECT user_id, lead_id, unlock_value, unlocked_at
             FROM lead_unlocks WHERE user_id = $1 AND lead_id = $2",
        )
        .bind(user_id)
        .bind(lead_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(unlock)
    }

    async fn unlock_lead(&self, user_id: Uuid, stored: &StoredLead) -> StoreResult<UnlockOutcome> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the profile serializes concurrent unlocks by the same user
        let credits: i32 = sqlx::query_scalar(
            "SELECT unlock_credits FROM profiles WHERE auth_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound("Profile".to_string()))?;

        let existing = sqlx::query_as::<_, LeadUnlock>(
            "SELECT user_id, lead_id, unlock_value, unlocked_at
             FROM lead_unlocks WHERE user_id = $1 AND lead_id = $2",
        )
        .bind(user_id)
        .bind(&stored.lead.id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(unlock) = existing {
            tx.commit().await?;
            return Ok(UnlockOutcome {
                unlock,
                credits_remaining: credits,
                newly_unlocked: false,
            });
        }

        if credits <= 0 {
            return Err(StoreError::InsufficientCredits);
        }

        let unlock = sqlx::query_as::<_, LeadUnlock>(
            "INSERT INTO lead_unlocks (user_id, lead_id, unlock_value)
             VALUES ($1, $2, $3)
             RETURNING user_id, lead_id, unlock_value, unlocked_at",
        )
        .bind(user_id)
        .bind(&stored.lead.id)
        .bind(&stored.gated_value)
        .fetch_one(&mut *tx)
        .await?;

        let credits_remaining: i32 = sqlx::query_scalar(
            "UPDATE profiles SET unlock_credits = unlock_credits - 1, updated_at = NOW()
             WHERE auth_id = $1 RETURNING unlock_credits",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(UnlockOutcome {
            unlock,
            credits_remaining,
            newly_unlocked: true,
        })
    }

    async fn health_check(&self) -> bool {
        crate::database::health_check(&self.pool).await
    }
}
