//! `PostgreSQL` repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgQueryResult;
use sqlx::types::Json;
use tracing::debug;
use yugen_core::error::DomainError;
use yugen_core::ids::{
    CharacterId, CharacterStateId, EpisodeId, ForeshadowingId, NovelId, RelationshipId,
    RelationshipLogId, WorldSettingId,
};
use yugen_core::model::{
    Character, CharacterProfile, CharacterRelationship, CharacterState, CharacterStateEntry,
    ContextSnapshot, EpisodeRange, Foreshadowing, ForeshadowingAttributes, ForeshadowingFilter,
    ForeshadowingStatus, Importance, NewRelationshipLog, RelationshipAttributes,
    RelationshipEntry, RelationshipLog, RelationshipLogEntry, StateAttributes, StateFilter,
    WorldSetting, WorldSettingAttributes, WorldSettingCategory,
};
use yugen_core::pagination::{Page, PageRequest};
use yugen_core::repository::{
    CharacterRepository, CharacterStateRepository, ContextSnapshotSource,
    ForeshadowingRepository, RelationshipLogRepository, RelationshipRepository,
    WorldSettingRepository,
};

use crate::error::map_db_error;
use crate::rows::{
    CHARACTER_COLUMNS, CharacterRow, FORESHADOWING_COLUMNS, ForeshadowingRow, LOG_SELECT,
    LogRecordRow, LogRow, RELATIONSHIP_SELECT, RelationshipRecordRow, RelationshipRow,
    STATE_SELECT, StateRow, WORLD_SETTING_COLUMNS, WorldSettingRow,
};

/// Column list of a bare `character_relationships` row.
const RELATIONSHIP_COLUMNS: &str = "id, novel_id, character_id, related_character_id, \
     relationship_type, description, intensity, created_at, updated_at";

/// Column list of a bare `relationship_logs` row.
const LOG_COLUMNS: &str = "id, character_relationship_id, episode_id, change_description, \
     previous_type, new_type, previous_intensity, new_intensity, created_at, updated_at";

/// Joins that tie a log to the novel of its source character.
const LOG_SCOPE: &str = "FROM relationship_logs l \
     JOIN character_relationships r ON r.id = l.character_relationship_id \
     JOIN characters c ON c.id = r.character_id";

/// State filter on `$1` novel, `$2` episode, `$3` character, `$4..$5` range.
const STATE_WHERE: &str = "WHERE c.novel_id = $1 \
     AND ($2::BIGINT IS NULL OR s.episode_id = $2) \
     AND ($3::BIGINT IS NULL OR s.character_id = $3) \
     AND ($4::BIGINT IS NULL OR s.episode_id >= $4) \
     AND ($5::BIGINT IS NULL OR s.episode_id <= $5)";

/// Store backed by a `PostgreSQL` connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store over `pool`. Migrations are the caller's concern.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

fn ensure_affected(
    result: &PgQueryResult,
    resource: &'static str,
    id: i64,
) -> Result<(), DomainError> {
    if result.rows_affected() == 0 {
        return Err(DomainError::NotFound { resource, id });
    }
    Ok(())
}

fn episode(range_bound: Option<EpisodeId>) -> Option<i64> {
    range_bound.map(EpisodeId::get)
}

#[async_trait]
impl CharacterRepository for PgStore {
    async fn list_characters(
        &self,
        novel_id: NovelId,
        page: PageRequest,
    ) -> Result<Page<Character>, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM characters WHERE novel_id = $1")
                .bind(novel_id.get())
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        let sql = format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE novel_id = $1 \
             ORDER BY id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, CharacterRow>(&sql)
            .bind(novel_id.get())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            items: rows.into_iter().map(Character::from).collect(),
            total: total(count),
            request: page,
        })
    }

    async fn find_character(
        &self,
        novel_id: NovelId,
        id: CharacterId,
    ) -> Result<Option<Character>, DomainError> {
        let sql = format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = $1 AND novel_id = $2"
        );
        let row = sqlx::query_as::<_, CharacterRow>(&sql)
            .bind(id.get())
            .bind(novel_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(Character::from))
    }

    async fn insert_character(
        &self,
        novel_id: NovelId,
        profile: &CharacterProfile,
        at: DateTime<Utc>,
    ) -> Result<Character, DomainError> {
        let sql = format!(
            "INSERT INTO characters (novel_id, name, age, appearance, abilities, personality, \
             speech_style, background, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
             RETURNING {CHARACTER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CharacterRow>(&sql)
            .bind(novel_id.get())
            .bind(&profile.name)
            .bind(profile.age)
            .bind(profile.appearance.as_deref())
            .bind(profile.abilities.as_deref())
            .bind(profile.personality.as_deref())
            .bind(profile.speech_style.as_deref())
            .bind(profile.background.as_deref())
            .bind(profile.role.as_deref())
            .bind(at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(Character::from(row))
    }

    async fn update_character(&self, character: &Character) -> Result<(), DomainError> {
        let profile = &character.profile;
        let result = sqlx::query(
            "UPDATE characters SET name = $2, age = $3, appearance = $4, abilities = $5, \
             personality = $6, speech_style = $7, background = $8, role = $9, updated_at = $10 \
             WHERE id = $1",
        )
        .bind(character.id.get())
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.appearance.as_deref())
        .bind(profile.abilities.as_deref())
        .bind(profile.personality.as_deref())
        .bind(profile.speech_style.as_deref())
        .bind(profile.background.as_deref())
        .bind(profile.role.as_deref())
        .bind(character.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        ensure_affected(&result, "character", character.id.get())
    }

    async fn delete_character(&self, id: CharacterId) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            "DELETE FROM relationship_logs WHERE character_relationship_id IN \
             (SELECT id FROM character_relationships \
              WHERE character_id = $1 OR related_character_id = $1)",
        )
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let relationships = sqlx::query(
            "DELETE FROM character_relationships \
             WHERE character_id = $1 OR related_character_id = $1",
        )
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let states = sqlx::query("DELETE FROM character_states WHERE character_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        debug!(
            character_id = %id,
            relationships = relationships.rows_affected(),
            states = states.rows_affected(),
            "character deleted with dependents"
        );
        Ok(())
    }
}

#[async_trait]
impl CharacterStateRepository for PgStore {
    async fn list_states(
        &self,
        novel_id: NovelId,
        filter: StateFilter,
        page: PageRequest,
    ) -> Result<Page<CharacterStateEntry>, DomainError> {
        let count_sql = format!(
            "SELECT COUNT(*) FROM character_states s \
             JOIN characters c ON c.id = s.character_id {STATE_WHERE}"
        );
        let count: i64 = sqlx::query_scalar(&count_sql)
            .bind(novel_id.get())
            .bind(episode(filter.episode_id))
            .bind(filter.character_id.map(CharacterId::get))
            .bind(episode(filter.range.from))
            .bind(episode(filter.range.to))
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let sql = format!(
            "{STATE_SELECT} {STATE_WHERE} \
             ORDER BY s.character_id, s.episode_id LIMIT $6 OFFSET $7"
        );
        let rows = sqlx::query_as::<_, StateRow>(&sql)
            .bind(novel_id.get())
            .bind(episode(filter.episode_id))
            .bind(filter.character_id.map(CharacterId::get))
            .bind(episode(filter.range.from))
            .bind(episode(filter.range.to))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            items: rows.into_iter().map(StateRow::into_entry).collect(),
            total: total(count),
            request: page,
        })
    }

    async fn character_timeline(
        &self,
        character_id: CharacterId,
        range: EpisodeRange,
    ) -> Result<Vec<CharacterState>, DomainError> {
        let sql = format!(
            "{STATE_SELECT} WHERE s.character_id = $1 \
             AND ($2::BIGINT IS NULL OR s.episode_id >= $2) \
             AND ($3::BIGINT IS NULL OR s.episode_id <= $3) \
             ORDER BY s.episode_id"
        );
        let rows = sqlx::query_as::<_, StateRow>(&sql)
            .bind(character_id.get())
            .bind(episode(range.from))
            .bind(episode(range.to))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(StateRow::into_state).collect())
    }

    async fn find_state(
        &self,
        novel_id: NovelId,
        id: CharacterStateId,
    ) -> Result<Option<CharacterStateEntry>, DomainError> {
        let sql = format!("{STATE_SELECT} WHERE s.id = $1 AND c.novel_id = $2");
        let row = sqlx::query_as::<_, StateRow>(&sql)
            .bind(id.get())
            .bind(novel_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(StateRow::into_entry))
    }

    async fn state_exists(
        &self,
        character_id: CharacterId,
        episode_id: EpisodeId,
        excluding: Option<CharacterStateId>,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM character_states \
             WHERE character_id = $1 AND episode_id = $2 \
             AND ($3::BIGINT IS NULL OR id <> $3))",
        )
        .bind(character_id.get())
        .bind(episode_id.get())
        .bind(excluding.map(CharacterStateId::get))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_state(
        &self,
        attributes: &StateAttributes,
        at: DateTime<Utc>,
    ) -> Result<CharacterState, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO character_states (character_id, episode_id, location, \
             emotional_state, physical_state, knowledge, inventory, notes, created_at, \
             updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING id",
        )
        .bind(attributes.character_id.get())
        .bind(attributes.episode_id.get())
        .bind(attributes.location.as_deref())
        .bind(attributes.emotional_state.as_deref())
        .bind(attributes.physical_state.as_deref())
        .bind(attributes.knowledge.as_deref())
        .bind(Json(attributes.inventory.clone()))
        .bind(attributes.notes.as_deref())
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(CharacterState {
            id: CharacterStateId(id),
            attributes: attributes.clone(),
            created_at: at,
            updated_at: at,
        })
    }

    async fn update_state(&self, state: &CharacterState) -> Result<(), DomainError> {
        let attributes = &state.attributes;
        let result = sqlx::query(
            "UPDATE character_states SET character_id = $2, episode_id = $3, location = $4, \
             emotional_state = $5, physical_state = $6, knowledge = $7, inventory = $8, \
             notes = $9, updated_at = $10 WHERE id = $1",
        )
        .bind(state.id.get())
        .bind(attributes.character_id.get())
        .bind(attributes.episode_id.get())
        .bind(attributes.location.as_deref())
        .bind(attributes.emotional_state.as_deref())
        .bind(attributes.physical_state.as_deref())
        .bind(attributes.knowledge.as_deref())
        .bind(Json(attributes.inventory.clone()))
        .bind(attributes.notes.as_deref())
        .bind(state.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        ensure_affected(&result, "character_state", state.id.get())
    }

    async fn delete_state(&self, id: CharacterStateId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM character_states WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl RelationshipRepository for PgStore {
    async fn list_relationships(
        &self,
        novel_id: NovelId,
        page: PageRequest,
    ) -> Result<Page<RelationshipEntry>, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM character_relationships WHERE novel_id = $1",
        )
        .bind(novel_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let sql = format!(
            "{RELATIONSHIP_SELECT} WHERE r.novel_id = $1 ORDER BY r.id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, RelationshipRow>(&sql)
            .bind(novel_id.get())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            items: rows.into_iter().map(RelationshipEntry::from).collect(),
            total: total(count),
            request: page,
        })
    }

    async fn find_relationship(
        &self,
        novel_id: NovelId,
        id: RelationshipId,
    ) -> Result<Option<RelationshipEntry>, DomainError> {
        let sql = format!("{RELATIONSHIP_SELECT} WHERE r.id = $1 AND r.novel_id = $2");
        let row = sqlx::query_as::<_, RelationshipRow>(&sql)
            .bind(id.get())
            .bind(novel_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(RelationshipEntry::from))
    }

    async fn outgoing_relationships(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<RelationshipEntry>, DomainError> {
        let sql = format!("{RELATIONSHIP_SELECT} WHERE r.character_id = $1 ORDER BY r.id");
        let rows = sqlx::query_as::<_, RelationshipRow>(&sql)
            .bind(character_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(RelationshipEntry::from).collect())
    }

    async fn incoming_relationships(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<RelationshipEntry>, DomainError> {
        let sql = format!("{RELATIONSHIP_SELECT} WHERE r.related_character_id = $1 ORDER BY r.id");
        let rows = sqlx::query_as::<_, RelationshipRow>(&sql)
            .bind(character_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(RelationshipEntry::from).collect())
    }

    async fn relationship_exists(
        &self,
        character_id: CharacterId,
        related_character_id: CharacterId,
        excluding: Option<RelationshipId>,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM character_relationships \
             WHERE character_id = $1 AND related_character_id = $2 \
             AND ($3::BIGINT IS NULL OR id <> $3))",
        )
        .bind(character_id.get())
        .bind(related_character_id.get())
        .bind(excluding.map(RelationshipId::get))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_relationship(
        &self,
        novel_id: NovelId,
        attributes: &RelationshipAttributes,
        at: DateTime<Utc>,
    ) -> Result<CharacterRelationship, DomainError> {
        let sql = format!(
            "INSERT INTO character_relationships (novel_id, character_id, \
             related_character_id, relationship_type, description, intensity, created_at, \
             updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {RELATIONSHIP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RelationshipRecordRow>(&sql)
            .bind(novel_id.get())
            .bind(attributes.character_id.get())
            .bind(attributes.related_character_id.get())
            .bind(&attributes.relationship_type)
            .bind(attributes.description.as_deref())
            .bind(attributes.intensity)
            .bind(at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(CharacterRelationship::from(row))
    }

    async fn update_relationship(
        &self,
        relationship: &CharacterRelationship,
    ) -> Result<(), DomainError> {
        let attributes = &relationship.attributes;
        let result = sqlx::query(
            "UPDATE character_relationships SET character_id = $2, \
             related_character_id = $3, relationship_type = $4, description = $5, \
             intensity = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(relationship.id.get())
        .bind(attributes.character_id.get())
        .bind(attributes.related_character_id.get())
        .bind(&attributes.relationship_type)
        .bind(attributes.description.as_deref())
        .bind(attributes.intensity)
        .bind(relationship.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        ensure_affected(&result, "character_relationship", relationship.id.get())
    }

    async fn delete_relationship(&self, id: RelationshipId) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query("DELETE FROM relationship_logs WHERE character_relationship_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        sqlx::query("DELETE FROM character_relationships WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        tx.commit().await.map_err(map_db_error)
    }

    async fn record_change(
        &self,
        relationship: &CharacterRelationship,
        log: &NewRelationshipLog,
        at: DateTime<Utc>,
    ) -> Result<RelationshipLog, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            "UPDATE character_relationships SET relationship_type = $2, intensity = $3, \
             updated_at = $4 WHERE id = $1",
        )
        .bind(relationship.id.get())
        .bind(&relationship.attributes.relationship_type)
        .bind(relationship.attributes.intensity)
        .bind(relationship.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;
        ensure_affected(&result, "character_relationship", relationship.id.get())?;

        let sql = format!(
            "INSERT INTO relationship_logs (character_relationship_id, episode_id, \
             change_description, previous_type, new_type, previous_intensity, new_intensity, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) RETURNING {LOG_COLUMNS}"
        );
        let row = sqlx::query_as::<_, LogRecordRow>(&sql)
            .bind(log.character_relationship_id.get())
            .bind(log.episode_id.get())
            .bind(log.change_description.as_deref())
            .bind(log.previous_type.as_deref())
            .bind(log.new_type.as_deref())
            .bind(log.previous_intensity)
            .bind(log.new_intensity)
            .bind(at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(RelationshipLog::from(row))
    }
}

#[async_trait]
impl RelationshipLogRepository for PgStore {
    async fn list_logs(
        &self,
        novel_id: NovelId,
        episode_id: Option<EpisodeId>,
        page: PageRequest,
    ) -> Result<Page<RelationshipLogEntry>, DomainError> {
        let filter = "WHERE c.novel_id = $1 AND ($2::BIGINT IS NULL OR l.episode_id = $2)";

        let count_sql = format!("SELECT COUNT(*) {LOG_SCOPE} {filter}");
        let count: i64 = sqlx::query_scalar(&count_sql)
            .bind(novel_id.get())
            .bind(episode(episode_id))
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let sql = format!(
            "{LOG_SELECT} {filter} ORDER BY l.created_at DESC, l.id DESC LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, LogRow>(&sql)
            .bind(novel_id.get())
            .bind(episode(episode_id))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            items: rows.into_iter().map(RelationshipLogEntry::from).collect(),
            total: total(count),
            request: page,
        })
    }

    async fn find_log(
        &self,
        novel_id: NovelId,
        id: RelationshipLogId,
    ) -> Result<Option<RelationshipLogEntry>, DomainError> {
        let sql = format!("{LOG_SELECT} WHERE l.id = $1 AND c.novel_id = $2");
        let row = sqlx::query_as::<_, LogRow>(&sql)
            .bind(id.get())
            .bind(novel_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(RelationshipLogEntry::from))
    }
}

#[async_trait]
impl ForeshadowingRepository for PgStore {
    async fn list_foreshadowings(
        &self,
        novel_id: NovelId,
        filter: ForeshadowingFilter,
        page: PageRequest,
    ) -> Result<Page<Foreshadowing>, DomainError> {
        let clause = "WHERE novel_id = $1 \
             AND ($2::TEXT IS NULL OR status = $2) \
             AND ($3::TEXT IS NULL OR importance = $3)";
        let status = filter.status.map(ForeshadowingStatus::as_str);
        let importance = filter.importance.map(Importance::as_str);

        let count_sql = format!("SELECT COUNT(*) FROM foreshadowings {clause}");
        let count: i64 = sqlx::query_scalar(&count_sql)
            .bind(novel_id.get())
            .bind(status)
            .bind(importance)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let sql = format!(
            "SELECT {FORESHADOWING_COLUMNS} FROM foreshadowings {clause} \
             ORDER BY id LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query_as::<_, ForeshadowingRow>(&sql)
            .bind(novel_id.get())
            .bind(status)
            .bind(importance)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(Foreshadowing::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            total: total(count),
            request: page,
        })
    }

    async fn find_foreshadowing(
        &self,
        novel_id: NovelId,
        id: ForeshadowingId,
    ) -> Result<Option<Foreshadowing>, DomainError> {
        let sql = format!(
            "SELECT {FORESHADOWING_COLUMNS} FROM foreshadowings WHERE id = $1 AND novel_id = $2"
        );
        let row = sqlx::query_as::<_, ForeshadowingRow>(&sql)
            .bind(id.get())
            .bind(novel_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.map(Foreshadowing::try_from).transpose()
    }

    async fn insert_foreshadowing(
        &self,
        novel_id: NovelId,
        attributes: &ForeshadowingAttributes,
        at: DateTime<Utc>,
    ) -> Result<Foreshadowing, DomainError> {
        let sql = format!(
            "INSERT INTO foreshadowings (novel_id, title, description, planted_episode_id, \
             resolved_episode_id, planned_resolution_episode, status, importance, created_at, \
             updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING {FORESHADOWING_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ForeshadowingRow>(&sql)
            .bind(novel_id.get())
            .bind(&attributes.title)
            .bind(attributes.description.as_deref())
            .bind(episode(attributes.planted_episode_id))
            .bind(episode(attributes.resolved_episode_id))
            .bind(attributes.planned_resolution_episode)
            .bind(attributes.status.as_str())
            .bind(attributes.importance.as_str())
            .bind(at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Foreshadowing::try_from(row)
    }

    async fn update_foreshadowing(
        &self,
        foreshadowing: &Foreshadowing,
    ) -> Result<(), DomainError> {
        let attributes = &foreshadowing.attributes;
        let result = sqlx::query(
            "UPDATE foreshadowings SET title = $2, description = $3, planted_episode_id = $4, \
             resolved_episode_id = $5, planned_resolution_episode = $6, status = $7, \
             importance = $8, updated_at = $9 WHERE id = $1",
        )
        .bind(foreshadowing.id.get())
        .bind(&attributes.title)
        .bind(attributes.description.as_deref())
        .bind(episode(attributes.planted_episode_id))
        .bind(episode(attributes.resolved_episode_id))
        .bind(attributes.planned_resolution_episode)
        .bind(attributes.status.as_str())
        .bind(attributes.importance.as_str())
        .bind(foreshadowing.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        ensure_affected(&result, "foreshadowing", foreshadowing.id.get())
    }

    async fn delete_foreshadowing(&self, id: ForeshadowingId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM foreshadowings WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl WorldSettingRepository for PgStore {
    async fn list_world_settings(
        &self,
        novel_id: NovelId,
        category: Option<WorldSettingCategory>,
        page: PageRequest,
    ) -> Result<Page<WorldSetting>, DomainError> {
        let clause = "WHERE novel_id = $1 AND ($2::TEXT IS NULL OR category = $2)";
        let category = category.map(WorldSettingCategory::as_str);

        let count_sql = format!("SELECT COUNT(*) FROM world_settings {clause}");
        let count: i64 = sqlx::query_scalar(&count_sql)
            .bind(novel_id.get())
            .bind(category)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let sql = format!(
            "SELECT {WORLD_SETTING_COLUMNS} FROM world_settings {clause} \
             ORDER BY id LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, WorldSettingRow>(&sql)
            .bind(novel_id.get())
            .bind(category)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(WorldSetting::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            total: total(count),
            request: page,
        })
    }

    async fn find_world_setting(
        &self,
        novel_id: NovelId,
        id: WorldSettingId,
    ) -> Result<Option<WorldSetting>, DomainError> {
        let sql = format!(
            "SELECT {WORLD_SETTING_COLUMNS} FROM world_settings WHERE id = $1 AND novel_id = $2"
        );
        let row = sqlx::query_as::<_, WorldSettingRow>(&sql)
            .bind(id.get())
            .bind(novel_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.map(WorldSetting::try_from).transpose()
    }

    async fn insert_world_setting(
        &self,
        novel_id: NovelId,
        attributes: &WorldSettingAttributes,
        at: DateTime<Utc>,
    ) -> Result<WorldSetting, DomainError> {
        let sql = format!(
            "INSERT INTO world_settings (novel_id, category, title, description, details, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {WORLD_SETTING_COLUMNS}"
        );
        let row = sqlx::query_as::<_, WorldSettingRow>(&sql)
            .bind(novel_id.get())
            .bind(attributes.category.as_str())
            .bind(&attributes.title)
            .bind(attributes.description.as_deref())
            .bind(attributes.details.clone())
            .bind(at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        WorldSetting::try_from(row)
    }

    async fn update_world_setting(&self, setting: &WorldSetting) -> Result<(), DomainError> {
        let attributes = &setting.attributes;
        let result = sqlx::query(
            "UPDATE world_settings SET category = $2, title = $3, description = $4, \
             details = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(setting.id.get())
        .bind(attributes.category.as_str())
        .bind(&attributes.title)
        .bind(attributes.description.as_deref())
        .bind(attributes.details.clone())
        .bind(setting.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        ensure_affected(&result, "world_setting", setting.id.get())
    }

    async fn delete_world_setting(&self, id: WorldSettingId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM world_settings WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl ContextSnapshotSource for PgStore {
    async fn load_context(
        &self,
        novel_id: NovelId,
        episode_id: EpisodeId,
    ) -> Result<ContextSnapshot, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let sql = format!(
            "{STATE_SELECT} WHERE c.novel_id = $1 AND s.episode_id = $2 ORDER BY s.id"
        );
        let character_states = sqlx::query_as::<_, StateRow>(&sql)
            .bind(novel_id.get())
            .bind(episode_id.get())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(StateRow::into_carded)
            .collect();

        let sql = format!(
            "SELECT {FORESHADOWING_COLUMNS} FROM foreshadowings \
             WHERE novel_id = $1 AND status IN ('planted', 'hinted') ORDER BY id"
        );
        let unresolved_foreshadowings = sqlx::query_as::<_, ForeshadowingRow>(&sql)
            .bind(novel_id.get())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(Foreshadowing::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let sql = format!("{RELATIONSHIP_SELECT} WHERE r.novel_id = $1 ORDER BY r.id");
        let character_relationships = sqlx::query_as::<_, RelationshipRow>(&sql)
            .bind(novel_id.get())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(RelationshipEntry::from)
            .collect();

        let sql = format!("{LOG_SELECT} WHERE c.novel_id = $1 AND l.episode_id = $2 ORDER BY l.id");
        let relationship_changes = sqlx::query_as::<_, LogRow>(&sql)
            .bind(novel_id.get())
            .bind(episode_id.get())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(RelationshipLogEntry::from)
            .collect();

        tx.commit().await.map_err(map_db_error)?;

        Ok(ContextSnapshot {
            character_states,
            unresolved_foreshadowings,
            character_relationships,
            relationship_changes,
        })
    }
}
