use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::AttachedFile;
use crate::domain::repositories::file_repository::{FileRepository, FileRepositoryError};
use crate::infrastructure::database::models::{AttachedFileModel, NewAttachedFileModel};
use crate::infrastructure::database::schema::attached_files::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresFileRepository {
    pool: DbPool,
}

impl PostgresFileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn save(&self, file: &AttachedFile) -> Result<(), FileRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        let new_file = NewAttachedFileModel::from(file);

        diesel::insert_into(attached_files)
            .values(&new_file)
            .execute(&mut conn)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, file: Uuid) -> Result<Option<AttachedFile>, FileRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        let result = attached_files
            .find(file)
            .first::<AttachedFileModel>(&mut conn)
            .optional()
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        result
            .map(AttachedFile::try_from)
            .transpose()
            .map_err(FileRepositoryError::DatabaseError)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<AttachedFile>, FileRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        let models = attached_files
            .filter(id.eq_any(ids))
            .load::<AttachedFileModel>(&mut conn)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        models
            .into_iter()
            .map(|model| AttachedFile::try_from(model).map_err(FileRepositoryError::DatabaseError))
            .collect()
    }

    async fn find_by_conversation_id(
        &self,
        conversation: Uuid,
    ) -> Result<Vec<AttachedFile>, FileRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        let models = attached_files
            .filter(conversation_id.eq(conversation))
            .load::<AttachedFileModel>(&mut conn)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        models
            .into_iter()
            .map(|model| AttachedFile::try_from(model).map_err(FileRepositoryError::DatabaseError))
            .collect()
    }

    async fn update(&self, file: &AttachedFile) -> Result<(), FileRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        let update_model = NewAttachedFileModel::from(file);

        let updated = diesel::update(attached_files.find(file.id()))
            .set(&update_model)
            .execute(&mut conn)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        if updated == 0 {
            return Err(FileRepositoryError::NotFound(file.id()));
        }

        Ok(())
    }

    async fn delete(&self, file: Uuid) -> Result<bool, FileRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count = diesel::delete(attached_files.find(file))
            .execute(&mut conn)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count > 0)
    }

    async fn delete_by_conversation_id(
        &self,
        conversation: Uuid,
    ) -> Result<i64, FileRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count =
            diesel::delete(attached_files.filter(conversation_id.eq(conversation)))
                .execute(&mut conn)
                .map_err(|e| FileRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count as i64)
    }
}
