use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::SearchResult;
use crate::domain::entities::DocumentChunk;
use crate::domain::value_objects::{SpeakerRole, TimeBucket};

#[derive(Debug, Deserialize)]
pub struct ChatSearchQueryDto {
    pub user_id: Uuid,
    pub query: String,
    pub limit: Option<i32>,
    /// Client timezone as minutes east of UTC; recency buckets use its
    /// midnight. Defaults to UTC.
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ContextSearchQueryDto {
    pub query: String,
    pub top_k: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ChatSearchResultDto {
    pub conversation_id: Uuid,
    pub conversation_public_id: String,
    pub conversation_title: String,
    pub message_id: Uuid,
    pub snippet: String,
    pub speaker_role: SpeakerRole,
    pub created_at: DateTime<Utc>,
    pub similarity: f32,
}

impl From<SearchResult> for ChatSearchResultDto {
    fn from(result: SearchResult) -> Self {
        Self {
            conversation_id: result.conversation_id,
            conversation_public_id: result.conversation_public_id,
            conversation_title: result.conversation_title,
            message_id: result.message_id,
            snippet: result.content,
            speaker_role: result.speaker_role,
            created_at: result.created_at,
            similarity: result.similarity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimeBucketDto {
    pub label: String,
    pub results: Vec<ChatSearchResultDto>,
}

#[derive(Debug, Serialize)]
pub struct ChatSearchResponseDto {
    pub query: String,
    pub total_results: i32,
    pub buckets: Vec<TimeBucketDto>,
}

impl ChatSearchResponseDto {
    /// Groups already-ranked results into recency buckets. Buckets appear in
    /// display order, empty ones are omitted, and rank order is preserved
    /// inside each bucket. Bucket boundaries are midnight in the client's
    /// timezone (`tz_offset_minutes` east of UTC).
    pub fn from_results(
        query: String,
        results: Vec<SearchResult>,
        now: DateTime<Utc>,
        tz_offset_minutes: i32,
    ) -> Self {
        let total_results = results.len() as i32;

        let mut grouped: Vec<(TimeBucket, Vec<ChatSearchResultDto>)> = TimeBucket::ALL
            .iter()
            .map(|bucket| (*bucket, Vec::new()))
            .collect();

        for result in results {
            let bucket = TimeBucket::for_timestamp(result.created_at, now, tz_offset_minutes);
            if let Some((_, entries)) = grouped.iter_mut().find(|(b, _)| *b == bucket) {
                entries.push(ChatSearchResultDto::from(result));
            }
        }

        let buckets = grouped
            .into_iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(bucket, entries)| TimeBucketDto {
                label: bucket.label().to_string(),
                results: entries,
            })
            .collect();

        Self {
            query,
            total_results,
            buckets,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContextChunkDto {
    pub chunk_id: Uuid,
    pub file_id: Uuid,
    pub file_name: String,
    pub chunk_index: i32,
    pub content: String,
}

impl From<DocumentChunk> for ContextChunkDto {
    fn from(chunk: DocumentChunk) -> Self {
        Self {
            chunk_id: chunk.id(),
            file_id: chunk.file_id(),
            file_name: chunk.file_name().to_string(),
            chunk_index: chunk.chunk_index(),
            content: chunk.content().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContextSearchResponseDto {
    pub chunks: Vec<ContextChunkDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn result_at(created_at: DateTime<Utc>, title: &str) -> SearchResult {
        SearchResult {
            conversation_id: Uuid::new_v4(),
            conversation_public_id: Uuid::new_v4().simple().to_string(),
            conversation_title: title.to_string(),
            message_id: Uuid::new_v4(),
            content: "snippet".to_string(),
            speaker_role: SpeakerRole::User,
            created_at,
            similarity: 0.9,
        }
    }

    #[test]
    fn test_empty_buckets_are_omitted() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let results = vec![
            result_at(now - Duration::hours(1), "today"),
            result_at(now - Duration::days(40), "older"),
        ];

        let dto = ChatSearchResponseDto::from_results("query".to_string(), results, now, 0);

        let labels: Vec<&str> = dto.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Older"]);
        assert_eq!(dto.total_results, 2);
    }

    #[test]
    fn test_rank_order_is_preserved_within_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        // Both today; the first is the higher-ranked hit.
        let results = vec![
            result_at(now - Duration::hours(3), "best"),
            result_at(now - Duration::hours(1), "second"),
        ];

        let dto = ChatSearchResponseDto::from_results("query".to_string(), results, now, 0);

        assert_eq!(dto.buckets.len(), 1);
        assert_eq!(dto.buckets[0].results[0].conversation_title, "best");
        assert_eq!(dto.buckets[0].results[1].conversation_title, "second");
    }

    #[test]
    fn test_buckets_follow_display_order() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        // Insertion order deliberately scrambled.
        let results = vec![
            result_at(now - Duration::days(3), "this week"),
            result_at(now - Duration::hours(2), "today"),
            result_at(now - Duration::days(1), "yesterday"),
        ];

        let dto = ChatSearchResponseDto::from_results("query".to_string(), results, now, 0);

        let labels: Vec<&str> = dto.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday", "Previous 7 Days"]);
    }

    #[test]
    fn test_client_offset_shifts_bucket_boundaries() {
        // Client at UTC+8, local morning: a result from earlier the same
        // local morning is Today there, Yesterday by UTC days.
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 1, 0, 0).unwrap();
        let results = vec![result_at(
            Utc.with_ymd_and_hms(2025, 6, 14, 22, 0, 0).unwrap(),
            "this morning",
        )];

        let east = ChatSearchResponseDto::from_results(
            "query".to_string(),
            results.clone(),
            now,
            480,
        );
        assert_eq!(east.buckets[0].label, "Today");

        let utc = ChatSearchResponseDto::from_results("query".to_string(), results, now, 0);
        assert_eq!(utc.buckets[0].label, "Yesterday");
    }
}
