use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::application::ports::{FileStatusEvent, StatusPublisher};
use crate::domain::entities::AttachedFile;
use crate::domain::repositories::FileRepository;

#[derive(Debug)]
pub enum BarrierError {
    /// Not every file reached a terminal status before the deadline. Carries
    /// the ids still in flight.
    Timeout(Vec<Uuid>),
    Repository(String),
    ChannelClosed,
}

impl std::fmt::Display for BarrierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarrierError::Timeout(pending) => {
                write!(f, "Timed out waiting for {} file(s)", pending.len())
            }
            BarrierError::Repository(msg) => write!(f, "Repository error: {}", msg),
            BarrierError::ChannelClosed => write!(f, "Status channel closed"),
        }
    }
}

impl std::error::Error for BarrierError {}

/// Push-based fan-out of file status changes. The pipeline publishes through
/// the `StatusPublisher` port; waiters subscribe instead of polling.
pub struct FileStatusNotifier {
    sender: broadcast::Sender<FileStatusEvent>,
    file_repository: Arc<dyn FileRepository>,
}

impl FileStatusNotifier {
    pub fn new(file_repository: Arc<dyn FileRepository>) -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            sender,
            file_repository,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FileStatusEvent> {
        self.sender.subscribe()
    }

    /// Blocks until every listed file reaches a terminal status, or the
    /// timeout elapses. Subscribes before the initial lookup so a transition
    /// landing in between is not missed.
    pub async fn await_all(
        &self,
        file_ids: &[Uuid],
        timeout: Duration,
    ) -> Result<Vec<AttachedFile>, BarrierError> {
        let mut receiver = self.subscribe();

        let mut pending: HashSet<Uuid> = file_ids.iter().copied().collect();
        let files = self
            .file_repository
            .find_by_ids(file_ids)
            .await
            .map_err(|e| BarrierError::Repository(e.to_string()))?;
        for file in &files {
            if file.status().is_terminal() {
                pending.remove(&file.id());
            }
        }

        if !pending.is_empty() {
            let wait = tokio::time::timeout(timeout, async {
                while !pending.is_empty() {
                    match receiver.recv().await {
                        Ok(event) => {
                            if event.status.is_terminal() {
                                pending.remove(&event.file_id);
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(_)) => {
                            // Missed events; fall back to a point lookup.
                            let ids: Vec<Uuid> = pending.iter().copied().collect();
                            let refreshed = self
                                .file_repository
                                .find_by_ids(&ids)
                                .await
                                .map_err(|e| BarrierError::Repository(e.to_string()))?;
                            for file in refreshed {
                                if file.status().is_terminal() {
                                    pending.remove(&file.id());
                                }
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(BarrierError::ChannelClosed);
                        }
                    }
                }
                Ok(())
            })
            .await;

            match wait {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    let mut remaining: Vec<Uuid> = pending.into_iter().collect();
                    remaining.sort();
                    return Err(BarrierError::Timeout(remaining));
                }
            }
        }

        self.file_repository
            .find_by_ids(file_ids)
            .await
            .map_err(|e| BarrierError::Repository(e.to_string()))
    }
}

impl StatusPublisher for FileStatusNotifier {
    fn publish(&self, event: FileStatusEvent) {
        // Send only fails when nobody is subscribed, which is fine.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{EmbeddingStatus, FileKind};
    use crate::infrastructure::persistence::memory::InMemoryFileRepository;

    fn pending_file() -> AttachedFile {
        AttachedFile::new(
            "doc.txt".to_string(),
            FileKind::PlainText,
            42,
            "ref".to_string(),
            None,
            Some(Uuid::new_v4()),
            Uuid::new_v4(),
        )
    }

    #[tokio::test]
    async fn test_already_terminal_files_return_immediately() {
        let repo = Arc::new(InMemoryFileRepository::new());
        let notifier = FileStatusNotifier::new(repo.clone());

        let mut file = pending_file();
        file.mark_queued().unwrap();
        file.mark_embedding().unwrap();
        file.mark_embedded(2).unwrap();
        repo.save(&file).await.unwrap();

        let files = notifier
            .await_all(&[file.id()], Duration::from_millis(10))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].status().is_embedded());
    }

    #[tokio::test]
    async fn test_barrier_releases_on_published_event() {
        let repo = Arc::new(InMemoryFileRepository::new());
        let notifier = Arc::new(FileStatusNotifier::new(repo.clone()));

        let file = pending_file();
        repo.save(&file).await.unwrap();

        let publisher = notifier.clone();
        let repo_for_task = repo.clone();
        let mut updated = file.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            updated.mark_queued().unwrap();
            updated.mark_embedding().unwrap();
            updated.mark_embedded(1).unwrap();
            repo_for_task.save(&updated).await.unwrap();
            publisher.publish(FileStatusEvent {
                file_id: updated.id(),
                file_name: updated.file_name().to_string(),
                status: updated.status().clone(),
            });
        });

        let files = notifier
            .await_all(&[file.id()], Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].status().is_embedded());
    }

    #[tokio::test]
    async fn test_barrier_times_out_with_pending_ids() {
        let repo = Arc::new(InMemoryFileRepository::new());
        let notifier = FileStatusNotifier::new(repo.clone());

        let file = pending_file();
        repo.save(&file).await.unwrap();

        let result = notifier
            .await_all(&[file.id()], Duration::from_millis(20))
            .await;

        match result {
            Err(BarrierError::Timeout(pending)) => assert_eq!(pending, vec![file.id()]),
            other => panic!("expected timeout, got {:?}", other.map(|f| f.len())),
        }
    }

    #[tokio::test]
    async fn test_failed_counts_as_terminal() {
        let repo = Arc::new(InMemoryFileRepository::new());
        let notifier = FileStatusNotifier::new(repo.clone());

        let mut file = pending_file();
        file.mark_queued().unwrap();
        file.mark_failed("provider down".to_string()).unwrap();
        repo.save(&file).await.unwrap();

        let files = notifier
            .await_all(&[file.id()], Duration::from_millis(10))
            .await
            .unwrap();

        assert_eq!(
            files[0].status(),
            &EmbeddingStatus::Failed("provider down".to_string())
        );
    }
}
