use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::{IntoResponse, Response, Sse};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use crate::application::ports::FileStatusEvent;
use crate::infrastructure::status::FileStatusNotifier;

pub struct StatusHandler {
    notifier: Arc<FileStatusNotifier>,
}

impl StatusHandler {
    pub fn new(notifier: Arc<FileStatusNotifier>) -> Self {
        Self { notifier }
    }

    /// GET /files/status/stream — pushes file status transitions as they
    /// happen. No polling; each event arrives when the pipeline publishes it.
    pub async fn file_status_stream(
        State(handler): State<Arc<StatusHandler>>,
    ) -> impl IntoResponse {
        let receiver = handler.notifier.subscribe();

        let stream = stream::unfold(receiver, |mut receiver| async move {
            match receiver.recv().await {
                Ok(event) => {
                    let sse_event = axum::response::sse::Event::default()
                        .event("file_status")
                        .data(event_payload(&event));
                    Some((Ok::<_, Infallible>(sse_event), receiver))
                }
                Err(RecvError::Lagged(skipped)) => {
                    // A slow client missed some transitions; tell it to
                    // re-fetch current statuses and keep streaming.
                    tracing::warn!(skipped, "status stream subscriber lagged");
                    let sse_event = axum::response::sse::Event::default()
                        .event("lagged")
                        .data(skipped.to_string());
                    Some((Ok::<_, Infallible>(sse_event), receiver))
                }
                Err(RecvError::Closed) => None,
            }
        });

        create_sse_response(stream)
    }
}

fn event_payload(event: &FileStatusEvent) -> String {
    serde_json::json!({
        "file_id": event.file_id,
        "file_name": event.file_name,
        "status": event.status.as_str(),
        "error": event.status.error_message(),
    })
    .to_string()
}

fn create_sse_response<S>(stream: S) -> Response
where
    S: Stream<Item = Result<axum::response::sse::Event, Infallible>> + Send + 'static,
{
    Sse::new(stream)
        .keep_alive(
            axum::response::sse::KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("keep-alive"),
        )
        .into_response()
}
