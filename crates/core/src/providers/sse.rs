use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::settings::Settings;
use super::http::{endpoint, parse_base_url};
use super::traits::{FeedEvent, FeedStream, InsightFeed};

/// Buffered feed events per open stream before the reader applies backpressure.
const FEED_CHANNEL_CAPACITY: usize = 64;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type, `"message"` unless the server sent an `event:` field.
    pub event: String,
    pub data: String,
    /// Last event id seen on the stream at dispatch time.
    pub id: Option<String>,
}

/// Incremental `text/event-stream` decoder.
///
/// Chunks may split lines (and UTF-8 sequences) anywhere; lines end in LF,
/// CRLF or CR. Incomplete events at end of stream are discarded.
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    data: String,
    event_type: String,
    last_event_id: Option<String>,
    retry: Option<Duration>,
    skip_lf: bool,
    seen_first_line: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        for &byte in chunk {
            if self.skip_lf {
                self.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => self.end_line(&mut events),
                b'\r' => {
                    self.end_line(&mut events);
                    self.skip_lf = true;
                }
                _ => self.line.push(byte),
            }
        }
        events
    }

    /// Id to send back as `Last-Event-ID` when reconnecting.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay requested by the server via `retry:`.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    /// Drop any half-received event before reading a new connection.
    /// Keeps the last event id and retry delay.
    pub fn reset_connection(&mut self) {
        self.line.clear();
        self.data.clear();
        self.event_type.clear();
        self.skip_lf = false;
        self.seen_first_line = false;
    }

    fn end_line(&mut self, events: &mut Vec<SseEvent>) {
        let raw = std::mem::take(&mut self.line);
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        if !self.seen_first_line {
            self.seen_first_line = true;
            if let Some(stripped) = line.strip_prefix('\u{feff}') {
                line = stripped.to_string();
            }
        }
        self.process_line(&line, events);
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<SseEvent>) {
        if line.is_empty() {
            self.dispatch(events);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event_type = value.to_string(),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(ms) = value.parse::<u64>() {
                        self.retry = Some(Duration::from_millis(ms));
                    }
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, events: &mut Vec<SseEvent>) {
        if self.data.is_empty() {
            self.event_type.clear();
            return;
        }
        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }
        let event = if self.event_type.is_empty() {
            "message".to_string()
        } else {
            std::mem::take(&mut self.event_type)
        };
        self.event_type.clear();
        events.push(SseEvent {
            event,
            data,
            id: self.last_event_id.clone(),
        });
    }
}

/// Live insight feed over server-sent events:
/// `GET /campaigns/{id}/insights/stream`.
///
/// Behaves like a browser `EventSource`: only `message` events are
/// delivered, a dropped connection is reported once and then re-opened after
/// the server's `retry` delay (sending `Last-Event-ID`), while an HTTP error
/// status or a non event-stream response ends the feed for good.
pub struct SseInsightFeed {
    client: Client,
    base_url: Url,
    default_retry: Duration,
}

impl SseInsightFeed {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        let base_url = parse_base_url(&settings.base_url)?;
        // No overall timeout: the response body stays open for the life of the feed.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Ok(Self {
            client,
            base_url,
            default_retry: Duration::from_millis(settings.stream_retry_ms),
        })
    }

    pub fn stream_url(&self, campaign_id: &str) -> Result<Url, CoreError> {
        endpoint(&self.base_url, &["campaigns", campaign_id, "insights", "stream"])
    }
}

#[async_trait]
impl InsightFeed for SseInsightFeed {
    fn name(&self) -> &str {
        "SSE"
    }

    async fn connect(&self, campaign_id: &str) -> Result<FeedStream, CoreError> {
        let url = self.stream_url(campaign_id)?;
        let (tx, rx) = mpsc::channel(FEED_CHANNEL_CAPACITY);
        tokio::spawn(run_feed(self.client.clone(), url, self.default_retry, tx));
        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

/// How one connection attempt ended.
enum Attempt {
    /// Body ended or a network error occurred: report, then reconnect.
    Dropped(String),
    /// The server refused the stream: stop.
    Failed(String),
    /// The consumer went away.
    Closed,
}

async fn run_feed(client: Client, url: Url, default_retry: Duration, tx: mpsc::Sender<FeedEvent>) {
    let mut decoder = SseDecoder::new();
    loop {
        let mut request = client.get(url.clone()).header(ACCEPT, "text/event-stream");
        if let Some(id) = decoder.last_event_id() {
            request = request.header("Last-Event-ID", id);
        }

        let attempt = tokio::select! {
            _ = tx.closed() => return,
            attempt = read_stream(request, &mut decoder, &tx) => attempt,
        };

        match attempt {
            Attempt::Closed => return,
            Attempt::Failed(message) => {
                warn!(%url, %message, "live stream refused, giving up");
                let _ = tx.send(FeedEvent::TransportError(message)).await;
                return;
            }
            Attempt::Dropped(message) => {
                debug!(%url, %message, "live stream dropped, reconnecting");
                if tx.send(FeedEvent::TransportError(message)).await.is_err() {
                    return;
                }
            }
        }

        decoder.reset_connection();
        let delay = decoder.retry().unwrap_or(default_retry);
        tokio::select! {
            _ = tx.closed() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn read_stream(
    request: RequestBuilder,
    decoder: &mut SseDecoder,
    tx: &mpsc::Sender<FeedEvent>,
) -> Attempt {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return Attempt::Dropped(CoreError::from(e).to_string()),
    };

    let status = response.status();
    if !status.is_success() {
        return Attempt::Failed(format!("server responded with HTTP {status}"));
    }
    let is_event_stream = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/event-stream"));
    if !is_event_stream {
        return Attempt::Failed("response is not text/event-stream".into());
    }

    let mut body = std::pin::pin!(response.bytes_stream());
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return Attempt::Dropped(CoreError::from(e).to_string()),
        };
        for event in decoder.feed(&chunk) {
            if event.event != "message" {
                continue;
            }
            if tx.send(FeedEvent::Message(event.data)).await.is_err() {
                return Attempt::Closed;
            }
        }
    }
    Attempt::Dropped("live stream closed by server".into())
}
