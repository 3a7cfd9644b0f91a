use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::{net::TcpStream, time::sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub mod settings;
pub mod wire;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Receives the payload of every text frame a feed delivers.
#[async_trait]
pub trait FeedConsumer: Send + Sync {
  async fn consume(&self, raw: &str);

  /// Called on transport failure, before the reconnect pause. A clean close
  /// by the peer does not count as a failure.
  async fn connection_lost(&self) {}
}

enum FeedPhase {
  Connecting,
  Streaming(Box<WsStream>),
  Backoff(Duration),
}

/// Drives one websocket feed until the task is cancelled: connect, pump
/// frames into the consumer, back off and reconnect on close or error.
pub async fn run_feed<C: FeedConsumer>(
  url: String,
  name: &'static str,
  retry: Duration,
  reopen: Duration,
  consumer: C,
) {
  info!("{name} feed waiting for {url}");
  let mut phase = FeedPhase::Connecting;
  loop {
    phase = match phase {
      FeedPhase::Connecting => match connect_async(url.as_str()).await {
        Ok((ws, _)) => {
          info!("{name} feed connected");
          FeedPhase::Streaming(Box::new(ws))
        }
        Err(err) => {
          warn!("{name} feed cannot connect: {err}");
          consumer.connection_lost().await;
          FeedPhase::Backoff(retry)
        }
      },
      FeedPhase::Streaming(mut ws) => match ws.next().await {
        Some(Ok(Message::Text(raw))) => {
          consumer.consume(&raw).await;
          FeedPhase::Streaming(ws)
        }
        Some(Ok(Message::Close(_))) | None => {
          info!("{name} feed closed by peer");
          FeedPhase::Backoff(reopen)
        }
        Some(Ok(other)) => {
          debug!("{name} feed skipping a {} byte non-text frame", other.len());
          FeedPhase::Streaming(ws)
        }
        Some(Err(err)) => {
          warn!("{name} feed error: {err}");
          consumer.connection_lost().await;
          FeedPhase::Backoff(reopen)
        }
      },
      FeedPhase::Backoff(delay) => {
        sleep(delay).await;
        FeedPhase::Connecting
      }
    };
  }
}
