use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for chat lines arriving from a connected participant
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle one inbound chat line from the client
    async fn handle_message(&self, participant_id: &str, name: &str, room_id: &str, text: String);
}

/// Transport failures surfaced by a connection. A clean close is not an
/// error; it ends [`Connection::run`] with Ok.
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        match self.next().await {
            Some(Ok(Message::Text(text))) => Ok(Some(text)),
            Some(Ok(Message::Close(_))) => Ok(None),
            Some(Ok(_)) => Ok(None), // Ignore binary/ping/pong
            Some(Err(e)) => Err(SocketError::ReceiveFailed(e.to_string())),
            None => Ok(None), // Connection closed
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// One participant's managed connection to a room.
///
/// Pumps outbound messages from the ConnectionManager's channel down the
/// socket and feeds inbound chat lines to the message handler, until either
/// side goes away.
pub struct Connection {
    pub participant_id: String,
    pub name: String,
    pub room_id: String,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        participant_id: String,
        name: String,
        room_id: String,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            participant_id,
            name,
            room_id,
            socket,
            outbound_receiver,
            message_handler,
        }
    }

    /// Run the connection - handles both sending and receiving until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Outbound: announcements and card updates headed to the client
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => {
                            self.socket.send_message(message).await?
                        }
                        None => break, // Channel closed, disconnect
                    }
                }

                // Inbound: chat lines typed by the participant
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(text)) => {
                            self.message_handler
                                .handle_message(&self.participant_id, &self.name, &self.room_id, text)
                                .await;
                        }
                        Ok(None) => break, // Client disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    /// Socket fed from a script of inbound lines; records what was sent
    struct ScriptedSocket {
        inbound: VecDeque<String>,
        sent: Arc<Mutex<Vec<String>>>,
        closed: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl SocketWrapper for ScriptedSocket {
        async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
            self.sent.lock().await.push(message);
            Ok(())
        }

        async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
            match self.inbound.pop_front() {
                Some(text) => Ok(Some(text)),
                None => Ok(None),
            }
        }

        async fn close(&mut self) -> Result<(), SocketError> {
            *self.closed.lock().await = true;
            Ok(())
        }
    }

    struct RecordingHandler {
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl MessageHandler for RecordingHandler {
        async fn handle_message(
            &self,
            participant_id: &str,
            name: &str,
            room_id: &str,
            text: String,
        ) {
            self.seen
                .lock()
                .await
                .push(format!("{}/{}/{}: {}", room_id, participant_id, name, text));
        }
    }

    #[tokio::test]
    async fn test_connection_feeds_inbound_lines_to_handler_then_closes() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(Mutex::new(false));
        let socket = ScriptedSocket {
            inbound: VecDeque::from(["/join".to_string(), "7".to_string()]),
            sent: sent.clone(),
            closed: closed.clone(),
        };
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(RecordingHandler { seen: seen.clone() });
        let (_outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let connection = Connection::new(
            "u1".to_string(),
            "alice".to_string(),
            "room-1".to_string(),
            Box::new(socket),
            outbound_rx,
            handler,
        );
        connection.run().await.unwrap();

        let seen = seen.lock().await;
        assert_eq!(
            *seen,
            vec![
                "room-1/u1/alice: /join".to_string(),
                "room-1/u1/alice: 7".to_string()
            ]
        );
        assert!(*closed.lock().await);
    }

    #[test]
    fn test_socket_errors_carry_their_cause() {
        let send = SocketError::SendFailed("pipe broke".to_string());
        let receive = SocketError::ReceiveFailed("bad frame".to_string());

        assert_eq!(send.to_string(), "send failed: pipe broke");
        assert_eq!(receive.to_string(), "receive failed: bad frame");
    }
}
