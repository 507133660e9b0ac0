//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding room events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::hub::ConnectionHub;
use super::messages::{WsCommand, WsMessage};
use crate::domain::ConnectionId;
use crate::error::GatewayError;
use crate::service::DomainService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the connection with the [`ConnectionHub`].
/// - Reads commands from the client and dispatches them.
/// - Forwards room events queued by the hub to the client.
/// - Drops the connection from the hub once the socket closes.
pub async fn run_connection(
    socket: WebSocket,
    hub: Arc<ConnectionHub>,
    service: Arc<DomainService>,
) {
    let (connection, mut outbound) = hub.register();
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, connection, &service).await;
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event queued by the hub
            event = outbound.recv() => {
                let Some(room_event) = event else {
                    break;
                };
                let json = serde_json::to_string(&WsMessage::event(&room_event)).unwrap_or_default();
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    hub.disconnect(connection);
    tracing::debug!(%connection, "ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    connection: ConnectionId,
    service: &DomainService,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage::error(String::new(), 400, "malformed JSON");
        return serde_json::to_string(&err).ok();
    };

    let reply = match serde_json::from_value::<WsCommand>(msg.payload.clone()) {
        Ok(command) => match execute(command, connection, service).await {
            Ok(payload) => WsMessage::response(msg.id, payload),
            Err(err) => WsMessage::error(msg.id, err.error_code(), err.to_string()),
        },
        Err(err) if is_known_command(&msg.payload) => {
            WsMessage::error(msg.id, 400, format!("invalid command: {err}"))
        }
        Err(_) => WsMessage::error(msg.id, 404, "unknown command"),
    };
    serde_json::to_string(&reply).ok()
}

fn is_known_command(payload: &serde_json::Value) -> bool {
    payload
        .get("command")
        .and_then(|v| v.as_str())
        .is_some_and(|name| WsCommand::NAMES.contains(&name))
}

async fn execute(
    command: WsCommand,
    connection: ConnectionId,
    service: &DomainService,
) -> Result<serde_json::Value, GatewayError> {
    match command {
        WsCommand::Join { domain, member_id } => {
            let room = service.join(&domain, &member_id, connection).await?;
            Ok(serde_json::json!({
                "joined": room,
                "domain": domain,
                "member_id": member_id,
            }))
        }
        WsCommand::Leave { domain } => {
            let known = service.leave(&domain, connection).await?;
            Ok(serde_json::json!({
                "left": domain,
                "known": known,
            }))
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{DomainRegistry, Transport};

    fn setup() -> (Arc<ConnectionHub>, DomainService) {
        let hub = Arc::new(ConnectionHub::new(8));
        let registry = DomainRegistry::new(Arc::clone(&hub) as Arc<dyn Transport>);
        (hub, DomainService::new(Arc::new(registry)))
    }

    fn parse(reply: Option<String>) -> serde_json::Value {
        let Some(text) = reply else {
            panic!("expected a reply");
        };
        serde_json::from_str(&text).unwrap_or_default()
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (hub, service) = setup();
        let (connection, _rx) = hub.register();
        let reply = parse(handle_text_message("{nope", connection, &service).await);
        assert_eq!(reply["type"], "error");
        assert_eq!(reply["payload"]["code"], 400);
    }

    #[tokio::test]
    async fn unknown_command_is_404() {
        let (hub, service) = setup();
        let (connection, _rx) = hub.register();
        let raw = r#"{"id":"9","type":"command","payload":{"command":"dance"}}"#;
        let reply = parse(handle_text_message(raw, connection, &service).await);
        assert_eq!(reply["id"], "9");
        assert_eq!(reply["payload"]["code"], 404);
    }

    #[tokio::test]
    async fn join_missing_member_is_400() {
        let (hub, service) = setup();
        let (connection, _rx) = hub.register();
        let raw = r#"{"id":"2","type":"command","payload":{"command":"join","domain":"lobby"}}"#;
        let reply = parse(handle_text_message(raw, connection, &service).await);
        assert_eq!(reply["payload"]["code"], 400);
    }

    #[tokio::test]
    async fn join_then_leave() {
        let (hub, service) = setup();
        let (connection, _rx) = hub.register();

        let join = r#"{"id":"1","type":"command","payload":{"command":"join","domain":"lobby","member_id":"u1"}}"#;
        let reply = parse(handle_text_message(join, connection, &service).await);
        assert_eq!(reply["type"], "response");
        assert_eq!(reply["payload"]["joined"], "lobby:u1");
        assert_eq!(hub.rooms_of(connection), vec!["lobby:u1"]);

        let leave = r#"{"id":"2","type":"command","payload":{"command":"leave","domain":"lobby"}}"#;
        let reply = parse(handle_text_message(leave, connection, &service).await);
        assert_eq!(reply["payload"]["known"], true);
        assert!(hub.rooms_of(connection).is_empty());
    }

    #[tokio::test]
    async fn rejected_domain_name_uses_gateway_code() {
        let (hub, service) = setup();
        let (connection, _rx) = hub.register();
        let raw = r#"{"id":"3","type":"command","payload":{"command":"join","domain":"a:b","member_id":"u1"}}"#;
        let reply = parse(handle_text_message(raw, connection, &service).await);
        assert_eq!(reply["payload"]["code"], 1002);
    }
}
