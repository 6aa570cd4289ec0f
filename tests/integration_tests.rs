mod test_helpers;

use roomcast_server::config::{Config, ServerConfig, StorageConfig, StorageKind};
use roomcast_server::protocol::{ClientMessage, ConnectionId, ServerMessage};
use roomcast_server::server::RoomOrchestrator;
use std::sync::Arc;
use std::time::Duration;
use test_helpers::{connect, create_test_server, drain};

/// Scenario 1: host creates a room, a viewer joins; both sides see the
/// membership and notification events the signaling contract promises.
#[tokio::test]
async fn host_create_then_viewer_join() {
    let server = create_test_server().await;
    let (c1, mut rx1) = connect(&server);

    server
        .handle_client_message(
            c1,
            ClientMessage::CreateRoom {
                host_id: "H".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;

    let room_id = match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, members, .. } => {
            assert_eq!(members, &["H".to_string()]);
            room_id.clone()
        }
        other => panic!("expected room-created, got {other:?}"),
    };
    drain(&mut rx1); // chat-history

    let (c2, mut rx2) = connect(&server);
    server
        .handle_client_message(
            c2,
            ClientMessage::JoinRoom {
                room_id: room_id.clone(),
                member_id: "V".to_string(),
                name: "Bob".to_string(),
            },
        )
        .await;

    match rx2.recv().await.unwrap().as_ref() {
        ServerMessage::RoomJoined { members, .. } => {
            assert_eq!(members, &["H".to_string(), "V".to_string()]);
        }
        other => panic!("expected room-joined, got {other:?}"),
    }

    match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::MemberJoined { members } => {
            assert_eq!(members, &["H".to_string(), "V".to_string()]);
        }
        other => panic!("expected member-joined, got {other:?}"),
    }
    match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::ViewerJoined { viewer_id } => {
            assert_eq!(viewer_id, &c2.to_string());
        }
        other => panic!("expected viewer-joined, got {other:?}"),
    }
}

/// Scenario 2: a second viewer reusing an already-taken display name is
/// rejected, and the room's membership is left untouched.
#[tokio::test]
async fn duplicate_name_is_rejected() {
    let server = create_test_server().await;
    let (c1, mut rx1) = connect(&server);
    server
        .handle_client_message(
            c1,
            ClientMessage::CreateRoom {
                host_id: "H".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;
    let room_id = match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, .. } => room_id.clone(),
        other => panic!("expected room-created, got {other:?}"),
    };
    drain(&mut rx1);

    let (c2, mut rx2) = connect(&server);
    server
        .handle_client_message(
            c2,
            ClientMessage::JoinRoom {
                room_id: room_id.clone(),
                member_id: "V".to_string(),
                name: "Bob".to_string(),
            },
        )
        .await;
    drain(&mut rx2);
    drain(&mut rx1);

    let (c3, mut rx3) = connect(&server);
    server
        .handle_client_message(
            c3,
            ClientMessage::JoinRoom {
                room_id: room_id.clone(),
                member_id: "V2".to_string(),
                name: "Bob".to_string(),
            },
        )
        .await;

    match rx3.recv().await.unwrap().as_ref() {
        ServerMessage::Error { message } => {
            assert!(message.contains("Bob"));
            assert!(message.contains("already taken"));
        }
        other => panic!("expected error, got {other:?}"),
    }
    assert!(rx3.try_recv().is_err());
}

fn test_config(grace_period_secs: u64) -> Config {
    Config {
        server: ServerConfig {
            grace_period_secs,
            ..ServerConfig::default()
        },
        storage: StorageConfig {
            kind: StorageKind::Memory,
            ..StorageConfig::default()
        },
        ..Config::default()
    }
}

/// Scenario 3: the host reloads the page while a viewer is present. The
/// reconnect rebinds the host's identity to the new connection, force-closes
/// the stale one, and announces `host-reconnected` to the rest of the room
/// instead of tearing it down.
#[tokio::test(start_paused = true)]
async fn host_reload_with_viewer_present() {
    let server = Arc::new(RoomOrchestrator::new(&test_config(5)).await.unwrap());
    let (c1, mut rx1) = connect(&server);
    server
        .handle_client_message(
            c1,
            ClientMessage::CreateRoom {
                host_id: "H".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;
    let room_id = match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, .. } => room_id.clone(),
        other => panic!("expected room-created, got {other:?}"),
    };
    drain(&mut rx1);

    let (c2, mut rx2) = connect(&server);
    server
        .handle_client_message(
            c2,
            ClientMessage::JoinRoom {
                room_id: room_id.clone(),
                member_id: "V".to_string(),
                name: "Bob".to_string(),
            },
        )
        .await;
    drain(&mut rx2);
    drain(&mut rx1);

    // c1 drops; arm the grace timer but don't let it fire.
    server.handle_disconnect(c1).await;
    tokio::time::advance(Duration::from_secs(1)).await;

    // Host reconnects on a fresh connection before the grace window elapses.
    let (c1_prime, mut rx1_prime) = connect(&server);
    server
        .handle_client_message(
            c1_prime,
            ClientMessage::CreateRoom {
                host_id: "H".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;

    match rx1_prime.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id: got, members, .. } => {
            assert_eq!(got, &room_id);
            assert_eq!(members, &["H".to_string(), "V".to_string()]);
        }
        other => panic!("expected room-created, got {other:?}"),
    }

    match rx2.recv().await.unwrap().as_ref() {
        ServerMessage::HostReconnected { host_id, host_socket_id } => {
            assert_eq!(host_id, "H");
            assert_eq!(host_socket_id, &c1_prime.to_string());
        }
        other => panic!("expected host-reconnected, got {other:?}"),
    }

    // Let the now-cancelled timer run its course; it must not fire.
    tokio::time::advance(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;

    server
        .handle_client_message(c1_prime, ClientMessage::ValidateRoom { room_id: room_id.clone() })
        .await;
    match rx1_prime.recv().await.unwrap().as_ref() {
        ServerMessage::RoomValidated { exists, .. } => assert!(exists),
        other => panic!("expected room-validated, got {other:?}"),
    }
}

/// Scenario 4: the host disconnects for good and the grace timer expires
/// with no reconnect. The room is torn down in the order viewers depend on:
/// `member-left` (for any other departed members), then `room-deleted`.
#[tokio::test(start_paused = true)]
async fn host_definitive_leave_tears_down_room() {
    let server = Arc::new(RoomOrchestrator::new(&test_config(5)).await.unwrap());
    let (c1, mut rx1) = connect(&server);
    server
        .handle_client_message(
            c1,
            ClientMessage::CreateRoom {
                host_id: "H".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;
    let room_id = match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, .. } => room_id.clone(),
        other => panic!("expected room-created, got {other:?}"),
    };
    drain(&mut rx1);

    let (c2, mut rx2) = connect(&server);
    server
        .handle_client_message(
            c2,
            ClientMessage::JoinRoom {
                room_id: room_id.clone(),
                member_id: "V".to_string(),
                name: "Bob".to_string(),
            },
        )
        .await;
    drain(&mut rx2);
    drain(&mut rx1);

    server.handle_disconnect(c1).await;
    tokio::time::advance(Duration::from_secs(6)).await;
    tokio::task::yield_now().await;

    match rx2.recv().await.unwrap().as_ref() {
        ServerMessage::MemberLeft { user_id, members } => {
            assert_eq!(user_id, "H");
            assert_eq!(members, &["V".to_string()]);
        }
        other => panic!("expected member-left, got {other:?}"),
    }
    match rx2.recv().await.unwrap().as_ref() {
        ServerMessage::RoomDeleted { message } => {
            assert_eq!(message, "Host has left the room");
        }
        other => panic!("expected room-deleted, got {other:?}"),
    }

    server
        .handle_client_message(c2, ClientMessage::ValidateRoom { room_id: room_id.clone() })
        .await;
    match rx2.recv().await.unwrap().as_ref() {
        ServerMessage::RoomValidated { exists, .. } => assert!(!exists),
        other => panic!("expected room-validated, got {other:?}"),
    }
}

/// Scenario 5: a chat message persists and broadcasts, then is replayed in
/// ascending order to the next joiner via `chat-history`.
#[tokio::test]
async fn chat_round_trip() {
    let server = create_test_server().await;
    let (c1, mut rx1) = connect(&server);
    server
        .handle_client_message(
            c1,
            ClientMessage::CreateRoom {
                host_id: "H".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;
    let room_id = match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, .. } => room_id.clone(),
        other => panic!("expected room-created, got {other:?}"),
    };
    drain(&mut rx1);

    server
        .handle_client_message(
            c1,
            ClientMessage::SendMessage {
                user_id: "H".to_string(),
                user_name: "Alice".to_string(),
                message: "hi".to_string(),
                room_id: room_id.clone(),
            },
        )
        .await;

    match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::ChatMessageEvent { message } => {
            assert_eq!(message.message, "hi");
            assert_eq!(message.user_id, "H");
        }
        other => panic!("expected chat-message, got {other:?}"),
    }

    let (c2, mut rx2) = connect(&server);
    server
        .handle_client_message(
            c2,
            ClientMessage::JoinRoom {
                room_id: room_id.clone(),
                member_id: "V".to_string(),
                name: "Bob".to_string(),
            },
        )
        .await;
    drain(&mut rx2); // room-joined
    drain(&mut rx1); // member-joined / viewer-joined
    let history = loop {
        match rx2.recv().await.unwrap().as_ref() {
            ServerMessage::ChatHistory { messages } => break messages.clone(),
            _ => continue,
        }
    };
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message, "hi");
}

/// Scenario 6: a reaction toggles on and back off across two identical
/// `react-to-message` events from the same viewer.
#[tokio::test]
async fn reaction_toggles_on_then_off() {
    let server = create_test_server().await;
    let (c1, mut rx1) = connect(&server);
    server
        .handle_client_message(
            c1,
            ClientMessage::CreateRoom {
                host_id: "H".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;
    let room_id = match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, .. } => room_id.clone(),
        other => panic!("expected room-created, got {other:?}"),
    };
    drain(&mut rx1);

    server
        .handle_client_message(
            c1,
            ClientMessage::SendMessage {
                user_id: "H".to_string(),
                user_name: "Alice".to_string(),
                message: "hi".to_string(),
                room_id: room_id.clone(),
            },
        )
        .await;
    let message_id = match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::ChatMessageEvent { message } => message.id.to_string(),
        other => panic!("expected chat-message, got {other:?}"),
    };

    server
        .handle_client_message(
            c1,
            ClientMessage::ReactToMessage {
                room_id: room_id.clone(),
                message_id: message_id.clone(),
                user_id: "V".to_string(),
                emoji: "\u{1F44D}".to_string(),
            },
        )
        .await;
    match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::MessageReactionUpdated { reactions, .. } => {
            assert_eq!(reactions.len(), 1);
            assert_eq!(reactions[0].user_ids, vec!["V".to_string()]);
        }
        other => panic!("expected message-reaction-updated, got {other:?}"),
    }

    server
        .handle_client_message(
            c1,
            ClientMessage::ReactToMessage {
                room_id: room_id.clone(),
                message_id,
                user_id: "V".to_string(),
                emoji: "\u{1F44D}".to_string(),
            },
        )
        .await;
    match rx1.recv().await.unwrap().as_ref() {
        ServerMessage::MessageReactionUpdated { reactions, .. } => {
            assert!(reactions.is_empty());
        }
        other => panic!("expected message-reaction-updated, got {other:?}"),
    }
}

#[allow(dead_code)]
fn assert_connection_id_display(id: ConnectionId) -> String {
    id.to_string()
}
