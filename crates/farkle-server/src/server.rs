//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, RoomStatus, ServerMessage};
use crate::room::GameRoom;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// All active rooms
    pub rooms: DashMap<Uuid, GameRoom>,
    /// Mapping from player ID to their room ID
    pub player_rooms: DashMap<Uuid, Uuid>,
    /// Mapping from player ID to their message sender
    pub player_senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            player_rooms: DashMap::new(),
            player_senders: DashMap::new(),
        }
    }

    /// Send a message to a specific player.
    pub fn send_to_player(&self, player_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.player_senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    /// Report an error back to a single player.
    fn send_error(&self, player_id: Uuid, message: impl Into<String>) {
        self.send_to_player(
            player_id,
            ServerMessage::Error {
                message: message.into(),
            },
        );
    }

    /// Broadcast a message to all players in a room.
    pub fn broadcast_to_room(&self, room_id: Uuid, msg: ServerMessage) {
        if let Some(room) = self.rooms.get(&room_id) {
            for player_id in room.players.keys() {
                self.send_to_player(*player_id, msg.clone());
            }
        }
    }

    /// Broadcast a message to all players in a room except one.
    pub fn broadcast_to_room_except(&self, room_id: Uuid, except: Uuid, msg: ServerMessage) {
        if let Some(room) = self.rooms.get(&room_id) {
            for player_id in room.players.keys() {
                if *player_id != except {
                    self.send_to_player(*player_id, msg.clone());
                }
            }
        }
    }

    /// Get list of waiting rooms.
    pub fn get_waiting_rooms(&self) -> Vec<crate::protocol::RoomInfo> {
        self.rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Waiting)
            .map(|r| r.to_info())
            .collect()
    }

    /// Broadcast the game state, the valid actions, and whose turn it is.
    fn broadcast_game_update(
        &self,
        room_id: Uuid,
        game_state: serde_json::Value,
        valid_actions: Vec<serde_json::Value>,
        current_player: usize,
    ) {
        self.broadcast_to_room(room_id, ServerMessage::GameState { state: game_state });
        self.broadcast_to_room(
            room_id,
            ServerMessage::ValidActions {
                actions: valid_actions,
            },
        );
        self.broadcast_to_room(
            room_id,
            ServerMessage::TurnChanged {
                player_index: current_player,
            },
        );
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Farkle server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Assign a player ID and a channel for outgoing messages
    let player_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.player_senders.insert(player_id, tx);

    let welcome = serde_json::to_string(&ServerMessage::Welcome { player_id })?;
    ws_sender.send(Message::Text(welcome.into())).await?;

    // Forward queued messages to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(player_id, client_msg, &state),
                Err(_) => warn!("Invalid message from {}: {}", player_id, text),
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", player_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_player(player_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", player_id, e);
                break;
            }
            _ => {}
        }
    }

    handle_disconnect(player_id, &state);
    state.player_senders.remove(&player_id);
    send_task.abort();

    info!("Connection closed for {}", player_id);
    Ok(())
}

/// Dispatch a client message.
fn handle_message(player_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    match msg {
        ClientMessage::CreateRoom {
            player_name,
            max_players,
        } => handle_create_room(player_id, player_name, max_players, state),
        ClientMessage::JoinRoom {
            room_id,
            player_name,
        } => handle_join_room(player_id, room_id, player_name, state),
        ClientMessage::LeaveRoom => handle_leave_room(player_id, state),
        ClientMessage::StartGame => handle_start_game(player_id, state),
        ClientMessage::ResetGame => handle_reset_game(player_id, state),
        ClientMessage::GameAction { action } => handle_game_action(player_id, action, state),
        ClientMessage::Chat { message } => handle_chat(player_id, message, state),
        ClientMessage::ListRooms => {
            let rooms = state.get_waiting_rooms();
            state.send_to_player(player_id, ServerMessage::RoomList { rooms });
        }
        ClientMessage::Ping => {
            state.send_to_player(player_id, ServerMessage::Pong);
        }
    }
}

fn handle_create_room(
    player_id: Uuid,
    player_name: String,
    max_players: u8,
    state: &Arc<ServerState>,
) {
    let room_id = Uuid::new_v4();
    let room = GameRoom::new(room_id, player_id, player_name, max_players);
    let room_info = room.to_info();

    state.rooms.insert(room_id, room);
    state.player_rooms.insert(player_id, room_id);

    info!("Player {} created room {}", player_id, room_id);
    state.send_to_player(player_id, ServerMessage::RoomCreated { room_id });
    state.send_to_player(player_id, ServerMessage::JoinedRoom { room: room_info });
}

fn handle_join_room(
    player_id: Uuid,
    room_id: Uuid,
    player_name: String,
    state: &Arc<ServerState>,
) {
    let Some(mut room) = state.rooms.get_mut(&room_id) else {
        state.send_error(player_id, "Room not found");
        return;
    };

    match room.add_player(player_id, player_name) {
        Ok(()) => {
            let room_info = room.to_info();
            drop(room); // Release the entry before broadcasting

            state.player_rooms.insert(player_id, room_id);
            state.send_to_player(
                player_id,
                ServerMessage::JoinedRoom {
                    room: room_info.clone(),
                },
            );
            state.broadcast_to_room_except(
                room_id,
                player_id,
                ServerMessage::RoomUpdated { room: room_info },
            );
        }
        Err(e) => {
            drop(room);
            state.send_error(player_id, e.to_string());
        }
    }
}

fn handle_leave_room(player_id: Uuid, state: &Arc<ServerState>) {
    let Some((_, room_id)) = state.player_rooms.remove(&player_id) else {
        return;
    };

    let should_remove = if let Some(mut room) = state.rooms.get_mut(&room_id) {
        let is_empty = room.remove_player(player_id).unwrap_or(false);
        if !is_empty {
            let room_info = room.to_info();
            drop(room);
            state.broadcast_to_room(room_id, ServerMessage::RoomUpdated { room: room_info });
        }
        is_empty
    } else {
        false
    };

    if should_remove {
        state.rooms.remove(&room_id);
    }

    state.send_to_player(player_id, ServerMessage::LeftRoom);
}

fn handle_start_game(player_id: Uuid, state: &Arc<ServerState>) {
    let Some(&room_id) = state.player_rooms.get(&player_id).as_deref() else {
        return;
    };
    let Some(mut room) = state.rooms.get_mut(&room_id) else {
        return;
    };

    match room.start_game(player_id) {
        Ok(()) => {
            let game_state = room.get_game_state().unwrap();
            let valid_actions = room.get_valid_actions().unwrap();
            let current_player = room.get_current_player().unwrap();
            drop(room);

            info!("Game started in room {}", room_id);
            state.broadcast_to_room(room_id, ServerMessage::GameStarted { state: game_state });
            state.broadcast_to_room(
                room_id,
                ServerMessage::ValidActions {
                    actions: valid_actions,
                },
            );
            state.broadcast_to_room(
                room_id,
                ServerMessage::TurnChanged {
                    player_index: current_player,
                },
            );
        }
        Err(e) => {
            drop(room);
            state.send_error(player_id, e.to_string());
        }
    }
}

fn handle_reset_game(player_id: Uuid, state: &Arc<ServerState>) {
    let Some(&room_id) = state.player_rooms.get(&player_id).as_deref() else {
        return;
    };
    let Some(mut room) = state.rooms.get_mut(&room_id) else {
        return;
    };

    match room.reset_game(player_id) {
        Ok(()) => {
            let room_info = room.to_info();
            drop(room);

            info!("Room {} returned to lobby", room_id);
            state.broadcast_to_room(room_id, ServerMessage::GameReset);
            state.broadcast_to_room(room_id, ServerMessage::RoomUpdated { room: room_info });
        }
        Err(e) => {
            drop(room);
            state.send_error(player_id, e.to_string());
        }
    }
}

fn handle_game_action(player_id: Uuid, action: serde_json::Value, state: &Arc<ServerState>) {
    let Some(&room_id) = state.player_rooms.get(&player_id).as_deref() else {
        return;
    };
    let Some(mut room) = state.rooms.get_mut(&room_id) else {
        return;
    };

    match room.apply_action(player_id, action) {
        Ok(events) => {
            let game_state = room.get_game_state().unwrap();
            let valid_actions = room.get_valid_actions().unwrap();
            let current_player = room.get_current_player().unwrap();
            drop(room);

            // Confirm to the acting player, then fan out the new state
            state.send_to_player(
                player_id,
                ServerMessage::ActionResult {
                    success: true,
                    events: events
                        .iter()
                        .map(|e| serde_json::to_value(e).unwrap())
                        .collect(),
                    error: None,
                },
            );
            state.broadcast_game_update(room_id, game_state, valid_actions, current_player);
        }
        Err(e) => {
            drop(room);
            state.send_to_player(
                player_id,
                ServerMessage::ActionResult {
                    success: false,
                    events: vec![],
                    error: Some(e.to_string()),
                },
            );
        }
    }
}

fn handle_chat(player_id: Uuid, message: String, state: &Arc<ServerState>) {
    let Some(&room_id) = state.player_rooms.get(&player_id).as_deref() else {
        return;
    };

    let player_name = state
        .rooms
        .get(&room_id)
        .and_then(|r| r.players.get(&player_id).map(|p| p.name.clone()))
        .unwrap_or_else(|| "Unknown".to_string());

    state.broadcast_to_room(
        room_id,
        ServerMessage::ChatMessage {
            player_name,
            message,
        },
    );
}

/// Handle player disconnect.
fn handle_disconnect(player_id: Uuid, state: &Arc<ServerState>) {
    let Some((_, room_id)) = state.player_rooms.remove(&player_id) else {
        return;
    };
    let Some(mut room) = state.rooms.get_mut(&room_id) else {
        return;
    };

    if room.status == RoomStatus::InGame {
        // Keep the seat; mark the player as disconnected
        room.set_player_connected(player_id, false);
        let room_info = room.to_info();
        drop(room);
        state.broadcast_to_room(room_id, ServerMessage::RoomUpdated { room: room_info });
    } else {
        let is_empty = room.remove_player(player_id).unwrap_or(false);
        if is_empty {
            drop(room);
            state.rooms.remove(&room_id);
        } else {
            let room_info = room.to_info();
            drop(room);
            state.broadcast_to_room(room_id, ServerMessage::RoomUpdated { room: room_info });
        }
    }
}
