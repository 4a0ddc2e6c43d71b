//! # Dispatcher
//!
//! Synchronous handlers for connection lifecycle events and inbound frames.
//! The actor calls these one at a time; tests call them directly.

use crate::domain::{DispatchConfig, DispatchError, MonitorThrottle, Secrets};
use ff_03_vote_tally::TallyEngine;
use ff_04_app_state::AppState;
use shared_bus::Broadcaster;
use shared_types::{
    parse_frame, AdminCommand, ConnectionId, InboundMessage, OutboundMessage, Role, Room,
    StatePayload, Target, VotePayload,
};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

pub struct Dispatcher {
    state: AppState,
    tally: TallyEngine,
    bus: Arc<dyn Broadcaster>,
    roles: HashMap<ConnectionId, Role>,
    secrets: Secrets,
    throttle: MonitorThrottle,
}

impl Dispatcher {
    pub fn new(
        state: AppState,
        tally: TallyEngine,
        bus: Arc<dyn Broadcaster>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            state,
            tally,
            bus,
            roles: HashMap::new(),
            secrets: config.secrets.clone(),
            throttle: MonitorThrottle::new(config.monitor_interval),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Role of a live connection; unknown connections are voters.
    pub fn role_of(&self, connection: &ConnectionId) -> Role {
        self.roles.get(connection).copied().unwrap_or_default()
    }

    pub fn connection_count(&self) -> usize {
        self.roles.len()
    }

    /// A new peer gets the current state straight away.
    pub fn on_connect(&mut self, connection: ConnectionId) {
        self.roles.insert(connection, Role::Voter);
        info!(connection_id = %connection, "Peer connected");
        self.emit(
            Target::Connection(connection),
            OutboundMessage::State(self.state.snapshot()),
        );
    }

    pub fn on_disconnect(&mut self, connection: ConnectionId) {
        let role = self.roles.remove(&connection).unwrap_or_default();
        info!(connection_id = %connection, ?role, "Peer disconnected");
    }

    /// Decode one text frame and handle it.
    ///
    /// Malformed frames are dropped. A failed request is logged and reported
    /// to admins; it never takes the dispatcher down.
    pub fn on_frame(&mut self, connection: ConnectionId, text: &str, now: Instant) {
        let message = match parse_frame(text) {
            Ok(message) => message,
            Err(e) => {
                debug!(connection_id = %connection, error = %e, "Discarding malformed frame");
                return;
            }
        };

        let kind = message.kind();
        if let Err(e) = self.handle(connection, message, now) {
            error!(connection_id = %connection, kind = kind.tag(), error = %e, "Request failed");
            self.info(format!("{} failed: {e}", kind.tag()));
        }
    }

    /// Handle one validated message.
    pub fn handle(
        &mut self,
        connection: ConnectionId,
        message: InboundMessage,
        now: Instant,
    ) -> Result<(), DispatchError> {
        match message {
            InboundMessage::Signon(secret) => {
                self.handle_signon(connection, &secret);
                Ok(())
            }
            InboundMessage::Admin(command) => {
                if self.role_of(&connection) != Role::Admin {
                    debug!(connection_id = %connection, command = %command, "Admin command from non-admin dropped");
                    return Ok(());
                }
                match AdminCommand::parse(&command) {
                    Some(command) => self.handle_admin(command),
                    None => {
                        info!(command = %command, "Unknown admin command");
                        self.info(format!("unknown command {command}"));
                        Ok(())
                    }
                }
            }
            InboundMessage::Vote(vote) => self.handle_vote(vote, now),
        }
    }

    /// Emit the trailing tally update if the throttle says it is due.
    pub fn on_throttle_deadline(&mut self, now: Instant) {
        if self.throttle.on_deadline(now) {
            self.push_stats();
        }
    }

    /// When the actor must wake up for a trailing tally update.
    pub fn throttle_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    fn handle_signon(&mut self, connection: ConnectionId, secret: &str) {
        let role = if secret_matches(secret, &self.secrets.admin) {
            Role::Admin
        } else if secret_matches(secret, &self.secrets.monitor) {
            Role::Monitor
        } else {
            info!(connection_id = %connection, "Unknown signon");
            self.info(format!("unknown signon {secret}"));
            return;
        };

        let Some(room) = role.room() else {
            return;
        };
        if let Err(e) = self.bus.join(connection, room) {
            warn!(connection_id = %connection, error = %e, "Signon for a connection the bus does not know");
            return;
        }
        self.roles.insert(connection, role);
        info!(connection_id = %connection, ?role, "Signon accepted");

        match role {
            Role::Admin => self.info("admin connected".to_string()),
            Role::Monitor => {
                self.info("monitor connected".to_string());
                match self.current_stats() {
                    Ok(stats) => self.emit(Target::Connection(connection), stats),
                    Err(e) => {
                        error!(connection_id = %connection, error = %e, "Could not load tally for monitor");
                    }
                }
            }
            Role::Voter => {}
        }
    }

    fn handle_admin(&mut self, command: AdminCommand) -> Result<(), DispatchError> {
        info!(command = command.as_str(), category = self.state.category(), "Admin command");
        match command {
            AdminCommand::OpenCategory | AdminCommand::CloseCategory => {
                self.state
                    .set_voting(command == AdminCommand::OpenCategory)?;
                self.broadcast_state();
            }
            AdminCommand::NextCategory | AdminCommand::PrevCategory => {
                let delta = if command == AdminCommand::NextCategory { 1 } else { -1 };
                let closed = self.state.set_voting(false)?;
                let next = i64::from(self.state.category()) + delta;
                let moved = self.state.set_category(next.max(0));
                // Peers must see the closed flag even when the move fails.
                if moved.is_ok() || closed {
                    self.broadcast_state();
                }
                moved?;
            }
            AdminCommand::ResetCategory => {
                let StatePayload { category, voting } = self.state.snapshot();
                let stats = self.tally.reset_category(category)?.to_stats();

                // Voters drop a locally selected choice when they see voting close.
                if voting {
                    self.emit(
                        Target::Everyone,
                        OutboundMessage::State(StatePayload {
                            category,
                            voting: false,
                        }),
                    );
                    self.broadcast_state();
                }
                self.emit(Target::Room(Room::Monitors), OutboundMessage::Stats(stats));
            }
        }
        Ok(())
    }

    fn handle_vote(&mut self, vote: VotePayload, now: Instant) -> Result<(), DispatchError> {
        if vote.category != self.state.category() || !self.state.voting() {
            debug!(
                voter_id = %vote.voter_id,
                category = vote.category,
                "Vote outside the open category dropped"
            );
            return Ok(());
        }

        self.tally
            .cast_vote(vote.category, &vote.voter_id, vote.candidate_id)?;
        self.emit(Target::Room(Room::Admins), OutboundMessage::Vote(vote));

        if self.throttle.on_request(now) {
            self.push_stats();
        }
        Ok(())
    }

    fn push_stats(&mut self) {
        match self.current_stats() {
            Ok(stats) => self.emit(Target::Room(Room::Monitors), stats),
            Err(e) => error!(error = %e, "Could not load tally for monitors"),
        }
    }

    fn current_stats(&mut self) -> Result<OutboundMessage, DispatchError> {
        let category = self.state.category();
        let tally = self.tally.get_tally(category)?;
        Ok(OutboundMessage::Stats(tally.to_stats()))
    }

    fn broadcast_state(&self) {
        self.emit(
            Target::Everyone,
            OutboundMessage::State(self.state.snapshot()),
        );
    }

    fn info(&self, line: String) {
        self.emit(Target::Room(Room::Admins), OutboundMessage::Info(line));
    }

    fn emit(&self, target: Target, message: OutboundMessage) {
        let delivered = self.bus.emit(target, &message);
        debug!(to = %target, kind = message.kind().tag(), delivered, "Emitted");
    }
}

fn secret_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
