//! # Integration Test Flows
//!
//! Dispatcher, SQLite store and RoomBus wired as in the server, exercised at
//! the frame level without a network.
//!
//! ## Flows Tested
//!
//! 1. Vote, change of mind and reset as seen by a monitor
//! 2. Category navigation as seen by a voter
//! 3. Reset while voting forces voters to clear their selection
//! 4. Disconnected peers stop receiving frames

#[cfg(test)]
mod tests {
    use ff_01_durable_store::{DurableStore, SqliteStore};
    use ff_03_vote_tally::TallyEngine;
    use ff_04_app_state::AppState;
    use ff_05_event_dispatch::{DispatchConfig, Dispatcher};
    use serde_json::{json, Value};
    use shared_bus::RoomBus;
    use shared_types::ConnectionId;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Node {
        dispatcher: Dispatcher,
        bus: Arc<RoomBus>,
        store: Arc<SqliteStore>,
        config: DispatchConfig,
        clock: Instant,
        _dir: tempfile::TempDir,
    }

    struct Peer {
        id: ConnectionId,
        frames: mpsc::Receiver<Arc<str>>,
    }

    impl Node {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = Arc::new(SqliteStore::open(dir.path().join("flows.sqlite3")).unwrap());
            let bus = Arc::new(RoomBus::new());
            let config = DispatchConfig::default();
            let state = AppState::load(store.clone()).unwrap();
            let tally = TallyEngine::new(store.clone());
            let dispatcher = Dispatcher::new(state, tally, bus.clone(), &config);
            Self {
                dispatcher,
                bus,
                store,
                config,
                clock: Instant::now(),
                _dir: dir,
            }
        }

        fn connect(&mut self) -> Peer {
            let id = ConnectionId::new();
            let frames = self.bus.register(id);
            self.dispatcher.on_connect(id);
            Peer { id, frames }
        }

        fn admin(&mut self) -> Peer {
            let mut peer = self.connect();
            let secret = self.config.secrets.admin.clone();
            self.send(&peer, json!({"event": "signon", "data": secret}));
            drain(&mut peer);
            peer
        }

        fn monitor(&mut self) -> Peer {
            let mut peer = self.connect();
            let secret = self.config.secrets.monitor.clone();
            self.send(&peer, json!({"event": "signon", "data": secret}));
            drain(&mut peer);
            peer
        }

        /// Deliver a frame. The clock advances past the monitor throttle
        /// interval so every accepted vote pushes stats immediately.
        fn send(&mut self, peer: &Peer, frame: Value) {
            self.clock += self.config.monitor_interval + Duration::from_millis(1);
            self.dispatcher
                .on_frame(peer.id, &frame.to_string(), self.clock);
        }

        fn command(&mut self, admin: &Peer, command: &str) {
            self.send(admin, json!({"event": "admin", "data": command}));
        }

        fn vote(&mut self, voter: &Peer, voter_id: &str, category: u32, candidate: u32) {
            self.send(
                voter,
                json!({
                    "event": "vote",
                    "data": {"voterId": voter_id, "category": category, "candidateId": candidate}
                }),
            );
        }
    }

    fn drain(peer: &mut Peer) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = peer.frames.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    fn of_kind(frames: &[Value], event: &str) -> Vec<Value> {
        frames
            .iter()
            .filter(|frame| frame["event"] == event)
            .map(|frame| frame["data"].clone())
            .collect()
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_vote_change_and_reset_seen_by_monitor() {
        let mut node = Node::new();
        let admin = node.admin();
        let mut monitor = node.monitor();
        let voter = node.connect();

        node.command(&admin, "open_category");
        drain(&mut monitor);

        node.vote(&voter, "u1", 0, 2);
        assert_eq!(
            of_kind(&drain(&mut monitor), "stats"),
            vec![json!({"category": 0, "votes": [0, 0, 1]})]
        );

        node.vote(&voter, "u1", 0, 0);
        assert_eq!(
            of_kind(&drain(&mut monitor), "stats"),
            vec![json!({"category": 0, "votes": [1, 0, 0]})]
        );

        node.command(&admin, "reset_category");
        assert_eq!(
            of_kind(&drain(&mut monitor), "stats"),
            vec![json!({"category": 0, "votes": []})]
        );
        assert!(node.store.list_votes(0).unwrap().is_empty());
    }

    #[test]
    fn test_category_navigation_seen_by_voter() {
        let mut node = Node::new();
        let admin = node.admin();
        let mut voter = node.connect();
        assert_eq!(
            of_kind(&drain(&mut voter), "state"),
            vec![json!({"category": 0, "voting": false})]
        );

        node.command(&admin, "prev_category");
        node.command(&admin, "open_category");
        node.command(&admin, "next_category");
        node.command(&admin, "next_category");
        node.command(&admin, "prev_category");

        assert_eq!(
            of_kind(&drain(&mut voter), "state"),
            vec![
                json!({"category": 0, "voting": false}),
                json!({"category": 0, "voting": true}),
                json!({"category": 1, "voting": false}),
                json!({"category": 2, "voting": false}),
                json!({"category": 1, "voting": false}),
            ]
        );
    }

    #[test]
    fn test_votes_for_closed_or_other_categories_change_nothing() {
        let mut node = Node::new();
        let mut admin = node.admin();
        let voter = node.connect();

        node.vote(&voter, "u1", 0, 1);
        node.command(&admin, "open_category");
        node.vote(&voter, "u1", 3, 1);

        assert!(of_kind(&drain(&mut admin), "vote").is_empty());
        assert!(node.store.list_votes(0).unwrap().is_empty());
        assert!(node.store.list_votes(3).unwrap().is_empty());
    }

    #[test]
    fn test_reset_while_voting_reopens_for_voters() {
        let mut node = Node::new();
        let admin = node.admin();
        let mut voter = node.connect();
        node.command(&admin, "open_category");
        node.vote(&voter, "u1", 0, 1);
        drain(&mut voter);

        node.command(&admin, "reset_category");

        assert_eq!(
            of_kind(&drain(&mut voter), "state"),
            vec![
                json!({"category": 0, "voting": false}),
                json!({"category": 0, "voting": true}),
            ]
        );
    }

    #[test]
    fn test_admin_sees_votes_and_signons() {
        let mut node = Node::new();
        let mut admin = node.admin();
        let _monitor = node.monitor();
        let voter = node.connect();
        node.send(&voter, json!({"event": "signon", "data": "nope"}));
        node.command(&admin, "open_category");
        node.vote(&voter, "u7", 0, 4);

        let frames = drain(&mut admin);
        assert_eq!(
            of_kind(&frames, "info"),
            vec![json!("monitor connected"), json!("unknown signon nope")]
        );
        assert_eq!(
            of_kind(&frames, "vote"),
            vec![json!({"voterId": "u7", "category": 0, "candidateId": 4})]
        );
    }

    #[test]
    fn test_disconnected_peer_is_forgotten() {
        let mut node = Node::new();
        let admin = node.admin();
        let voter = node.connect();
        assert_eq!(node.bus.connection_count(), 2);

        node.bus.remove(&voter.id);
        node.dispatcher.on_disconnect(voter.id);
        drop(voter);
        node.command(&admin, "open_category");

        assert_eq!(node.bus.connection_count(), 1);
        assert_eq!(node.dispatcher.connection_count(), 1);
    }
}
