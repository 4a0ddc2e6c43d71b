//! # Wire Messages
//!
//! Every frame on the socket is a JSON object `{"event": <tag>, "data": <payload>}`.
//!
//! | Kind     | Direction                  | Payload                                   |
//! |----------|----------------------------|-------------------------------------------|
//! | `state`  | server → all / one         | `{category, voting}`                      |
//! | `stats`  | server → monitors          | `{category, votes: [count, ...]}`         |
//! | `info`   | server → admins            | human-readable line                       |
//! | `signon` | client → server            | shared secret                             |
//! | `admin`  | admin → server             | command name                              |
//! | `vote`   | voter → server, → admins   | `{voterId, category, candidateId}`        |

use crate::entities::{CandidateId, CategoryId};
use crate::errors::FrameError;
use serde::{Deserialize, Serialize};

/// Longest voter id accepted on a `vote` frame.
pub const MAX_VOTER_ID_LEN: usize = 128;

/// Highest candidate index accepted on a `vote` frame. Tallies are dense on
/// the wire, so this bounds the length of every `stats` array.
pub const MAX_CANDIDATE_ID: CandidateId = 1023;

/// The closed set of frame kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    State,
    Stats,
    Info,
    Signon,
    Admin,
    Vote,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::State,
        EventKind::Stats,
        EventKind::Info,
        EventKind::Signon,
        EventKind::Admin,
        EventKind::Vote,
    ];

    /// Tag used in the `event` field of a frame.
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::State => "state",
            EventKind::Stats => "stats",
            EventKind::Info => "info",
            EventKind::Signon => "signon",
            EventKind::Admin => "admin",
            EventKind::Vote => "vote",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Authoritative voting state as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    pub category: CategoryId,
    pub voting: bool,
}

/// Tally for one category, dense and zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsPayload {
    pub category: CategoryId,
    pub votes: Vec<u64>,
}

/// One vote cast by a voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    pub voter_id: String,
    pub category: CategoryId,
    pub candidate_id: CandidateId,
}

/// Commands an admin connection may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminCommand {
    OpenCategory,
    CloseCategory,
    NextCategory,
    PrevCategory,
    ResetCategory,
}

impl AdminCommand {
    pub const ALL: [AdminCommand; 5] = [
        AdminCommand::OpenCategory,
        AdminCommand::CloseCategory,
        AdminCommand::NextCategory,
        AdminCommand::PrevCategory,
        AdminCommand::ResetCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminCommand::OpenCategory => "open_category",
            AdminCommand::CloseCategory => "close_category",
            AdminCommand::NextCategory => "next_category",
            AdminCommand::PrevCategory => "prev_category",
            AdminCommand::ResetCategory => "reset_category",
        }
    }

    /// Resolve a command name. Unknown names are not an error at this layer;
    /// the dispatcher reports them to admins.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.as_str() == name)
    }
}

/// Frames a client may send.
///
/// `signon` and `admin` carry raw strings: an unrecognized secret or command
/// is still a well-formed frame and is reported to admins rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundMessage {
    Signon(String),
    Admin(String),
    Vote(VotePayload),
}

impl InboundMessage {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundMessage::Signon(_) => EventKind::Signon,
            InboundMessage::Admin(_) => EventKind::Admin,
            InboundMessage::Vote(_) => EventKind::Vote,
        }
    }
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundMessage {
    State(StatePayload),
    Stats(StatsPayload),
    Info(String),
    Vote(VotePayload),
}

impl OutboundMessage {
    pub fn kind(&self) -> EventKind {
        match self {
            OutboundMessage::State(_) => EventKind::State,
            OutboundMessage::Stats(_) => EventKind::Stats,
            OutboundMessage::Info(_) => EventKind::Info,
            OutboundMessage::Vote(_) => EventKind::Vote,
        }
    }

    /// Serialize into a text frame.
    pub fn to_frame(&self) -> Result<String, FrameError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode and validate one inbound text frame.
pub fn parse_frame(text: &str) -> Result<InboundMessage, FrameError> {
    let message: InboundMessage = serde_json::from_str(text)?;
    if let InboundMessage::Vote(vote) = &message {
        if vote.voter_id.is_empty() {
            return Err(FrameError::InvalidField {
                field: "voterId",
                reason: "must not be empty",
            });
        }
        if vote.voter_id.len() > MAX_VOTER_ID_LEN {
            return Err(FrameError::InvalidField {
                field: "voterId",
                reason: "too long",
            });
        }
        if vote.candidate_id > MAX_CANDIDATE_ID {
            return Err(FrameError::InvalidField {
                field: "candidateId",
                reason: "out of range",
            });
        }
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_tags_are_unique() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(EventKind::from_tag("65996b32"), None);
    }

    #[test]
    fn test_parse_vote_frame() {
        let frame = json!({
            "event": "vote",
            "data": {"voterId": "u1", "category": 3, "candidateId": 2}
        })
        .to_string();

        let message = parse_frame(&frame).unwrap();
        assert_eq!(
            message,
            InboundMessage::Vote(VotePayload {
                voter_id: "u1".into(),
                category: 3,
                candidate_id: 2,
            })
        );
        assert_eq!(message.kind(), EventKind::Vote);
    }

    #[test]
    fn test_parse_rejects_malformed_frames() {
        let cases = [
            "not json",
            r#"{"event":"vote","data":{"voterId":"u1","category":-1,"candidateId":0}}"#,
            r#"{"event":"vote","data":{"voterId":"u1","category":0}}"#,
            r#"{"event":"vote","data":{"voterId":"u1","category":0,"candidateId":1.5}}"#,
            r#"{"event":"admin","data":7}"#,
            r#"{"event":"state","data":{"category":0,"voting":true}}"#,
            r#"{"event":"bogus","data":null}"#,
        ];
        for case in cases {
            assert!(parse_frame(case).is_err(), "accepted {case}");
        }
    }

    #[test]
    fn test_parse_rejects_bad_voter_id() {
        let empty = r#"{"event":"vote","data":{"voterId":"","category":0,"candidateId":0}}"#;
        assert!(matches!(
            parse_frame(empty),
            Err(FrameError::InvalidField { field: "voterId", .. })
        ));

        let long = json!({
            "event": "vote",
            "data": {"voterId": "x".repeat(MAX_VOTER_ID_LEN + 1), "category": 0, "candidateId": 0}
        })
        .to_string();
        assert!(parse_frame(&long).is_err());
    }

    #[test]
    fn test_parse_rejects_huge_candidate() {
        let frame = json!({
            "event": "vote",
            "data": {"voterId": "u1", "category": 0, "candidateId": MAX_CANDIDATE_ID + 1}
        })
        .to_string();
        assert!(matches!(
            parse_frame(&frame),
            Err(FrameError::InvalidField { field: "candidateId", .. })
        ));
    }

    #[test]
    fn test_unknown_admin_command_is_well_formed() {
        let message = parse_frame(r#"{"event":"admin","data":"fatal_reset"}"#).unwrap();
        assert_eq!(message, InboundMessage::Admin("fatal_reset".into()));
        assert_eq!(AdminCommand::parse("fatal_reset"), None);
        assert_eq!(
            AdminCommand::parse("next_category"),
            Some(AdminCommand::NextCategory)
        );
    }

    #[test]
    fn test_outbound_frame_shape() {
        let frame = OutboundMessage::Stats(StatsPayload {
            category: 1,
            votes: vec![0, 2],
        })
        .to_frame()
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["event"], "stats");
        assert_eq!(parsed["data"]["votes"], json!([0, 2]));

        let frame = OutboundMessage::Vote(VotePayload {
            voter_id: "u1".into(),
            category: 0,
            candidate_id: 4,
        })
        .to_frame()
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["data"]["voterId"], "u1");
        assert_eq!(parsed["data"]["candidateId"], 4);
    }
}
