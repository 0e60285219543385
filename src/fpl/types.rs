use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{PlayerId, UserId};

/// Body the API sends back when the logged-in account does not own the entry.
pub const ENTRY_DENIED_DETAIL: &str = "You cannot view this entry";

/// The parts of `bootstrap-static/` this crate reads. Records stay untyped;
/// their columns change from season to season.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BootstrapStatic {
    #[serde(default)]
    pub teams: Vec<Value>,
    /// Game weeks.
    #[serde(default)]
    pub events: Vec<Value>,
    /// Players.
    #[serde(default)]
    pub elements: Vec<Value>,
}

/// `element-summary/{player_id}/`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ElementSummary {
    #[serde(default)]
    pub history_past: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub fixtures: Vec<Value>,
}

impl ElementSummary {
    /// Merge the summary collections into a player record.
    pub fn merge_into(self, player: &mut Value) {
        if let Value::Object(obj) = player {
            obj.insert("history_past".to_string(), Value::Array(self.history_past));
            obj.insert("history".to_string(), Value::Array(self.history));
            obj.insert("fixtures".to_string(), Value::Array(self.fixtures));
        }
    }
}

/// `my-team/{user_id}/`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MyTeam {
    #[serde(default)]
    pub picks: Vec<Value>,
    #[serde(default)]
    pub chips: Vec<Value>,
    #[serde(default)]
    pub transfers: Value,
}

/// `me/`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserProfile {
    #[serde(default)]
    pub player: Value,
}

impl UserProfile {
    /// The entry (user id) of the logged-in manager, if the profile has one.
    pub fn entry(&self) -> Option<UserId> {
        self.player.get("entry").and_then(UserId::from_json)
    }
}

pub fn is_entry_denied(body: &Value) -> bool {
    ["details", "detail"]
        .iter()
        .any(|k| body.get(k).and_then(Value::as_str) == Some(ENTRY_DENIED_DETAIL))
}

/// `id` of a player record.
pub fn player_id_of(record: &Value) -> Option<PlayerId> {
    record
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .map(PlayerId::new)
}

/// Keep the records whose `id` is in `ids`; `None` or an empty list keeps
/// everything.
pub fn retain_ids<I>(records: Vec<Value>, ids: Option<&[I]>) -> Vec<Value>
where
    I: Copy + Into<Value>,
{
    match ids {
        None => records,
        Some([]) => records,
        Some(ids) => {
            let wanted: Vec<Value> = ids.iter().map(|id| (*id).into()).collect();
            records
                .into_iter()
                .filter(|r| r.get("id").is_some_and(|id| wanted.contains(id)))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamId;
    use serde_json::json;

    #[test]
    fn test_bootstrap_defaults_missing_sections() {
        let parsed: BootstrapStatic =
            serde_json::from_value(json!({"teams": [{"id": 1}]})).unwrap();
        assert_eq!(parsed.teams.len(), 1);
        assert!(parsed.events.is_empty());
        assert!(parsed.elements.is_empty());
    }

    #[test]
    fn test_merge_summary_into_player() {
        let summary: ElementSummary = serde_json::from_value(json!({
            "history": [{"fixture": 1}],
            "fixtures": [{"event": 5}]
        }))
        .unwrap();
        let mut player = json!({"id": 1, "web_name": "Raya"});

        summary.merge_into(&mut player);

        assert_eq!(player["history"], json!([{"fixture": 1}]));
        assert_eq!(player["history_past"], json!([]));
        assert_eq!(player["fixtures"], json!([{"event": 5}]));
    }

    #[test]
    fn test_user_profile_entry() {
        let profile: UserProfile =
            serde_json::from_value(json!({"player": {"entry": "123"}})).unwrap();
        assert_eq!(profile.entry(), Some(UserId::new(123)));

        let anonymous: UserProfile = serde_json::from_value(json!({"player": null})).unwrap();
        assert_eq!(anonymous.entry(), None);
    }

    #[test]
    fn test_is_entry_denied() {
        assert!(is_entry_denied(&json!({"details": ENTRY_DENIED_DETAIL})));
        assert!(is_entry_denied(&json!({"detail": ENTRY_DENIED_DETAIL})));
        assert!(!is_entry_denied(&json!({"picks": []})));
    }

    #[test]
    fn test_retain_ids() {
        let records = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];

        let kept = retain_ids(records.clone(), Some(&[TeamId::new(3), TeamId::new(1)][..]));
        assert_eq!(kept, vec![json!({"id": 1}), json!({"id": 3})]);

        let all = retain_ids::<TeamId>(records, None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_retain_ids_empty_list_keeps_everything() {
        let records = vec![json!({"id": 1}), json!({"id": 2})];

        let kept = retain_ids(records.clone(), Some(&[] as &[TeamId]));

        assert_eq!(kept, records);
    }

    #[test]
    fn test_player_id_of() {
        assert_eq!(player_id_of(&json!({"id": 233})), Some(PlayerId::new(233)));
        assert_eq!(player_id_of(&json!({"name": "x"})), None);
    }
}
