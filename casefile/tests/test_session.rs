mod common;

use casefile::engine::{Outcome, Screen};
use casefile::observability::EventEmitter;
use casefile::persistence::{FileSaveStore, SaveStore};
use casefile::session::{Action, Session};

fn session_in(dir: &std::path::Path) -> Session {
    Session::new(
        Box::new(common::fixture_library()),
        Box::new(FileSaveStore::new(dir)),
        EventEmitter::from_file(&dir.join("events.jsonl")).unwrap(),
    )
}

fn play_alpha(session: &mut Session) {
    for action in [
        Action::OpenCase("alpha".to_string()),
        Action::EnterCase,
        Action::PullLead("window".to_string()),
        Action::ChooseIntervention("knock".to_string()),
    ] {
        session.dispatch(action).unwrap();
    }
}

#[test]
fn save_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    play_alpha(&mut session);
    assert_eq!(session.state().screen(), Screen::Results);
    drop(session);

    let blob = FileSaveStore::new(dir.path()).load().expect("save written");
    assert_eq!(blob.last_case_id, "alpha");
    assert_eq!(blob.last_case_title, "Alpha Street");
    assert_eq!(blob.last_outcome, Some(Outcome::Bad));
    assert!(blob.resolved_at.is_some());
}

#[test]
fn reset_save_forgets_the_blob() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    play_alpha(&mut session);
    assert!(session.last_save().is_some());

    assert!(session.dispatch(Action::ResetSave).unwrap());
    assert!(session.last_save().is_none());
    assert!(FileSaveStore::new(dir.path()).load().is_none());
}

#[test]
fn event_stream_follows_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    play_alpha(&mut session);
    session.dispatch(Action::GoHome).unwrap();
    drop(session);

    let events: Vec<serde_json::Value> = std::fs::read_to_string(dir.path().join("events.jsonl"))
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let kinds: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        ["CaseOpened", "CaseEntered", "LeadPulled", "CaseResolved", "RunReset"]
    );
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event["sequence"], i);
    }
    assert_eq!(events[3]["outcome"], "bad");
}

#[test]
fn unknown_case_leaves_run_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    let err = session
        .dispatch(Action::OpenCase("gamma".to_string()))
        .unwrap_err();
    assert!(err.to_string().contains("unknown case 'gamma'"));
    assert_eq!(session.state().screen(), Screen::Home);
    assert!(session.last_save().is_none());
}

#[test]
fn actions_deserialize_from_tagged_json() {
    let pull: Action = serde_json::from_str(r#"{"type":"pull_lead","target":"window"}"#).unwrap();
    assert_eq!(pull, Action::PullLead("window".to_string()));
    let enter: Action = serde_json::from_str(r#"{"type":"enter_case"}"#).unwrap();
    assert_eq!(enter, Action::EnterCase);
}

#[test]
fn case_index_comes_from_the_library() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    let ids: Vec<String> = session
        .case_index()
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, ["alpha", "beta"]);
}
