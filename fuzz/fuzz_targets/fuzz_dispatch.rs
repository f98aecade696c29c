#![no_main]

use libfuzzer_sys::fuzz_target;
use casefile::case::BuiltinLibrary;
use casefile::observability::EventEmitter;
use casefile::persistence::MemorySaveStore;
use casefile::session::{Action, Session};

// Each input line is one JSON-encoded action, e.g.
// {"type":"pull_lead","target":"cctv"}
fuzz_target!(|data: &[u8]| {
    let Ok(script) = std::str::from_utf8(data) else {
        return;
    };

    let mut session = Session::new(
        Box::new(BuiltinLibrary::default()),
        Box::new(MemorySaveStore::default()),
        EventEmitter::noop(),
    );
    let _ = session.dispatch(Action::OpenCase("night-shift".to_string()));

    for line in script.lines().take(256) {
        if let Ok(action) = serde_json::from_str::<Action>(line) {
            let _ = session.dispatch(action);
            session.tick();
        }

        let state = session.state();
        assert!(state.pulls_used() <= state.pulls_max());
        assert!((0..=99).contains(&state.threat()));
    }
});
