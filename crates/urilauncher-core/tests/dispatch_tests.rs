//! Integration tests for config-driven dispatch.

use std::cell::RefCell;
use std::path::PathBuf;

use urilauncher_core::{
    Action, ActionMap, DispatchOutcome, Dispatcher, LauncherConfig, Launcher, Notifier, Result,
};

#[derive(Default)]
struct Recorder {
    launched: RefCell<Vec<Action>>,
    alerts: RefCell<Vec<String>>,
}

impl Launcher for &Recorder {
    fn launch(&self, action: &Action) -> Result<()> {
        self.launched.borrow_mut().push(action.clone());
        Ok(())
    }
}

impl Notifier for &Recorder {
    fn alert(&self, _title: &str, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

const CONFIG: &str = r#"
[[actions]]
uri = "andrejlauncher://notes/"
name = "Notes"
launch = "notepad.exe"

[[actions]]
uri = "andrejlauncher://linkedin/"
name = "LinkedIn"
open = "https://www.linkedin.com/"
"#;

#[test]
fn test_configured_actions_replace_builtins() {
    let config = LauncherConfig::parse(CONFIG).unwrap();
    let map = ActionMap::from_entries(&config.actions).unwrap();
    let recorder = Recorder::default();
    let dispatcher = Dispatcher::new(map, &recorder, &recorder);

    assert_eq!(
        dispatcher.dispatch("andrejlauncher://notes/"),
        DispatchOutcome::Launched(Action::Launch(PathBuf::from("notepad.exe")))
    );
    assert_eq!(
        dispatcher.dispatch("andrejlauncher://linkedin/"),
        DispatchOutcome::Launched(Action::Open("https://www.linkedin.com/".to_string()))
    );
    assert_eq!(
        dispatcher.dispatch("andrejlauncher://calculator/"),
        DispatchOutcome::Unmatched
    );

    assert_eq!(recorder.launched.borrow().len(), 2);
    assert_eq!(recorder.alerts.borrow().len(), 1);
    assert!(recorder.alerts.borrow()[0].contains("andrejlauncher://calculator/"));
}

#[test]
fn test_unknown_uri_alert_text() {
    let map = ActionMap::from_entries(&LauncherConfig::default().actions).unwrap();
    let recorder = Recorder::default();
    let dispatcher = Dispatcher::new(map, &recorder, &recorder);

    assert_eq!(
        dispatcher.dispatch("andrejlauncher://unknown/"),
        DispatchOutcome::Unmatched
    );
    assert_eq!(
        *recorder.alerts.borrow(),
        vec!["Unknown launcher URI: andrejlauncher://unknown/".to_string()]
    );
    assert!(recorder.launched.borrow().is_empty());
}

#[test]
fn test_builtins_follow_custom_scheme() {
    let config = LauncherConfig::parse(r#"scheme = "worklauncher""#).unwrap();
    let map = ActionMap::from_entries(&config.actions).unwrap();
    let recorder = Recorder::default();
    let dispatcher = Dispatcher::new(map, &recorder, &recorder);

    assert_eq!(
        dispatcher.dispatch("worklauncher://calculator"),
        DispatchOutcome::Launched(Action::Launch(PathBuf::from("calc.exe")))
    );
    assert_eq!(
        dispatcher.dispatch("andrejlauncher://calculator/"),
        DispatchOutcome::Unmatched
    );
}
