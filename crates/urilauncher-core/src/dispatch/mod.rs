//! URI dispatch.
//!
//! A URI either matches an entry of the `ActionMap` exactly and its action is
//! started, or it does not and the user gets an alert naming the URI.
//! Neither case is a process failure.

mod action;
mod launcher;
mod notifier;

pub use action::*;
pub use launcher::*;
pub use notifier::*;

use tracing::{debug, info, warn};

use crate::error::Error;

/// Caption used for dispatch alerts.
pub const ALERT_TITLE: &str = "andrejlauncher";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Launched(Action),
    LaunchFailed(Action),
    Unmatched,
}

pub struct Dispatcher<L: Launcher, N: Notifier> {
    actions: ActionMap,
    launcher: L,
    notifier: N,
}

impl<L: Launcher, N: Notifier> Dispatcher<L, N> {
    pub fn new(actions: ActionMap, launcher: L, notifier: N) -> Self {
        Self {
            actions,
            launcher,
            notifier,
        }
    }

    pub fn dispatch(&self, uri: &str) -> DispatchOutcome {
        let Some(mapped) = self.actions.get(uri) else {
            warn!("No action mapped for {uri:?}");
            debug!("Known URIs: {:?}", self.actions.uris());
            let err = Error::UnmatchedUri(uri.to_string());
            self.notifier.alert(ALERT_TITLE, &err.to_string());
            return DispatchOutcome::Unmatched;
        };

        info!("{uri} -> {} ({})", mapped.name, mapped.action);
        match self.launcher.launch(&mapped.action) {
            Ok(()) => DispatchOutcome::Launched(mapped.action.clone()),
            Err(e) => {
                warn!("{e}");
                self.notifier.alert(ALERT_TITLE, &e.to_string());
                DispatchOutcome::LaunchFailed(mapped.action.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Scheme, builtin_actions};
    use crate::error::Result;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingLauncher {
        launched: RefCell<Vec<Action>>,
        fail: bool,
    }

    impl Launcher for &RecordingLauncher {
        fn launch(&self, action: &Action) -> Result<()> {
            if self.fail {
                return Err(Error::LaunchFailed {
                    target: action.target(),
                    message: "not found".to_string(),
                });
            }
            self.launched.borrow_mut().push(action.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: RefCell<Vec<String>>,
    }

    impl Notifier for &RecordingNotifier {
        fn alert(&self, _title: &str, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
    }

    fn builtin_map() -> ActionMap {
        ActionMap::from_entries(&builtin_actions(&Scheme::default())).unwrap()
    }

    #[test]
    fn test_dispatch_calculator() {
        let launcher = RecordingLauncher::default();
        let notifier = RecordingNotifier::default();
        let dispatcher = Dispatcher::new(builtin_map(), &launcher, &notifier);

        let outcome = dispatcher.dispatch("andrejlauncher://calculator/");

        let calc = Action::Launch(PathBuf::from("calc.exe"));
        assert_eq!(outcome, DispatchOutcome::Launched(calc.clone()));
        assert_eq!(*launcher.launched.borrow(), vec![calc]);
        assert!(notifier.alerts.borrow().is_empty());
    }

    #[test]
    fn test_dispatch_dashboard_links() {
        let launcher = RecordingLauncher::default();
        let notifier = RecordingNotifier::default();
        let dispatcher = Dispatcher::new(builtin_map(), &launcher, &notifier);

        for uri in [
            "andrejlauncher://calculator",
            "andrejlauncher://explorer",
            "andrejlauncher://terminal",
        ] {
            assert!(matches!(
                dispatcher.dispatch(uri),
                DispatchOutcome::Launched(_)
            ));
        }

        assert_eq!(
            *launcher.launched.borrow(),
            vec![
                Action::Launch(PathBuf::from("calc.exe")),
                Action::Launch(PathBuf::from("explorer.exe")),
                Action::Launch(PathBuf::from("wt.exe")),
            ]
        );
        assert!(notifier.alerts.borrow().is_empty());
    }

    #[test]
    fn test_dispatch_unmatched_alerts_once() {
        let uris = [
            "andrejlauncher://unknown/",
            "andrejlauncher://",
            "",
            "andrejlauncher://Calculator/",
        ];
        for uri in uris {
            let launcher = RecordingLauncher::default();
            let notifier = RecordingNotifier::default();
            let dispatcher = Dispatcher::new(builtin_map(), &launcher, &notifier);

            assert_eq!(dispatcher.dispatch(uri), DispatchOutcome::Unmatched);
            assert!(launcher.launched.borrow().is_empty());
            let alerts = notifier.alerts.borrow();
            assert_eq!(alerts.len(), 1);
            assert!(alerts[0].contains(uri));
        }
    }

    #[test]
    fn test_dispatch_launch_failure_alerts() {
        let launcher = RecordingLauncher {
            fail: true,
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();
        let dispatcher = Dispatcher::new(builtin_map(), &launcher, &notifier);

        let outcome = dispatcher.dispatch("andrejlauncher://terminal/");
        assert_eq!(
            outcome,
            DispatchOutcome::LaunchFailed(Action::Launch(PathBuf::from("wt.exe")))
        );
        assert_eq!(notifier.alerts.borrow().len(), 1);
        assert!(notifier.alerts.borrow()[0].contains("wt.exe"));
    }
}
