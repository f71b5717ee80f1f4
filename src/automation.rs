use std::rc::Rc;
use std::time::Duration;

use crate::uitree::{find_descendant, Desktop, NodeAction, UiNode};

/// Scheduled ticks before a lookup is abandoned.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Interval between scheduled ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Identifies the foreign browser surface a lookup drives.
#[derive(Debug, Clone)]
pub struct LookupTarget {
    /// Title of the browser window.
    pub window_title: String,
    /// Identifier of the address/search field.
    pub address_field_id: String,
    /// Identifier of the suggestion results container.
    pub results_container_id: String,
    /// The lookup page URL; the percent-encoded query is appended.
    pub url_prefix: String,
    pub max_retries: u32,
}

/// Outcome of one scheduled tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still working; schedule another tick after the poll interval.
    Reschedule,
    /// The lookup ran to completion.
    Finished,
    /// The retry budget ran out; carries the name of the stuck state.
    GaveUp(&'static str),
}

enum LookupState {
    LocateWindow,
    LocateInputField {
        root: Rc<dyn UiNode>,
    },
    SetFieldText {
        root: Rc<dyn UiNode>,
        field: Rc<dyn UiNode>,
    },
    LocateResultItem {
        root: Rc<dyn UiNode>,
        url: String,
    },
    Delay {
        remaining: u32,
        next: Option<Box<LookupState>>,
    },
}

enum Step {
    /// The state could not make progress; try again on a later tick.
    Retry,
    /// Transition to the given state, or terminate on `None`.
    Next(Option<LookupState>),
}

impl LookupState {
    fn name(&self) -> &'static str {
        match self {
            LookupState::LocateWindow => "LocateWindow",
            LookupState::LocateInputField { .. } => "LocateInputField",
            LookupState::SetFieldText { .. } => "SetFieldText",
            LookupState::LocateResultItem { .. } => "LocateResultItem",
            LookupState::Delay { .. } => "Delay",
        }
    }

    fn advance(
        &mut self,
        desktop: &dyn Desktop,
        target: &LookupTarget,
        query: &str,
    ) -> anyhow::Result<Step> {
        match self {
            LookupState::LocateWindow => {
                tracing::debug!("locating '{}'", target.window_title);
                // Query the root before the title: on some devices the title
                // is reported stale until the root has been touched.
                let root = desktop
                    .windows()
                    .into_iter()
                    .find(|window| window.root().is_some() && window.title() == target.window_title)
                    .and_then(|window| window.root());
                match root {
                    Some(root) => Ok(Step::Next(Some(LookupState::LocateInputField { root }))),
                    None => Ok(Step::Retry),
                }
            }
            LookupState::LocateInputField { root } => {
                tracing::debug!("locating address field");
                let Some(field) = root.find_by_identifier(&target.address_field_id) else {
                    return Ok(Step::Retry);
                };
                field.perform_action(NodeAction::Focus)?;
                // Focus needs a frame to settle before text injection works.
                Ok(Step::Next(Some(LookupState::Delay {
                    remaining: 1,
                    next: Some(Box::new(LookupState::SetFieldText {
                        root: Rc::clone(root),
                        field,
                    })),
                })))
            }
            LookupState::SetFieldText { root, field } => {
                let url = format!("{}{}", target.url_prefix, urlencoding::encode(query));
                tracing::debug!("injecting '{url}'");
                field.perform_action(NodeAction::SetText(url.clone()))?;
                Ok(Step::Next(Some(LookupState::LocateResultItem {
                    root: Rc::clone(root),
                    url,
                })))
            }
            LookupState::LocateResultItem { root, url } => {
                tracing::debug!("locating suggestion for '{url}'");
                let Some(container) = root.find_by_identifier(&target.results_container_id) else {
                    return Ok(Step::Retry);
                };
                let item = container.children_in_z_order().into_iter().find(|entry| {
                    find_descendant(entry, &|node: &dyn UiNode| {
                        node.text()
                            .is_some_and(|text| text.starts_with(&target.url_prefix))
                    })
                    .is_some()
                });
                let Some(item) = item else {
                    return Ok(Step::Retry);
                };
                item.perform_action(NodeAction::Click)?;
                Ok(Step::Next(Some(LookupState::Delay {
                    remaining: 1,
                    next: None,
                })))
            }
            LookupState::Delay { remaining, next } => {
                if *remaining > 0 {
                    *remaining -= 1;
                    Ok(Step::Retry)
                } else {
                    Ok(Step::Next(next.take().map(|boxed| *boxed)))
                }
            }
        }
    }
}

/// Looks up a piece of text in a foreign browser window by driving its UI:
/// find the window, focus the address field, inject the lookup URL, activate
/// the matching suggestion.
///
/// There is no cooperative protocol with the browser and no guaranteed
/// timing, so every step polls: a state that cannot make progress yet is
/// retried on the next tick, and the whole operation is abandoned once the
/// retry budget runs out. The caller owns the driving loop and is expected
/// to call [`tick`](Self::tick) immediately after construction, then once
/// per poll interval for as long as it returns [`TickOutcome::Reschedule`].
///
/// At most one instance should be alive at a time; starting a new lookup
/// supersedes any prior instance, which must be closed first.
pub struct LookupAutomation {
    query: String,
    target: LookupTarget,
    state: Option<LookupState>,
    tries: u32,
}

impl LookupAutomation {
    /// Starts a lookup for `query`. The on-screen keyboard is suppressed
    /// until the automation is closed so it cannot cover the screen during
    /// injection.
    pub fn new(desktop: &dyn Desktop, target: LookupTarget, query: impl Into<String>) -> Self {
        desktop.set_soft_keyboard_suppressed(true);
        Self {
            query: query.into(),
            target,
            state: Some(LookupState::LocateWindow),
            tries: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_some()
    }

    /// Runs one scheduled advance.
    ///
    /// Transitions that resolve without waiting on the foreign UI (an
    /// expired delay, the unconditional text injection) are churned through
    /// eagerly within the call; a state that returns itself ends the tick.
    /// One retry is consumed per tick, not per churn step. Errors from the
    /// foreign UI cost a retry instead of propagating.
    pub fn tick(&mut self, desktop: &dyn Desktop) -> TickOutcome {
        while let Some(state) = self.state.as_mut() {
            match state.advance(desktop, &self.target, &self.query) {
                Ok(Step::Retry) => break,
                Ok(Step::Next(next)) => self.state = next,
                Err(err) => {
                    tracing::warn!("error in {}, will retry: {err:#}", state.name());
                    break;
                }
            }
        }
        self.tries += 1;

        match &self.state {
            None => TickOutcome::Finished,
            Some(state) if self.tries >= self.target.max_retries => {
                let name = state.name();
                tracing::info!("giving up in {name} after {} tries", self.tries);
                self.state = None;
                TickOutcome::GaveUp(name)
            }
            Some(_) => TickOutcome::Reschedule,
        }
    }

    /// Terminates the lookup and restores the keyboard. Irreversible: a
    /// closed instance cannot be resumed.
    pub fn close(&mut self, desktop: &dyn Desktop) {
        self.state = None;
        desktop.set_soft_keyboard_suppressed(false);
    }
}
