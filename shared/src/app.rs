use tracing::{debug, info, warn};

use crate::action::{dispatch, Action, Resource};
use crate::capabilities::{get_json, Capabilities, FetchError, FetchOutcome};
use crate::epoch::Epoch;
use crate::event::Event;
use crate::model::{Model, PendingComparison, UserId};
use crate::retry::RetryDecision;
use crate::selectors::{can_compare_selection, selected_events_in_order};
use crate::store::reduce;
use crate::view::{self, ViewModel};

#[derive(Default)]
pub struct App;

impl App {
    fn apply(model: &mut Model, action: Action) {
        debug!(action = action.name(), "reducing");
        let state = std::mem::take(&mut model.ui);
        model.ui = reduce(state, action);
    }

    /// Issue a GET for `resource`, or fail it right away if the URL could not be built.
    fn request<F>(
        model: &mut Model,
        caps: &Capabilities,
        resource: Resource,
        epoch: Epoch,
        url: Result<String, FetchError>,
        make_event: F,
    ) where
        F: FnOnce(FetchOutcome) -> Event + Send + 'static,
    {
        match url {
            Ok(url) => {
                let request_id = get_json(&caps.http, &url, make_event);
                debug!(%resource, %epoch, %request_id, %url, "fetch requested");
            }
            Err(error) => {
                warn!(%resource, %error, "cannot build request");
                Self::apply(model, dispatch(resource, Err(error)));
            }
        }
    }

    fn is_current(model: &Model, resource: Resource, epoch: Epoch) -> bool {
        let current = model.epochs.current(resource);
        if current != epoch {
            debug!(%resource, %epoch, %current, "dropping stale response");
            return false;
        }
        true
    }

    fn log_outcome(resource: Resource, epoch: Epoch, outcome: &FetchOutcome) {
        match outcome {
            Ok(_) => debug!(%resource, %epoch, "fetch succeeded"),
            Err(error) => warn!(%resource, %epoch, %error, status = ?error.status(), "fetch failed"),
        }
    }

    fn request_user_ids(model: &mut Model, caps: &Capabilities) {
        let epoch = model.epochs.advance(Resource::UserIds);
        model.user_ids_retries_remaining = model.config.user_ids_retry.max_retries;
        Self::fetch_user_ids(model, caps, epoch);
    }

    fn fetch_user_ids(model: &mut Model, caps: &Capabilities, epoch: Epoch) {
        let url = model.config.api().and_then(|api| api.user_ids());
        Self::request(model, caps, Resource::UserIds, epoch, url, move |outcome| {
            Event::UserIdsFetched {
                epoch,
                outcome: Box::new(outcome),
            }
        });
    }

    fn user_ids_fetched(model: &mut Model, caps: &Capabilities, epoch: Epoch, outcome: FetchOutcome) {
        Self::log_outcome(Resource::UserIds, epoch, &outcome);

        if let Err(error) = &outcome {
            let policy = model.config.user_ids_retry;
            match policy.decide(error, model.user_ids_retries_remaining) {
                RetryDecision::RetryAfter(delay) => {
                    model.user_ids_retries_remaining =
                        model.user_ids_retries_remaining.saturating_sub(1);
                    info!(
                        retries_remaining = model.user_ids_retries_remaining,
                        delay_ms = policy.delay_ms,
                        "retrying user ids"
                    );
                    caps.timer.after(delay, move |output| Event::UserIdsRetryElapsed {
                        epoch,
                        output,
                    });
                    return;
                }
                RetryDecision::GiveUp => {
                    warn!(%error, "giving up on user ids");
                }
            }
        }

        Self::apply(model, dispatch(Resource::UserIds, outcome));
        caps.render.render();
    }

    /// Called when a new user or address supersedes the events being compared:
    /// their details can no longer arrive, so an open modal would never resolve.
    fn abandon_comparison(model: &mut Model) {
        model.pending_comparison = None;
        if model.ui.comparing_events {
            debug!("closing comparison of superseded events");
            Self::apply(model, Action::ComparisonClosed);
        }
    }

    fn select_user(model: &mut Model, caps: &Capabilities, user_id: Option<UserId>) {
        let epoch = model.epochs.advance(Resource::Addresses);
        Self::abandon_comparison(model);

        let Some(user_id) = user_id else {
            Self::apply(model, Action::UserSelectionCleared);
            return;
        };

        Self::apply(model, Action::SelectedUserIdChanged(user_id.clone()));
        let url = model.config.api().and_then(|api| api.user_addresses(&user_id));
        Self::request(model, caps, Resource::Addresses, epoch, url, move |outcome| {
            Event::AddressesFetched {
                epoch,
                outcome: Box::new(outcome),
            }
        });
    }

    fn compare(model: &mut Model, caps: &Capabilities) {
        if !can_compare_selection(&model.ui.selected_events) {
            debug!(
                selected = model.ui.selected_events.len(),
                "comparison needs exactly two events"
            );
            return;
        }

        Self::apply(model, Action::ComparisonRequested);
        let epoch = model.epochs.advance(Resource::EventDetails);

        let urls: Result<Vec<String>, FetchError> = model.config.api().and_then(|api| {
            selected_events_in_order(&model.ui)
                .into_iter()
                .map(|event| api.event_details(event))
                .collect()
        });

        let urls = match urls {
            Ok(urls) => urls,
            Err(error) => {
                Self::fail_comparison(model, error);
                return;
            }
        };

        model.pending_comparison = Some(PendingComparison::new(epoch));
        for (slot, url) in urls.into_iter().enumerate() {
            Self::request(model, caps, Resource::EventDetails, epoch, Ok(url), move |outcome| {
                Event::EventDetailFetched {
                    epoch,
                    slot,
                    outcome: Box::new(outcome),
                }
            });
        }
    }

    fn event_detail_fetched(model: &mut Model, epoch: Epoch, slot: usize, outcome: FetchOutcome) {
        Self::log_outcome(Resource::EventDetails, epoch, &outcome);

        let value = match outcome {
            Ok(value) => value,
            Err(error) => {
                Self::fail_comparison(model, error);
                return;
            }
        };

        let Some(pending) = model
            .pending_comparison
            .as_mut()
            .filter(|pending| pending.epoch == epoch)
        else {
            debug!(%epoch, slot, "no comparison waiting for details");
            return;
        };

        if let Some(details) = pending.fill(slot, value) {
            model.pending_comparison = None;
            Self::apply(model, dispatch(Resource::EventDetails, Ok(details)));
        }
    }

    /// The first failed detail fails the whole comparison; the sibling
    /// request is invalidated so its late answer is dropped.
    fn fail_comparison(model: &mut Model, error: FetchError) {
        model.epochs.advance(Resource::EventDetails);
        model.pending_comparison = None;
        Self::apply(model, dispatch(Resource::EventDetails, Err(error)));
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        if event.is_user_initiated() {
            info!(event = event_name, "user action");
        } else {
            debug!(event = event_name, "update");
        }

        match event {
            Event::AppStarted { config } => {
                if let Some(config) = config {
                    match config.validate() {
                        Ok(()) => model.config = *config,
                        Err(error) => warn!(%error, "ignoring invalid config"),
                    }
                }
                info!(api_base_url = %model.config.api_base_url, "app started");

                Self::request_user_ids(model, caps);
                caps.render.render();
            }

            Event::UserIdsRefreshRequested => {
                Self::request_user_ids(model, caps);
            }

            Event::UserIdsFetched { epoch, outcome } => {
                if Self::is_current(model, Resource::UserIds, epoch) {
                    Self::user_ids_fetched(model, caps, epoch, *outcome);
                }
            }

            Event::UserIdsRetryElapsed { epoch, output: _ } => {
                if Self::is_current(model, Resource::UserIds, epoch) {
                    Self::fetch_user_ids(model, caps, epoch);
                    caps.render.render();
                }
            }

            Event::UserSelected { user_id } => {
                Self::select_user(model, caps, user_id);
                caps.render.render();
            }

            Event::AddressesFetched { epoch, outcome } => {
                if Self::is_current(model, Resource::Addresses, epoch) {
                    Self::log_outcome(Resource::Addresses, epoch, &outcome);
                    Self::apply(model, dispatch(Resource::Addresses, *outcome));
                    caps.render.render();
                }
            }

            Event::AddressClicked { address_id } => {
                let epoch = model.epochs.advance(Resource::Events);
                Self::abandon_comparison(model);

                Self::apply(model, Action::AddressSelected(address_id.clone()));
                let url = model
                    .config
                    .api()
                    .and_then(|api| api.address_events(&address_id));
                Self::request(model, caps, Resource::Events, epoch, url, move |outcome| {
                    Event::EventsFetched {
                        epoch,
                        outcome: Box::new(outcome),
                    }
                });
                caps.render.render();
            }

            Event::EventsFetched { epoch, outcome } => {
                if Self::is_current(model, Resource::Events, epoch) {
                    Self::log_outcome(Resource::Events, epoch, &outcome);
                    Self::apply(model, dispatch(Resource::Events, *outcome));
                    caps.render.render();
                }
            }

            Event::EventToggled { identifier } => {
                Self::apply(model, Action::EventSelectionToggled(identifier));
                caps.render.render();
            }

            Event::CompareClicked => {
                Self::compare(model, caps);
                caps.render.render();
            }

            Event::EventDetailFetched {
                epoch,
                slot,
                outcome,
            } => {
                if Self::is_current(model, Resource::EventDetails, epoch) {
                    Self::event_detail_fetched(model, epoch, slot, *outcome);
                    caps.render.render();
                }
            }

            Event::ComparisonDismissed => {
                model.epochs.advance(Resource::EventDetails);
                model.pending_comparison = None;
                Self::apply(model, Action::ComparisonClosed);
                caps.render.render();
            }

            Event::ErrorDismissed => {
                Self::apply(model, Action::ErrorDismissed);
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(&model.ui)
    }
}
