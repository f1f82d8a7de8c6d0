#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_core::Request;
use serde_json::Value;
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult};
use crux_http::HttpError;
use shared::capabilities::{TimerOperation, TimerOutput};
use shared::{App, Effect, Event, Model};

pub type Tester = AppTester<App, Effect>;

#[derive(Default)]
pub struct Effects {
    pub fetches: Vec<Request<HttpRequest>>,
    pub timers: Vec<Request<TimerOperation>>,
    pub renders: usize,
}

pub fn split(effects: Vec<Effect>) -> Effects {
    let mut out = Effects::default();
    for effect in effects {
        match effect {
            Effect::Http(request) => out.fetches.push(request),
            Effect::Timer(request) => out.timers.push(request),
            Effect::Render(_) => out.renders += 1,
        }
    }
    out
}

pub fn send(app: &Tester, model: &mut Model, event: Event) -> Effects {
    split(app.update(event, model).effects)
}

pub fn url_of(request: &Request<HttpRequest>) -> &str {
    &request.operation.url
}

pub fn ok_json(body: &Value) -> HttpResult {
    HttpResult::Ok(HttpResponse::ok().body(body.to_string()).build())
}

pub fn status(code: u16) -> HttpResult {
    HttpResult::Ok(HttpResponse::status(code).build())
}

pub fn raw_body(code: u16, body: &str) -> HttpResult {
    HttpResult::Ok(HttpResponse::status(code).body(body).build())
}

pub fn connection_refused() -> HttpResult {
    HttpResult::Err(HttpError::Io("connection refused".to_string()))
}

/// Answer a request and feed the resulting events back into the app.
pub fn respond(
    app: &Tester,
    model: &mut Model,
    mut request: Request<HttpRequest>,
    result: HttpResult,
) -> Effects {
    let update = app.resolve(&mut request, result).expect("request resolves");
    feed(app, model, update.events)
}

pub fn respond_json(
    app: &Tester,
    model: &mut Model,
    request: Request<HttpRequest>,
    body: &Value,
) -> Effects {
    respond(app, model, request, ok_json(body))
}

pub fn elapse(app: &Tester, model: &mut Model, mut request: Request<TimerOperation>) -> Effects {
    let update = app
        .resolve(&mut request, TimerOutput::Elapsed)
        .expect("timer resolves");
    feed(app, model, update.events)
}

fn feed(app: &Tester, model: &mut Model, events: Vec<Event>) -> Effects {
    let mut out = Effects::default();
    for event in events {
        let next = send(app, model, event);
        out.fetches.extend(next.fetches);
        out.timers.extend(next.timers);
        out.renders += next.renders;
    }
    out
}

pub fn started(app: &Tester, model: &mut Model) -> Request<HttpRequest> {
    let mut effects = send(app, model, Event::AppStarted { config: None });
    assert_eq!(effects.fetches.len(), 1);
    effects.fetches.remove(0)
}
