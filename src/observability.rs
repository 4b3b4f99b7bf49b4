use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("agentchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("agentchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("agentchat.client.request_duration_seconds");
pub(crate) static CLIENT_PINGS: Counter = Counter::new("agentchat.client.pings");

pub(crate) static SESSION_TURNS: Counter = Counter::new("agentchat.session.turns");
pub(crate) static SESSION_TURN_FAILURES: Counter =
    Counter::new("agentchat.session.turn_failures");
pub(crate) static SESSION_IGNORED_SUBMITS: Counter =
    Counter::new("agentchat.session.ignored_submits");
pub(crate) static SESSION_TURN_DURATION: Moments =
    Moments::new("agentchat.session.turn_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
    collector.register_counter(&CLIENT_PINGS);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_TURN_FAILURES);
    collector.register_counter(&SESSION_IGNORED_SUBMITS);
    collector.register_moments(&SESSION_TURN_DURATION);
}
