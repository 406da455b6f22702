use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("tablemate.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("tablemate.client.request_errors");
pub(crate) static CLIENT_RETRIES: Counter = Counter::new("tablemate.client.retries");
pub(crate) static CLIENT_REFRESHES: Counter = Counter::new("tablemate.client.refreshes");
pub(crate) static CLIENT_REFRESH_FAILURES: Counter =
    Counter::new("tablemate.client.refresh_failures");

pub(crate) static CHAT_CONNECTS: Counter = Counter::new("tablemate.chat.connects");
pub(crate) static CHAT_CONNECT_FAILURES: Counter = Counter::new("tablemate.chat.connect_failures");
pub(crate) static CHAT_MESSAGES_IN: Counter = Counter::new("tablemate.chat.messages_in");
pub(crate) static CHAT_MESSAGES_OUT: Counter = Counter::new("tablemate.chat.messages_out");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_RETRIES);
    collector.register_counter(&CLIENT_REFRESHES);
    collector.register_counter(&CLIENT_REFRESH_FAILURES);

    collector.register_counter(&CHAT_CONNECTS);
    collector.register_counter(&CHAT_CONNECT_FAILURES);
    collector.register_counter(&CHAT_MESSAGES_IN);
    collector.register_counter(&CHAT_MESSAGES_OUT);
}
