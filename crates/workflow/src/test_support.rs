use crate::FormErrors;
use pitchside_client::testing::{RecordingNavigator, RecordingSink, ScriptedTransport};
use pitchside_client::{ApiClient, Session};
use pitchside_config::SessionConfig;
use pitchside_store::InMemoryCredentialStore;
use std::sync::Arc;

pub(crate) struct Harness {
    pub client: Arc<ApiClient>,
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<InMemoryCredentialStore>,
    pub nav: Arc<RecordingNavigator>,
    pub sink: Arc<RecordingSink>,
    pub form: FormErrors,
}

impl Harness {
    pub fn new(transport: ScriptedTransport) -> Self {
        let transport = Arc::new(transport);
        let store = Arc::new(InMemoryCredentialStore::new());
        let nav = Arc::new(RecordingNavigator::default());
        let session = Arc::new(Session::new(
            store.clone(),
            nav.clone(),
            &SessionConfig::default(),
        ));
        Self {
            client: Arc::new(ApiClient::new(transport.clone(), session)),
            transport,
            store,
            nav,
            sink: Arc::new(RecordingSink::default()),
            form: FormErrors::new(),
        }
    }
}
