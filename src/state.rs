use crate::config::Config;
use crate::github::GithubClient;
use crate::store::HistoryStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: HistoryStore,
    pub github: GithubClient,
}

impl AppState {
    /// Open the history database and build the upstream client.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store = HistoryStore::connect(
            &config.database_url,
            config.max_db_connections,
            config.history_limit,
        )
        .await?;
        let github = GithubClient::new(&config.github)?;

        Ok(Self { store, github })
    }
}
