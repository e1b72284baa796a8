use anyhow::{Error, format_err};
use google_calendar3::{CalendarHub, api::Scope};
pub use google_calendar3::api::{Event, EventDateTime};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use log::debug;
use std::path::Path;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey, read_service_account_key};

type GCConnector = HttpsConnector<HttpConnector>;
type GCCalendar = CalendarHub<GCConnector>;

pub struct GCalendarInstance {
    gcal: GCCalendar,
}

impl GCalendarInstance {
    /// Build a calendar hub authenticated as the service account described
    /// by `gcal_secret_file`.
    ///
    /// # Errors
    /// Returns error if the key file can't be read or parsed, or if the
    /// authenticator can't be built from it
    pub async fn new(gcal_secret_file: &Path) -> Result<Self, Error> {
        let secret = load_service_account_key(gcal_secret_file).await?;
        Self::from_service_account_key(secret).await
    }

    /// # Errors
    /// Returns error if the private key is invalid or no TLS roots are found
    pub async fn from_service_account_key(secret: ServiceAccountKey) -> Result<Self, Error> {
        debug!("service account {}", secret.client_email);
        let auth = ServiceAccountAuthenticator::builder(secret)
            .build()
            .await
            .map_err(|e| format_err!("Unable to build authenticator: {e}"))?;
        let connector: GCConnector = HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self {
            gcal: CalendarHub::new(client, auth),
        })
    }

    /// # Errors
    /// Returns the transport or API error unchanged
    pub async fn insert_gcal_event(&self, gcal_id: &str, gcal_event: Event) -> Result<Event, Error> {
        let (_, result) = self
            .gcal
            .events()
            .insert(gcal_event, gcal_id)
            .add_scope(Scope::Event)
            .doit()
            .await
            .map_err(|e| format_err!("{:#?}", e))?;
        Ok(result)
    }
}

/// # Errors
/// Returns error if the file is missing or isn't a service account key
pub async fn load_service_account_key(gcal_secret_file: &Path) -> Result<ServiceAccountKey, Error> {
    read_service_account_key(gcal_secret_file).await.map_err(|e| {
        format_err!(
            "Unable to read service account file {}: {e}",
            gcal_secret_file.display()
        )
    })
}
