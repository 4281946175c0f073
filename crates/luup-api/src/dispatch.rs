// Request dispatch
//
// Owns the HTTP client, the base endpoint and the default parameters taken
// from the endpoint's query string. The connector and every facade share one
// dispatcher through an `Arc` and funnel into `send`, which performs exactly
// one GET and hands back the body untouched.

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::params::{ParamName, Params};

#[derive(Debug)]
pub(crate) struct Dispatcher {
    http: reqwest::Client,
    base_url: Url,
    defaults: Params,
}

impl Dispatcher {
    /// Split `base_url` into the bare endpoint and its default parameters.
    pub(crate) fn new(http: reqwest::Client, mut base_url: Url) -> Self {
        let defaults = Params::from_url_query(&base_url).translated();
        base_url.set_query(None);
        base_url.set_fragment(None);
        Self {
            http,
            base_url,
            defaults,
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn defaults(&self) -> &Params {
        &self.defaults
    }

    /// Endpoint URL carrying `defaults` overlaid with `params`.
    ///
    /// `params` must already be translated.
    pub(crate) fn compose_url(&self, params: &Params) -> Url {
        let query = self.defaults.merged(params).to_query_string();
        let mut url = self.base_url.clone();
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        url
    }

    /// Send caller-built parameters; they must carry their own `id`.
    pub(crate) async fn request(&self, params: Params) -> Result<String, Error> {
        self.send(&params.translated()).await
    }

    pub(crate) async fn request_by_id(&self, id: &str, params: Params) -> Result<String, Error> {
        if id.trim().is_empty() {
            return Err(Error::MissingArgument {
                name: ParamName::Id.as_str(),
            });
        }

        let params = params.translated().with(ParamName::Id, id);
        self.send(&params).await
    }

    pub(crate) async fn request_by_id_and_action(
        &self,
        id: &str,
        action: &str,
        params: Params,
    ) -> Result<String, Error> {
        if id.trim().is_empty() {
            return Err(Error::MissingArgument {
                name: ParamName::Id.as_str(),
            });
        }
        if action.trim().is_empty() {
            return Err(Error::MissingArgument {
                name: ParamName::Action.as_str(),
            });
        }

        let params = params
            .translated()
            .with(ParamName::Action, action)
            .with(ParamName::Id, id);
        self.send(&params).await
    }

    async fn send(&self, params: &Params) -> Result<String, Error> {
        self.defaults.merged(params).require(ParamName::Id)?;

        let url = self.compose_url(params);
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(status = status.as_u16(), bytes = body.len(), "luup response");

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
