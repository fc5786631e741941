use reqwest::redirect::Policy;
use reqwest::Client;

const REDIRECT_HOP_LIMIT: usize = 5;

#[derive(Default)]
pub struct HttpClientConfig {
  pub egress_proxy: Option<String>,
  pub user: Option<String>,
  pub pass: Option<String>,
}

// Redirect policy is a client-level setting in reqwest, so both variants are
// built once at startup and selected per request.
pub struct ClientSet {
  manual: Client,
  follow: Client,
}

impl HttpClientConfig {
  pub fn build_client_set(&self) -> Result<ClientSet, reqwest::Error> {
    Ok(ClientSet {
      manual: self.build_client(Policy::none())?,
      follow: self.build_client(Policy::limited(REDIRECT_HOP_LIMIT))?,
    })
  }

  fn build_client(&self, redirect: Policy) -> Result<Client, reqwest::Error> {
    let mut client_builder = reqwest::ClientBuilder::new();

    if let Some(proxy_url) = &self.egress_proxy {
      let mut proxy = reqwest::Proxy::all(proxy_url)?;

      if let (Some(user_name), Some(password)) = (&self.user, &self.pass) {
        proxy = proxy.basic_auth(user_name, password);
      }

      client_builder = client_builder.proxy(proxy);
    }

    client_builder.redirect(redirect).build()
  }
}

impl ClientSet {
  pub fn select(&self, follow_redirect: bool) -> &Client {
    if follow_redirect {
      &self.follow
    } else {
      &self.manual
    }
  }
}
