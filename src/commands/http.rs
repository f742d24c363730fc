use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::commands::{ApiResponse, ManageAction, ManageApi};
use crate::error::{ClientError, Result};
use crate::net::endpoint;

pub struct HttpManageApi {
  client: reqwest::Client,
  origin: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenameRequest<'a> {
  path: &'a str,
  new_name: &'a str,
}

impl HttpManageApi {
  pub fn new(origin: Url, timeout: Duration) -> Result<Self> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, origin })
  }

  // Failures come back as 4xx with a JSON body or a plain-text message, so
  // the body is read regardless of the status code.
  async fn read_response(response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<ApiResponse>(&body) {
      Ok(parsed) => Ok(parsed),
      Err(_) => {
        let body = body.trim();
        let message = if body.is_empty() {
          format!("server returned {status}")
        } else {
          body.to_string()
        };
        Err(ClientError::Server(message))
      }
    }
  }
}

impl ManageApi for HttpManageApi {
  async fn rename(&self, path: &str, new_name: &str) -> Result<ApiResponse> {
    let url = endpoint::rename_url(&self.origin)?;
    tracing::debug!(%url, path, new_name, "rename");
    let response = self.client.post(url).json(&RenameRequest { path, new_name }).send().await?;
    Self::read_response(response).await
  }

  async fn manage(&self, action: ManageAction, srcs: &[String], dest: Option<&str>) -> Result<ApiResponse> {
    let url = endpoint::manage_url(&self.origin, action.as_str(), srcs, dest)?;
    tracing::debug!(%url, "manage");
    let response = self.client.get(url).send().await?;
    Self::read_response(response).await
  }
}
