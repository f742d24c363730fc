use url::Url;

use crate::error::{ClientError, Result};

/// Parses the configured server origin, accepting bare `host:port` as http.
pub fn parse_origin(server: &str) -> Result<Url> {
  let server = server.trim();
  let url = if server.contains("://") {
    Url::parse(server)?
  } else {
    Url::parse(&format!("http://{server}"))?
  };
  match url.scheme() {
    "http" | "https" => Ok(url),
    other => Err(ClientError::UnsupportedScheme(other.to_string())),
  }
}

/// The duplex listing channel lives at `/files` on the same host, using the
/// secure scheme when the origin is secure.
pub fn listing_endpoint(origin: &Url) -> Result<Url> {
  let mut url = origin.join("/files")?;
  let scheme = match origin.scheme() {
    "https" => "wss",
    "http" => "ws",
    other => return Err(ClientError::UnsupportedScheme(other.to_string())),
  };
  url
    .set_scheme(scheme)
    .map_err(|()| ClientError::UnsupportedScheme(scheme.to_string()))?;
  url.set_query(None);
  url.set_fragment(None);
  Ok(url)
}

pub fn manage_url(origin: &Url, action: &str, srcs: &[String], dest: Option<&str>) -> Result<Url> {
  let mut url = origin.join("/manage")?;
  {
    let mut query = url.query_pairs_mut();
    query.clear();
    query.append_pair("action", action);
    if let Some(dest) = dest {
      query.append_pair("dest", dest);
    }
    for src in srcs {
      query.append_pair("srcs", src);
    }
  }
  Ok(url)
}

pub fn rename_url(origin: &Url) -> Result<Url> {
  Ok(origin.join("/rename")?)
}

pub fn zip_url(origin: &Url, path: &str) -> Result<Url> {
  path_query(origin, "/zip", path)
}

pub fn file_url(origin: &Url, path: &str) -> Result<Url> {
  path_query(origin, "/file", path)
}

fn path_query(origin: &Url, endpoint: &str, path: &str) -> Result<Url> {
  let mut url = origin.join(endpoint)?;
  url.query_pairs_mut().clear().append_pair("path", path);
  Ok(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn origin(s: &str) -> Url {
    parse_origin(s).unwrap()
  }

  #[test]
  fn test_parse_origin_bare_host() {
    assert_eq!(origin("localhost:3000").as_str(), "http://localhost:3000/");
  }

  #[test]
  fn test_parse_origin_rejects_other_schemes() {
    assert!(matches!(
      parse_origin("ftp://example.com"),
      Err(ClientError::UnsupportedScheme(_))
    ));
  }

  #[test]
  fn test_listing_endpoint_plain() {
    let url = listing_endpoint(&origin("http://localhost:3000/some/page?x=1")).unwrap();
    assert_eq!(url.as_str(), "ws://localhost:3000/files");
  }

  #[test]
  fn test_listing_endpoint_secure() {
    let url = listing_endpoint(&origin("https://files.example.com")).unwrap();
    assert_eq!(url.as_str(), "wss://files.example.com/files");
  }

  #[test]
  fn test_manage_url_multi_valued_srcs() {
    let srcs = vec!["/a b".to_string(), "/c&d".to_string()];
    let url = manage_url(&origin("http://h:1"), "paste", &srcs, Some("/dest")).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
      pairs,
      vec![
        ("action".to_string(), "paste".to_string()),
        ("dest".to_string(), "/dest".to_string()),
        ("srcs".to_string(), "/a b".to_string()),
        ("srcs".to_string(), "/c&d".to_string()),
      ]
    );
    assert_eq!(url.path(), "/manage");
  }

  #[test]
  fn test_manage_url_without_dest() {
    let url = manage_url(&origin("http://h:1"), "delete", &["/x".to_string()], None).unwrap();
    assert_eq!(url.query(), Some("action=delete&srcs=%2Fx"));
  }

  #[test]
  fn test_download_urls() {
    let o = origin("http://h:1");
    assert_eq!(zip_url(&o, "/dir").unwrap().as_str(), "http://h:1/zip?path=%2Fdir");
    assert_eq!(file_url(&o, "/f.txt").unwrap().as_str(), "http://h:1/file?path=%2Ff.txt");
    assert_eq!(rename_url(&o).unwrap().as_str(), "http://h:1/rename");
  }
}
