use std::time::Duration;

use url::Url;

use crate::{
    api::{ErrorReply, ParseRequest, ParserResponse, RequestShape},
    config::ViewerConfig,
    Result, ViewError,
};

/// Raw answer of the producer: HTTP status and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReply {
    pub status: u16,
    pub body: String,
}

impl ProducerReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Whatever actually carries `POST <url>` with a JSON body to the producer.
/// Implementations should give up after `timeout`; an `Err` is reported as
/// a transport failure.
pub trait ParseBackend {
    fn post(&self, url: &Url, body: &str, timeout: Duration) -> std::result::Result<ProducerReply, String>;
}

impl<F> ParseBackend for F
where
    F: Fn(&Url, &str, Duration) -> std::result::Result<ProducerReply, String>,
{
    fn post(&self, url: &Url, body: &str, timeout: Duration) -> std::result::Result<ProducerReply, String> {
        self(url, body, timeout)
    }
}

/// Map a producer reply to a response or to the error shown to the user.
pub fn decode_reply(reply: &ProducerReply) -> Result<ParserResponse> {
    if !reply.is_success() {
        let detail = serde_json::from_str::<ErrorReply>(&reply.body)
            .ok()
            .and_then(|r| r.message())
            .unwrap_or_else(|| "Failed to parse input".to_string());
        return Err(ViewError::ProducerError {
            status: reply.status,
            detail,
        });
    }
    serde_json::from_str(&reply.body).map_err(|e| ViewError::MalformedResponse(e.to_string()))
}

pub struct ParseClient<B> {
    backend: B,
    url: Url,
    timeout: Duration,
    shape: RequestShape,
}

impl<B: ParseBackend> ParseClient<B> {
    pub fn new(backend: B, config: &ViewerConfig) -> anyhow::Result<Self> {
        Ok(ParseClient {
            backend,
            url: config.parse_url()?,
            timeout: config.timeout(),
            shape: config.request_shape,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// One request, no retries.
    pub fn parse(&self, request: &ParseRequest) -> Result<ParserResponse> {
        let body = request.to_json(self.shape);
        let t0 = instant::Instant::now();
        let reply = self
            .backend
            .post(&self.url, &body, self.timeout)
            .map_err(ViewError::TransportFailure)?;
        let elapsed = t0.elapsed();
        if elapsed > self.timeout {
            return Err(ViewError::TransportFailure(format!(
                "no answer within {}ms",
                self.timeout.as_millis()
            )));
        }
        decode_reply(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::default_grammar;

    fn request() -> ParseRequest {
        ParseRequest {
            grammar: default_grammar(),
            input_string: "a a b".to_string(),
        }
    }

    #[test]
    fn test_producer_error_detail() {
        let reply = ProducerReply {
            status: 400,
            body: r#"{"detail": "Parsing error at symbol c"}"#.to_string(),
        };
        let err = decode_reply(&reply).unwrap_err();
        assert_eq!(err.to_string(), "Parsing error at symbol c");

        let reply = ProducerReply {
            status: 500,
            body: "<html>oops</html>".to_string(),
        };
        assert_eq!(
            decode_reply(&reply).unwrap_err(),
            ViewError::ProducerError {
                status: 500,
                detail: "Failed to parse input".to_string()
            }
        );

        let reply = ProducerReply {
            status: 200,
            body: r#"{"lr1_sets": []}"#.to_string(),
        };
        assert!(matches!(
            decode_reply(&reply),
            Err(ViewError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_client_sends_configured_shape() {
        let cfg = ViewerConfig {
            request_shape: RequestShape::Flat,
            ..ViewerConfig::default()
        };
        let backend = |url: &Url, body: &str, _timeout: Duration| -> std::result::Result<ProducerReply, String> {
            assert_eq!(url.path(), "/api/parse");
            let v: serde_json::Value = serde_json::from_str(body).unwrap();
            assert_eq!(v["start_symbol"], "S");
            assert_eq!(v["grammar"]["A"][1], "b");
            Ok(ProducerReply {
                status: 200,
                body: r#"{"lr1_sets": [], "parsing_table": {}, "parsing_steps": []}"#.to_string(),
            })
        };
        let client = ParseClient::new(backend, &cfg).unwrap();
        let resp = client.parse(&request()).unwrap();
        assert!(resp.lr1_sets.is_empty());
    }

    #[test]
    fn test_transport_failures() {
        let cfg = ViewerConfig {
            timeout_ms: 1,
            ..ViewerConfig::default()
        };
        let refused = |_: &Url, _: &str, _: Duration| -> std::result::Result<ProducerReply, String> {
            Err("connection refused".to_string())
        };
        let client = ParseClient::new(refused, &cfg).unwrap();
        assert_eq!(
            client.parse(&request()).unwrap_err(),
            ViewError::TransportFailure("connection refused".to_string())
        );

        let slow = |_: &Url, _: &str, _: Duration| -> std::result::Result<ProducerReply, String> {
            std::thread::sleep(Duration::from_millis(20));
            Ok(ProducerReply {
                status: 200,
                body: r#"{"lr1_sets": [], "parsing_table": {}, "parsing_steps": []}"#.to_string(),
            })
        };
        let client = ParseClient::new(slow, &cfg).unwrap();
        assert!(matches!(
            client.parse(&request()),
            Err(ViewError::TransportFailure(_))
        ));
    }
}
