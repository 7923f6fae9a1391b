use std::time::Duration;

use geoguess::{
    GameService, GuessRequest, GuessResponse, GuessScore, Problem, ProblemResponse, ServiceError,
};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::trace;

pub const DEFAULT_API_URL: &str = "http://localhost:8081";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the remote game service over HTTP with JSON bodies.
///
/// Every request is bounded by the timeout given at construction, so a hung
/// service turns into a retryable [`ServiceError::Timeout`].
pub struct HttpService {
    client: Client,
    base_url: String,
}

impl HttpService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("API URL '{}' must start with http:// or https://", base_url);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: String::from(base_url),
        })
    }

    fn perform_request<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ServiceError> {
        let resp = req.send().map_err(transport_error)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(transport_error)?;
        trace!(status, body = %body, "Received response");
        decode_body(status, &body)
    }
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Transport(err.to_string())
    }
}

fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(ServiceError::Status(status));
    }
    serde_json::from_str(body).map_err(|err| ServiceError::MalformedResponse(err.to_string()))
}

impl GameService for HttpService {
    fn fetch_problem(&mut self) -> Result<Problem, ServiceError> {
        let url = format!("{}/problem", self.base_url);
        trace!(%url, "Requesting problem");
        let resp: ProblemResponse = self.perform_request(self.client.get(&url))?;
        Problem::try_from(resp)
    }

    fn score_guess(&mut self, request: &GuessRequest) -> Result<GuessScore, ServiceError> {
        let url = format!("{}/guess", self.base_url);
        trace!(%url, ?request, "Submitting guess");
        let resp: GuessResponse = self.perform_request(self.client.post(&url).json(request))?;
        GuessScore::try_from(resp)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use geoguess::Location;

    use super::*;

    const PROBLEM_BODY: &str = r#"{"image_base64":"QUJD","correct_location":[50.08,14.42],"model_predicted_probabilities":[0.5,0.5],"model_predicted_location":[48.2,16.37],"model_predicted_distance_km":252.6,"model_predicted_score":3040}"#;

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    /// Answers a single request with `response` and hands back what was received.
    fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (url, handle)
    }

    fn service(url: &str) -> HttpService {
        HttpService::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn fetches_problem() {
        let (url, handle) = serve_once(http_response("200 OK", PROBLEM_BODY));
        let problem = service(&url).fetch_problem().unwrap();
        assert_eq!(problem.correct_location, Location::new(50.08, 14.42));
        assert_eq!(problem.opponent_location, Location::new(48.2, 16.37));
        assert_eq!(problem.opponent_score, 3040);

        let request = handle.join().unwrap();
        assert!(request.starts_with("GET /problem HTTP/1.1\r\n"));
    }

    #[test]
    fn posts_guess_latitude_first() {
        let (url, handle) = serve_once(http_response(
            "200 OK",
            r#"{"distance_km": 1090.3, "score": 589}"#,
        ));
        let score = service(&format!("{}/", url))
            .score_guess(&GuessRequest {
                correct_location: Location::new(50.08, 14.42),
                guessed_location: Location::new(41.9, 12.5),
            })
            .unwrap();
        assert_eq!(score.score, 589);
        assert_eq!(score.distance_km, Some(1090.3));

        let request = handle.join().unwrap();
        assert!(request.starts_with("POST /guess HTTP/1.1\r\n"));
        assert!(request.ends_with(
            r#"{"correct_location":[50.08,14.42],"guessed_location":[41.9,12.5]}"#
        ));
    }

    #[test]
    fn error_status_is_reported() {
        let (url, handle) = serve_once(http_response("500 Internal Server Error", "{}"));
        assert_eq!(
            service(&url).fetch_problem(),
            Err(ServiceError::Status(500))
        );
        handle.join().unwrap();
    }

    #[test]
    fn partial_body_is_malformed() {
        let (url, handle) = serve_once(http_response(
            "200 OK",
            r#"{"image_base64":"QUJD","correct_location":[50.08,14.42]}"#,
        ));
        assert!(matches!(
            service(&url).fetch_problem(),
            Err(ServiceError::MalformedResponse(_))
        ));
        handle.join().unwrap();
    }

    #[test]
    fn guess_response_without_score_is_malformed() {
        let (url, handle) = serve_once(http_response("200 OK", r#"{"distance_km": 3.0}"#));
        let result = service(&url).score_guess(&GuessRequest {
            correct_location: Location::new(50.08, 14.42),
            guessed_location: Location::new(50.0, 14.4),
        });
        assert!(matches!(result, Err(ServiceError::MalformedResponse(_))));
        handle.join().unwrap();
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        assert!(matches!(
            service(&url).fetch_problem(),
            Err(ServiceError::Transport(_))
        ));
    }

    #[test]
    fn hung_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(2));
        });
        let mut service = HttpService::new(&url, Duration::from_millis(200)).unwrap();
        assert_eq!(service.fetch_problem(), Err(ServiceError::Timeout));
    }

    #[test]
    fn rejects_url_without_scheme() {
        assert!(HttpService::new("localhost:8081", DEFAULT_TIMEOUT).is_err());
    }

    #[test]
    fn decode_body_checks_status_first() {
        assert_eq!(
            decode_body::<GuessResponse>(404, "not json").unwrap_err(),
            ServiceError::Status(404)
        );
        assert!(matches!(
            decode_body::<GuessResponse>(200, "not json"),
            Err(ServiceError::MalformedResponse(_))
        ));
    }
}
