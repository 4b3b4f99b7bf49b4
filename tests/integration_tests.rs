//! Integration tests for the agentchat library.
//! These tests run the HTTP client against a local stub of the agent service.

#[cfg(test)]
mod tests {
    use agentchat::chat::{
        ChatSession, RenderOptions, SourceDisclosures, SubmitOutcome, render_transcript,
    };
    use agentchat::{AgentClient, AgentRequest, Error, MessageRole};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    /// What the stub saw for one request.
    #[derive(Debug)]
    struct Captured {
        request_line: String,
        body: String,
    }

    /// Serves one canned `(status, body)` response per connection, in order.
    async fn spawn_stub(
        responses: Vec<(u16, &'static str)>,
    ) -> (String, mpsc::UnboundedReceiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let captured = read_request(&mut stream).await;
                let _ = tx.send(captured);
                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        (format!("http://{addr}"), rx)
    }

    async fn read_request(stream: &mut TcpStream) -> Captured {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                let length = content_length(&head);
                let body_start = end + 4;
                if buf.len() >= body_start + length {
                    return Captured {
                        request_line: head.lines().next().unwrap_or_default().to_string(),
                        body: String::from_utf8_lossy(&buf[body_start..body_start + length])
                            .to_string(),
                    };
                }
            }
        }
        Captured {
            request_line: String::new(),
            body: String::new(),
        }
    }

    fn content_length(head: &str) -> usize {
        head.lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse().ok())
            .unwrap_or(0)
    }

    fn reason(status: u16) -> &'static str {
        match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }

    fn json(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_first_message_creates_thread() {
        let (base, mut seen) = spawn_stub(vec![(200, r#"{"thread_id":"t1","answer":"Hi!"}"#)]).await;
        let client = AgentClient::new(Some(base)).unwrap();

        let reply = client
            .post_message(None, &AgentRequest::new("Hello"))
            .await
            .unwrap();
        assert_eq!(reply.thread_id, "t1");
        assert_eq!(reply.answer, "Hi!");
        assert!(reply.sources.is_none());

        let captured = seen.recv().await.unwrap();
        assert_eq!(captured.request_line, "POST /api/demo-agent HTTP/1.1");
        assert_eq!(json(&captured.body), serde_json::json!({"message": "Hello"}));
    }

    #[tokio::test]
    async fn test_follow_up_continues_thread() {
        let (base, mut seen) = spawn_stub(vec![(
            200,
            r#"{"thread_id":"t1","answer":"Again","sources":[{"title":"Doc","url":"http://x"}]}"#,
        )])
        .await;
        let client = AgentClient::new(Some(format!("{base}/"))).unwrap();

        let reply = client
            .post_message(Some("t1"), &AgentRequest::new("More"))
            .await
            .unwrap();
        let sources = reply.sources.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Doc");
        assert_eq!(sources[0].url, "http://x");

        let captured = seen.recv().await.unwrap();
        assert_eq!(captured.request_line, "POST /api/demo-agent/t1 HTTP/1.1");
        assert_eq!(json(&captured.body), serde_json::json!({"message": "More"}));
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let (base, _seen) = spawn_stub(vec![(500, r#"{"detail":"boom"}"#)]).await;
        let client = AgentClient::new(Some(base)).unwrap();

        let err = client
            .post_message(None, &AgentRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(err.is_request_failure());
        match err {
            Error::Api {
                status_code,
                message,
                ..
            } => {
                assert_eq!(status_code, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_request_failure() {
        let (base, _seen) = spawn_stub(vec![(200, "not json")]).await;
        let client = AgentClient::new(Some(base)).unwrap();

        let err = client
            .post_message(None, &AgentRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
        assert!(err.is_request_failure());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = AgentClient::new(Some(format!("http://{addr}"))).unwrap();

        let err = client
            .post_message(None, &AgentRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(err.is_request_failure());
    }

    #[tokio::test]
    async fn test_ping() {
        let (base, mut seen) = spawn_stub(vec![(200, r#"{"message":"AI Agent Demo API"}"#)]).await;
        let client = AgentClient::new(Some(base)).unwrap();

        assert_eq!(client.ping().await.unwrap(), "AI Agent Demo API");
        let captured = seen.recv().await.unwrap();
        assert_eq!(captured.request_line, "GET / HTTP/1.1");
    }

    #[tokio::test]
    async fn test_session_conversation() {
        let (base, mut seen) = spawn_stub(vec![
            (200, r#"{"thread_id":"t1","answer":"Hi!"}"#),
            (
                200,
                r#"{"thread_id":"t1","answer":"See **Doc**.","sources":[{"title":"Doc","url":"http://x"}]}"#,
            ),
        ])
        .await;
        let client = AgentClient::new(Some(base)).unwrap();
        let mut session = ChatSession::new();

        assert!(session.submit("Hello", &client).await.is_answered());
        assert_eq!(session.thread_id(), Some("t1"));
        assert_eq!(
            seen.recv().await.unwrap().request_line,
            "POST /api/demo-agent HTTP/1.1"
        );

        assert!(session.submit("Cite it", &client).await.is_answered());
        assert_eq!(
            seen.recv().await.unwrap().request_line,
            "POST /api/demo-agent/t1 HTTP/1.1"
        );

        let roles: Vec<MessageRole> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant
            ]
        );
        assert!(session.messages()[3].has_sources());
        assert!(!session.is_pending());

        let lines = render_transcript(
            session.messages(),
            session.is_pending(),
            &SourceDisclosures::new(),
            &RenderOptions::new().with_color(false),
        );
        assert!(lines.contains(&"See Doc.".to_string()));
        assert!(lines.contains(&"▸ Show Sources (1)".to_string()));
    }

    #[tokio::test]
    async fn test_session_failure_keeps_transcript() {
        let (base, _seen) = spawn_stub(vec![(503, "unavailable")]).await;
        let client = AgentClient::new(Some(base)).unwrap();
        let mut session = ChatSession::new();

        let outcome = session.submit("Hello", &client).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(Error::Api { status_code: 503, .. })));
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.thread_id(), None);
        assert!(!session.is_pending());

        let lines = render_transcript(
            session.messages(),
            session.is_pending(),
            &SourceDisclosures::new(),
            &RenderOptions::new().with_color(false),
        );
        assert!(lines.last().unwrap().ends_with("(no reply)"));
    }
}
