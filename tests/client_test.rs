//! Integration tests for the help form talking to a running server

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;

    use clue::client::{HelpClient, HelpForm, View, read_attachment};
    use clue::openai::LanguageModel;

    use crate::test_utils::{FailingModel, StubModel, test_app};

    /// Serves `app` on a random local port and returns its base URL
    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn spawn_with(model: Arc<dyn LanguageModel>) -> HelpClient {
        HelpClient::new(&spawn_server(test_app(model)).await)
    }

    /// Tests a submission round trips through the endpoint
    #[tokio::test]
    async fn it_shows_the_coach_reply() {
        let stub = StubModel::replying(Some("What does your test expect add(2,2) to be?"));
        let client = spawn_with(stub.clone()).await;

        let mut form = HelpForm::new();
        form.set_code("def add(a,b): return a+b\n# test: add(2,2) -> 5");

        assert!(form.submit(&client).await);
        assert_eq!(
            form.view(),
            View::Response("What does your test expect add(2,2) to be?")
        );
        assert!(!form.is_in_flight());
        assert_eq!(stub.call_count(), 1);
    }

    /// Tests attachments reach the model in the order they were added
    #[tokio::test]
    async fn it_sends_attachments_in_order() {
        let stub = StubModel::replying(Some("Check the constraints."));
        let client = spawn_with(stub.clone()).await;

        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("prompt.png");
        let second = dir.path().join("error.jpg");
        std::fs::write(&first, b"first").unwrap();
        std::fs::write(&second, b"second").unwrap();

        let mut form = HelpForm::new();
        form.add_attachments(vec![
            read_attachment(&first).await.unwrap(),
            read_attachment(&second).await.unwrap(),
        ]);
        assert_eq!(form.latest_file_name(), Some("prompt.png"));
        form.submit(&client).await;

        assert_eq!(
            stub.last_request().image_urls(),
            vec!["data:image/png;base64,Zmlyc3Q=", "data:image/jpeg;base64,c2Vjb25k"]
        );
    }

    /// Tests a failed request is shown with the error prefix
    #[tokio::test]
    async fn it_shows_server_errors() {
        let client = spawn_with(Arc::new(FailingModel)).await;

        let mut form = HelpForm::new();
        form.set_ask("why?");
        form.submit(&client).await;

        assert_eq!(form.ai_text(), "Oops — 503 The server is overloaded");
        assert!(form.can_submit());
    }

    /// Tests an unreachable server is shown with the error prefix
    #[tokio::test]
    async fn it_shows_connection_errors() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HelpClient::new(&format!("http://{}", addr));
        let mut form = HelpForm::new();
        form.submit(&client).await;

        assert!(form.ai_text().starts_with("Oops — "));
        assert!(!form.is_in_flight());
    }
}
