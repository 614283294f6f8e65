//! Interactive and one-shot chat.

use std::io::Write;

use color_eyre::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

use super::output::PrintSink;
use crate::client::AssistantClient;
use crate::error::ChatResult;
use crate::session::ConversationSession;
use crate::sse::StreamOutcome;
use crate::traits::{HttpClient, ReplySink};

/// What a line typed at the chat prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    Send(String),
    NewConversation,
    Quit,
    Skip,
}

/// Classify one input line.
pub fn classify_line(line: &str) -> LineAction {
    match line.trim() {
        "" => LineAction::Skip,
        "/quit" | "/exit" => LineAction::Quit,
        "/new" => LineAction::NewConversation,
        text => LineAction::Send(text.to_string()),
    }
}

/// Interrupt requests, one `()` per Ctrl+C.
pub type Interrupts = UnboundedReceiver<()>;

/// Forward every Ctrl+C for the rest of the process to one channel.
///
/// tokio's SIGINT handler stays installed once registered, so this must be
/// called at most once per process.
pub fn ctrl_c_interrupts() -> Interrupts {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Send one message; an interrupt during the reply cancels it.
pub async fn send_interruptible<C, S>(
    client: &AssistantClient<C>,
    session: &mut ConversationSession,
    message: &str,
    sink: &mut S,
    interrupts: &mut Interrupts,
) -> ChatResult<StreamOutcome>
where
    C: HttpClient,
    S: ReplySink + ?Sized,
{
    let cancel = CancellationToken::new();
    let send = client.send_message(session, message, sink, &cancel);
    tokio::pin!(send);

    loop {
        tokio::select! {
            result = &mut send => return result,
            Some(()) = interrupts.recv() => {
                tracing::debug!("Interrupt while streaming; cancelling reply");
                cancel.cancel();
            }
        }
    }
}

/// Read lines from `input` and chat until it ends, `/quit` or an interrupt
/// at the prompt.
///
/// An interrupt while a reply is streaming cancels only that reply. Send
/// failures are reported and the loop carries on; the conversation is left
/// as it was so the user can simply resend.
pub async fn chat_loop<C, R, O, E>(
    client: &AssistantClient<C>,
    session: &mut ConversationSession,
    input: R,
    sink: &mut PrintSink<O, E>,
    interrupts: &mut Interrupts,
) -> Result<()>
where
    C: HttpClient,
    R: AsyncBufRead + Unpin,
    O: Write + Send,
    E: Write + Send,
{
    let mut lines = input.lines();

    loop {
        eprint!("> ");
        let line = tokio::select! {
            line = lines.next_line() => line?,
            Some(()) = interrupts.recv() => {
                eprintln!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        match classify_line(&line) {
            LineAction::Skip => continue,
            LineAction::Quit => break,
            LineAction::NewConversation => {
                session.reset();
                eprintln!("Started a new conversation with {}.", session.assistant());
            }
            LineAction::Send(message) => {
                match send_interruptible(client, session, &message, sink, interrupts).await {
                    Ok(StreamOutcome::Cancelled) => {
                        sink.finish_line();
                        eprintln!("[cancelled]");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        sink.finish_line();
                        tracing::warn!(code = err.error_code(), error = %err, "Send failed");
                        eprintln!("Error: {}", err.user_message());
                    }
                }
            }
        }
    }

    Ok(())
}

/// Send a single message and print the reply.
pub async fn one_shot<C: HttpClient>(
    client: &AssistantClient<C>,
    session: &mut ConversationSession,
    message: &str,
    interrupts: &mut Interrupts,
) -> Result<()> {
    let mut sink = PrintSink::stdio();
    let outcome = send_interruptible(client, session, message, &mut sink, interrupts).await?;
    if outcome.is_cancelled() {
        sink.finish_line();
    }
    outcome.into_result()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse, StreamEnd};
    use crate::config::ClientConfig;

    fn test_client() -> (AssistantClient<MockHttpClient>, MockHttpClient) {
        let mock = MockHttpClient::new();
        let client = AssistantClient::with_http(
            &ClientConfig::default().with_base_url("http://test"),
            mock.clone(),
        );
        (client, mock)
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line("  "), LineAction::Skip);
        assert_eq!(classify_line("/quit"), LineAction::Quit);
        assert_eq!(classify_line(" /new "), LineAction::NewConversation);
        assert_eq!(classify_line(" hi "), LineAction::Send("hi".to_string()));
    }

    #[tokio::test]
    async fn test_chat_loop_new_conversation_and_quit() {
        let (client, mock) = test_client();
        mock.enqueue_response(
            MockResponse::stream(["data: Hi\ndata: [DONE]\n"]).with_header("X-Conversation-Id", "c1"),
        );
        mock.enqueue_response(
            MockResponse::stream(["data: Ho\ndata: [DONE]\n"]).with_header("X-Conversation-Id", "c2"),
        );

        let mut session = client.new_session("helper");
        let mut sink = PrintSink::new(Vec::new(), Vec::new());
        let input: &[u8] = b"hello\n\n/new\nagain\n/quit\nnever sent\n";

        let (_tx, mut interrupts) = mpsc::unbounded_channel();

        chat_loop(&client, &mut session, input, &mut sink, &mut interrupts)
            .await
            .unwrap();

        let (out, _) = sink.into_parts();
        assert_eq!(String::from_utf8(out).unwrap(), "Hi\nHo\n");

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[1].url.contains("conversation_id"));
        assert_eq!(session.conversation_id(), Some("c2"));
    }

    #[tokio::test]
    async fn test_chat_loop_survives_transport_error() {
        let (client, mock) = test_client();
        mock.enqueue_response(MockResponse::Error(crate::traits::HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        mock.enqueue_response(MockResponse::stream(["data: ok\ndata: [DONE]\n"]));

        let mut session = client.new_session("helper");
        let mut sink = PrintSink::new(Vec::new(), Vec::new());
        let input: &[u8] = b"first\nsecond\n";
        let (_tx, mut interrupts) = mpsc::unbounded_channel();

        chat_loop(&client, &mut session, input, &mut sink, &mut interrupts)
            .await
            .unwrap();

        let (out, _) = sink.into_parts();
        assert_eq!(String::from_utf8(out).unwrap(), "ok\n");
        assert_eq!(session.exchanges(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_at_idle_prompt_ends_loop() {
        let (client, mock) = test_client();
        let mut session = client.new_session("helper");
        let mut sink = PrintSink::new(Vec::new(), Vec::new());

        // Input that never produces a line: the writer stays open.
        let (_writer, reader) = tokio::io::duplex(64);
        let input = tokio::io::BufReader::new(reader);

        let (tx, mut interrupts) = mpsc::unbounded_channel();
        tx.send(()).unwrap();

        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            chat_loop(&client, &mut session, input, &mut sink, &mut interrupts),
        )
        .await
        .expect("loop should end on interrupt")
        .unwrap();

        assert!(mock.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_interrupt_while_streaming_cancels_only_that_reply() {
        let (client, mock) = test_client();
        mock.enqueue_response(MockResponse::stream(["data: par\n"]).ending_with(StreamEnd::Hang));
        mock.enqueue_response(MockResponse::stream(["data: ok\ndata: [DONE]\n"]));

        let (tx, mut interrupts) = mpsc::unbounded_channel();
        let interrupter = {
            let mock = mock.clone();
            tokio::spawn(async move {
                // Wait until the first reply has started streaming.
                while mock
                    .stream_trackers()
                    .first()
                    .map_or(true, |tracker| tracker.chunks_read() == 0)
                {
                    tokio::task::yield_now().await;
                }
                tx.send(()).unwrap();
                tx
            })
        };

        let mut session = client.new_session("helper");
        let mut sink = PrintSink::new(Vec::new(), Vec::new());
        let input: &[u8] = b"first\nsecond\n";

        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            chat_loop(&client, &mut session, input, &mut sink, &mut interrupts),
        )
        .await
        .expect("interrupt should cancel the hanging reply")
        .unwrap();
        let _tx = interrupter.await.unwrap();

        let (out, _) = sink.into_parts();
        assert_eq!(String::from_utf8(out).unwrap(), "par\nok\n");
        assert_eq!(mock.get_requests().len(), 2);
        assert!(mock.stream_trackers()[0].is_released());
        assert_eq!(session.exchanges(), 1);
        assert_eq!(session.reply(), "ok");
    }

    #[tokio::test]
    async fn test_send_without_interrupt_completes() {
        let (client, mock) = test_client();
        mock.enqueue_response(MockResponse::stream(["data: done\ndata: [DONE]\n"]));

        let mut session = client.new_session("helper");
        let mut events = Vec::new();
        let (tx, mut interrupts) = mpsc::unbounded_channel::<()>();
        drop(tx);

        let outcome = send_interruptible(&client, &mut session, "hi", &mut events, &mut interrupts)
            .await
            .unwrap();
        assert_eq!(outcome, StreamOutcome::Completed);
        assert_eq!(session.exchanges(), 1);
    }
}
