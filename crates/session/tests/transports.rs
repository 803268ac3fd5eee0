use parley_session::{
    ClientAction, ReplayTransport, SessionEvent, SessionHandle, SessionInfo, TokenKind, TranscriptEvent,
};
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const RECORDING: &str = r#"{"event":"token","type":"content","text":"Hel"}
{"event":"token","type":"content","text":"lo"}
{"event":"message_done","content":null}

this line is not a frame
{"event":"tool_call","id":"t1","name":"search","args":{"q":"x"}}
{"event":"tool_result","id":"t1","result":"ok"}
{"event":"message_done","content":"found it"}
"#;

fn write_recording() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RECORDING.as_bytes()).unwrap();
    file
}

async fn next_event(handle: &mut SessionHandle) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(5), handle.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("session channel closed")
}

#[tokio::test]
async fn test_replay_plays_one_response_per_message() {
    let recording = write_recording();
    let transport = ReplayTransport::new(recording.path(), Duration::ZERO);
    let mut handle = SessionHandle::spawn(Box::new(transport), CancellationToken::new());

    assert_eq!(next_event(&mut handle).await, SessionEvent::Connected);

    handle.send(ClientAction::UserMessage { text: "hi".to_string() }).unwrap();
    assert_eq!(
        next_event(&mut handle).await,
        SessionEvent::Transcript(TranscriptEvent::Token { kind: TokenKind::Content, text: "Hel".to_string() })
    );
    assert_eq!(
        next_event(&mut handle).await,
        SessionEvent::Transcript(TranscriptEvent::Token { kind: TokenKind::Content, text: "lo".to_string() })
    );
    assert_eq!(
        next_event(&mut handle).await,
        SessionEvent::Transcript(TranscriptEvent::MessageDone { content: None })
    );

    // Nothing more is played until the next user message.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.try_recv(), None);

    handle.send(ClientAction::UserMessage { text: "search".to_string() }).unwrap();
    assert!(matches!(
        next_event(&mut handle).await,
        SessionEvent::Transcript(TranscriptEvent::ToolCall { .. })
    ));
    assert!(matches!(
        next_event(&mut handle).await,
        SessionEvent::Transcript(TranscriptEvent::ToolResult { .. })
    ));
    assert_eq!(
        next_event(&mut handle).await,
        SessionEvent::Transcript(TranscriptEvent::MessageDone { content: Some("found it".to_string()) })
    );

    handle.send(ClientAction::UserMessage { text: "more?".to_string() }).unwrap();
    assert!(matches!(
        next_event(&mut handle).await,
        SessionEvent::Transcript(TranscriptEvent::Error { .. })
    ));

    handle.join().await;
}

#[tokio::test]
async fn test_replay_missing_file_disconnects() {
    let transport = ReplayTransport::new("/definitely/not/a/recording.jsonl", Duration::ZERO);
    let mut handle = SessionHandle::spawn(Box::new(transport), CancellationToken::new());

    assert_eq!(next_event(&mut handle).await, SessionEvent::Disconnected);
}

#[tokio::test]
async fn test_replay_cancel_sends_disconnect() {
    let recording = write_recording();
    let cancel = CancellationToken::new();
    let transport = ReplayTransport::new(recording.path(), Duration::ZERO);
    let mut handle = SessionHandle::spawn(Box::new(transport), cancel.clone());

    assert_eq!(next_event(&mut handle).await, SessionEvent::Connected);
    cancel.cancel();
    assert_eq!(next_event(&mut handle).await, SessionEvent::Disconnected);
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_transport_reads_stdout_frames() {
    let script = r#"printf '%s\n' '{"event":"pwd","pwd":"/srv/agent"}'"#;
    let transport = parley_session::ProcessTransport::new("sh", vec!["-c".to_string(), script.to_string()]);
    let mut handle = SessionHandle::spawn(Box::new(transport), CancellationToken::new());

    assert_eq!(next_event(&mut handle).await, SessionEvent::Connected);
    assert_eq!(
        next_event(&mut handle).await,
        SessionEvent::Info(SessionInfo::Pwd { pwd: "/srv/agent".to_string() })
    );
    assert_eq!(next_event(&mut handle).await, SessionEvent::Disconnected);
}
