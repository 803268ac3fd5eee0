use parley_session::{FrameCodec, InboundFrame, TokenKind, ToolArgs, TranscriptEvent};
use parley_ui::{Applied, StreamingState, Transcript, TranscriptRenderer};
use serde_json::json;

fn content(text: &str) -> TranscriptEvent {
    TranscriptEvent::Token { kind: TokenKind::Content, text: text.to_string() }
}

/// Decode a JSONL script the way a transport would and fold it into `transcript`
fn apply_script(transcript: &mut Transcript, script: &str) {
    let mut codec = FrameCodec::new();
    for line in script.lines() {
        if let Some(InboundFrame::Transcript(event)) = codec.decode_line(line).unwrap() {
            transcript.apply(event);
        }
    }
}

#[test]
fn test_streamed_tokens_then_done() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("say hello");
    transcript.apply(content("Hel"));
    transcript.apply(content("lo"));
    transcript.apply(TranscriptEvent::MessageDone { content: None });

    let assistant = &transcript.turns()[0].assistant;
    assert_eq!(assistant.content, "Hello");
    assert_eq!(assistant.streaming_state, StreamingState::Done);
}

#[test]
fn test_tool_call_with_result() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("find x");
    apply_script(
        &mut transcript,
        r#"{"event":"tool_call","id":"t1","name":"search","args":{"q":"x"}}
{"event":"tool_result","id":"t1","result":"ok"}"#,
    );

    let calls = &transcript.turns()[0].assistant.tool_calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "t1");
    assert_eq!(calls[0].name, "search");
    assert_eq!(serde_json::Value::Object(calls[0].args.clone()), json!({"q": "x"}));
    assert_eq!(calls[0].result.as_deref(), Some("ok"));
}

#[test]
fn test_result_for_missing_tool_call() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("q");
    let applied = transcript.apply(TranscriptEvent::ToolResult { id: "missing".to_string(), result: "ok".to_string() });

    assert_eq!(applied, Applied::Ignored);
    assert!(transcript.turns()[0].assistant.tool_calls.is_empty());
}

#[test]
fn test_interim_draft_then_final_summary() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("summarize");
    apply_script(
        &mut transcript,
        r#"{"event":"begin_interim_stream"}
{"event":"token","type":"content","text":"draft"}
{"event":"begin_final_summary"}
{"event":"token","type":"content","text":"final"}
{"event":"message_done","content":null}"#,
    );

    let assistant = &transcript.turns()[0].assistant;
    assert_eq!(assistant.interim_char_count, 5);
    assert_eq!(assistant.content, "final");
    assert!(assistant.is_done());
}

#[test]
fn test_interleaved_reasoning_and_content() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("think");
    let events = [
        (TokenKind::Reasoning, "a"),
        (TokenKind::Content, "1"),
        (TokenKind::Reasoning, "b"),
        (TokenKind::Content, "2"),
        (TokenKind::Reasoning, "c"),
    ];
    for (kind, text) in events {
        transcript.apply(TranscriptEvent::Token { kind, text: text.to_string() });
    }

    let assistant = &transcript.turns()[0].assistant;
    assert_eq!(assistant.reasoning, "abc");
    assert_eq!(assistant.content, "12");
}

#[test]
fn test_todo_updates_replace_previous_list() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("plan");
    let first = [
        r#"{"event":"todo_list_update","items":["#,
        r#"{"item_number":1,"text":"a","status":"open"},"#,
        r#"{"item_number":2,"text":"b","status":"open"}]}"#,
    ]
    .concat();
    let second = r#"{"event":"todo_list_update","items":[{"itemNumber":7,"text":"z","status":"closed"}]}"#;
    apply_script(&mut transcript, &format!("{}\n{}", first, second));

    let todos = &transcript.turns()[0].todo_items;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].item_number, 7);
    assert!(todos[0].is_closed());
}

#[test]
fn test_full_turn_with_approval_renders() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("remove the temp file");
    apply_script(
        &mut transcript,
        r#"{"event":"token","type":"reasoning","text":"Need to delete it."}
{"event":"approval_request","id":"a1","tool_name":"delete_file","args":{"path":"/tmp/x"}}
{"event":"approval_resolved","id":"a1","approved":true}
{"event":"tool_call","id":"t1","name":"delete_file","args":{"path":"/tmp/x"}}
{"event":"tool_result","id":"t1","result":"deleted"}
{"event":"message_done","content":"Removed /tmp/x."}"#,
    );

    let turn = &transcript.turns()[0];
    assert!(turn.pending_approval().is_none());
    assert!(turn.assistant.is_done());

    let text = TranscriptRenderer::new(&transcript, 60).plain_text();
    insta::assert_snapshot!(text, @r#"
    ● You
    ┃ remove the temp file

    ◆ Assistant
      Need to delete it.
      ⚙ delete_file({"path":"/tmp/x"})
        ↳ deleted
    Removed /tmp/x.
    ? Allow delete_file({"path":"/tmp/x"})
      ✓ approved
    "#);
}

#[test]
fn test_second_turn_ignores_late_events_from_first() {
    let mut transcript = Transcript::new();
    transcript.begin_turn("one");
    transcript.apply(TranscriptEvent::MessageDone { content: Some("first".to_string()) });
    transcript.apply(content(" late"));
    transcript.apply(TranscriptEvent::ToolCall { id: "t".to_string(), name: "x".to_string(), args: ToolArgs::new() });

    transcript.begin_turn("two");
    transcript.apply(content("second"));

    let turns = transcript.turns();
    assert_eq!(turns[0].assistant.content, "first");
    assert!(turns[0].assistant.tool_calls.is_empty());
    assert_eq!(turns[1].assistant.content, "second");
    assert_eq!(transcript.active_turn().map(|t| t.id), Some(turns[1].id));
}
