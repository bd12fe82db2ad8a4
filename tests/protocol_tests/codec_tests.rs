//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use cruddy::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, Response, Status, HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use cruddy::store::Record;
use cruddy::TodoError;

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_each_command() {
    let commands = vec![
        Command::Create {
            text: "walk the dog".to_string(),
        },
        Command::ReadAll,
        Command::ReadOne {
            id: "00001".to_string(),
        },
        Command::Update {
            id: "00001".to_string(),
            text: "walk the cat".to_string(),
        },
        Command::Delete {
            id: "00001".to_string(),
        },
        Command::Ping,
    ];

    for cmd in commands {
        let decoded = decode_command(&encode_command(&cmd)).unwrap();
        assert_eq!(decoded, cmd);
    }
}

#[test]
fn test_create_header_layout() {
    let encoded = encode_command(&Command::Create {
        text: "hi".to_string(),
    });

    assert_eq!(encoded[0], 0x01);
    assert_eq!(&encoded[1..5], &2u32.to_be_bytes());
    assert_eq!(&encoded[HEADER_SIZE..], b"hi");
}

#[test]
fn test_update_with_empty_text() {
    let cmd = Command::Update {
        id: "00003".to_string(),
        text: String::new(),
    };

    assert_eq!(decode_command(&encode_command(&cmd)).unwrap(), cmd);
}

#[test]
fn test_update_text_containing_length_like_bytes() {
    let cmd = Command::Update {
        id: "00003".to_string(),
        text: "\u{0}\u{0}\u{0}\u{5}multi\nline".to_string(),
    };

    assert_eq!(decode_command(&encode_command(&cmd)).unwrap(), cmd);
}

// =============================================================================
// Malformed Command Tests
// =============================================================================

#[test]
fn test_decode_incomplete_header() {
    let result = decode_command(&[0x01, 0x00]);
    assert!(matches!(result, Err(TodoError::Protocol(_))));
}

#[test]
fn test_decode_incomplete_payload() {
    let mut encoded = encode_command(&Command::Create {
        text: "truncated".to_string(),
    });
    encoded.truncate(encoded.len() - 3);

    assert!(matches!(decode_command(&encoded), Err(TodoError::Protocol(_))));
}

#[test]
fn test_decode_unknown_command() {
    let bytes = [0x7F, 0, 0, 0, 0];
    assert!(matches!(decode_command(&bytes), Err(TodoError::Protocol(_))));
}

#[test]
fn test_decode_ping_with_payload() {
    let bytes = [0x06, 0, 0, 0, 1, b'x'];
    assert!(matches!(decode_command(&bytes), Err(TodoError::Protocol(_))));
}

#[test]
fn test_decode_update_id_length_overrun() {
    // id_len says 100 but only 2 bytes follow
    let mut bytes = vec![0x04, 0, 0, 0, 6];
    bytes.extend_from_slice(&100u32.to_be_bytes());
    bytes.extend_from_slice(b"ab");

    assert!(matches!(decode_command(&bytes), Err(TodoError::Protocol(_))));
}

#[test]
fn test_decode_invalid_utf8() {
    let bytes = [0x01, 0, 0, 0, 2, 0xFF, 0xFE];
    assert!(matches!(decode_command(&bytes), Err(TodoError::Protocol(_))));
}

#[test]
fn test_decode_payload_too_large() {
    let mut bytes = vec![0x01];
    bytes.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());

    assert!(matches!(decode_command(&bytes), Err(TodoError::Protocol(_))));
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_encode_decode_record_response() {
    let record = Record::new("00007", "feed the fish");
    let response = Response::record(&record).unwrap();

    let decoded = decode_response(&encode_response(&response)).unwrap();
    assert_eq!(decoded.status, Status::Ok);

    let payload = decoded.payload.unwrap();
    let back: Record = bincode::deserialize(&payload).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_not_found_response_carries_message() {
    let response = Response::not_found("No item with id: 00017");
    let decoded = decode_response(&encode_response(&response)).unwrap();

    assert_eq!(decoded.status, Status::NotFound);
    assert_eq!(decoded.message(), "No item with id: 00017");
}

#[test]
fn test_empty_ok_response() {
    let decoded = decode_response(&encode_response(&Response::ok(None))).unwrap();

    assert_eq!(decoded.status, Status::Ok);
    assert!(decoded.payload.is_none());
}

#[test]
fn test_decode_unknown_status() {
    let bytes = [0x09, 0, 0, 0, 0];
    assert!(matches!(decode_response(&bytes), Err(TodoError::Protocol(_))));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_multiple_commands() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, &Command::Ping).unwrap();
    write_command(
        &mut buffer,
        &Command::Delete {
            id: "00002".to_string(),
        },
    )
    .unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_command(&mut cursor).unwrap(), Command::Ping);
    assert_eq!(
        read_command(&mut cursor).unwrap(),
        Command::Delete {
            id: "00002".to_string()
        }
    );

    // Stream exhausted
    assert!(matches!(read_command(&mut cursor), Err(TodoError::Io(_))));
}

#[test]
fn test_stream_response() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::error("boom")).unwrap();

    let mut cursor = Cursor::new(buffer);
    let response = read_response(&mut cursor).unwrap();

    assert_eq!(response.status, Status::Error);
    assert_eq!(response.message(), "boom");
}
