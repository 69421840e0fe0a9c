//! End-to-end tests for terminal synchronization.
//!
//! These drive the real `Terminal` adapter through complete ticks against an
//! in-memory endpoint and against files in a temporary directory, acting as
//! the human editor between ticks.

use tempfile::TempDir;

use terminal_sync_core::endpoint::{FileEndpoint, MemoryEndpoint, TextEndpoint};
use terminal_sync_core::packet::Packet;
use terminal_sync_core::schema;
use terminal_sync_core::store::{KeyValueStore, Vector2};
use terminal_sync_core::sync::{SyncOutcome, SyncProtocol, Terminal};

// ===========================================================================
// Helpers
// ===========================================================================

fn packet_with_text(text: &str) -> Packet {
    let mut packet = Packet::new();
    packet.set_text(text);
    packet
}

fn terminal_with(local: Packet, external: &str) -> Terminal<MemoryEndpoint> {
    Terminal::with_packet(MemoryEndpoint::new(external), local)
}

// ===========================================================================
// Store properties
// ===========================================================================

#[test]
fn test_round_trip_of_populated_packet() {
    let mut packet = Packet::new();
    packet.set_text("> run diagnostics\n> status");
    packet.set_carriage_index(12);
    packet.set_size(Vector2::new(0.4, 0.2));
    packet.set_special_keys(["Shift"]);
    packet.set_general_keys(["W", "A"]);
    packet.flag_error("sensor offline");

    let text = packet.serialize();
    let parsed = KeyValueStore::parse(&text).expect("canonical text must parse");
    assert_eq!(&parsed, packet.store());
    assert_eq!(parsed.serialize(), text);
}

#[test]
fn test_round_trip_of_awkward_packet_fields() {
    let texts = ["a\r\nb", "x\r", "   ", "\t indented\r\n"];
    for text in texts {
        let mut packet = packet_with_text(text);
        packet.set_special_keys(["|", "[", ";", "=", " "]);
        packet.set_general_keys(["a=b", "Last Error"]);
        packet.set_user(" padded user ");

        let serialized = packet.serialize();
        let parsed = KeyValueStore::parse(&serialized).expect("canonical text must parse");
        assert_eq!(&parsed, packet.store(), "text: {serialized:?}");
        assert_eq!(parsed.serialize(), serialized);
    }
}

#[test]
fn test_unrelated_edit_keeps_carriage_returns_in_text() {
    let local = packet_with_text("a\r\nb");
    let edited = local.serialize().replace("Alpha=1", "Alpha=0.5");
    let mut terminal = terminal_with(local, &edited);

    assert_eq!(terminal.tick().unwrap(), SyncOutcome::Synchronized);
    assert_eq!(terminal.packet().text(), "a\r\nb");
    assert_eq!(terminal.packet().alpha(), 0.5);
    assert_eq!(terminal.endpoint().text(), edited);
}

#[test]
fn test_edit_after_reserved_key_names_is_not_rejected() {
    let mut local = Packet::new();
    local.set_special_keys(["|", "["]);
    let edited = local.serialize().replace("User=PLACEHOLDERUSER", "User=operator");
    let mut terminal = terminal_with(local, &edited);

    assert_eq!(terminal.tick().unwrap(), SyncOutcome::Synchronized);
    assert_eq!(terminal.packet().user(), "operator");
    assert_eq!(terminal.packet().special_keys(), vec!["|", "["]);
}

#[test]
fn test_reconcile_is_idempotent_on_own_text() {
    let mut local = packet_with_text("hello").into_store();
    let before = local.clone();
    let text = local.serialize();

    assert_eq!(SyncProtocol::reconcile(&mut local, &text), SyncOutcome::NoChange);
    assert_eq!(local, before);
}

#[test]
fn test_vector_decode_is_fail_safe() {
    let mut store = KeyValueStore::new();
    store.set(schema::UI, schema::SIZE, "garbage");
    assert_eq!(store.get_as_vector2(schema::UI, schema::SIZE), Vector2::default());
}

// ===========================================================================
// Adapter behaviour
// ===========================================================================

#[test]
fn test_identical_text_returns_false_without_write() {
    let external = Packet::new().serialize();
    let mut terminal = terminal_with(Packet::new(), &external);

    assert!(!terminal.update().unwrap());
    assert!(terminal.endpoint().writes().is_empty());
}

#[test]
fn test_stale_text_is_merged_and_pushed_once() {
    let stale = packet_with_text("old").serialize();
    let mut terminal = terminal_with(packet_with_text("new"), &stale);

    assert!(!terminal.update().unwrap());

    let writes = terminal.endpoint().writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0], terminal.packet().serialize());

    // The pushed text is now the canonical form; the next tick is quiet.
    assert_eq!(terminal.tick().unwrap(), SyncOutcome::NoChange);
    assert_eq!(terminal.endpoint().writes().len(), 1);
}

#[test]
fn test_text_edit_is_copied_into_local_state() {
    let mut terminal = terminal_with(packet_with_text("hello"), "");
    let edited = packet_with_text("hello world").serialize();
    terminal.endpoint_mut().edit(edited.clone());

    assert_eq!(terminal.tick().unwrap(), SyncOutcome::Synchronized);
    assert_eq!(terminal.packet().text(), "hello world");
    assert_eq!(terminal.endpoint().text(), edited);
}

#[test]
fn test_edit_with_unknown_keys_is_accepted_without_write() {
    let mut external = packet_with_text("hello world");
    external.set_special_keys(["Enter"]);
    let external_text = external.serialize();

    let mut terminal = terminal_with(packet_with_text("hello"), &external_text);

    assert!(terminal.update().unwrap());
    assert_eq!(terminal.packet().text(), "hello world");
    assert!(terminal.packet().special_keys().is_empty());
    assert!(terminal.endpoint().writes().is_empty());
    assert_eq!(terminal.endpoint().text(), external_text);
}

#[test]
fn test_malformed_text_is_rejected() {
    let mut terminal = terminal_with(packet_with_text("hello"), "not an ini document {{{");

    assert!(!terminal.update().unwrap());
    assert_eq!(terminal.packet(), &packet_with_text("hello"));
    assert!(terminal.endpoint().writes().is_empty());
    assert_eq!(terminal.endpoint().text(), "not an ini document {{{");
}

#[test]
fn test_reads_external_text_once_per_tick() {
    let mut terminal = terminal_with(Packet::new(), "");
    for _ in 0..3 {
        terminal.tick().unwrap();
    }
    assert_eq!(terminal.endpoint().reads(), 3);
}

#[test]
fn test_half_typed_edit_then_completed_edit() {
    let mut terminal = terminal_with(Packet::new(), &Packet::new().serialize());

    // The human is mid-edit and the header is broken.
    let broken = Packet::new().serialize().replace("[States]", "[States");
    terminal.endpoint_mut().edit(broken);
    assert!(matches!(terminal.tick().unwrap(), SyncOutcome::Rejected(_)));
    assert_eq!(terminal.packet(), &Packet::new());

    // The edit is finished.
    terminal
        .endpoint_mut()
        .edit(packet_with_text("fixed").serialize());
    assert_eq!(terminal.tick().unwrap(), SyncOutcome::Synchronized);
    assert_eq!(terminal.packet().text(), "fixed");
}

#[test]
fn test_local_change_reaches_endpoint_after_flag_error() {
    let mut terminal = terminal_with(Packet::new(), &Packet::new().serialize());
    assert_eq!(terminal.tick().unwrap(), SyncOutcome::NoChange);

    terminal.packet_mut().flag_error("disk full");
    terminal.push().unwrap();

    let pushed = KeyValueStore::parse(terminal.endpoint().text()).unwrap();
    assert_eq!(pushed.get(schema::DEBUG, schema::ERROR_COUNT), Ok("1"));
    assert_eq!(pushed.get(schema::DEBUG, schema::LAST_ERROR), Ok("disk full"));
    assert_eq!(terminal.tick().unwrap(), SyncOutcome::NoChange);
}

// ===========================================================================
// File-backed endpoint
// ===========================================================================

#[test]
fn test_file_endpoint_full_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom_data.ini");
    let mut terminal = Terminal::new(FileEndpoint::new(&path));

    // Missing file reads as empty text, which parses to an empty document.
    assert_eq!(terminal.tick().unwrap(), SyncOutcome::Accepted);
    assert!(!path.exists());

    terminal.push().unwrap();
    assert_eq!(terminal.tick().unwrap(), SyncOutcome::NoChange);

    // A human edits the file by hand, keeping the schema.
    let on_disk = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, on_disk.replace("Text=", "Text=ping")).unwrap();

    assert_eq!(terminal.tick().unwrap(), SyncOutcome::Synchronized);
    assert_eq!(terminal.packet().text(), "ping");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        terminal.packet().serialize()
    );
}

#[test]
fn test_endpoint_by_mutable_reference() {
    let mut endpoint = MemoryEndpoint::new("");
    {
        let mut terminal = Terminal::new(&mut endpoint);
        terminal.push().unwrap();
    }
    assert_eq!(endpoint.get_text().unwrap(), Packet::new().serialize());
}
