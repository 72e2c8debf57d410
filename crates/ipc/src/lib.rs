//! IPC message protocol for the label paint engine
//!
//! Defines the message types exchanged between an interaction layer (mouse
//! and widget handling, not part of this workspace) and the paint engine.
//! Messages are JSON with an adjacently tagged `type`/`data` layout.

mod commands;
mod error;
mod messages;
mod types;

pub use commands::*;
pub use error::*;
pub use messages::*;
pub use types::*;

/// Decode a UI message from JSON
pub fn decode_ui_message(json: &str) -> Result<UiToEngine, IpcError> {
    if json.trim().is_empty() {
        return Err(IpcError::InvalidFormat("empty message".to_string()));
    }
    Ok(serde_json::from_str(json)?)
}

/// Encode an engine message as JSON
pub fn encode_engine_message(message: &EngineToUi) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelpaint_config::SlicingMode;

    #[test]
    fn test_decode_paint_command() {
        let json = r#"{"type":"PaintCommand","data":{"AddPoint":{"point":[1.0,2.0,3.0]}}}"#;
        let msg = decode_ui_message(json).unwrap();
        assert_eq!(
            msg,
            UiToEngine::PaintCommand(PaintCommand::AddPoint {
                point: [1.0, 2.0, 3.0]
            })
        );
    }

    #[test]
    fn test_decode_unit_command() {
        let json = r#"{"type":"PaintCommand","data":"Undo"}"#;
        let UiToEngine::PaintCommand(cmd) = decode_ui_message(json).unwrap();
        assert_eq!(cmd, PaintCommand::Undo);
    }

    #[test]
    fn test_decode_slicing_mode() {
        let json = r#"{"type":"PaintCommand","data":{"SetSlicingMode":{"mode":"J"}}}"#;
        let UiToEngine::PaintCommand(cmd) = decode_ui_message(json).unwrap();
        assert_eq!(cmd, PaintCommand::SetSlicingMode { mode: SlicingMode::J });
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(
            decode_ui_message("   "),
            Err(IpcError::InvalidFormat(_))
        ));
        assert!(matches!(
            decode_ui_message("{not json"),
            Err(IpcError::Serialize(_))
        ));
    }

    #[test]
    fn test_encode_modified() {
        let json = encode_engine_message(&EngineToUi::Modified {
            kind: ModifiedKind::Fill,
            voxel_count: 4,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"Modified","data":{"kind":"Fill","voxel_count":4}}"#
        );
    }
}
