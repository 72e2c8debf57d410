//! Command dispatch from the IPC protocol

use glam::DVec3;
use labelpaint_ipc::{
    EngineToUi, IpcError, ModifiedKind, PaintCommand, UiToEngine, decode_ui_message,
};
use tracing::{debug, warn};

use crate::error::PaintError;

use super::PaintEngine;

impl PaintEngine {
    /// Undo/redo availability as an outbound message
    pub fn history_state(&self) -> EngineToUi {
        EngineToUi::HistoryChanged {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Execute one command, returning the messages it produced
    ///
    /// Failures are reported as [`EngineToUi::Error`] rather than returned, so
    /// a bad command never tears down the session.
    pub async fn handle_command(&mut self, command: PaintCommand) -> Vec<EngineToUi> {
        let mut events = Vec::new();
        if let Err(e) = self.dispatch(command, &mut events).await {
            warn!("Paint command failed: {}", e);
            events.push(EngineToUi::Error {
                code: e.code().to_string(),
                message: e.to_string(),
            });
        }
        events
    }

    /// Decode a JSON UI message and execute it
    pub async fn handle_message(&mut self, json: &str) -> Result<Vec<EngineToUi>, IpcError> {
        let UiToEngine::PaintCommand(command) = decode_ui_message(json)?;
        Ok(self.handle_command(command).await)
    }

    async fn dispatch(
        &mut self,
        command: PaintCommand,
        events: &mut Vec<EngineToUi>,
    ) -> Result<(), PaintError> {
        match command {
            PaintCommand::StartStroke => self.start_stroke()?,
            PaintCommand::AddPoint { point } => self.add_point(point),
            PaintCommand::PaintPolygon { points } => {
                let points: Vec<DVec3> = points.into_iter().map(DVec3::from).collect();
                self.paint_polygon(&points)?;
            }
            PaintCommand::PaintRectangle { corner1, corner2 } => {
                self.paint_rectangle(corner1, corner2)
            }
            PaintCommand::PaintEllipse { center, scale } => self.paint_ellipse(center, scale),
            PaintCommand::EndStroke => {
                if let Some(summary) = self.end_stroke().await? {
                    events.push(EngineToUi::Modified {
                        kind: ModifiedKind::Paint,
                        voxel_count: summary.changed,
                    });
                    if summary.filled > 0 {
                        events.push(EngineToUi::Modified {
                            kind: ModifiedKind::Fill,
                            voxel_count: summary.filled,
                        });
                    }
                    events.push(self.history_state());
                }
            }
            PaintCommand::CancelStroke => {
                self.cancel_stroke();
            }
            PaintCommand::Undo => {
                if let Some(voxel_count) = self.undo() {
                    events.push(EngineToUi::Modified {
                        kind: ModifiedKind::Undo,
                        voxel_count,
                    });
                    events.push(self.history_state());
                }
            }
            PaintCommand::Redo => {
                if let Some(voxel_count) = self.redo() {
                    events.push(EngineToUi::Modified {
                        kind: ModifiedKind::Redo,
                        voxel_count,
                    });
                    events.push(self.history_state());
                }
            }
            PaintCommand::ClearHistory => {
                self.clear_history();
                events.push(self.history_state());
            }
            PaintCommand::SetLabel { label } => self.set_label(label),
            PaintCommand::SetRadius { radius } => self.set_radius(radius),
            PaintCommand::SetSlicingMode { mode } => self.set_slicing_mode(mode),
            PaintCommand::SetAutoFillBetweenSlices { enabled } => {
                self.set_auto_fill_between_slices(enabled)
            }
        }
        debug!("Dispatched command, {} events", events.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use labelpaint_config::SlicingMode;

    use super::super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_stroke_via_commands() {
        let mut engine = engine_with_background([4, 4, 4]);
        for command in [
            PaintCommand::SetLabel { label: 7 },
            PaintCommand::SetRadius { radius: 0.5 },
            PaintCommand::StartStroke,
            PaintCommand::AddPoint {
                point: [2.0, 2.0, 2.0],
            },
        ] {
            assert!(engine.handle_command(command).await.is_empty());
        }

        let events = engine.handle_command(PaintCommand::EndStroke).await;
        assert_eq!(
            events,
            vec![
                EngineToUi::Modified {
                    kind: ModifiedKind::Paint,
                    voxel_count: 1
                },
                EngineToUi::HistoryChanged {
                    can_undo: true,
                    can_redo: false
                },
            ]
        );

        let events = engine.handle_command(PaintCommand::Undo).await;
        assert_eq!(events.last(), Some(&EngineToUi::HistoryChanged {
            can_undo: false,
            can_redo: true
        }));
        assert!(engine.handle_command(PaintCommand::Undo).await.is_empty());
    }

    #[tokio::test]
    async fn test_fill_reported_via_commands() {
        let mut engine = engine_with_background([4, 4, 4]);
        engine
            .handle_command(PaintCommand::SetSlicingMode {
                mode: SlicingMode::K,
            })
            .await;
        engine
            .handle_command(PaintCommand::SetAutoFillBetweenSlices { enabled: true })
            .await;
        paint_voxel(&mut engine, 5, [1.0, 1.0, 1.0]).await;

        engine.handle_command(PaintCommand::StartStroke).await;
        engine
            .handle_command(PaintCommand::AddPoint {
                point: [1.0, 1.0, 3.0],
            })
            .await;
        let events = engine.handle_command(PaintCommand::EndStroke).await;
        assert!(events.contains(&EngineToUi::Modified {
            kind: ModifiedKind::Fill,
            voxel_count: 1
        }));
    }

    #[tokio::test]
    async fn test_errors_become_messages() {
        let mut engine = engine_with_background([4, 4, 4]);
        engine.handle_command(PaintCommand::StartStroke).await;
        let events = engine.handle_command(PaintCommand::StartStroke).await;
        assert!(matches!(
            events.as_slice(),
            [EngineToUi::Error { code, .. }] if code == "stroke_in_progress"
        ));

        let events = engine
            .handle_command(PaintCommand::PaintPolygon {
                points: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            })
            .await;
        assert!(matches!(
            events.as_slice(),
            [EngineToUi::Error { code, .. }] if code == "triangulation"
        ));
        assert!(engine.handle_command(PaintCommand::CancelStroke).await.is_empty());
        assert!(!engine.is_stroking());
    }

    #[tokio::test]
    async fn test_handle_message_json() {
        let mut engine = engine_with_background([4, 4, 4]);
        engine
            .handle_message(r#"{"type":"PaintCommand","data":{"SetLabel":{"label":4}}}"#)
            .await
            .unwrap();
        assert_eq!(engine.label(), 4);

        let events = engine
            .handle_message(r#"{"type":"PaintCommand","data":"ClearHistory"}"#)
            .await
            .unwrap();
        assert_eq!(events, vec![engine.history_state()]);

        assert!(matches!(
            engine.handle_message("").await,
            Err(IpcError::InvalidFormat(_))
        ));
    }
}
