use bevy::prelude::*;
use bevy::window::FileDragAndDrop;

use crate::engine::field::elements::PhotoId;
use crate::engine::morph::state_machine::{CommandSource, MorphAction, MorphCommand};
use crate::engine::scene::photo_panels::{PhotoUploadRequest, UploadSource};
use crate::engine::tracking::systems::{TrackingAction, TrackingRequest};

/// Keyboard controls for native builds: Space toggles the formation, T
/// starts or stops hand tracking. On the web the host page drives both over
/// RPC instead.
pub fn keyboard_control_system(
    mut morph_commands: EventWriter<MorphCommand>,
    mut tracking_requests: EventWriter<TrackingRequest>,
    #[cfg(not(target_arch = "wasm32"))] keyboard: Res<ButtonInput<KeyCode>>,
) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if keyboard.just_pressed(KeyCode::Space) {
            morph_commands.write(MorphCommand {
                action: MorphAction::Toggle,
                source: CommandSource::Keyboard,
            });
        }

        if keyboard.just_pressed(KeyCode::KeyT) {
            tracking_requests.write(TrackingRequest {
                action: TrackingAction::Toggle,
            });
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        let _ = (&mut morph_commands, &mut tracking_requests);
    }
}

/// Turns files dropped on the window into photo uploads, keyed by file name.
pub fn file_drop_system(
    mut drops: EventReader<FileDragAndDrop>,
    mut uploads: EventWriter<PhotoUploadRequest>,
) {
    for drop in drops.read() {
        let FileDragAndDrop::DroppedFile { path_buf, .. } = drop else {
            continue;
        };
        let Some(name) = path_buf.file_name().and_then(|name| name.to_str()) else {
            warn!("Ignoring dropped file with a non UTF-8 name: {}", path_buf.display());
            continue;
        };

        uploads.write(PhotoUploadRequest {
            id: PhotoId::from(name),
            url: path_buf.to_string_lossy().into_owned(),
            source: UploadSource::DragAndDrop,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn dropped_files_become_uploads() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<FileDragAndDrop>()
            .add_event::<PhotoUploadRequest>()
            .add_systems(Update, file_drop_system);

        let window = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(FileDragAndDrop::HoveredFile {
            window,
            path_buf: PathBuf::from("/tmp/ignored.png"),
        });
        app.world_mut().send_event(FileDragAndDrop::DroppedFile {
            window,
            path_buf: PathBuf::from("/tmp/holiday.jpg"),
        });
        app.update();

        let events = app.world().resource::<Events<PhotoUploadRequest>>();
        let uploads: Vec<_> = events.iter_current_update_events().collect();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].id, PhotoId::from("holiday.jpg"));
        assert_eq!(uploads[0].url, "/tmp/holiday.jpg");
        assert_eq!(uploads[0].source, UploadSource::DragAndDrop);
    }
}
