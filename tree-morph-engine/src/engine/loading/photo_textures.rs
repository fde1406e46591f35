use std::collections::HashMap;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::field::elements::{PhotoId, TextureRef};
use crate::engine::field::morph_field::MorphField;

/// Image and material of one panel's picture while its load is tracked.
pub struct PhotoTexture {
    pub image: Handle<Image>,
    pub material: Handle<StandardMaterial>,
}

/// Panel textures still loading. Entries leave once they resolve.
#[derive(Resource, Default)]
pub struct PhotoTextures {
    pending: HashMap<PhotoId, PhotoTexture>,
}

impl PhotoTextures {
    pub fn track(&mut self, id: PhotoId, texture: PhotoTexture) {
        self.pending.insert(id, texture);
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Fired when a panel's texture resolves either way.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PhotoTextureStateChanged {
    pub id: PhotoId,
    pub state: TextureRef,
}

// Check panel textures every frame without waiting on any of them
pub fn check_photo_texture_loading(
    mut textures: ResMut<PhotoTextures>,
    mut field: ResMut<MorphField>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    mut changed: EventWriter<PhotoTextureStateChanged>,
) {
    if textures.pending.is_empty() {
        return;
    }

    let mut resolved = Vec::new();
    for (id, texture) in &textures.pending {
        let state = match asset_server.get_load_state(&texture.image) {
            Some(LoadState::Loaded) => TextureRef::Loaded,
            Some(LoadState::Failed(error)) => {
                warn!("Photo '{id}' texture failed, keeping placeholder: {error}");
                TextureRef::Failed
            }
            _ => continue,
        };

        if state == TextureRef::Loaded {
            if let Some(material) = materials.get_mut(&texture.material) {
                material.base_color = Color::WHITE;
                material.base_color_texture = Some(texture.image.clone());
            }
        }

        if field.set_texture_state(id, state) {
            changed.write(PhotoTextureStateChanged {
                id: id.clone(),
                state,
            });
        }
        resolved.push(id.clone());
    }

    for id in resolved {
        textures.pending.remove(&id);
    }
}
