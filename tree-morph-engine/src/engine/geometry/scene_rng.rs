use bevy::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use constants::scene::DEFAULT_SCENE_SEED;

/// Random source for formation sampling. Reseeded from the tuning table so a
/// seed always reproduces the same tree.
#[derive(Resource)]
pub struct SceneRng(pub Pcg64Mcg);

impl SceneRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(Pcg64Mcg::seed_from_u64(seed))
    }
}

impl Default for SceneRng {
    fn default() -> Self {
        Self::from_seed(DEFAULT_SCENE_SEED)
    }
}
