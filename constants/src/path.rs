/// Tuning table, relative to the asset root.
pub const TUNING_PATH: &str = "tuning/morph_tuning.json";
