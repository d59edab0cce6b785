use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// "src/db/pool.py" -> "pool.py".
pub fn short_path(path: &str) -> &str {
    path.rsplit_once('/').map(|(_, rest)| rest).unwrap_or(path)
}

/// Deterministic pair in [-1, 1] derived from a node id.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_path_takes_last_component() {
        assert_eq!(short_path("src/db/pool.py"), "pool.py");
        assert_eq!(short_path("main.rs"), "main.rs");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x1, y1) = stable_pair("src/app.py::handler");
        let (x2, y2) = stable_pair("src/app.py::handler");
        assert_eq!((x1, y1), (x2, y2));
        assert!((-1.0..=1.0).contains(&x1));
        assert!((-1.0..=1.0).contains(&y1));
    }
}
