use std::path::PathBuf;

use crate::logging::LoggingConfig;

/// Which demo program to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Demo {
    /// 2D rectangle outline under an orthographic projection
    Rectangle,
    /// Octahedron outline, rotating
    Octahedron,
    /// Cube edges, rotating
    WireCube,
    /// Shaded cube, rotating
    SolidCube,
}

/// Application configuration.
///
/// `shader_dir`, when set, must contain `point.vert` and `point.frag`; the
/// program interface is checked before the first frame.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub demo: Demo,
    pub shader_dir: Option<PathBuf>,
    pub target_fps: u32,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub const VERTEX_SHADER: &'static str = "point.vert";
    pub const FRAGMENT_SHADER: &'static str = "point.frag";

    pub fn shader_paths(&self) -> Option<(PathBuf, PathBuf)> {
        self.shader_dir
            .as_ref()
            .map(|dir| (dir.join(Self::VERTEX_SHADER), dir.join(Self::FRAGMENT_SHADER)))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            demo: Demo::SolidCube,
            shader_dir: None,
            target_fps: 30,
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.demo, Demo::SolidCube);
        assert_eq!(config.target_fps, 30);
        assert!(config.shader_paths().is_none());
    }

    #[test]
    fn test_shader_paths() {
        let config = AppConfig {
            shader_dir: Some(PathBuf::from("shaders")),
            ..AppConfig::default()
        };
        let (vert, frag) = config.shader_paths().unwrap();
        assert_eq!(vert, PathBuf::from("shaders/point.vert"));
        assert_eq!(frag, PathBuf::from("shaders/point.frag"));
    }
}
