use crate::Scene;

/// Named scenes in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    scenes: Vec<(String, Scene)>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene, replacing any existing scene with the same name.
    pub fn add_scene(&mut self, name: impl Into<String>, scene: Scene) {
        let name = name.into();
        match self.scenes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = scene,
            None => self.scenes.push((name, scene)),
        }
    }

    pub fn list_scenes(&self) -> Vec<&str> {
        self.scenes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get_scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|(n, _)| n == name).map(|(_, scene)| scene)
    }

    pub fn get_scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|(n, _)| n == name).map(|(_, scene)| scene)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
