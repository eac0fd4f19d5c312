//! Input scene model.
//!
//! Scenes and their raw assets are produced upstream (image generation,
//! text-to-speech, narration text) and passed into the assembly pipeline
//! read-only. Nothing in this module does IO.

/// One ordered unit of the story to assemble.
///
/// Indexes are 1-based and must be contiguous across the scene list; this
/// is enforced by [`validate_scene_list`] before assembly starts.
#[derive(Debug, Clone)]
pub struct Scene {
    /// 1-based position of the scene in the story.
    pub index: usize,
    /// Encoded image bytes (JPEG or PNG).
    pub image: Vec<u8>,
    /// Encoded narration audio bytes, if this scene has narration audio.
    pub audio: Option<Vec<u8>>,
    /// Raw narration text, possibly markdown-tagged, if present.
    pub narration: Option<String>,
}

impl Scene {
    pub fn new(index: usize, image: Vec<u8>) -> Self {
        Self {
            index,
            image,
            audio: None,
            narration: None,
        }
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = Some(audio);
        self
    }

    #[must_use]
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }
}

/// Checks that the scene list is non-empty, carries image data, and has
/// contiguous 1-based indexes. Returns a description of the first problem.
pub fn validate_scene_list(scenes: &[Scene]) -> Result<(), String> {
    if scenes.is_empty() {
        return Err("no scenes provided".to_string());
    }
    for (position, scene) in scenes.iter().enumerate() {
        let expected = position + 1;
        if scene.index != expected {
            return Err(format!(
                "scene indexes must be contiguous from 1: expected {expected}, got {}",
                scene.index
            ));
        }
        if scene.image.is_empty() {
            return Err(format!("scene {} has no image data", scene.index));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(index: usize) -> Scene {
        Scene::new(index, vec![0xFF, 0xD8, 0xFF])
    }

    #[test]
    fn test_empty_scene_list_rejected() {
        assert!(validate_scene_list(&[]).is_err());
    }

    #[test]
    fn test_contiguous_indexes_accepted() {
        let scenes = vec![scene(1), scene(2), scene(3)];
        assert!(validate_scene_list(&scenes).is_ok());
    }

    #[test]
    fn test_gap_in_indexes_rejected() {
        let scenes = vec![scene(1), scene(3)];
        let err = validate_scene_list(&scenes).unwrap_err();
        assert!(err.contains("expected 2"));
    }

    #[test]
    fn test_zero_based_indexes_rejected() {
        let scenes = vec![scene(0), scene(1)];
        assert!(validate_scene_list(&scenes).is_err());
    }

    #[test]
    fn test_missing_image_rejected() {
        let scenes = vec![Scene::new(1, Vec::new())];
        let err = validate_scene_list(&scenes).unwrap_err();
        assert!(err.contains("no image data"));
    }

    #[test]
    fn test_builder_attaches_assets() {
        let s = scene(1).with_audio(vec![1, 2, 3]).with_narration("text");
        assert!(s.audio.is_some());
        assert_eq!(s.narration.as_deref(), Some("text"));
    }
}
