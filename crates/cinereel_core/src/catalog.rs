//! Fixed option lists offered to the user.

/// Visual styles a project can be rendered in.
pub const VISUAL_STYLES: &[&str] = &[
    "Cinematic 3D animation, Pixar-like soft lighting",
    "Hand-painted 2D animation, Ghibli-inspired backgrounds",
    "Photorealistic live-action film still",
    "Anime cel shading with bold line art",
    "Claymation stop-motion with tactile textures",
    "Watercolor storybook illustration",
];

/// Target languages for generated scene text.
pub const LANGUAGES: &[&str] = &["Bahasa Melayu", "Bahasa Inggeris", "Bahasa Indonesia"];

/// Language used when the user does not choose one.
pub const DEFAULT_LANGUAGE: &str = "Bahasa Melayu";

/// Messages rotated while a video job is pending.
pub const VIDEO_PROGRESS_MESSAGES: &[&str] = &[
    "Blocking out camera movement...",
    "Bringing character textures to life...",
    "Stabilising cinematic lighting...",
    "Rendering frames per second...",
    "Arranging the visual narrative flow...",
    "Almost ready to watch...",
];
